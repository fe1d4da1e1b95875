use std::{collections::HashMap, fs::File, io::Write, path::Path};

use anyhow::Context;
use itertools::Itertools;

use super::company_record::CompanyRecord;

pub const RESULTS_FILENAME: &str = "mna_results.csv";

/// Records of one scouting run, in the order they were emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<CompanyRecord>,
}

impl ResultSet {
    pub fn push(&mut self, record: CompanyRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of every field seen across rows, in order of first appearance.
    pub fn columns(&self) -> Vec<&'static str> {
        self.records
            .iter()
            .flat_map(|record| record.fields().into_iter().map(|(name, _)| name))
            .unique()
            .collect()
    }

    /// One row per record aligned to [`ResultSet::columns`]; missing cells are empty.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();

        self.records
            .iter()
            .map(|record| {
                let mut cells: HashMap<&str, String> = record.fields().into_iter().collect();
                columns
                    .iter()
                    .map(|column| cells.remove(column).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<W> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let columns = self.columns();
        if !columns.is_empty() {
            csv_writer.write_record(columns)?;
        }
        for row in self.rows() {
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;

        csv_writer
            .into_inner()
            .map_err(|e| e.into_error())
            .context("Failed to finish csv output")
    }

    pub fn to_csv_bytes(&self) -> anyhow::Result<Vec<u8>> {
        self.write_csv(Vec::new())
    }

    pub fn save_csv(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_csv(file)?;
        Ok(())
    }
}
