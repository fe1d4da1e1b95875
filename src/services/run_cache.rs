use std::{collections::HashMap, sync::Mutex};

use uuid::Uuid;

use crate::domain::ResultSet;

const CACHE_RESET_LEN: usize = 100;

/// Finished runs kept in memory so the results page can offer a download.
#[derive(Default)]
pub struct RunCache {
    runs: Mutex<HashMap<Uuid, ResultSet>>,
}

impl RunCache {
    pub fn insert(&self, result_set: ResultSet) -> Uuid {
        let run_id = Uuid::new_v4();
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());

        // TODO: Evict the oldest run instead of dropping everything
        if runs.len() >= CACHE_RESET_LEN {
            log::info!("Run cache reached {} entries, clearing", runs.len());
            runs.clear();
        }
        runs.insert(run_id, result_set);

        run_id
    }

    pub fn get(&self, run_id: &Uuid) -> Option<ResultSet> {
        self.runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(run_id)
            .cloned()
    }
}
