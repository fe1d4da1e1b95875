use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use mna_scout::{
    configuration::get_configuration,
    domain::{Profile, ScoutingParams, RESULTS_FILENAME},
    startup::build_scout,
};

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Buyers,
    Sellers,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Buyers => Profile::Buyers,
            ProfileArg::Sellers => Profile::Sellers,
        }
    }
}

/// Run one M&A scouting pass and save the prospects as CSV.
#[derive(Parser)]
#[command(name = "scout-batch", version)]
struct Args {
    /// Which side of the deal to look for
    #[arg(long, value_enum, ignore_case = true, default_value = "buyers")]
    profile: ProfileArg,

    #[arg(long, default_value = "")]
    industry: String,

    #[arg(long, default_value = "")]
    technology: String,

    #[arg(long, default_value = "")]
    region: String,

    #[arg(long, default_value = "")]
    deal_size: String,

    /// Comma-separated extra keywords
    #[arg(long, default_value = "")]
    keywords: String,

    /// Search results to consider per query (defaults to configuration)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    limit: Option<u32>,

    #[arg(long, default_value = RESULTS_FILENAME)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let configuration = get_configuration().context("Failed to read configuration.")?;

    let scout = build_scout(&configuration)?;
    let params = ScoutingParams {
        profile: args.profile.into(),
        industry: args.industry,
        technology: args.technology,
        region: args.region,
        deal_size: args.deal_size,
        additional_keywords: args.keywords,
        per_query_limit: args
            .limit
            .map(|limit| limit as usize)
            .unwrap_or(scout.default_limit()),
    };

    let result_set = scout.run(&params).await?;

    if result_set.is_empty() {
        println!("No prospects found.");
    } else {
        result_set.save_csv(&args.output)?;
        println!(
            "Saved {} records to {}",
            result_set.len(),
            args.output.display()
        );
    }

    Ok(())
}
