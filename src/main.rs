use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use mna_scout::{
    configuration::get_configuration,
    startup::{build_scout, run},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    let scout = build_scout(&configuration)?;

    run(listener, scout)?.await?;

    Ok(())
}
