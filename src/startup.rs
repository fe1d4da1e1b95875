use std::{net::TcpListener, sync::Arc};

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    configuration::Settings,
    routes::{default_route, scout_route},
    services::{
        ContentFetcher, GoogleSearch, HttpContentFetcher, LlmCollaborator, OpenaiClient, RunCache,
        Scout, WebSearch,
    },
};

/// Wires the concrete collaborators. A missing API key leaves the LLM
/// unavailable; runs then fail with a configuration error.
pub fn build_scout(configuration: &Settings) -> anyhow::Result<Scout> {
    let search: Arc<dyn WebSearch> = Arc::new(GoogleSearch::new(&configuration.search)?);
    let fetcher: Arc<dyn ContentFetcher> =
        Arc::new(HttpContentFetcher::new(configuration.fetcher.timeout())?);
    let llm = OpenaiClient::from_settings(&configuration.api_keys, &configuration.openai)
        .map(|client| Arc::new(client) as Arc<dyn LlmCollaborator>);

    Ok(Scout::new(
        search,
        fetcher,
        llm,
        configuration.scout.url_delay(),
    )
    .with_default_limit(configuration.scout.per_query_limit))
}

pub fn run(listener: TcpListener, scout: Scout) -> Result<Server, std::io::Error> {
    let scout = web::Data::new(scout);
    let run_cache = Data::new(RunCache::default());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(default_route::default)
            .service(
                web::scope("/scout")
                    .service(scout_route::run_scouting)
                    .service(scout_route::download_results),
            )
            .app_data(scout.clone())
            .app_data(run_cache.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
