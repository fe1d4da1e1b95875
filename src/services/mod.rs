pub mod content_fetcher;
pub mod extractor;
pub mod openai_client;
pub mod query_builder;
pub mod run_cache;
pub mod scout;
pub mod web_search;

pub use content_fetcher::*;
pub use extractor::*;
pub use openai_client::*;
pub use query_builder::*;
pub use run_cache::*;
pub use scout::*;
pub use web_search::*;
