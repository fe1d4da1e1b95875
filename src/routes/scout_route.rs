use actix_web::{get, http::header, http::StatusCode, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::{Profile, ScoutingParams, RESULTS_FILENAME},
    routes::default_route::{render_page, IndexTemplate},
    services::{RunCache, Scout},
};

#[derive(Deserialize)]
pub struct ScoutForm {
    profile: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    technology: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    deal_size: String,
    #[serde(default)]
    additional_keywords: String,
    #[serde(default)]
    per_query_limit: String,
}

impl ScoutForm {
    /// A blank, zero or unparsable limit falls back to `default_limit`.
    fn into_params(self, default_limit: usize) -> ScoutingParams {
        let per_query_limit = self
            .per_query_limit
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);

        ScoutingParams {
            profile: Profile::from_input(&self.profile),
            industry: self.industry,
            technology: self.technology,
            region: self.region,
            deal_size: self.deal_size,
            additional_keywords: self.additional_keywords,
            per_query_limit,
        }
    }
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate {
    profile: Profile,
    run_id: String,
    filename: &'static str,
    columns: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

#[post("")]
async fn run_scouting(
    scout: web::Data<Scout>,
    run_cache: web::Data<RunCache>,
    form: web::Form<ScoutForm>,
) -> HttpResponse {
    let params = form.into_inner().into_params(scout.default_limit());
    log::info!(
        "Scouting {} with limit {} per query",
        params.profile,
        params.per_query_limit
    );

    match scout.run(&params).await {
        Ok(result_set) => {
            let template = ResultsTemplate {
                profile: params.profile,
                columns: result_set.columns(),
                rows: result_set.rows(),
                filename: RESULTS_FILENAME,
                run_id: run_cache.insert(result_set).to_string(),
            };
            render_page(&template, StatusCode::OK)
        }
        Err(e) => {
            let template = IndexTemplate {
                error: Some(e.to_string()),
                per_query_limit: params.per_query_limit,
            };
            render_page(&template, StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

#[get("/{run_id}/mna_results.csv")]
async fn download_results(
    run_id: web::Path<String>,
    run_cache: web::Data<RunCache>,
) -> HttpResponse {
    let Some(result_set) = Uuid::parse_str(&run_id)
        .ok()
        .and_then(|run_id| run_cache.get(&run_id))
    else {
        return HttpResponse::NotFound().body("Unknown scouting run");
    };

    match result_set.to_csv_bytes() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", RESULTS_FILENAME),
            ))
            .body(csv),
        Err(e) => {
            log::error!("Failed to export run {} as csv: {:?}", run_id, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
