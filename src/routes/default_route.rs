use actix_web::{get, http::StatusCode, web, HttpResponse};
use askama::Template;

use crate::services::Scout;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub error: Option<String>,
    pub per_query_limit: usize,
}

#[get("/")]
async fn default(scout: web::Data<Scout>) -> HttpResponse {
    let template = IndexTemplate {
        error: None,
        per_query_limit: scout.default_limit(),
    };
    render_page(&template, StatusCode::OK)
}

pub fn render_page(template: &impl Template, status: StatusCode) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
