use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::state::app_state::AppState;

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Werewolf engine is running"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    games: usize,
    decision_service: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        games: app_state.games.len(),
        decision_service: app_state.config.decision_service.clone(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
