//! Privileged override route, enabled by `WEREWOLF_DEBUG_OVERRIDES`.

use actix_web::http::header::ETAG;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::games::human_view;
use crate::domain::overrides::{OverrideRequest, ReconcileReport};
use crate::domain::player_view::PlayerView;
use crate::error::AppError;
use crate::http::etag::game_etag;
use crate::services::game_flow::FlowOutcome;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct OverrideResponse {
    report: ReconcileReport,
    status: FlowOutcome,
    view: PlayerView,
}

/// POST /api/games/{game_id}/debug/override
async fn apply_override(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    body: web::Json<OverrideRequest>,
) -> Result<HttpResponse, AppError> {
    if !app_state.config.debug_overrides {
        return Err(AppError::forbidden("debug overrides are disabled"));
    }
    let service = app_state.games.get(&path.into_inner())?;
    let report = service.apply_override(body.into_inner())?;
    let status = service.drive().await?;

    let snap = service.snapshot();
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, game_etag(&snap.state.game_id, snap.version)))
        .json(OverrideResponse {
            report,
            status,
            view: human_view(&snap)?,
        }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{game_id}/debug/override").route(web::post().to(apply_override)),
    );
}
