//! Game-related HTTP routes.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::events::PlayerAction;
use crate::domain::player_view::PlayerView;
use crate::domain::rules::TableSetup;
use crate::domain::state::Seat;
use crate::domain::GameState;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::http::etag::{game_etag, if_none_match_hits};
use crate::services::game_flow::{FlowOutcome, GameFlowService, Snapshot};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    #[serde(flatten)]
    pub setup: TableSetup,
    /// Fixed seed for a reproducible game; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub seat: Seat,
    pub action: PlayerAction,
}

/// Flow status plus the human's view after a mutation.
#[derive(Debug, Serialize)]
pub struct FlowResponse {
    pub game_id: String,
    pub status: FlowOutcome,
    pub view: PlayerView,
}

pub(crate) fn human_view(snap: &Snapshot) -> Result<PlayerView, AppError> {
    let human = snap.state.human_seat().ok_or_else(|| {
        AppError::internal(ErrorCode::InternalError, "game has no human seat")
    })?;
    Ok(PlayerView::for_seat(&snap.state, human)?)
}

pub(crate) fn flow_response(
    service: &GameFlowService,
    status: FlowOutcome,
) -> Result<HttpResponse, AppError> {
    let snap = service.snapshot();
    let etag = game_etag(&snap.state.game_id, snap.version);
    let body = FlowResponse {
        game_id: snap.state.game_id.clone(),
        status,
        view: human_view(&snap)?,
    };
    Ok(HttpResponse::Ok().insert_header((ETAG, etag)).json(body))
}

/// POST /api/games
///
/// Deals a new table, starts it, and drives until the human (or the
/// presenter) has to act.
async fn create_game(
    app_state: web::Data<AppState>,
    body: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let (service, status) = app_state.games.create(&req.setup, req.seed).await?;
    let mut res = flow_response(&service, status)?;
    *res.status_mut() = StatusCode::CREATED;
    Ok(res)
}

/// POST /api/games/resume
///
/// Restores a game from an exported `GameState` and drives it.
async fn resume_game(
    app_state: web::Data<AppState>,
    body: web::Json<GameState>,
) -> Result<HttpResponse, AppError> {
    let (service, status) = app_state.games.resume(body.into_inner()).await?;
    flow_response(&service, status)
}

/// GET /api/games/{game_id}/view
///
/// The human seat's view. Supports `If-None-Match`: a matching ETag gets
/// `304 Not Modified` with no body.
async fn get_view(
    http_req: HttpRequest,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = app_state.games.get(&path.into_inner())?;
    let snap = service.snapshot();
    let etag = game_etag(&snap.state.game_id, snap.version);

    if let Some(client_etag) = http_req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    {
        if if_none_match_hits(client_etag, &etag) {
            return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
                .insert_header((ETAG, etag))
                .finish());
        }
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(human_view(&snap)?))
}

/// GET /api/games/{game_id}/state
///
/// Full authoritative state, for save/resume.
async fn get_state(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = app_state.games.get(&path.into_inner())?;
    let snap = service.snapshot();
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, game_etag(&snap.state.game_id, snap.version)))
        .json(snap.state.as_ref()))
}

/// POST /api/games/{game_id}/actions
async fn submit_action(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    body: web::Json<ActionRequest>,
) -> Result<HttpResponse, AppError> {
    let service = app_state.games.get(&path.into_inner())?;
    let ActionRequest { seat, action } = body.into_inner();
    let status = service.submit_action(seat, action).await?;
    flow_response(&service, status)
}

/// POST /api/games/{game_id}/advance
async fn advance(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = app_state.games.get(&path.into_inner())?;
    let status = service.advance_speech().await?;
    flow_response(&service, status)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_game)))
        .service(web::resource("/resume").route(web::post().to(resume_game)))
        .service(web::resource("/{game_id}/view").route(web::get().to(get_view)))
        .service(web::resource("/{game_id}/state").route(web::get().to(get_state)))
        .service(web::resource("/{game_id}/actions").route(web::post().to(submit_action)))
        .service(web::resource("/{game_id}/advance").route(web::post().to(advance)));
}
