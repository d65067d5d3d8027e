use actix_web::{web, App, HttpServer};
use werewolf_backend::config::EngineConfig;
use werewolf_backend::middleware::cors::cors_middleware;
use werewolf_backend::middleware::request_trace::RequestTrace;
use werewolf_backend::routes;
use werewolf_backend::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        decision_service = %config.decision_service,
        debug_overrides = config.debug_overrides,
        "Starting werewolf engine"
    );

    let bind = (config.host.clone(), config.port);
    let data = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
