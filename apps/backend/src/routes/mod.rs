use actix_web::web;

pub mod debug;
pub mod games;
pub mod health;

/// Configure application routes.
///
/// `main.rs` adds CORS around these; tests register them as-is.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Games routes: /api/games/**
    cfg.service(
        web::scope("/api/games")
            .configure(debug::configure_routes)
            .configure(games::configure_routes),
    );
}
