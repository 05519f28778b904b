use server::config;
use server::routes;
use server::state;

use axum::{routing::{get, post}, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    // Load theory and saved openings, migrating the store if needed
    tracing::info!("Opening store at {}", config.data_dir.display());
    let session = state::open_session(&config)?;

    let stats = state::stats_tracker(&config)?;
    if stats.enabled() {
        tracing::info!("Opening explorer configured at {}", config.explorer_url);
    } else {
        tracing::info!("LICHESS_API_TOKEN not set - position statistics disabled");
    }

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Board
        .route("/api/session", get(routes::session::get_session))
        .route("/api/session/move", post(routes::session::play_move))
        .route("/api/session/navigate", post(routes::session::navigate))
        .route("/api/session/reset", post(routes::session::reset))
        // Saved openings
        .route("/api/openings/main", post(routes::openings::save_main))
        .route("/api/openings/variation", post(routes::openings::save_variation))
        .route("/api/openings/extend", post(routes::openings::extend))
        .route("/api/openings/update", post(routes::openings::update))
        .route("/api/openings/quick-add", post(routes::openings::quick_add))
        .route("/api/openings/delete", post(routes::openings::delete))
        .route("/api/openings/load", post(routes::openings::load))
        // Library and theory
        .route("/api/library", get(routes::library::list_openings))
        .route("/api/library/parents", get(routes::library::parent_choices))
        .route("/api/theory/detect", get(routes::library::detect))
        // Crowd statistics
        .route("/api/stats", get(routes::stats::get_stats))
        // Shared state
        .layer(Extension(session))
        .layer(Extension(stats))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
