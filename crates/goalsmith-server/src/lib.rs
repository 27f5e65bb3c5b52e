pub mod embed;
pub mod error;
pub mod report;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use textgen_client::{ProviderChain, ProviderConfig};

use crate::state::{AppState, ProviderStatus};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing with an
/// injected generator.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/process-objectives",
            post(routes::objectives::process_objectives),
        )
        .route("/api/analyze-ikigai", post(routes::ikigai::analyze_ikigai))
        .route("/api/generate-pdf", post(routes::pdf::generate_pdf))
        .route("/api/config", get(routes::config::get_config))
        .fallback(embed::static_handler)
        .layer(cors)
        .with_state(state)
}

/// Start the goalsmith server with providers resolved from the environment.
pub async fn serve(port: u16, open_browser: bool) -> anyhow::Result<()> {
    let config = ProviderConfig::from_env();
    let providers = ProviderStatus::from_config(&config);
    if !providers.primary_configured && !providers.fallback_configured {
        tracing::warn!(
            "no provider API keys configured; every record will be synthesized from templates"
        );
    }

    let chain = ProviderChain::from_config(&config);
    let state = AppState::new(Arc::new(chain), providers);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("goalsmith server listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
