//! HTTP routing, CORS and the server lifecycle.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::handler::process_request;
use super::state::{AppState, SharedState};
use crate::config::Config;
use crate::drill::validate_corpus;
use crate::storage::{Database, SqliteDrillStore};
use crate::types::{DrillError, Result};

pub const GENERATE_PATH: &str = "/generate-drill";

/// Build the application router
pub fn router(state: SharedState, allowed_origin: &str) -> Router {
    Router::new()
        .route(
            GENERATE_PATH,
            post(generate_drill).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = match allowed_origin.trim() {
        "*" | "" => AllowOrigin::any(),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!("Invalid allowed_origin '{}', allowing any origin", origin);
                AllowOrigin::any()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

async fn generate_drill(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match process_request(&state, auth_header, &body).await {
        Ok(response) => response.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn method_not_allowed() -> Response {
    DrillError::MethodNotAllowed.into_response()
}

async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Validate the corpus, open storage, wire providers and serve until
/// Ctrl-C or SIGTERM
pub async fn serve(config: Config) -> Result<()> {
    let corpus = validate_corpus()?;
    info!("Few-shot corpus OK ({} examples)", corpus.len());

    let db = Database::open(&config.storage.database_path)?;
    info!("Drill store at {}", config.storage.database_path);
    let store = Arc::new(SqliteDrillStore::new(Arc::new(db)));

    let state = Arc::new(AppState::from_config(&config, store)?);
    let app = router(state, &config.server.allowed_origin);

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
