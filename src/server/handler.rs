//! Drill generation request handling.
//!
//! Authentication, body coercion, generation, then persistence. Once a drill
//! has been generated it is always returned; a failed save only flips
//! `saved` to false and adds a hint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::auth::extract_bearer;
use super::state::AppState;
use crate::drill::{Drill, DrillRequest};
use crate::types::{DrillError, Result};

/// Successful response body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub id: Option<String>,
    pub drill: Drill,
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

const SAVE_FAILED_HINT: &str =
    "The drill was generated but could not be saved. Save it again to keep it.";

/// Run one generation request end to end
pub async fn process_request(
    state: &AppState,
    auth_header: Option<&str>,
    body: &[u8],
) -> Result<GenerateResponse> {
    let token = extract_bearer(auth_header)?;
    let user_id = state.auth.verify(token).await?;
    let request = DrillRequest::from_body(body)?;

    info!(
        user = %user_id,
        remix = request.is_remix(),
        update = request.existing_id.is_some(),
        "Generating drill"
    );

    let generation = state.generator.generate(&request).await?;
    let drill = generation.drill;

    let saved = match &request.existing_id {
        Some(existing_id) => state
            .store
            .update(existing_id, &user_id, &drill)
            .await
            .map(|_| existing_id.clone()),
        None => state.store.insert(&user_id, &drill).await,
    };

    let response = match saved {
        Ok(id) => GenerateResponse {
            id: Some(id),
            drill,
            saved: true,
            hint: None,
        },
        Err(e) => {
            warn!(user = %user_id, "Drill not saved: {}", e);
            GenerateResponse {
                id: request.existing_id.clone(),
                drill,
                saved: false,
                hint: Some(SAVE_FAILED_HINT.to_string()),
            }
        }
    };

    info!(
        attempts = generation.attempts,
        saved = response.saved,
        id = response.id.as_deref().unwrap_or("-"),
        "Drill request complete"
    );
    Ok(response)
}

impl IntoResponse for DrillError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for GenerateResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
