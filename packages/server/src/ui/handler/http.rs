//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::UploadedAsset,
    infrastructure::dto::http::ConnectionListDto,
    ui::state::AppState,
    usecase::SubmitEventError,
};

/// Form field carrying the display timestamp
const TIME_FIELD: &str = "time";
/// Response body for any unreadable form
const BAD_FORM_DATA: &str = "Bad form data";

/// Query parameters accepted by `POST /lap/{id}` (the form field wins if both are present)
#[derive(Debug, Default, Deserialize)]
pub struct LapQuery {
    pub time: Option<String>,
}

/// Parsed multipart body of an event submission
#[derive(Debug, Default)]
struct LapForm {
    time: Option<String>,
    assets: Vec<UploadedAsset>,
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List currently registered connections (diagnostic)
pub async fn get_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionListDto> {
    let summaries = state.get_connections_usecase.execute().await;
    Json(summaries.into())
}

/// Accept a lap event, persist its attachments and broadcast it
///
/// The response body reports how many connections a delivery was attempted
/// to, not how many received it.
pub async fn submit_lap(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Query(query): Query<LapQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, (StatusCode, String)> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!("Bad form data for event '{}': {}", event_id, rejection);
            return Err((rejection.status(), BAD_FORM_DATA.to_string()));
        }
    };
    let form = match read_lap_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Bad form data for event '{}': {}", event_id, e);
            return Err((e.status(), BAD_FORM_DATA.to_string()));
        }
    };
    let timestamp = form.time.or(query.time);

    match state
        .submit_event_usecase
        .execute(event_id.clone(), timestamp, form.assets)
        .await
    {
        Ok(outcome) => Ok(format!(
            "Broadcasted '{}' at '{}' to {} clients",
            outcome.message.event_id(),
            outcome.message.timestamp(),
            outcome.broadcast.attempted
        )),
        Err(SubmitEventError::InvalidEventId(e)) => {
            tracing::warn!("Rejected event '{}': {}", event_id, e);
            Err((StatusCode::BAD_REQUEST, format!("Invalid event id: {}", e)))
        }
        Err(SubmitEventError::Storage(e)) => {
            tracing::error!("Failed to save images for event '{}': {}", event_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save images".to_string(),
            ))
        }
    }
}

/// Collect the `time` field and every file field of the form
async fn read_lap_form(multipart: &mut Multipart) -> Result<LapForm, MultipartError> {
    let mut form = LapForm::default();
    let mut fields_read = 0usize;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A form with zero parts fails to parse, but is a valid submission
            Err(e) if fields_read == 0 && e.status() == StatusCode::BAD_REQUEST => {
                tracing::debug!("Treating form without parts as empty: {}", e);
                break;
            }
            Err(e) => return Err(e),
        };
        fields_read += 1;
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await?;
                tracing::debug!(
                    "Received attachment '{}' in field '{}' ({} bytes)",
                    file_name,
                    name,
                    bytes.len()
                );
                form.assets.push(UploadedAsset::new(file_name, bytes.to_vec()));
            }
            None if name == TIME_FIELD => {
                form.time = Some(field.text().await?);
            }
            None => {
                tracing::debug!("Ignoring form field '{}'", name);
            }
        }
    }
    Ok(form)
}
