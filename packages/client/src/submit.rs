//! Lap event submission over HTTP.

use std::path::{Path, PathBuf};

use reqwest::{
    Url,
    multipart::{Form, Part},
};

use crate::error::ClientError;

/// Form field name for attached images
const IMAGE_FIELD: &str = "image";
/// Form field name for the display timestamp
const TIME_FIELD: &str = "time";
/// Fallback when a path has no usable file name
const DEFAULT_IMAGE_NAME: &str = "image.jpg";

/// A lap event to post to the relay
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Base URL of the server (e.g., "http://127.0.0.1:8080")
    pub server: String,
    pub event_id: String,
    /// Display timestamp; the server uses its own clock when `None`
    pub time: Option<String>,
    pub images: Vec<PathBuf>,
}

impl SubmitRequest {
    /// Ingestion endpoint for this event
    ///
    /// The event id is pushed as a single path segment, so characters such
    /// as `#`, `?` or `/` are percent-encoded.
    pub fn lap_url(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.server)
            .map_err(|e| ClientError::InvalidServerUrl(format!("{}: {}", self.server, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidServerUrl(self.server.clone()))?
            .pop_if_empty()
            .push("lap")
            .push(&self.event_id);
        Ok(url)
    }
}

/// Post the event and return the server's confirmation text
pub async fn submit_event(request: &SubmitRequest) -> Result<String, ClientError> {
    let form = build_form(request).await?;
    let url = request.lap_url()?;
    tracing::debug!("POST {} ({} images)", url, request.images.len());

    let response = reqwest::Client::new()
        .post(url)
        .multipart(form)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::SubmitRejected {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

async fn build_form(request: &SubmitRequest) -> Result<Form, ClientError> {
    let mut form = Form::new();
    if let Some(time) = &request.time {
        form = form.text(TIME_FIELD, time.clone());
    }
    for path in &request.images {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadImage {
                path: path.clone(),
                source,
            })?;
        form = form.part(IMAGE_FIELD, Part::bytes(bytes).file_name(image_name(path)));
    }
    Ok(form)
}

fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string())
}
