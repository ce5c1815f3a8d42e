//! HTTP API response DTOs.

use serde::Serialize;

use crate::usecase::ConnectionSummary;

/// A single connected client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionDto {
    pub id: String,
    pub remote_addr: Option<String>,
}

/// Response of `GET /api/connections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionListDto {
    pub count: usize,
    pub connections: Vec<ConnectionDto>,
}

impl From<ConnectionSummary> for ConnectionDto {
    fn from(summary: ConnectionSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            remote_addr: summary.remote_addr.map(|addr| addr.to_string()),
        }
    }
}

impl From<Vec<ConnectionSummary>> for ConnectionListDto {
    fn from(summaries: Vec<ConnectionSummary>) -> Self {
        let connections: Vec<ConnectionDto> = summaries.into_iter().map(Into::into).collect();
        Self {
            count: connections.len(),
            connections,
        }
    }
}
