use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use track_store_db::{ProjectStatus, StoreError};

use track_store_http_errors::ErrorResponseData;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Project not found")]
    NotFound,

    #[error(
        "Cannot transition from '{current}' to '{requested}'. Allowed transitions: {}",
        format_statuses(.allowed)
    )]
    InvalidTransition {
        current: ProjectStatus,
        requested: ProjectStatus,
        allowed: &'static [ProjectStatus],
    },

    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}

fn format_statuses(statuses: &[ProjectStatus]) -> String {
    if statuses.is_empty() {
        return "none".to_string();
    }

    statuses
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    fn error_kind(&self) -> &'static str {
        match self {
            Error::Store(_) => "db",
            Error::Validation { .. } => "validation",
            Error::InvalidBody(_) => "validation",
            Error::NotFound => "not_found",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Generic(_) => "internal_server_error",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            Error::InvalidTransition {
                current,
                requested,
                allowed,
            } => Some(serde_json::json!({
                "current": current,
                "requested": requested,
                "allowed": allowed,
            })),
            _ => None,
        }
    }

    pub fn response_tuple(&self) -> (StatusCode, ErrorResponseData) {
        let status = match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = ErrorResponseData::new(self.error_kind(), self.to_string());
        if let Some(details) = self.details() {
            body = body.with_details(details);
        }

        (status, body)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (code, json) = self.response_tuple();
        (code, Json(json)).into_response()
    }
}
