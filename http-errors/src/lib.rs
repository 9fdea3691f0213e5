use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{event, Level};

#[derive(Debug, Serialize)]
pub struct ErrorResponseData {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    kind: Cow<'static, str>,
    message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ErrorResponseData {
    pub fn new(
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> ErrorResponseData {
        let ret = ErrorResponseData {
            error: ErrorDetails {
                kind: kind.into(),
                message: message.into(),
                details: None,
            },
        };

        event!(Level::ERROR, kind=%ret.error.kind, message=%ret.error.message);

        ret
    }

    /// Attach structured detail, such as the offending field of a validation
    /// failure or the allowed destinations of a rejected status transition.
    pub fn with_details(mut self, details: Value) -> ErrorResponseData {
        self.error.details = Some(details);
        self
    }
}
