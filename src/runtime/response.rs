use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::error;

/// JSON wrapper every handler responds with.
///
/// `error` is empty on success and `response` is only present on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
}

impl<T> Envelope<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            response: None,
        }
    }
}

/// Serialized handler output: a status plus a JSON envelope body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// 200 with the value wrapped in a success envelope.
    ///
    /// A value that serializes to `null` (`()`, `None`) leaves `response` out.
    pub fn ok<T: Serialize>(response: &T) -> Self {
        let body = serde_json::to_value(response).and_then(|value| {
            serde_json::to_vec(&Envelope {
                error: String::new(),
                response: Some(value).filter(|v| !v.is_null()),
            })
        });
        match body {
            Ok(body) => Self {
                status: StatusCode::OK,
                body,
            },
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }

    /// Error envelope with the given status.
    pub fn error(status: StatusCode, message: impl Display) -> Self {
        let envelope: Envelope<()> = Envelope::error(message.to_string());
        // A struct of a String and a unit never fails to serialize.
        let body = serde_json::to_vec(&envelope).unwrap_or_default();
        Self { status, body }
    }

    /// Route not handled by the service.
    pub fn unknown_method() -> Self {
        Self::error(StatusCode::NOT_FOUND, "unknown method")
    }

    pub fn bad_method() -> Self {
        Self::error(StatusCode::NOT_ACCEPTABLE, "bad method")
    }

    pub fn unauthorized() -> Self {
        Self::error(StatusCode::FORBIDDEN, "unauthorized")
    }

    /// Map an operation error to a response using [`classify_domain_error`].
    pub fn from_domain_error(err: impl Display) -> Self {
        let message = err.to_string();
        Self::error(classify_domain_error(&message), message)
    }

    /// Parse the body back into a JSON value.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Convert into an `http::Response` with a JSON content type.
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut resp = http::Response::new(self.body);
        *resp.status_mut() = self.status;
        resp.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        resp
    }
}

/// Status for an error returned by a service method.
///
/// Exactly `user not exist` is 404. Any other message mentioning `exist`
/// without `not` is a conflict. Everything else is 500.
pub fn classify_domain_error(message: &str) -> StatusCode {
    if message == "user not exist" {
        StatusCode::NOT_FOUND
    } else if message.contains("exist") && !message.contains("not") {
        StatusCode::CONFLICT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
