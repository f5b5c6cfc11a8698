use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// A backend answered, but its payload breaks the outcome invariants.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidPrediction {
    #[error("class index {index} outside vocabulary of {classes}")]
    ClassIndexOutOfRange { index: i64, classes: usize },

    #[error("expected {expected} percentages, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("percentage {value} at index {index} is not within [0, 100]")]
    PercentageOutOfRange { index: usize, value: f64 },
}

/// Why a single model call produced no usable prediction.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid prediction: {0}")]
    Invalid(#[from] InvalidPrediction),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read upload: {0}")]
    Multipart(String),

    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

impl From<actix_multipart::MultipartError> for IngestError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        IngestError::Multipart(e.to_string())
    }
}

impl ResponseError for IngestError {
    fn status_code(&self) -> StatusCode {
        match self {
            IngestError::Multipart(_) => StatusCode::BAD_REQUEST,
            IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
