//! Error to HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::errors::WebError;

pub const NOT_READY_MESSAGE: &str = "EPG file not found. The system may still be generating the initial EPG data. Please check back in a few moments.";

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotReady { path } => {
                warn!("EPG file not found: {}", path);
                (StatusCode::NOT_FOUND, NOT_READY_MESSAGE).into_response()
            }
            WebError::Internal { message } => {
                error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
