//! Error types for the web front-end

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Template '{0}' is not loaded")]
    MissingTemplate(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(detail = %self, "Failed to render page");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred while rendering the page",
        )
            .into_response()
    }
}
