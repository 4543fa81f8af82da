use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Empty filter pattern")]
    EmptyFilter,

    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Search term could not be compiled: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to render results: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyFilter | SearchError::InvalidFilter { .. } => {
                AppError::BadRequest(err.to_string())
            }
            SearchError::Pattern(_) | SearchError::Render(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
