use super::components::{self, Component};
use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Failure modes of the record stores. `NotFound` and `Conflict` are
/// ordinary outcomes the handlers react to; the rest are the backend being
/// unavailable or misbehaving.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("a record with this {field} already exists")]
    Conflict { field: &'static str },

    #[error("database: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug)]
pub struct ServerError(Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let Some(StoreError::NotFound) = self.0.downcast_ref::<StoreError>()
        {
            return not_found_response();
        }
        tracing::error!(error = ?self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            .into_response()
    }
}

pub fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            components::Page {
                title: "Not Found".to_string(),
                meta: None,
                principal: None,
                children: Box::new(components::NotFound {}),
            }
            .render(),
        ),
    )
        .into_response()
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>`
// to turn them into `Result<_, ServerError>`. That way you don't need to do
// that manually.
impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
