//! Todo API Client
//!
//! One async call per intent against the `/api/todos` collection.
//! Any non-2xx status is a failure; failure bodies are never read.

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Todo, TodoId, TodoPatch};

pub use http::HttpTodoApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint {0} cannot carry path segments")]
    Endpoint(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote todo collection.
///
/// `?Send` because browser fetch futures are not `Send`.
#[async_trait(?Send)]
pub trait TodoApi {
    /// `GET /api/todos`
    async fn list(&self) -> ApiResult<Vec<Todo>>;

    /// `POST /api/todos` with `{title}`
    async fn create(&self, title: &str) -> ApiResult<Todo>;

    /// `PATCH /api/todos/{id}/toggle`; flips, so not idempotent
    async fn toggle(&self, id: &TodoId) -> ApiResult<Todo>;

    /// `DELETE /api/todos/{id}`; response body ignored
    async fn delete(&self, id: &TodoId) -> ApiResult<()>;

    /// `PUT /api/todos/{id}` with the fields set in `patch`
    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> ApiResult<Todo>;

    /// `PUT /api/todos/{id}` with `{completed: true}`
    async fn mark_completed(&self, id: &TodoId) -> ApiResult<Todo> {
        self.update(id, &TodoPatch::completed(true)).await
    }

    /// `GET /api/health`
    async fn health(&self) -> ApiResult<()>;
}
