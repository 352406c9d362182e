//! Stateless HTTP request builder and response parser for the data source.
//!
//! # Design
//! `DataSourceClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Filtering, sorting and pagination are never pushed to the
//! source: both endpoints return the full collection.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Comment, User};

/// Synchronous, stateless client for the comments/users source.
#[derive(Debug, Clone)]
pub struct DataSourceClient {
    base_url: String,
}

impl DataSourceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_comments(&self) -> HttpRequest {
        self.get("comments")
    }

    pub fn build_list_users(&self) -> HttpRequest {
        self.get("users")
    }

    pub fn parse_list_comments(&self, response: HttpResponse) -> Result<Vec<Comment>, ApiError> {
        check_status(&response, "comments")?;
        let comments: Vec<Comment> = decode(&response.body)?;
        debug!(count = comments.len(), "parsed comments");
        Ok(comments)
    }

    /// Parse the user collection and keep only its first element.
    ///
    /// An empty collection is not an error: the profile simply has no user.
    pub fn parse_first_user(&self, response: HttpResponse) -> Result<Option<User>, ApiError> {
        check_status(&response, "user")?;
        let users: Vec<User> = decode(&response.body)?;
        debug!(count = users.len(), "parsed users");
        Ok(users.into_iter().next())
    }

    fn get(&self, resource: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{resource}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }
}

fn check_status(response: &HttpResponse, resource: &'static str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatus {
        resource,
        status: response.status,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
