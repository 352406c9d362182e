//! Lifecycle of a one-shot data-source request.

use crate::error::ApiError;

/// What a state machine learns about its outstanding request.
///
/// A load goes `Pending` first and then exactly one of `Ok` or `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    Pending,
    Ok(T),
    Err(String),
}

impl<T> From<Result<T, ApiError>> for RequestState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(payload) => RequestState::Ok(payload),
            Err(err) => RequestState::Err(err.to_string()),
        }
    }
}
