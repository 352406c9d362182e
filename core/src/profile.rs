//! Read-only profile of the first user the source returns.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::RequestState;
use crate::types::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct Profile {
    state: ProfileState,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// Completion callback for the users request. A failure leaves any
    /// previously loaded user in place.
    pub fn on_fetch(&mut self, outcome: RequestState<Option<User>>) {
        match outcome {
            RequestState::Pending => {
                debug!("profile load started");
                self.state.loading = true;
                self.state.error = None;
            }
            RequestState::Ok(user) => {
                debug!(user_id = user.as_ref().map(|u| u.id), "profile loaded");
                self.state.loading = false;
                self.state.user = user;
            }
            RequestState::Err(message) => {
                warn!(error = %message, "profile load failed");
                self.state.loading = false;
                self.state.error = Some(message);
            }
        }
    }
}
