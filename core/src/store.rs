//! Explicit application store holding both state machines.
//!
//! # Design
//! One `AppStore` is constructed per session and handed to whatever drives
//! the UI. All mutation goes through `dispatch`, which runs the matching
//! transition and then rebuilds the dashboard's derived view whenever the
//! action changed one of its inputs (comments, search, sort, page size). A
//! reader therefore never observes a stale `filtered_comments`.
//!
//! Loads follow the build/parse split of `DataSourceClient`: `begin_*`
//! marks the request pending and hands back the `HttpRequest` for the host
//! to execute, `finish_*` parses the host's `HttpResponse`, and `fail_*`
//! reports a transport failure. The comments and profile loads are
//! independent and may be in flight at the same time.

use std::time::Duration;

use tracing::debug;

use crate::client::DataSourceClient;
use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardState, SortField};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::prefs::PreferenceStore;
use crate::profile::{Profile, ProfileState};
use crate::request::RequestState;
use crate::types::{Comment, User};

/// Every state transition the presentation layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Comments(RequestState<Vec<Comment>>),
    Profile(RequestState<Option<User>>),
    SetPage(u32),
    SetPageSize(u32),
    SetSearch(String),
    SetSort(SortField),
}

impl Action {
    /// Whether the dashboard's derived view must be rebuilt afterwards.
    fn affects_filters(&self) -> bool {
        match self {
            Action::Comments(outcome) => matches!(outcome, RequestState::Ok(_)),
            Action::SetPageSize(_) | Action::SetSearch(_) | Action::SetSort(_) => true,
            Action::Profile(_) | Action::SetPage(_) => false,
        }
    }
}

#[derive(Debug)]
pub struct AppStore<P> {
    dashboard: Dashboard<P>,
    profile: Profile,
    search: Debouncer<String>,
}

impl<P: PreferenceStore> AppStore<P> {
    pub fn new(prefs: P) -> Self {
        let mut store = Self {
            dashboard: Dashboard::new(prefs),
            profile: Profile::new(),
            search: Debouncer::new(SEARCH_DEBOUNCE),
        };
        store.dashboard.apply_filters();
        store
    }

    pub fn with_config(prefs: P, config: &DashboardConfig) -> Self {
        let mut store = Self {
            dashboard: Dashboard::with_default_page_size(prefs, config.default_page_size),
            profile: Profile::new(),
            search: Debouncer::new(config.search_debounce),
        };
        store.dashboard.apply_filters();
        store
    }

    pub fn dashboard(&self) -> &Dashboard<P> {
        &self.dashboard
    }

    pub fn dashboard_state(&self) -> &DashboardState {
        self.dashboard.state()
    }

    pub fn profile_state(&self) -> &ProfileState {
        self.profile.state()
    }

    pub fn current_page_data(&self) -> &[Comment] {
        self.dashboard.current_page_data()
    }

    pub fn dispatch(&mut self, action: Action) {
        let refilter = action.affects_filters();
        match action {
            Action::Comments(outcome) => self.dashboard.on_fetch(outcome),
            Action::Profile(outcome) => self.profile.on_fetch(outcome),
            Action::SetPage(page) => self.dashboard.set_page(page),
            Action::SetPageSize(size) => self.dashboard.set_page_size(size),
            Action::SetSearch(search) => self.dashboard.set_search(search),
            Action::SetSort(field) => self.dashboard.set_sort(field),
        }
        if refilter {
            self.dashboard.apply_filters();
        }
    }

    /// Start a comments load. `None` while one is already in flight.
    pub fn begin_load_comments(&mut self, client: &DataSourceClient) -> Option<HttpRequest> {
        if self.dashboard.state().loading {
            debug!("comments load already in flight");
            return None;
        }
        self.dispatch(Action::Comments(RequestState::Pending));
        Some(client.build_list_comments())
    }

    pub fn finish_load_comments(&mut self, client: &DataSourceClient, response: HttpResponse) {
        let outcome = client.parse_list_comments(response).into();
        self.dispatch(Action::Comments(outcome));
    }

    pub fn fail_load_comments(&mut self, error: ApiError) {
        self.dispatch(Action::Comments(RequestState::Err(error.to_string())));
    }

    /// Start a profile load. `None` while one is already in flight.
    pub fn begin_load_profile(&mut self, client: &DataSourceClient) -> Option<HttpRequest> {
        if self.profile.state().loading {
            debug!("profile load already in flight");
            return None;
        }
        self.dispatch(Action::Profile(RequestState::Pending));
        Some(client.build_list_users())
    }

    pub fn finish_load_profile(&mut self, client: &DataSourceClient, response: HttpResponse) {
        let outcome = client.parse_first_user(response).into();
        self.dispatch(Action::Profile(outcome));
    }

    pub fn fail_load_profile(&mut self, error: ApiError) {
        self.dispatch(Action::Profile(RequestState::Err(error.to_string())));
    }

    /// Record a keystroke in the search box at `now`.
    pub fn type_search(&mut self, now: Duration, text: impl Into<String>) {
        self.search.push(now, text.into());
    }

    /// Commit the debounced search once its quiet window has passed.
    /// Returns `true` when a search was committed.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.search.poll(now) {
            Some(text) => {
                debug!(search = %text, "committing debounced search");
                self.dispatch(Action::SetSearch(text));
                true
            }
            None => false,
        }
    }

    /// When the next `tick` could commit, if a search is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.search.deadline()
    }

    /// The dashboard view is going away: drop any uncommitted search.
    pub fn teardown_dashboard(&mut self) {
        if self.search.teardown() {
            debug!("dropped pending search on teardown");
        }
    }
}
