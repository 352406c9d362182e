//! Client-side core of the comments dashboard.
//!
//! # Overview
//! Fetches comments and a user profile from a REST source and shapes them
//! for display: case-insensitive search, three-way column sort and
//! pagination, all as pure state transitions. The core never performs I/O
//! and never reads a clock (host-does-IO pattern): the host executes the
//! `HttpRequest`s it is handed and supplies the current time for the
//! debounced search box.
//!
//! # Design
//! - `DataSourceClient` is stateless; each endpoint is a `build_*` /
//!   `parse_*` pair so the I/O boundary is explicit.
//! - `Dashboard` and `Profile` are plain state machines driven by a single
//!   completion callback per request (`RequestState`).
//! - `AppStore` is the one explicit container for both, sequencing the
//!   derived-view rebuild after every action that needs it.
//! - Session preferences sit behind the `PreferenceStore` trait.

pub mod client;
mod collate;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod http;
pub mod prefs;
pub mod profile;
pub mod request;
pub mod store;
pub mod timer;
pub mod types;

pub use client::DataSourceClient;
pub use config::DashboardConfig;
pub use dashboard::{
    Dashboard, DashboardState, Pagination, Sort, SortDirection, SortField, SortIndicator,
    PAGE_SIZE_OPTIONS,
};
pub use debounce::Debouncer;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use prefs::{MemoryPreferences, PreferenceStore};
pub use profile::{Profile, ProfileState};
pub use request::RequestState;
pub use store::{Action, AppStore};
pub use timer::{TimerHandle, TimerQueue};
pub use types::{Address, Comment, Company, Geo, User};
