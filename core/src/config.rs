//! Host configuration read from the environment.

use std::env;
use std::time::Duration;

use crate::dashboard::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::debounce::SEARCH_DEBOUNCE;
use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

const API_URL_VAR: &str = "DASHBOARD_API_URL";
const DEBOUNCE_VAR: &str = "DASHBOARD_SEARCH_DEBOUNCE_MS";
const PAGE_SIZE_VAR: &str = "DASHBOARD_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub search_debounce: Duration,
    /// Used only when the session has no persisted page size.
    pub default_page_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            search_debounce: SEARCH_DEBOUNCE,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables take their
    /// defaults; set-but-invalid ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { key: API_URL_VAR });
            }
            config.base_url = url.to_string();
        }

        if let Some(raw) = lookup(DEBOUNCE_VAR) {
            let millis = parse_number::<u64>(DEBOUNCE_VAR, &raw)?;
            config.search_debounce = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            let size = parse_number::<u32>(PAGE_SIZE_VAR, &raw)?;
            if !PAGE_SIZE_OPTIONS.contains(&size) {
                return Err(ConfigError::NotAllowed {
                    key: PAGE_SIZE_VAR,
                    value: size,
                    allowed: &PAGE_SIZE_OPTIONS,
                });
            }
            config.default_page_size = size;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: raw.to_string(),
    })
}
