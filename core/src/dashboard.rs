//! Comments dashboard: search, sort and pagination over a fetched list.
//!
//! # Design
//! `comments` is the authoritative list, replaced wholesale by each
//! successful load. `filtered_comments` is a derived view rebuilt by
//! `apply_filters` from `comments`, `search` and `sort`; the transitions that
//! change those inputs do not rebuild it themselves; `AppStore::dispatch`
//! sequences the recomputation.
//!
//! Page size, search and sort are seeded from the preference store at
//! construction and written back on every change. The current page is
//! written but deliberately never restored, so a reload always starts on
//! page 1.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use crate::collate::locale_compare;
use crate::prefs::{
    PreferenceStore, CURRENT_PAGE_KEY, PAGE_SIZE_KEY, SEARCH_KEY, SORT_DIRECTION_KEY,
    SORT_FIELD_KEY,
};
use crate::request::RequestState;
use crate::types::Comment;

/// Page sizes offered to the user. The transitions accept any positive size.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sortable columns of the comments table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    PostId,
    Name,
    Email,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::PostId => "postId",
            SortField::Name => "name",
            SortField::Email => "email",
        }
    }

    fn compare(self, a: &Comment, b: &Comment) -> Ordering {
        match self {
            SortField::PostId => a.post_id.cmp(&b.post_id),
            SortField::Name => locale_compare(&a.name, &b.name),
            SortField::Email => locale_compare(&a.email, &b.email),
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postId" => Ok(SortField::PostId),
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted string that names no known sort field or direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value {0:?}")]
pub struct UnknownValue(pub String);

/// Sort criteria. Both halves are set together or cleared together by
/// `set_sort`; a restored session may hold one without the other, in which
/// case no sorting is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction: Some(direction),
        }
    }

    /// Field and direction, when both are set.
    pub fn active(&self) -> Option<(SortField, SortDirection)> {
        Some((self.field?, self.direction?))
    }
}

/// Column header hint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Not clamped to `total_pages`; readers of out-of-range pages see no rows.
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub comments: Vec<Comment>,
    pub filtered_comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    pub search: String,
    pub sort: Sort,
}

/// The dashboard state machine and the preference store it writes through.
#[derive(Debug)]
pub struct Dashboard<P> {
    state: DashboardState,
    prefs: P,
}

impl<P: PreferenceStore> Dashboard<P> {
    pub fn new(prefs: P) -> Self {
        Self::with_default_page_size(prefs, DEFAULT_PAGE_SIZE)
    }

    /// Restore preferences, falling back to `default_page_size` when no valid
    /// page size was persisted.
    pub fn with_default_page_size(prefs: P, default_page_size: u32) -> Self {
        let page_size = prefs
            .get(PAGE_SIZE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(default_page_size.max(1));
        let search = prefs.get(SEARCH_KEY).unwrap_or_default();
        let sort = Sort {
            field: prefs.get(SORT_FIELD_KEY).and_then(|raw| raw.parse().ok()),
            direction: prefs.get(SORT_DIRECTION_KEY).and_then(|raw| raw.parse().ok()),
        };
        debug!(page_size, search = %search, ?sort, "restored dashboard preferences");

        Self {
            state: DashboardState {
                comments: Vec::new(),
                filtered_comments: Vec::new(),
                loading: false,
                error: None,
                pagination: Pagination {
                    current_page: 1,
                    page_size,
                    total_pages: 0,
                },
                search,
                sort,
            },
            prefs,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    /// Completion callback for the comments request.
    pub fn on_fetch(&mut self, outcome: RequestState<Vec<Comment>>) {
        match outcome {
            RequestState::Pending => {
                debug!("comments load started");
                self.state.loading = true;
                self.state.error = None;
            }
            RequestState::Ok(comments) => {
                debug!(count = comments.len(), "comments loaded");
                self.state.loading = false;
                self.state.filtered_comments = comments.clone();
                self.state.comments = comments;
                self.recompute_total_pages();
            }
            RequestState::Err(message) => {
                warn!(error = %message, "comments load failed");
                self.state.loading = false;
                self.state.error = Some(message);
            }
        }
    }

    /// Jump to page `page`. No bounds check against `total_pages`.
    pub fn set_page(&mut self, page: u32) {
        self.state.pagination.current_page = page;
        self.prefs.set(CURRENT_PAGE_KEY, &page.to_string());
    }

    /// Change the page size and go back to the first page.
    ///
    /// A size of zero is ignored: the table cannot be split into empty pages.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size == 0 {
            warn!("ignoring page size of zero");
            return;
        }
        self.state.pagination.page_size = page_size;
        self.state.pagination.current_page = 1;
        self.prefs.set(PAGE_SIZE_KEY, &page_size.to_string());
    }

    /// Commit search text and go back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
        self.state.pagination.current_page = 1;
        self.prefs.set(SEARCH_KEY, &self.state.search);
    }

    /// Cycle the sort for `field`: another field starts at ascending, the
    /// same field goes ascending, descending, unsorted, ascending again.
    pub fn set_sort(&mut self, field: SortField) {
        let sort = &mut self.state.sort;
        if sort.field == Some(field) {
            match sort.direction {
                Some(SortDirection::Asc) => sort.direction = Some(SortDirection::Desc),
                Some(SortDirection::Desc) => *sort = Sort::default(),
                None => sort.direction = Some(SortDirection::Asc),
            }
        } else {
            *sort = Sort::new(field, SortDirection::Asc);
        }
        debug!(sort = ?self.state.sort, "sort changed");

        match self.state.sort.active() {
            Some((field, direction)) => {
                self.prefs.set(SORT_FIELD_KEY, field.as_str());
                self.prefs.set(SORT_DIRECTION_KEY, direction.as_str());
            }
            None => {
                self.prefs.remove(SORT_FIELD_KEY);
                self.prefs.remove(SORT_DIRECTION_KEY);
            }
        }
    }

    /// Rebuild `filtered_comments` and `total_pages` from the current inputs.
    pub fn apply_filters(&mut self) {
        self.state.filtered_comments =
            filter_and_sort(&self.state.comments, &self.state.search, self.state.sort);
        self.recompute_total_pages();
    }

    /// Rows of the current page; empty when the page is out of range.
    pub fn current_page_data(&self) -> &[Comment] {
        let Pagination {
            current_page,
            page_size,
            ..
        } = self.state.pagination;
        let rows = &self.state.filtered_comments;
        if current_page == 0 {
            return &[];
        }
        let size = page_size as usize;
        let start = (current_page as usize - 1).saturating_mul(size);
        if start >= rows.len() {
            return &[];
        }
        let end = start.saturating_add(size).min(rows.len());
        &rows[start..end]
    }

    pub fn filtered_count(&self) -> usize {
        self.state.filtered_comments.len()
    }

    pub fn sort_indicator(&self, field: SortField) -> SortIndicator {
        let sort = self.state.sort;
        if sort.field != Some(field) {
            return SortIndicator::Unsorted;
        }
        match sort.direction {
            Some(SortDirection::Asc) => SortIndicator::Ascending,
            _ => SortIndicator::Descending,
        }
    }

    fn recompute_total_pages(&mut self) {
        let pagination = &mut self.state.pagination;
        pagination.total_pages =
            total_pages(self.state.filtered_comments.len(), pagination.page_size);
    }
}

/// `ceil(count / page_size)`; zero rows means zero pages.
pub fn total_pages(count: usize, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from((count as u64).div_ceil(size)).unwrap_or(u32::MAX)
}

/// Filter `comments` by `search` (case-insensitive substring of name, email
/// or body) and stable-sort the survivors by `sort` when it is active.
pub fn filter_and_sort(comments: &[Comment], search: &str, sort: Sort) -> Vec<Comment> {
    let mut rows: Vec<Comment> = if search.is_empty() {
        comments.to_vec()
    } else {
        let needle = search.to_lowercase();
        comments
            .iter()
            .filter(|comment| matches_search(comment, &needle))
            .cloned()
            .collect()
    };

    if let Some((field, direction)) = sort.active() {
        rows.sort_by(|a, b| match direction {
            SortDirection::Asc => field.compare(a, b),
            SortDirection::Desc => field.compare(b, a),
        });
    }
    rows
}

fn matches_search(comment: &Comment, needle: &str) -> bool {
    [&comment.name, &comment.email, &comment.body]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;

    fn comment(post_id: u64, id: u64, name: &str, email: &str, body: &str) -> Comment {
        Comment {
            post_id,
            id,
            name: name.to_string(),
            email: email.to_string(),
            body: body.to_string(),
        }
    }

    fn alice_and_bob() -> Vec<Comment> {
        vec![
            comment(1, 1, "Alice", "a@x.com", "hi"),
            comment(2, 2, "bob", "b@x.com", "yo"),
        ]
    }

    fn loaded(comments: Vec<Comment>) -> Dashboard<MemoryPreferences> {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        dashboard.on_fetch(RequestState::Pending);
        dashboard.on_fetch(RequestState::Ok(comments));
        dashboard.apply_filters();
        dashboard
    }

    fn ids(rows: &[Comment]) -> Vec<u64> {
        rows.iter().map(|c| c.id).collect()
    }

    #[test]
    fn starts_empty_with_defaults() {
        let dashboard = Dashboard::new(MemoryPreferences::new());
        let state = dashboard.state();
        assert!(state.comments.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(state.pagination.total_pages, 0);
        assert_eq!(state.sort, Sort::default());
    }

    #[test]
    fn restores_preferences_but_not_current_page() {
        let prefs: MemoryPreferences = [
            (PAGE_SIZE_KEY, "50"),
            (SEARCH_KEY, "ali"),
            (SORT_FIELD_KEY, "email"),
            (SORT_DIRECTION_KEY, "desc"),
            (CURRENT_PAGE_KEY, "7"),
        ]
        .into_iter()
        .collect();
        let dashboard = Dashboard::new(prefs);
        let state = dashboard.state();
        assert_eq!(state.pagination.page_size, 50);
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.search, "ali");
        assert_eq!(state.sort, Sort::new(SortField::Email, SortDirection::Desc));
    }

    #[test]
    fn garbage_preferences_fall_back_to_defaults() {
        let prefs: MemoryPreferences = [
            (PAGE_SIZE_KEY, "lots"),
            (SORT_FIELD_KEY, "body"),
            (SORT_DIRECTION_KEY, "sideways"),
        ]
        .into_iter()
        .collect();
        let dashboard = Dashboard::new(prefs);
        assert_eq!(dashboard.state().pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(dashboard.state().sort, Sort::default());

        let zero: MemoryPreferences = [(PAGE_SIZE_KEY, "0")].into_iter().collect();
        assert_eq!(Dashboard::new(zero).state().pagination.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn load_success_sets_both_lists_and_total_pages() {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        dashboard.on_fetch(RequestState::Pending);
        assert!(dashboard.state().loading);

        dashboard.on_fetch(RequestState::Ok(alice_and_bob()));
        let state = dashboard.state();
        assert!(!state.loading);
        assert_eq!(state.comments, alice_and_bob());
        assert_eq!(state.filtered_comments, alice_and_bob());
        assert_eq!(state.pagination.total_pages, 1);
    }

    #[test]
    fn load_failure_keeps_previous_comments() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.on_fetch(RequestState::Pending);
        dashboard.on_fetch(RequestState::Err("Failed to fetch comments".to_string()));

        let state = dashboard.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch comments"));
        assert_eq!(state.comments, alice_and_bob());
    }

    #[test]
    fn pending_clears_a_previous_error() {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        dashboard.on_fetch(RequestState::Err("boom".to_string()));
        dashboard.on_fetch(RequestState::Pending);
        assert!(dashboard.state().error.is_none());
        assert!(dashboard.state().loading);
    }

    #[test]
    fn empty_search_keeps_fetched_order() {
        let dashboard = loaded(alice_and_bob());
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![1, 2]);
        assert_eq!(dashboard.state().pagination.total_pages, 1);
    }

    #[test]
    fn search_is_case_insensitive_over_name_email_and_body() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_search("ALI");
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![1]);

        dashboard.set_search("b@X");
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2]);

        dashboard.set_search("yo");
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2]);

        dashboard.set_search("nobody");
        dashboard.apply_filters();
        assert!(dashboard.state().filtered_comments.is_empty());
        assert_eq!(dashboard.state().pagination.total_pages, 0);
    }

    #[test]
    fn search_resets_page_and_persists() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_page(3);
        dashboard.set_search("bob");
        assert_eq!(dashboard.state().pagination.current_page, 1);
        assert_eq!(dashboard.preferences().get(SEARCH_KEY).as_deref(), Some("bob"));
    }

    #[test]
    fn name_sort_descending_is_case_insensitive() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_sort(SortField::Name);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![1, 2]);

        dashboard.set_sort(SortField::Name);
        dashboard.apply_filters();
        assert_eq!(dashboard.state().sort.direction, Some(SortDirection::Desc));
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2, 1]);
    }

    #[test]
    fn accented_names_and_dotted_emails_sort_by_collation() {
        let mut dashboard = loaded(vec![
            comment(1, 1, "Zed", "z.q@x.com", "a"),
            comment(1, 2, "Émile", "z_q@x.com", "b"),
            comment(1, 3, "adam", "z1@x.com", "c"),
        ]);
        dashboard.set_sort(SortField::Name);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![3, 2, 1]);

        dashboard.set_sort(SortField::Email);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2, 1, 3]);
    }

    #[test]
    fn post_id_sorts_numerically() {
        let mut dashboard = loaded(vec![
            comment(10, 1, "a", "a", "a"),
            comment(9, 2, "b", "b", "b"),
            comment(100, 3, "c", "c", "c"),
        ]);
        dashboard.set_sort(SortField::PostId);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2, 1, 3]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut dashboard = loaded(vec![
            comment(2, 1, "x", "x", "x"),
            comment(1, 2, "y", "y", "y"),
            comment(2, 3, "z", "z", "z"),
            comment(1, 4, "w", "w", "w"),
        ]);
        dashboard.set_sort(SortField::PostId);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![2, 4, 1, 3]);

        dashboard.set_sort(SortField::PostId);
        dashboard.apply_filters();
        assert_eq!(ids(&dashboard.state().filtered_comments), vec![1, 3, 2, 4]);
    }

    #[test]
    fn sort_cycle_persists_and_clears_keys() {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        dashboard.set_sort(SortField::Email);
        assert_eq!(dashboard.preferences().get(SORT_FIELD_KEY).as_deref(), Some("email"));
        assert_eq!(dashboard.preferences().get(SORT_DIRECTION_KEY).as_deref(), Some("asc"));

        dashboard.set_sort(SortField::Email);
        assert_eq!(dashboard.preferences().get(SORT_DIRECTION_KEY).as_deref(), Some("desc"));

        dashboard.set_sort(SortField::Email);
        assert_eq!(dashboard.state().sort, Sort::default());
        assert!(dashboard.preferences().get(SORT_FIELD_KEY).is_none());
        assert!(dashboard.preferences().get(SORT_DIRECTION_KEY).is_none());
    }

    #[test]
    fn switching_field_restarts_at_ascending() {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        dashboard.set_sort(SortField::Name);
        dashboard.set_sort(SortField::Name);
        dashboard.set_sort(SortField::PostId);
        assert_eq!(dashboard.state().sort, Sort::new(SortField::PostId, SortDirection::Asc));
    }

    #[test]
    fn restored_field_without_direction_cycles_to_ascending() {
        let prefs: MemoryPreferences = [(SORT_FIELD_KEY, "name")].into_iter().collect();
        let mut dashboard = Dashboard::new(prefs);
        assert_eq!(dashboard.state().sort.active(), None);
        dashboard.set_sort(SortField::Name);
        assert_eq!(dashboard.state().sort, Sort::new(SortField::Name, SortDirection::Asc));
    }

    #[test]
    fn sort_indicator_tracks_field_and_direction() {
        let mut dashboard = Dashboard::new(MemoryPreferences::new());
        assert_eq!(dashboard.sort_indicator(SortField::Name), SortIndicator::Unsorted);
        dashboard.set_sort(SortField::Name);
        assert_eq!(dashboard.sort_indicator(SortField::Name), SortIndicator::Ascending);
        assert_eq!(dashboard.sort_indicator(SortField::Email), SortIndicator::Unsorted);
        dashboard.set_sort(SortField::Name);
        assert_eq!(dashboard.sort_indicator(SortField::Name), SortIndicator::Descending);
    }

    #[test]
    fn page_size_resets_page_and_persists() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_page(2);
        dashboard.set_page_size(1);
        dashboard.apply_filters();
        let pagination = dashboard.state().pagination;
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.page_size, 1);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(dashboard.preferences().get(PAGE_SIZE_KEY).as_deref(), Some("1"));
    }

    #[test]
    fn zero_page_size_is_ignored() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_page(2);
        dashboard.set_page_size(0);
        assert_eq!(dashboard.state().pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(dashboard.state().pagination.current_page, 2);
    }

    #[test]
    fn set_page_persists_without_bounds_check() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_page(42);
        assert_eq!(dashboard.state().pagination.current_page, 42);
        assert_eq!(dashboard.preferences().get(CURRENT_PAGE_KEY).as_deref(), Some("42"));
        assert!(dashboard.current_page_data().is_empty());
    }

    #[test]
    fn current_page_data_slices_filtered_rows() {
        let rows: Vec<Comment> = (1..=25)
            .map(|id| comment(1, id, "n", "e", "b"))
            .collect();
        let mut dashboard = loaded(rows);
        assert_eq!(dashboard.state().pagination.total_pages, 3);
        assert_eq!(ids(dashboard.current_page_data()), (1..=10).collect::<Vec<_>>());

        dashboard.set_page(3);
        assert_eq!(ids(dashboard.current_page_data()), (21..=25).collect::<Vec<_>>());

        dashboard.set_page(0);
        assert!(dashboard.current_page_data().is_empty());
    }

    #[test]
    fn locale_compare_orders_lowercase_first_on_ties() {
        assert_eq!(locale_compare("Alice", "bob"), Ordering::Less);
        assert_eq!(locale_compare("bob", "Alice"), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(500, 100), 5);
    }
}
