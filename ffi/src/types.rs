//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use dashboard_core::dashboard::DashboardState;
use dashboard_core::error::ApiError;
use dashboard_core::http::HttpMethod;
use dashboard_core::profile::ProfileState;
use dashboard_core::{AppStore, Comment, DataSourceClient, MemoryPreferences, SortDirection, SortField, User};

/// Opaque handle to one dashboard session. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiDashboard {
    pub(crate) client: DataSourceClient,
    pub(crate) store: AppStore<MemoryPreferences>,
}

/// Heap-allocate `s` as a C string. Interior NULs cannot cross the boundary
/// and are dropped.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

pub(crate) fn to_c_string_opt(s: Option<&str>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), to_c_string)
}

/// Release a string produced by `to_c_string`. Null is ignored.
///
/// # Safety
/// `s` must be null or come from `CString::into_raw` and not be freed yet.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Returned by `dash_begin_load_*`. The C caller executes the request and
/// passes the response back through the matching `dash_finish_load_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: dashboard_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(&req.path),
            headers,
            headers_len,
            body: to_c_string_opt(req.body.as_deref()),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `dash_finish_load_*`. The FFI layer reads but does not
/// free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Status codes and enums
// ---------------------------------------------------------------------------

/// Outcome category of an FFI call. The human-readable message of a failed
/// load lives in the snapshot's `error` field.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Deserialization = 2,
    Transport = 3,
    Panic = 4,
    NullArg = 5,
    InvalidArg = 6,
}

impl FfiErrorCode {
    pub(crate) fn of<T>(result: &Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => FfiErrorCode::Ok,
            Err(ApiError::UnexpectedStatus { .. }) => FfiErrorCode::Http,
            Err(ApiError::Deserialization(_)) => FfiErrorCode::Deserialization,
            Err(ApiError::Transport(_)) => FfiErrorCode::Transport,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSortField {
    None = 0,
    PostId = 1,
    Name = 2,
    Email = 3,
}

impl FfiSortField {
    pub(crate) fn to_core(self) -> Option<SortField> {
        match self {
            FfiSortField::None => None,
            FfiSortField::PostId => Some(SortField::PostId),
            FfiSortField::Name => Some(SortField::Name),
            FfiSortField::Email => Some(SortField::Email),
        }
    }
}

impl From<Option<SortField>> for FfiSortField {
    fn from(field: Option<SortField>) -> Self {
        match field {
            None => FfiSortField::None,
            Some(SortField::PostId) => FfiSortField::PostId,
            Some(SortField::Name) => FfiSortField::Name,
            Some(SortField::Email) => FfiSortField::Email,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSortDirection {
    None = 0,
    Asc = 1,
    Desc = 2,
}

impl From<Option<SortDirection>> for FfiSortDirection {
    fn from(direction: Option<SortDirection>) -> Self {
        match direction {
            None => FfiSortDirection::None,
            Some(SortDirection::Asc) => FfiSortDirection::Asc,
            Some(SortDirection::Desc) => FfiSortDirection::Desc,
        }
    }
}

// ---------------------------------------------------------------------------
// Read-side snapshots
// ---------------------------------------------------------------------------

/// A single comment row exposed to C.
#[repr(C)]
pub struct FfiComment {
    pub post_id: u64,
    pub id: u64,
    pub name: *mut c_char,
    pub email: *mut c_char,
    pub body: *mut c_char,
}

/// A list of comment rows exposed to C.
#[repr(C)]
pub struct FfiCommentList {
    pub items: *mut FfiComment,
    pub len: u32,
}

impl FfiCommentList {
    pub(crate) fn from_core(rows: &[Comment]) -> *mut Self {
        let len = rows.len() as u32;
        let items = if rows.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_rows: Box<[FfiComment]> = rows
                .iter()
                .map(|c| FfiComment {
                    post_id: c.post_id,
                    id: c.id,
                    name: to_c_string(&c.name),
                    email: to_c_string(&c.email),
                    body: to_c_string(&c.body),
                })
                .collect();
            Box::into_raw(ffi_rows) as *mut FfiComment
        };
        Box::into_raw(Box::new(FfiCommentList { items, len }))
    }
}

/// Everything a table view needs apart from the rows themselves.
#[repr(C)]
pub struct FfiDashboardSnapshot {
    pub loading: bool,
    /// Null unless the last load failed.
    pub error: *mut c_char,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub filtered_count: u32,
    pub search: *mut c_char,
    pub sort_field: FfiSortField,
    pub sort_direction: FfiSortDirection,
}

impl FfiDashboardSnapshot {
    pub(crate) fn from_core(state: &DashboardState) -> *mut Self {
        Box::into_raw(Box::new(FfiDashboardSnapshot {
            loading: state.loading,
            error: to_c_string_opt(state.error.as_deref()),
            current_page: state.pagination.current_page,
            page_size: state.pagination.page_size,
            total_pages: state.pagination.total_pages,
            total_count: state.comments.len() as u32,
            filtered_count: state.filtered_comments.len() as u32,
            search: to_c_string(&state.search),
            sort_field: state.sort.field.into(),
            sort_direction: state.sort.direction.into(),
        }))
    }
}

/// The profile card's user, flattened.
#[repr(C)]
pub struct FfiUser {
    pub id: u64,
    pub name: *mut c_char,
    pub username: *mut c_char,
    pub email: *mut c_char,
    pub phone: *mut c_char,
    pub website: *mut c_char,
    pub street: *mut c_char,
    pub suite: *mut c_char,
    pub city: *mut c_char,
    pub zipcode: *mut c_char,
    pub lat: *mut c_char,
    pub lng: *mut c_char,
    pub company_name: *mut c_char,
    pub company_catch_phrase: *mut c_char,
    pub company_bs: *mut c_char,
}

impl FfiUser {
    fn from_core(user: &User) -> *mut Self {
        Box::into_raw(Box::new(FfiUser {
            id: user.id,
            name: to_c_string(&user.name),
            username: to_c_string(&user.username),
            email: to_c_string(&user.email),
            phone: to_c_string(&user.phone),
            website: to_c_string(&user.website),
            street: to_c_string(&user.address.street),
            suite: to_c_string(&user.address.suite),
            city: to_c_string(&user.address.city),
            zipcode: to_c_string(&user.address.zipcode),
            lat: to_c_string(&user.address.geo.lat),
            lng: to_c_string(&user.address.geo.lng),
            company_name: to_c_string(&user.company.name),
            company_catch_phrase: to_c_string(&user.company.catch_phrase),
            company_bs: to_c_string(&user.company.bs),
        }))
    }

    /// # Safety
    /// `user` must come from `FfiUser::from_core` and not be freed yet.
    pub(crate) unsafe fn free(user: *mut Self) {
        let user = unsafe { Box::from_raw(user) };
        for s in [
            user.name,
            user.username,
            user.email,
            user.phone,
            user.website,
            user.street,
            user.suite,
            user.city,
            user.zipcode,
            user.lat,
            user.lng,
            user.company_name,
            user.company_catch_phrase,
            user.company_bs,
        ] {
            unsafe { free_c_string(s) };
        }
    }
}

#[repr(C)]
pub struct FfiProfile {
    pub loading: bool,
    /// Null unless the last load failed.
    pub error: *mut c_char,
    /// Null until a user has been loaded.
    pub user: *mut FfiUser,
}

impl FfiProfile {
    pub(crate) fn from_core(state: &ProfileState) -> *mut Self {
        Box::into_raw(Box::new(FfiProfile {
            loading: state.loading,
            error: to_c_string_opt(state.error.as_deref()),
            user: state
                .user
                .as_ref()
                .map_or(std::ptr::null_mut(), FfiUser::from_core),
        }))
    }
}
