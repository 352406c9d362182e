//! C-ABI wrapper around `dashboard-core`.
//!
//! # Overview
//! Exposes one dashboard session (comments table plus profile card) through
//! `extern "C"` functions so any language with a C FFI can drive the state
//! machines without linking to serde or an async runtime. The host executes
//! the HTTP requests it is handed and supplies the clock for the debounced
//! search box as milliseconds since any fixed origin.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `dash_begin_load_*` / `dash_finish_load_*` mirror the core's
//!   build/parse split; a failed load is recorded in the session state and
//!   also reported through the returned `FfiErrorCode`.
//! - Reads return freshly allocated snapshots. The C caller owns all
//!   returned pointers and must call the matching `dash_free_*` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use dashboard_core::{
    Action, ApiError, AppStore, DashboardConfig, DataSourceClient, HttpResponse,
    MemoryPreferences,
};

use types::*;

/// Read a caller-provided C string. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `s` must be non-null and point to a NUL-terminated string.
unsafe fn read_str(s: *const c_char) -> String {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("").to_string()
}

/// Run `f` against the session behind `dashboard`. Returns `on_null` if the
/// pointer is null and `on_panic` if `f` panics.
fn with_dashboard<T>(
    dashboard: *mut FfiDashboard,
    on_null: T,
    on_panic: T,
    f: impl FnOnce(&mut FfiDashboard) -> T,
) -> T {
    if dashboard.is_null() {
        return on_null;
    }
    let dashboard = unsafe { &mut *dashboard };
    catch_unwind(AssertUnwindSafe(|| f(dashboard))).unwrap_or(on_panic)
}

/// `with_dashboard` for entry points that report an `FfiErrorCode`.
fn with_dashboard_code(
    dashboard: *mut FfiDashboard,
    f: impl FnOnce(&mut FfiDashboard) -> FfiErrorCode,
) -> FfiErrorCode {
    with_dashboard(dashboard, FfiErrorCode::NullArg, FfiErrorCode::Panic, f)
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a dashboard session reading from `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `dash_free`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_new(base_url: *const c_char) -> *mut FfiDashboard {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_str(base_url) };
        let config = DashboardConfig {
            base_url: url,
            ..DashboardConfig::default()
        };
        Box::into_raw(Box::new(FfiDashboard {
            client: DataSourceClient::new(&config.base_url),
            store: AppStore::with_config(MemoryPreferences::new(), &config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a session configured from the `DASHBOARD_*` environment variables.
///
/// Returns null if any variable holds an invalid value.
#[unsafe(no_mangle)]
pub extern "C" fn dash_new_from_env() -> *mut FfiDashboard {
    catch_unwind(|| match DashboardConfig::from_env() {
        Ok(config) => Box::into_raw(Box::new(FfiDashboard {
            client: DataSourceClient::new(&config.base_url),
            store: AppStore::with_config(MemoryPreferences::new(), &config),
        })),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session created by `dash_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free(dashboard: *mut FfiDashboard) {
    if !dashboard.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(dashboard) });
        });
    }
}

// ---------------------------------------------------------------------------
// Loads
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { read_str(resp.body) }
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Mark the comments load pending and return the request to execute.
///
/// Returns null if `dashboard` is null or a comments load is already in
/// flight. Free the request with `dash_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_begin_load_comments(dashboard: *mut FfiDashboard) -> *mut FfiHttpRequest {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        match d.store.begin_load_comments(&d.client) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    })
}

/// Feed the host's response to the pending comments load.
#[unsafe(no_mangle)]
pub extern "C" fn dash_finish_load_comments(
    dashboard: *mut FfiDashboard,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    if response.is_null() {
        return FfiErrorCode::NullArg;
    }
    with_dashboard_code(dashboard, |d| {
        let resp = ffi_response_to_core(unsafe { &*response });
        let result = d.client.parse_list_comments(resp);
        let code = FfiErrorCode::of(&result);
        d.store.dispatch(Action::Comments(result.into()));
        code
    })
}

/// Report that the comments request never produced a response.
#[unsafe(no_mangle)]
pub extern "C" fn dash_fail_load_comments(
    dashboard: *mut FfiDashboard,
    message: *const c_char,
) -> FfiErrorCode {
    if message.is_null() {
        return FfiErrorCode::NullArg;
    }
    with_dashboard_code(dashboard, |d| {
        let message = unsafe { read_str(message) };
        d.store.fail_load_comments(ApiError::Transport(message));
        FfiErrorCode::Transport
    })
}

/// Mark the profile load pending and return the request to execute.
///
/// Returns null if `dashboard` is null or a profile load is already in flight.
#[unsafe(no_mangle)]
pub extern "C" fn dash_begin_load_profile(dashboard: *mut FfiDashboard) -> *mut FfiHttpRequest {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        match d.store.begin_load_profile(&d.client) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    })
}

/// Feed the host's response to the pending profile load.
#[unsafe(no_mangle)]
pub extern "C" fn dash_finish_load_profile(
    dashboard: *mut FfiDashboard,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    if response.is_null() {
        return FfiErrorCode::NullArg;
    }
    with_dashboard_code(dashboard, |d| {
        let resp = ffi_response_to_core(unsafe { &*response });
        let result = d.client.parse_first_user(resp);
        let code = FfiErrorCode::of(&result);
        d.store.dispatch(Action::Profile(result.into()));
        code
    })
}

/// Report that the profile request never produced a response.
#[unsafe(no_mangle)]
pub extern "C" fn dash_fail_load_profile(
    dashboard: *mut FfiDashboard,
    message: *const c_char,
) -> FfiErrorCode {
    if message.is_null() {
        return FfiErrorCode::NullArg;
    }
    with_dashboard_code(dashboard, |d| {
        let message = unsafe { read_str(message) };
        d.store.fail_load_profile(ApiError::Transport(message));
        FfiErrorCode::Transport
    })
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Jump to `page` (1-based). Not checked against the page count.
#[unsafe(no_mangle)]
pub extern "C" fn dash_set_page(dashboard: *mut FfiDashboard, page: u32) -> FfiErrorCode {
    with_dashboard_code(dashboard, |d| {
        d.store.dispatch(Action::SetPage(page));
        FfiErrorCode::Ok
    })
}

/// Change the page size and return to page 1. Zero is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn dash_set_page_size(dashboard: *mut FfiDashboard, page_size: u32) -> FfiErrorCode {
    with_dashboard_code(dashboard, |d| {
        d.store.dispatch(Action::SetPageSize(page_size));
        FfiErrorCode::Ok
    })
}

/// Advance the sort cycle for `field`. `FfiSortField::None` is not a column
/// and yields `InvalidArg`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_set_sort(dashboard: *mut FfiDashboard, field: FfiSortField) -> FfiErrorCode {
    let Some(field) = field.to_core() else {
        return FfiErrorCode::InvalidArg;
    };
    with_dashboard_code(dashboard, |d| {
        d.store.dispatch(Action::SetSort(field));
        FfiErrorCode::Ok
    })
}

/// Record search-box text typed at `now_ms`. It is committed by a later
/// `dash_tick` once the quiet window has passed.
#[unsafe(no_mangle)]
pub extern "C" fn dash_type_search(
    dashboard: *mut FfiDashboard,
    now_ms: u64,
    text: *const c_char,
) -> FfiErrorCode {
    if text.is_null() {
        return FfiErrorCode::NullArg;
    }
    with_dashboard_code(dashboard, |d| {
        let text = unsafe { read_str(text) };
        d.store.type_search(Duration::from_millis(now_ms), text);
        FfiErrorCode::Ok
    })
}

/// Commit a pending search if it has been quiet long enough.
/// Returns `true` when the table changed.
#[unsafe(no_mangle)]
pub extern "C" fn dash_tick(dashboard: *mut FfiDashboard, now_ms: u64) -> bool {
    with_dashboard(dashboard, false, false, |d| d.store.tick(Duration::from_millis(now_ms)))
}

/// The dashboard view was closed: drop any uncommitted search.
#[unsafe(no_mangle)]
pub extern "C" fn dash_teardown(dashboard: *mut FfiDashboard) {
    with_dashboard(dashboard, (), (), |d| d.store.teardown_dashboard());
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Snapshot of the table state. Free with `dash_free_snapshot`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_snapshot(dashboard: *mut FfiDashboard) -> *mut FfiDashboardSnapshot {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        FfiDashboardSnapshot::from_core(d.store.dashboard_state())
    })
}

/// Rows of the current page. Free with `dash_free_comment_list`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_page_rows(dashboard: *mut FfiDashboard) -> *mut FfiCommentList {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        FfiCommentList::from_core(d.store.current_page_data())
    })
}

/// Profile card state. Free with `dash_free_profile`.
#[unsafe(no_mangle)]
pub extern "C" fn dash_profile(dashboard: *mut FfiDashboard) -> *mut FfiProfile {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        FfiProfile::from_core(d.store.profile_state())
    })
}

/// Full dashboard state as JSON (camelCase keys). Free with
/// `dash_free_string`. Returns null on serialization failure.
#[unsafe(no_mangle)]
pub extern "C" fn dash_state_json(dashboard: *mut FfiDashboard) -> *mut c_char {
    with_dashboard(dashboard, std::ptr::null_mut(), std::ptr::null_mut(), |d| {
        match serde_json::to_string(d.store.dashboard_state()) {
            Ok(json) => to_c_string(&json),
            Err(_) => std::ptr::null_mut(),
        }
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `dash_begin_load_*`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.path);
            free_c_string(req.body);
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    });
}

/// Free a snapshot returned by `dash_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free_snapshot(snapshot: *mut FfiDashboardSnapshot) {
    if snapshot.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let snapshot = unsafe { Box::from_raw(snapshot) };
        unsafe {
            free_c_string(snapshot.error);
            free_c_string(snapshot.search);
        }
    });
}

/// Free a row list returned by `dash_page_rows`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free_comment_list(list: *mut FfiCommentList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let items = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize))
            };
            for item in items.iter() {
                unsafe {
                    free_c_string(item.name);
                    free_c_string(item.email);
                    free_c_string(item.body);
                }
            }
        }
    });
}

/// Free a profile returned by `dash_profile`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free_profile(profile: *mut FfiProfile) {
    if profile.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let profile = unsafe { Box::from_raw(profile) };
        unsafe { free_c_string(profile.error) };
        if !profile.user.is_null() {
            unsafe { FfiUser::free(profile.user) };
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dash_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
