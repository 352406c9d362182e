//! Verify build/parse methods and filter sequences against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes expected requests, simulated responses and
//! expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use dashboard_core::{
    Action, ApiError, AppStore, Comment, DataSourceClient, HttpMethod, HttpResponse,
    MemoryPreferences, RequestState, Sort, SortField, User,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> DataSourceClient {
    DataSourceClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &dashboard_core::HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert!(req.body.is_none(), "{name}: body should be None");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[test]
fn comments_test_vectors() {
    let raw = include_str!("../../test-vectors/comments.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Verify build
        check_request(name, &c.build_list_comments(), &case["expected_request"]);

        // Verify parse
        let result = c.parse_list_comments(simulated(case));
        if let Some(message) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: message");
        } else if let Some(kind) = case.get("expected_error_kind") {
            let err = result.unwrap_err();
            match kind.as_str().unwrap() {
                "Deserialization" => {
                    assert!(matches!(err, ApiError::Deserialization(_)), "{name}: kind")
                }
                other => panic!("{name}: unknown expected_error_kind: {other}"),
            }
        } else {
            let comments = result.unwrap();
            let expected: Vec<Comment> =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(comments, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[test]
fn users_test_vectors() {
    let raw = include_str!("../../test-vectors/users.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_list_users(), &case["expected_request"]);

        let result = c.parse_first_user(simulated(case));
        if let Some(message) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: message");
        } else {
            let user = result.unwrap();
            let expected: Option<User> =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(user, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Filter sequences
// ---------------------------------------------------------------------------

/// Translate one `{"search": ..}` / `{"sort": ..}` / ... object into an action.
fn parse_action(raw: &serde_json::Value) -> Action {
    let obj = raw.as_object().unwrap();
    let (key, value) = obj.iter().next().unwrap();
    match key.as_str() {
        "search" => Action::SetSearch(value.as_str().unwrap().to_string()),
        "sort" => Action::SetSort(serde_json::from_value::<SortField>(value.clone()).unwrap()),
        "page" => Action::SetPage(value.as_u64().unwrap() as u32),
        "pageSize" => Action::SetPageSize(value.as_u64().unwrap() as u32),
        other => panic!("unknown action: {other}"),
    }
}

#[test]
fn filters_test_vectors() {
    let raw = include_str!("../../test-vectors/filters.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let comments: Vec<Comment> = serde_json::from_value(vectors["comments"].clone()).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut store = AppStore::new(MemoryPreferences::new());
        store.dispatch(Action::Comments(RequestState::Pending));
        store.dispatch(Action::Comments(RequestState::Ok(comments.clone())));

        for action in case["actions"].as_array().unwrap() {
            store.dispatch(parse_action(action));
        }

        let state = store.dashboard_state();
        let ids: Vec<u64> = state.filtered_comments.iter().map(|c| c.id).collect();
        let expected_ids: Vec<u64> = serde_json::from_value(case["expected_ids"].clone()).unwrap();
        assert_eq!(ids, expected_ids, "{name}: filtered ids");
        assert_eq!(
            u64::from(state.pagination.total_pages),
            case["expected_total_pages"].as_u64().unwrap(),
            "{name}: total pages"
        );
        if let Some(sort) = case.get("expected_sort") {
            let expected: Sort = serde_json::from_value(sort.clone()).unwrap();
            assert_eq!(state.sort, expected, "{name}: sort");
        }
        if let Some(page) = case.get("expected_current_page") {
            assert_eq!(
                u64::from(state.pagination.current_page),
                page.as_u64().unwrap(),
                "{name}: current page"
            );
        }
    }
}
