use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::divisions::handlers;
use crate::features::divisions::services::DivisionService;

/// Create routes for the divisions feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<DivisionService>) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        // Fuzzy search route must come before the {code} route
        .route("/china/division/{year}/fuzzy", get(handlers::fuzzy_search))
        .route("/china/division/{year}/{code}", get(handlers::get_division))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{Division, DivisionCatalog};
    use crate::modules::search::{FuzzyMatcher, MemoryFuzzyIndex};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::collections::HashMap;

    fn test_server() -> TestServer {
        let raw = r#"{
            "11": {
                "name": "北京市",
                "pinyin": "bei jing shi",
                "location": {"lat": 39.904989, "lng": 116.405285, "type": "GCJ02"},
                "children": ["1101"]
            },
            "1101": {
                "name": "北京市",
                "pinyin": "bei jing shi",
                "is_direct": true,
                "children": ["110101", "110102"]
            },
            "110101": {"name": "东城区", "pinyin": "dong cheng qu"},
            "110102": {"name": "西城区", "pinyin": "xi cheng qu"},
            "12": {"name": "天津市", "pinyin": "tian jin shi"}
        }"#;
        let divisions: HashMap<String, Division> = serde_json::from_str(raw).unwrap();
        let catalog = Arc::new(DivisionCatalog::from_divisions(divisions, "2020").unwrap());
        let matcher: Arc<dyn FuzzyMatcher> = Arc::new(MemoryFuzzyIndex::build(&catalog));
        let service = Arc::new(DivisionService::new(catalog, matcher));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_status_is_ok() {
        let server = test_server();
        let response = server.get("/status").await;
        response.assert_status_ok();
        response.assert_text("ok");
    }

    #[tokio::test]
    async fn test_resolve_division_with_children_and_location() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/11")
            .add_query_param("children", "true")
            .add_query_param("location", "true")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"]["code"], "11");
        assert_eq!(body["data"]["name"], "北京市");
        assert_eq!(body["data"]["fullpath"], "北京市");
        assert_eq!(body["data"]["location"]["type"], "GCJ02");

        // The pass-through 1101 wrapper is expanded away
        let children = body["data"]["children"].as_array().unwrap();
        let codes: Vec<&str> = children
            .iter()
            .map(|c| c["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["110101", "110102"]);
    }

    #[tokio::test]
    async fn test_resolve_division_omits_sections_by_default() {
        let server = test_server();
        let response = server.get("/china/division/2020/110101").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["fullpath"], "北京市 东城区");
        let data = body["data"].as_object().unwrap();
        assert!(!data.contains_key("children"));
        assert!(!data.contains_key("location"));
    }

    #[tokio::test]
    async fn test_resolve_toggles_require_literal_true() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/11")
            .add_query_param("children", "1")
            .add_query_param("location", "True")
            .await;
        response.assert_status_ok();

        let data: Value = response.json();
        let data = data["data"].as_object().unwrap();
        assert!(!data.contains_key("children"));
        assert!(!data.contains_key("location"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let server = test_server();
        let response = server.get("/china/division/2020/99").await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
        assert!(body["message"].as_str().unwrap().contains("99"));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_is_bad_request() {
        let server = test_server();
        let response = server.get("/china/division/2020/1").await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_year_is_not_found() {
        let server = test_server();
        let response = server.get("/china/division/2019/11").await;
        response.assert_status_not_found();

        let response = server
            .get("/china/division/2019/fuzzy")
            .add_query_param("k", "beijing")
            .await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_fuzzy_search_ranks_and_reports_timing() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "beijing")
            .add_query_param("size", "1")
            .await;
        response.assert_status_ok();
        assert!(response.headers().get("x-time-used").is_some());

        let body: Value = response.json();
        let hits = body["data"].as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["code"], "11");
        assert_eq!(hits[0]["fullpath"], "北京市");
    }

    #[tokio::test]
    async fn test_fuzzy_search_pinyin_toggle() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "tianjin")
            .add_query_param("pinyin", "true")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["code"], "12");
        assert_eq!(body["data"][0]["pinyin"], "tianjinshi");

        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "tianjin")
            .await;
        let body: Value = response.json();
        let hit = body["data"][0].as_object().unwrap();
        assert!(!hit.contains_key("pinyin"));
    }

    #[tokio::test]
    async fn test_fuzzy_search_quoted_keyword_is_sanitized() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "'beijing'")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["code"], "11");
    }

    #[tokio::test]
    async fn test_fuzzy_search_numeric_keyword() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "110101")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["code"], "110101");
    }

    #[tokio::test]
    async fn test_fuzzy_search_no_match_is_empty_list() {
        let server = test_server();
        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "vvv")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(true));
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fuzzy_search_missing_keyword_is_bad_request() {
        let server = test_server();
        let response = server.get("/china/division/2020/fuzzy").await;
        response.assert_status_bad_request();

        let response = server
            .get("/china/division/2020/fuzzy")
            .add_query_param("k", "   ")
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_fuzzy_search_bad_size_is_bad_request() {
        let server = test_server();
        for size in ["abc", "0", "-3"] {
            let response = server
                .get("/china/division/2020/fuzzy")
                .add_query_param("k", "beijing")
                .add_query_param("size", size)
                .await;
            response.assert_status_bad_request();
        }
    }
}
