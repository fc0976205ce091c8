#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Covers the form page, backtest submission through the mock price
//! source, HTMX fragment vs full-page responses, and error statuses.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;
use holdfast::adapters::web::{AppState, build_router};
use holdfast::ports::config_port::ConfigPort;

struct MockConfigPort;

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("backtest", "amount") => Some("10000".to_string()),
            ("backtest", "allocations") => Some("SPY:60,TLT:40".to_string()),
            _ => None,
        }
    }

    fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
        default
    }

    fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
        default
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

fn create_test_app() -> Router {
    let state = AppState {
        price_port: Arc::new(sixty_forty_port()),
        config: Arc::new(MockConfigPort),
    };
    build_router(state)
}

async fn body_text(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).into_owned()
}

fn run_request(form_data: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/backtest/run")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_data))
        .unwrap()
}

const VALID_FORM: &str = "amount=10000&allocations=SPY%3A60%2CTLT%3A40&interval=monthly";

mod form_tests {
    use super::*;

    #[tokio::test]
    async fn form_renders_with_ok_status() {
        let app = create_test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn form_contains_required_fields() {
        let app = create_test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("name=\"amount\""));
        assert!(html.contains("name=\"allocations\""));
        assert!(html.contains("name=\"interval\""));
        assert!(html.contains("hx-post"));
    }

    #[tokio::test]
    async fn form_prefills_config_defaults() {
        let app = create_test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("value=\"10000\""));
        assert!(html.contains("SPY:60,TLT:40"));
    }

    #[tokio::test]
    async fn form_htmx_fragment_excludes_html_wrapper() {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("HX-Request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("<div id=\"content\">"));
        assert!(!html.contains("<!DOCTYPE html>"));
    }
}

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn submission_returns_ok() {
        let app = create_test_app();
        let response = app.oneshot(run_request(VALID_FORM)).await.unwrap();
        let status = response.status();
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK, "Response body: {}", html);
        assert!(html.contains("Backtest Result"));
    }

    #[tokio::test]
    async fn submission_shows_positions_and_units() {
        let app = create_test_app();
        let response = app.oneshot(run_request(VALID_FORM)).await.unwrap();
        let html = body_text(response).await;

        assert!(html.contains("<td>SPY</td>"));
        assert!(html.contains("<td>60</td>"));
        assert!(html.contains("<td>TLT</td>"));
        assert!(html.contains("<td>80</td>"));
    }

    #[tokio::test]
    async fn submission_includes_chart_with_total_line() {
        let app = create_test_app();
        let response = app.oneshot(run_request(VALID_FORM)).await.unwrap();
        let html = body_text(response).await;

        assert!(html.contains("<svg"));
        assert!(html.contains(">Total</text>"));
        // 60*110 + 80*55 at the last bar
        assert!(html.contains("11,000"));
    }

    #[tokio::test]
    async fn submission_htmx_fragment() {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/backtest/run")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header("HX-Request", "true")
                    .body(Body::from(VALID_FORM))
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("<div id=\"result-content\">"));
        assert!(!html.contains("<!DOCTYPE html>"));
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn invalid_amount_is_bad_request() {
        let app = create_test_app();
        let response = app
            .oneshot(run_request(
                "amount=lots&allocations=SPY%3A60%2CTLT%3A40&interval=monthly",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn duplicate_allocation_is_bad_request() {
        let app = create_test_app();
        let response = app
            .oneshot(run_request(
                "amount=10000&allocations=SPY%3A60%2CSPY%3A40&interval=monthly",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_symbol_is_unprocessable() {
        let app = create_test_app();
        let response = app
            .oneshot(run_request(
                "amount=10000&allocations=ZZZTOP%3A100&interval=monthly",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn htmx_error_returns_fragment_only() {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/backtest/run")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header("HX-Request", "true")
                    .body(Body::from("amount=lots&allocations=SPY%3A100"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("class=\"error\""));
        assert!(!html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn not_found_returns_404_error_page() {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("<!DOCTYPE html>"));
    }
}
