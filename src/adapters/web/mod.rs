//! Web server adapter.
//!
//! Axum server with an HTMX-based form for submitting backtest parameters
//! through a browser. A thin layer over [`compute_backtest`]; all pipeline
//! work happens in the domain.
//!
//! [`compute_backtest`]: crate::domain::backtest::compute_backtest

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

pub struct AppState {
    pub price_port: Arc<dyn PricePort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::backtest_form))
        .route("/backtest/run", post(handlers::run_backtest))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
