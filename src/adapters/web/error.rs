//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::HoldfastError;

use super::is_htmx_request;
use super::templates::{BasePage, ErrorTemplate};

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &HoldfastError) -> StatusCode {
    match err {
        HoldfastError::ConfigParse { .. }
        | HoldfastError::ConfigMissing { .. }
        | HoldfastError::ConfigInvalid { .. }
        | HoldfastError::Allocation(_)
        | HoldfastError::NoSymbols => StatusCode::BAD_REQUEST,
        HoldfastError::NoTradeHistory { .. }
        | HoldfastError::MissingPriceData { .. }
        | HoldfastError::EmptyPriceTable => StatusCode::UNPROCESSABLE_ENTITY,
        HoldfastError::Source { .. } | HoldfastError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<HoldfastError> for WebError {
    fn from(err: HoldfastError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            message: self.message.clone(),
            status: self.status.as_u16(),
        };
        let content = match template.render() {
            Ok(html) => html,
            Err(_) => return (self.status, self.message).into_response(),
        };

        let page = BasePage {
            title: "Error".to_string(),
            content,
        };
        match page.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

/// Header-aware error rendering: HTMX requests get the bare fragment, a
/// normal navigation gets the full page.
pub fn render_error(err: WebError, headers: &HeaderMap) -> Response {
    if is_htmx_request(headers) {
        let template = ErrorTemplate {
            message: err.message.clone(),
            status: err.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (err.status, Html(html)).into_response(),
            Err(_) => (err.status, err.message).into_response(),
        }
    } else {
        err.into_response()
    }
}
