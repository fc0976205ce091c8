//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::adapters::svg_chart::{format_thousands, format_value_chart};
use crate::domain::allocation::parse_allocations;
use crate::domain::backtest::{BacktestOutcome, compute_backtest_as_of};
use crate::domain::price_table::Interval;

use super::templates::{BacktestFormTemplate, PositionView, ResultTemplate};
use super::{AppState, WebError, error::render_error, is_htmx_request};

pub async fn backtest_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let template = BacktestFormTemplate {
        default_amount: state
            .config
            .get_string("backtest", "amount")
            .unwrap_or_else(|| "10000".to_string()),
        default_allocations: state
            .config
            .get_string("backtest", "allocations")
            .unwrap_or_else(|| "SPY:60,TLT:40".to_string()),
    };

    if is_htmx_request(&headers) {
        Ok(Html(template.fragment()).into_response())
    } else {
        let html = template
            .render()
            .map_err(|e| WebError::internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct BacktestFormData {
    pub amount: String,
    pub allocations: String,
    pub interval: Option<String>,
}

pub async fn run_backtest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<BacktestFormData>,
) -> Response {
    match run_backtest_inner(state, form).await {
        Ok(template) => {
            if is_htmx_request(&headers) {
                Html(template.fragment()).into_response()
            } else {
                match template.render() {
                    Ok(html) => Html(html).into_response(),
                    Err(e) => render_error(WebError::internal(e.to_string()), &headers),
                }
            }
        }
        Err(err) => render_error(err, &headers),
    }
}

async fn run_backtest_inner(
    state: Arc<AppState>,
    form: BacktestFormData,
) -> Result<ResultTemplate, WebError> {
    let amount: u64 = form
        .amount
        .trim()
        .parse()
        .map_err(|_| WebError::bad_request("Invalid amount: expected a non-negative integer"))?;

    let allocations = parse_allocations(&form.allocations)
        .map_err(|e| WebError::bad_request(format!("Invalid allocations: {e}")))?;

    let interval = match form.interval.as_deref() {
        None | Some("") => Interval::Monthly,
        Some(value) => Interval::parse(value)
            .ok_or_else(|| WebError::bad_request("Invalid interval: expected daily, weekly or monthly"))?,
    };

    // The price port is a blocking collaborator; keep it off the reactor.
    let port = Arc::clone(&state.price_port);
    let end_date = chrono::Utc::now().date_naive();
    let outcome = tokio::task::spawn_blocking(move || {
        compute_backtest_as_of(&*port, amount, &allocations, end_date, interval)
    })
    .await
    .map_err(|e| WebError::internal(e.to_string()))??;

    Ok(result_template(&outcome))
}

fn result_template(outcome: &BacktestOutcome) -> ResultTemplate {
    let positions = outcome
        .positions
        .positions()
        .iter()
        .map(|p| PositionView {
            symbol: p.symbol.clone(),
            ratio: format!("{:.1}", p.ratio),
            units: p.units,
        })
        .collect();

    let final_total = outcome
        .values
        .rows()
        .last()
        .and_then(|row| row.total)
        .map(format_thousands)
        .unwrap_or_else(|| "n/a".to_string());

    ResultTemplate {
        start_date: outcome.start_date.to_string(),
        end_date: outcome.end_date.to_string(),
        amount: format_thousands(outcome.amount as f64),
        positions,
        final_total,
        chart_svg: format_value_chart(&outcome.values),
    }
}

pub async fn not_found(headers: HeaderMap) -> Response {
    render_error(WebError::not_found("Page not found"), &headers)
}
