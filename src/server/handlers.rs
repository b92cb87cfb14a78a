use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::error::ApiError;
use crate::nav::{NavQuery, fetch_filtered_nav, render_json};

#[derive(Debug, Serialize)]
pub struct CronResponse {
    pub data: &'static str,
}

/// `GET /api/fund-nav?mutualFundID=<int>&start=<dd-mm-yyyy>&end=<dd-mm-yyyy>`
pub async fn fund_nav(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = NavQuery::from_pairs(&pairs);
    let today = chrono::Utc::now().date_naive();

    let response = fetch_filtered_nav(state.provider.as_ref(), &query, today).await?;
    let body = render_json(&response)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn cron(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CronResponse>, ApiError> {
    let authorized = match (
        state.config.cron_secret.as_deref(),
        headers.get(header::AUTHORIZATION),
    ) {
        (Some(secret), Some(value)) => value
            .to_str()
            .is_ok_and(|value| value.strip_prefix("Bearer ") == Some(secret)),
        _ => false,
    };

    if !authorized {
        warn!("Rejected cron request");
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(CronResponse {
        data: "Hello, Cron!",
    }))
}
