//! Fund NAV lookup: query validation, upstream fetch and date filtering.

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::core::period::filter_nav;
use crate::core::{DateRange, FilteredResponse, FundProvider};
use crate::error::ApiError;

/// Raw query values as received. Empty values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavQuery {
    pub mutual_fund_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl NavQuery {
    /// Builds the query from decoded `key=value` pairs. The first occurrence
    /// of a key wins.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key.as_ref() == name)
                .map(|(_, value)| value.as_ref())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        NavQuery {
            mutual_fund_id: first("mutualFundID"),
            start: first("start"),
            end: first("end"),
        }
    }
}

/// Runs one lookup against `provider`. `today` bounds the accepted end date.
#[instrument(skip(provider))]
pub async fn fetch_filtered_nav(
    provider: &dyn FundProvider,
    query: &NavQuery,
    today: NaiveDate,
) -> Result<FilteredResponse, ApiError> {
    let fund_id = query.mutual_fund_id.as_deref().ok_or_else(|| {
        ApiError::BadRequest("mutualFundID query parameter is required".to_string())
    })?;
    if fund_id.parse::<i64>().is_err() {
        return Err(ApiError::BadRequest(
            "mutualFundID must be an integer".to_string(),
        ));
    }

    let range = DateRange::from_query(query.start.as_deref(), query.end.as_deref(), today)?;

    let fund = provider.fetch_fund(fund_id).await.map_err(|e| {
        let message = format!("{e:#}");
        warn!(error = %message, "Upstream fetch failed");
        ApiError::Internal(message)
    })?;

    if fund.meta.is_empty() {
        return Err(ApiError::BadRequest("Invalid mutualFundID".to_string()));
    }

    let data = filter_nav(&fund.data, range.as_ref());
    debug!(
        total = fund.data.len(),
        kept = data.len(),
        "Filtered NAV points"
    );

    Ok(FilteredResponse {
        meta: fund.meta,
        period: range.map(|r| r.to_string()),
        data,
    })
}

pub fn render_json(response: &FilteredResponse) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(response)
        .map_err(|_| ApiError::Internal("error creating JSON response".to_string()))
}
