//! `/reports` handlers.

use super::{AppState, error::ApiError};
use crate::{
    core::report::{self, SalesReport},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Query of `GET /reports/sales`
#[derive(Debug, Default, Deserialize)]
pub struct SalesReportQuery {
    /// Only count orders from the last `days` days
    days: Option<u32>,
}

/// Start of a report covering the last `days` days before `now`.
fn period_start(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>> {
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(Error::InvalidReportPeriod { days })
}

pub(super) async fn sales(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> Result<Json<SalesReport>, ApiError> {
    let context = ApiError::context("Failed to generate report");
    let since = query
        .days
        .map(|days| period_start(Utc::now(), days))
        .transpose()
        .map_err(context)?;
    let report = report::generate_sales_report(&state.db, since)
        .await
        .map_err(context)?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_period_start() {
        let now = Utc::now();
        assert_eq!(period_start(now, 0).unwrap(), now);
        assert_eq!(period_start(now, 7).unwrap(), now - Duration::days(7));

        assert!(matches!(
            period_start(now, u32::MAX),
            Err(Error::InvalidReportPeriod { days: u32::MAX })
        ));
    }
}
