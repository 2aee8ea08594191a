/// Aggregation request model and window parsing.
///
/// The request arrives from the consuming layer as camelCase JSON with
/// window timestamps in `"yyyy-MM-dd HH:mm"` form, interpreted as UTC.
/// Parsing and range validation happen before any store access, so a bad
/// window never costs a database round trip.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AggregationError, Granularity};

/// Window timestamp format, UTC. No timezone handling beyond that.
pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRequest {
    pub station_id: i64,
    pub window_start: String,
    pub window_end: String,
    /// `None` (or JSON `null`) means no level-to-discharge conversion.
    #[serde(default)]
    pub rating_curve_type_id: Option<i64>,
    pub granularity: Granularity,
}

impl AggregationRequest {
    /// Validates and parses the window bounds.
    ///
    /// A window whose start equals its end is legal (single-instant,
    /// bounds-inclusive). Start after end is `InvalidTimeRange`.
    pub fn parse_window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), AggregationError> {
        let start = parse_window_timestamp(&self.window_start)?;
        let end = parse_window_timestamp(&self.window_end)?;

        if start > end {
            return Err(AggregationError::InvalidTimeRange(format!(
                "window start {} is after window end {}",
                self.window_start, self.window_end
            )));
        }

        Ok((start, end))
    }
}

/// Parses one `"yyyy-MM-dd HH:mm"` timestamp as UTC.
pub fn parse_window_timestamp(raw: &str) -> Result<DateTime<Utc>, AggregationError> {
    let naive = NaiveDateTime::parse_from_str(raw, WINDOW_FORMAT).map_err(|e| {
        AggregationError::InvalidTimeRange(format!("could not parse timestamp '{}': {}", raw, e))
    })?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
