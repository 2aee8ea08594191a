/// Core data types for the hydrometric series aggregation core.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no store access, only types and the small pure
/// helpers that belong to them.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Samples and rating-curve rows
// ---------------------------------------------------------------------------

/// A single observation from a hydrometric station: an instant (already UTC)
/// and the measured magnitude, either a water level or a discharge depending
/// on what the station records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Sample { timestamp, value }
    }
}

/// One raw rating-curve row as stored: level and discharge magnitudes plus
/// the per-axis factors that bring each of them to its principal unit.
///
/// The two axes are converted independently; a curve may store levels in
/// centimetres and discharges in litres per second, both normalized before
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRow {
    pub level: f64,
    pub level_unit_factor: f64,
    pub discharge: f64,
    pub discharge_unit_factor: f64,
}

/// A rating-curve point after unit conversion: both magnitudes are in
/// principal units and ready for exact-match lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingPoint {
    pub level: f64,
    pub discharge: f64,
}

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// Calendar unit used to group a series for reporting.
///
/// Serialized as its variant name ("Hour", "Day", "Month", "Year") in the
/// request shape consumed by the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Hour,
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Maps the legacy integer aggregation codes (0 = hour, 1 = day,
    /// 2 = month, 3 = year) still used by older callers of the reporting
    /// interface. Any other code is an explicit error rather than a silent
    /// no-result.
    pub fn from_code(code: i64) -> Result<Granularity, AggregationError> {
        match code {
            0 => Ok(Granularity::Hour),
            1 => Ok(Granularity::Day),
            2 => Ok(Granularity::Month),
            3 => Ok(Granularity::Year),
            other => Err(AggregationError::UnsupportedGranularity(other)),
        }
    }

    /// The calendar field compared when scanning for bucket boundaries:
    /// hour-of-day (0–23), day-of-month (1–31), month-of-year (1–12) or
    /// calendar year.
    pub fn calendar_field(&self, timestamp: &DateTime<Utc>) -> i32 {
        match self {
            Granularity::Hour => timestamp.hour() as i32,
            Granularity::Day => timestamp.day() as i32,
            Granularity::Month => timestamp.month() as i32,
            Granularity::Year => timestamp.year(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation output
// ---------------------------------------------------------------------------

/// One calendar-aligned bucket of the aggregated series.
///
/// The anchor is the timestamp of the first sample that fell into the bucket,
/// never a synthesized boundary instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub anchor_timestamp: DateTime<Utc>,
    pub mean: f64,
    pub count: u32,
}

/// The assembled result of one aggregation request: buckets in chronological
/// encounter order. An empty result is a valid outcome (empty window), not a
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub buckets: Vec<Bucket>,
}

impl AggregationResult {
    pub fn new(buckets: Vec<Bucket>) -> Self {
        AggregationResult { buckets }
    }

    /// The number of samples behind each bucket, aligned with `buckets`.
    pub fn counts(&self) -> Vec<u32> {
        self.buckets.iter().map(|b| b.count).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while serving one aggregation request.
///
/// A window that simply contains no samples is NOT represented here; that is
/// a valid empty `AggregationResult`. Callers distinguish empty from failed
/// via the `Result` variant, never via an empty-vs-null convention.
#[derive(Debug, PartialEq)]
pub enum AggregationError {
    /// Malformed window timestamp, or start after end. Detected before any
    /// store access.
    InvalidTimeRange(String),
    /// The store was unreachable or errored while fetching samples.
    SeriesLookupFailure(String),
    /// The store was unreachable or errored while fetching rating-curve rows.
    RatingCurveLookupFailure(String),
    /// A value has no exact match in a present rating curve. Surfaced as an
    /// error so an unconverted value is never mislabeled as converted.
    MissingRatingPoint { level: f64 },
    /// A granularity code outside the four recognized values.
    UnsupportedGranularity(i64),
}

impl std::fmt::Display for AggregationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationError::InvalidTimeRange(msg) => {
                write!(f, "Invalid time range: {}", msg)
            }
            AggregationError::SeriesLookupFailure(msg) => {
                write!(f, "Series lookup failed: {}", msg)
            }
            AggregationError::RatingCurveLookupFailure(msg) => {
                write!(f, "Rating curve lookup failed: {}", msg)
            }
            AggregationError::MissingRatingPoint { level } => {
                write!(f, "No rating point for level {}", level)
            }
            AggregationError::UnsupportedGranularity(code) => {
                write!(f, "Unsupported granularity code: {}", code)
            }
        }
    }
}

impl std::error::Error for AggregationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
