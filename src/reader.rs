/// Per-request orchestration: validate, fetch, convert, aggregate.
///
/// `read_aggregated` is the one entry point the consuming layer calls. It
/// owns the phase ordering and the error mapping at the store seam; the
/// store itself stays a dumb data source. Window validation runs before any
/// store access, and an empty window is a valid empty result, never an
/// error.

use crate::aggregate::aggregate;
use crate::logging::{self, DataSource};
use crate::model::{AggregationError, AggregationResult};
use crate::rating::{self, RatingCurve};
use crate::request::AggregationRequest;
use crate::series::SampleSeries;
use crate::store::SeriesStore;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Serves one aggregation request against the given store.
///
/// Phases:
/// 1. Parse and validate the window (`InvalidTimeRange` before any I/O).
/// 2. Fetch raw samples; a store failure is `SeriesLookupFailure`.
/// 3. Zero samples: return an empty result.
/// 4. When a curve type was requested, fetch its rows; a store failure is
///    `RatingCurveLookupFailure`. Zero rows means no curve, values pass
///    through unconverted.
/// 5. Convert every value; a level with no rating point aborts the request.
/// 6. Collapse duplicate timestamps, group into calendar buckets, return.
pub fn read_aggregated<S: SeriesStore>(
    store: &mut S,
    request: &AggregationRequest,
) -> Result<AggregationResult, AggregationError> {
    let (window_start, window_end) = request.parse_window()?;

    let raw_samples = store
        .fetch_samples(request.station_id, window_start, window_end)
        .map_err(|e| {
            logging::log_store_failure(request.station_id, "Sample fetch", e.as_ref());
            AggregationError::SeriesLookupFailure(e.to_string())
        })?;

    if raw_samples.is_empty() {
        logging::info(
            DataSource::Database,
            Some(&request.station_id.to_string()),
            &format!(
                "No samples between {} and {}",
                request.window_start, request.window_end
            ),
        );
        return Ok(AggregationResult::default());
    }

    let curve = match request.rating_curve_type_id {
        Some(curve_type_id) => {
            let rows = store
                .fetch_rating_rows(request.station_id, curve_type_id)
                .map_err(|e| {
                    logging::log_store_failure(request.station_id, "Rating curve fetch", e.as_ref());
                    AggregationError::RatingCurveLookupFailure(e.to_string())
                })?;
            RatingCurve::from_rows(&rows)
        }
        None => None,
    };

    let mut series = SampleSeries::new();
    for sample in &raw_samples {
        let converted = rating::convert_value(curve.as_ref(), sample.value)?;
        series.insert(sample.timestamp, converted);
    }

    let result = aggregate(&series, request.granularity);

    logging::log_aggregation_summary(
        request.station_id,
        series.len(),
        curve.as_ref().map(|c| c.len()).unwrap_or(0),
        result.len(),
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
