/// Storage seam for samples and rating-curve rows.
///
/// The aggregation core never owns the database; it asks a `SeriesStore` for
/// ordered raw samples and for the scale rows backing a station's rating
/// curve. `postgres` is the production implementation, `memory` the
/// deterministic one for tests and development replay.

use std::error::Error;

use chrono::{DateTime, Utc};

use crate::model::{Sample, ScaleRow};

pub mod memory;
pub mod postgres;

pub trait SeriesStore {
    /// Returns the station's samples inside the window, ascending by
    /// timestamp, both bounds inclusive.
    fn fetch_samples(
        &mut self,
        station_id: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, Box<dyn Error>>;

    /// Returns the raw scale rows for one (station, curve type) pair.
    /// Zero rows is a valid answer: the station simply has no curve of that
    /// type, and values pass through unconverted.
    fn fetch_rating_rows(
        &mut self,
        station_id: i64,
        curve_type_id: i64,
    ) -> Result<Vec<ScaleRow>, Box<dyn Error>>;
}
