/// In-memory series store for tests and development replay.
///
/// Holds samples and scale rows per station and answers the same contract
/// as the PostgreSQL store: window bounds inclusive, samples ascending by
/// timestamp. The sort is stable, so rows sharing a timestamp keep their
/// insertion order and last-write-wins collapsing behaves the same as
/// against real data.

use std::collections::HashMap;
use std::error::Error;

use chrono::{DateTime, Utc};

use crate::model::{Sample, ScaleRow};
use crate::store::SeriesStore;

#[derive(Default)]
pub struct MemorySeriesStore {
    samples: HashMap<i64, Vec<Sample>>,
    rating_rows: HashMap<(i64, i64), Vec<ScaleRow>>,
}

impl MemorySeriesStore {
    pub fn new() -> MemorySeriesStore {
        MemorySeriesStore::default()
    }

    pub fn add_sample(&mut self, station_id: i64, timestamp: DateTime<Utc>, value: f64) {
        self.samples
            .entry(station_id)
            .or_default()
            .push(Sample::new(timestamp, value));
    }

    pub fn add_rating_row(&mut self, station_id: i64, curve_type_id: i64, row: ScaleRow) {
        self.rating_rows
            .entry((station_id, curve_type_id))
            .or_default()
            .push(row);
    }
}

impl SeriesStore for MemorySeriesStore {
    fn fetch_samples(
        &mut self,
        station_id: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, Box<dyn Error>> {
        let mut inside: Vec<Sample> = self
            .samples
            .get(&station_id)
            .map(|all| {
                all.iter()
                    .filter(|s| s.timestamp >= window_start && s.timestamp <= window_end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        inside.sort_by_key(|s| s.timestamp);
        Ok(inside)
    }

    fn fetch_rating_rows(
        &mut self,
        station_id: i64,
        curve_type_id: i64,
    ) -> Result<Vec<ScaleRow>, Box<dyn Error>> {
        Ok(self
            .rating_rows
            .get(&(station_id, curve_type_id))
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_fetch_samples_is_window_inclusive_and_ascending() {
        let mut store = MemorySeriesStore::new();
        store.add_sample(1, ts(3, 0), 3.0);
        store.add_sample(1, ts(1, 0), 1.0);
        store.add_sample(1, ts(2, 0), 2.0);
        store.add_sample(1, ts(4, 0), 4.0);

        let samples = store.fetch_samples(1, ts(1, 0), ts(3, 0)).unwrap();

        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0], "both bounds inclusive, ascending");
    }

    #[test]
    fn test_fetch_samples_for_unknown_station_is_empty() {
        let mut store = MemorySeriesStore::new();
        let samples = store.fetch_samples(99, ts(1, 0), ts(2, 0)).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_duplicate_timestamps_keep_insertion_order() {
        let mut store = MemorySeriesStore::new();
        store.add_sample(1, ts(1, 0), 1.0);
        store.add_sample(1, ts(1, 0), 2.0);

        let samples = store.fetch_samples(1, ts(1, 0), ts(1, 0)).unwrap();
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0], "stable sort preserves insert order");
    }

    #[test]
    fn test_fetch_rating_rows_keyed_by_station_and_curve_type() {
        let mut store = MemorySeriesStore::new();
        let row = ScaleRow {
            level: 2.0,
            level_unit_factor: 1.0,
            discharge: 10.0,
            discharge_unit_factor: 1.0,
        };
        store.add_rating_row(1, 7, row);

        assert_eq!(store.fetch_rating_rows(1, 7).unwrap().len(), 1);
        assert!(store.fetch_rating_rows(1, 8).unwrap().is_empty());
        assert!(store.fetch_rating_rows(2, 7).unwrap().is_empty());
    }
}
