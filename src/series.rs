/// Insertion-ordered sample series with duplicate-timestamp collapsing.
///
/// Samples keep the order in which they were inserted, and a second insert at
/// an already-seen timestamp overwrites the value in place: the entry stays
/// at the position of the first occurrence, the last value wins. The series
/// is never re-sorted; the aggregation engine requires callers to insert in
/// ascending timestamp order.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::Sample;

// ---------------------------------------------------------------------------
// SampleSeries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SampleSeries {
    samples: Vec<Sample>,
    index: HashMap<DateTime<Utc>, usize>,
}

impl SampleSeries {
    pub fn new() -> Self {
        SampleSeries::default()
    }

    /// Inserts a sample. A timestamp seen before overwrites the stored value
    /// in place and keeps its original position.
    pub fn insert(&mut self, timestamp: DateTime<Utc>, value: f64) {
        match self.index.get(&timestamp) {
            Some(&position) => self.samples[position].value = value,
            None => {
                self.index.insert(timestamp, self.samples.len());
                self.samples.push(Sample::new(timestamp, value));
            }
        }
    }

    /// Number of distinct-timestamp samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a SampleSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
