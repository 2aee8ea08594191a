/// Calendar-bucket grouping engine.
///
/// Walks an ordered sample series exactly once and emits one bucket per run
/// of samples sharing a calendar field (hour-of-day, day-of-month,
/// month-of-year or year), with the arithmetic mean and the sample count of
/// each run. The sample that trips a boundary is never consumed by the
/// closing bucket; it is carried over as the first member of the next one.
///
/// One routine serves all four granularities; the only varying piece is the
/// calendar-field extractor on `Granularity`.
///
/// # Preconditions and invariants
/// - Input samples must already be ascending by timestamp; grouping is
///   unspecified otherwise.
/// - Every emitted bucket has `count >= 1` and an anchor taken from an input
///   sample, never synthesized.
/// - Boundary detection compares the single calendar field only, not a full
///   composite date. Samples spaced at exact multiples of the field's cycle
///   (e.g. exactly 24 hours apart under `Hour`) share the field value and
///   fall into the same bucket.

use crate::model::{AggregationResult, Bucket, Granularity, Sample};
use crate::series::SampleSeries;

// ---------------------------------------------------------------------------
// Aggregation scan
// ---------------------------------------------------------------------------

/// Groups the series into calendar-aligned buckets.
///
/// Single left-to-right pass. The scan cycles through three phases:
/// start a bucket (from the carried sample if one is pending, otherwise the
/// next unconsumed sample), accumulate while the calendar field matches the
/// bucket's reference key, and on a mismatch hold that sample for the next
/// bucket. An empty series yields an empty result.
pub fn aggregate(series: &SampleSeries, granularity: Granularity) -> AggregationResult {
    let mut buckets = Vec::new();
    let mut samples = series.iter();
    let mut carried: Option<Sample> = None;

    loop {
        // StartBucket: the carried boundary sample, if any, opens the bucket.
        let first = match carried.take().or_else(|| samples.next().copied()) {
            Some(sample) => sample,
            None => break,
        };
        let anchor = first.timestamp;
        let reference = granularity.calendar_field(&first.timestamp);
        let mut sum = first.value;
        let mut count: u32 = 1;

        // Accumulating: fold samples in while the calendar field holds.
        for sample in samples.by_ref() {
            if granularity.calendar_field(&sample.timestamp) != reference {
                // BoundaryFound: keep the sample for the next cycle.
                carried = Some(*sample);
                break;
            }
            sum += sample.value;
            count += 1;
        }

        buckets.push(Bucket {
            anchor_timestamp: anchor,
            mean: sum / f64::from(count),
            count,
        });
    }

    AggregationResult::new(buckets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    fn ts_ymd(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn series_of(samples: &[(DateTime<Utc>, f64)]) -> SampleSeries {
        let mut series = SampleSeries::new();
        for &(timestamp, value) in samples {
            series.insert(timestamp, value);
        }
        series
    }

    // --- Hourly grouping ----------------------------------------------------

    #[test]
    fn test_hourly_grouping_with_carried_boundary_sample() {
        // 00:10 and 00:50 share hour 0; 01:05 trips the boundary and must
        // open the second bucket rather than being discarded.
        let series = series_of(&[(ts(0, 10), 1.0), (ts(0, 50), 3.0), (ts(1, 5), 5.0)]);
        let result = aggregate(&series, Granularity::Hour);

        assert_eq!(result.len(), 2);
        assert_eq!(result.buckets[0].anchor_timestamp, ts(0, 10));
        assert_eq!(result.buckets[0].mean, 2.0);
        assert_eq!(result.buckets[0].count, 2);
        assert_eq!(result.buckets[1].anchor_timestamp, ts(1, 5));
        assert_eq!(result.buckets[1].mean, 5.0);
        assert_eq!(result.buckets[1].count, 1);
    }

    #[test]
    fn test_grouping_splits_buckets_instead_of_collapsing_window() {
        // Pins the boundary-detection semantics: the reference key comes from
        // the bucket's first sample, so a window spanning two hours yields
        // two buckets, never one aggregate over the whole window.
        let series = series_of(&[
            (ts(9, 0), 10.0),
            (ts(9, 30), 20.0),
            (ts(10, 0), 30.0),
            (ts(10, 30), 40.0),
        ]);
        let result = aggregate(&series, Granularity::Hour);

        assert_eq!(
            result.len(),
            2,
            "two calendar hours must produce two buckets, not a single collapsed one"
        );
        assert_eq!(result.counts(), vec![2, 2]);
        assert_eq!(result.buckets[0].mean, 15.0);
        assert_eq!(result.buckets[1].mean, 35.0);
    }

    #[test]
    fn test_hour_grouping_merges_samples_exactly_one_day_apart() {
        // Known limitation of single-field comparison: 09:00 today and 09:00
        // tomorrow share hour-of-day 9, so no boundary is detected.
        let series = series_of(&[
            (ts_ymd(2024, 5, 1, 9), 2.0),
            (ts_ymd(2024, 5, 2, 9), 4.0),
        ]);
        let result = aggregate(&series, Granularity::Hour);

        assert_eq!(result.len(), 1);
        assert_eq!(result.buckets[0].count, 2);
        assert_eq!(result.buckets[0].mean, 3.0);
    }

    // --- Other granularities ------------------------------------------------

    #[test]
    fn test_daily_grouping_across_month_boundary() {
        // Day-of-month 31 → 1 trips a boundary even though the month changed
        // too; only the day field is compared.
        let series = series_of(&[
            (ts_ymd(2024, 1, 31, 8), 1.0),
            (ts_ymd(2024, 1, 31, 20), 3.0),
            (ts_ymd(2024, 2, 1, 8), 7.0),
        ]);
        let result = aggregate(&series, Granularity::Day);

        assert_eq!(result.len(), 2);
        assert_eq!(result.buckets[0].mean, 2.0);
        assert_eq!(result.buckets[0].count, 2);
        assert_eq!(result.buckets[1].anchor_timestamp, ts_ymd(2024, 2, 1, 8));
    }

    #[test]
    fn test_monthly_grouping() {
        let series = series_of(&[
            (ts_ymd(2024, 3, 5, 0), 10.0),
            (ts_ymd(2024, 3, 25, 0), 20.0),
            (ts_ymd(2024, 4, 2, 0), 60.0),
        ]);
        let result = aggregate(&series, Granularity::Month);

        assert_eq!(result.len(), 2);
        assert_eq!(result.buckets[0].mean, 15.0);
        assert_eq!(result.buckets[1].mean, 60.0);
    }

    #[test]
    fn test_yearly_grouping() {
        let series = series_of(&[
            (ts_ymd(2023, 6, 1, 0), 1.0),
            (ts_ymd(2023, 12, 1, 0), 3.0),
            (ts_ymd(2024, 1, 1, 0), 5.0),
        ]);
        let result = aggregate(&series, Granularity::Year);

        assert_eq!(result.len(), 2);
        assert_eq!(result.buckets[0].count, 2);
        assert_eq!(result.buckets[1].count, 1);
    }

    // --- Edge cases ---------------------------------------------------------

    #[test]
    fn test_empty_series_yields_empty_result() {
        let result = aggregate(&SampleSeries::new(), Granularity::Hour);
        assert!(result.is_empty());
        assert!(result.counts().is_empty());
    }

    #[test]
    fn test_single_sample_yields_one_bucket_for_every_granularity() {
        for granularity in [
            Granularity::Hour,
            Granularity::Day,
            Granularity::Month,
            Granularity::Year,
        ] {
            let series = series_of(&[(ts(14, 30), 42.5)]);
            let result = aggregate(&series, granularity);

            assert_eq!(result.len(), 1, "one sample must yield one bucket ({:?})", granularity);
            assert_eq!(result.buckets[0].count, 1);
            assert_eq!(result.buckets[0].mean, 42.5);
            assert_eq!(result.buckets[0].anchor_timestamp, ts(14, 30));
        }
    }

    #[test]
    fn test_count_one_buckets_at_both_window_ends() {
        let series = series_of(&[
            (ts(0, 59), 2.0),
            (ts(1, 10), 4.0),
            (ts(1, 20), 6.0),
            (ts(2, 1), 8.0),
        ]);
        let result = aggregate(&series, Granularity::Hour);

        assert_eq!(result.counts(), vec![1, 2, 1]);
        assert_eq!(result.buckets[1].mean, 5.0);
    }

    #[test]
    fn test_counts_sum_to_distinct_sample_count() {
        let series = series_of(&[
            (ts(0, 5), 1.0),
            (ts(0, 15), 2.0),
            (ts(1, 5), 3.0),
            (ts(1, 15), 4.0),
            (ts(1, 45), 5.0),
            (ts(3, 0), 6.0),
        ]);
        let result = aggregate(&series, Granularity::Hour);

        let total: u32 = result.counts().iter().sum();
        assert_eq!(total as usize, series.len());
        assert!(result.buckets.iter().all(|b| b.count >= 1));
    }

    #[test]
    fn test_anchors_are_non_decreasing_input_timestamps() {
        let input = [
            (ts(0, 5), 1.0),
            (ts(0, 55), 2.0),
            (ts(2, 0), 3.0),
            (ts(2, 30), 4.0),
            (ts(5, 0), 5.0),
        ];
        let series = series_of(&input);
        let result = aggregate(&series, Granularity::Hour);

        let input_stamps: Vec<_> = input.iter().map(|(t, _)| *t).collect();
        let mut previous: Option<DateTime<Utc>> = None;
        for bucket in &result.buckets {
            assert!(
                input_stamps.contains(&bucket.anchor_timestamp),
                "anchor {} must be one of the input timestamps",
                bucket.anchor_timestamp
            );
            if let Some(prev) = previous {
                assert!(bucket.anchor_timestamp >= prev, "anchors must be non-decreasing");
            }
            previous = Some(bucket.anchor_timestamp);
        }
    }

    #[test]
    fn test_mean_is_arithmetic_mean_of_run_values() {
        let series = series_of(&[(ts(6, 0), 1.0), (ts(6, 20), 2.0), (ts(6, 40), 4.0)]);
        let result = aggregate(&series, Granularity::Hour);

        assert_eq!(result.len(), 1);
        let expected = (1.0 + 2.0 + 4.0) / 3.0;
        assert!((result.buckets[0].mean - expected).abs() < 1e-12);
    }
}
