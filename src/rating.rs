/// Rating-curve construction and level→discharge conversion.
///
/// A rating curve is the measured level-to-discharge relationship for one
/// (station, curve-type) pair. It is built once per request from raw scale
/// rows: each row's level and discharge are brought to their principal units
/// independently, then the converted pair becomes one exact-match table
/// entry. Stations without curve rows simply have no curve; their samples
/// pass through unconverted.

use std::collections::HashMap;

use crate::model::{AggregationError, RatingPoint, ScaleRow};

// ---------------------------------------------------------------------------
// RatingCurve
// ---------------------------------------------------------------------------

/// Exact-match level→discharge lookup, both axes in principal units.
///
/// Lookup keys compare by `f64::to_bits`, so "exact match" means the stored
/// and queried levels are bit-identical. Duplicate level keys are not
/// rejected; the last-written row wins.
#[derive(Debug, Clone)]
pub struct RatingCurve {
    table: HashMap<u64, f64>,
}

impl RatingCurve {
    /// Builds a curve from raw store rows, converting each axis to its
    /// principal unit. Zero rows means the station has no curve for the
    /// requested type: returns `None`, which downstream code treats as
    /// "no conversion", not as an error.
    pub fn from_rows(rows: &[ScaleRow]) -> Option<RatingCurve> {
        if rows.is_empty() {
            return None;
        }

        let mut table = HashMap::with_capacity(rows.len());
        for row in rows {
            let point = RatingPoint {
                level: row.level * row.level_unit_factor,
                discharge: row.discharge * row.discharge_unit_factor,
            };
            table.insert(point.level.to_bits(), point.discharge);
        }
        Some(RatingCurve { table })
    }

    /// The discharge stored for an exactly matching level, if any.
    pub fn discharge_for(&self, level: f64) -> Option<f64> {
        self.table.get(&level.to_bits()).copied()
    }

    /// Number of distinct level keys in the curve.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Value conversion
// ---------------------------------------------------------------------------

/// Applies an optional rating curve to one raw sample value.
///
/// - No curve: the value is returned unchanged.
/// - Curve present, exact level match: the mapped discharge.
/// - Curve present, no match: `MissingRatingPoint`. A level that cannot be
///   converted is never silently passed through as if it were a discharge.
// TODO: interpolate between the neighbouring rating points instead of failing
// when no exact level match exists.
pub fn convert_value(
    curve: Option<&RatingCurve>,
    value: f64,
) -> Result<f64, AggregationError> {
    match curve {
        None => Ok(value),
        Some(curve) => curve
            .discharge_for(value)
            .ok_or(AggregationError::MissingRatingPoint { level: value }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
