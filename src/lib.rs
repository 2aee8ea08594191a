/// hydro_series: temporal aggregation engine for hydrometric time series.
///
/// # Module structure
///
/// ```text
/// hydro_series
/// ├── model     — shared data types (Sample, Granularity, Bucket, AggregationError, …)
/// ├── request   — aggregation request shape + window parsing/validation
/// ├── series    — insertion-ordered sample series with duplicate collapsing
/// ├── rating    — rating curve construction and level→discharge conversion
/// ├── aggregate — calendar-bucket grouping with carry-over across boundaries
/// ├── reader    — per-request orchestration: validate → fetch → convert → group
/// ├── store
/// │   ├── postgres — production store over the hydro schema
/// │   └── memory   — deterministic store for tests and development replay
/// └── logging   — leveled logging with station context and failure classification
/// ```

pub mod aggregate;
pub mod logging;
pub mod model;
pub mod rating;
pub mod reader;
pub mod request;
pub mod series;
pub mod store;
