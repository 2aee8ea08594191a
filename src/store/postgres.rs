/// PostgreSQL-backed series store.
///
/// Connects with the URL in `DATABASE_URL` (read through dotenv, so a local
/// `.env` works) and expects the `hydro` schema from
/// `sql/001_series_schema.sql` to be applied. The connection lives as long
/// as the store value; per-request callers construct the store inside the
/// request scope so the client is released on every exit path.

use std::env;
use std::error::Error;

use chrono::{DateTime, Utc};
use postgres::{Client, NoTls};

use crate::model::{Sample, ScaleRow};
use crate::store::SeriesStore;

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Connects and checks that the expected schemas exist.
///
/// Failing fast here turns a misapplied-migration problem into one clear
/// message instead of a query error deep inside a request.
pub fn connect_and_verify(schemas: &[&str]) -> Result<Client, Box<dyn Error>> {
    dotenv::dotenv().ok();
    let database_url =
        env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set (see .env)")?;

    let mut client = Client::connect(&database_url, NoTls)?;

    for schema in schemas {
        let row = client.query_one(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.schemata WHERE schema_name = $1
            )",
            &[schema],
        )?;
        let present: bool = row.get(0);
        if !present {
            return Err(format!(
                "schema '{}' is missing - apply sql/001_series_schema.sql first",
                schema
            )
            .into());
        }
    }

    Ok(client)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct PgSeriesStore {
    client: Client,
}

impl PgSeriesStore {
    /// Connects using `DATABASE_URL` and verifies the `hydro` schema.
    pub fn connect() -> Result<PgSeriesStore, Box<dyn Error>> {
        let client = connect_and_verify(&["hydro"])?;
        Ok(PgSeriesStore { client })
    }

    /// Wraps an already-open client. Used by tests that manage their own
    /// connection and seed data.
    pub fn from_client(client: Client) -> PgSeriesStore {
        PgSeriesStore { client }
    }

    /// Earliest and latest sample timestamp recorded for a station, or
    /// `None` when the station has no samples at all. Service layers use
    /// this to construct sensible default windows.
    pub fn data_range(
        &mut self,
        station_id: i64,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, Box<dyn Error>> {
        let row = self.client.query_one(
            "SELECT MIN(sampled_at), MAX(sampled_at)
             FROM hydro.samples
             WHERE station_id = $1",
            &[&station_id],
        )?;

        let min: Option<DateTime<Utc>> = row.get(0);
        let max: Option<DateTime<Utc>> = row.get(1);

        match (min, max) {
            (Some(start), Some(end)) => Ok(Some((start, end))),
            _ => Ok(None),
        }
    }
}

impl SeriesStore for PgSeriesStore {
    fn fetch_samples(
        &mut self,
        station_id: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, Box<dyn Error>> {
        let rows = self.client.query(
            "SELECT sampled_at, value
             FROM hydro.samples
             WHERE station_id = $1
               AND sampled_at BETWEEN $2 AND $3
             ORDER BY sampled_at ASC",
            &[&station_id, &window_start, &window_end],
        )?;

        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            samples.push(Sample::new(row.get(0), row.get(1)));
        }

        Ok(samples)
    }

    fn fetch_rating_rows(
        &mut self,
        station_id: i64,
        curve_type_id: i64,
    ) -> Result<Vec<ScaleRow>, Box<dyn Error>> {
        // Units join twice: once for the level axis, once for the discharge
        // axis. Each axis carries its own to-principal factor.
        let rows = self.client.query(
            "SELECT r.level, lu.to_principal, r.discharge, du.to_principal
             FROM hydro.rating_points r
             JOIN hydro.units lu ON r.level_unit_id = lu.unit_id
             JOIN hydro.units du ON r.discharge_unit_id = du.unit_id
             WHERE r.station_id = $1
               AND r.curve_type_id = $2",
            &[&station_id, &curve_type_id],
        )?;

        let mut scale_rows = Vec::with_capacity(rows.len());
        for row in rows {
            scale_rows.push(ScaleRow {
                level: row.get(0),
                level_unit_factor: row.get(1),
                discharge: row.get(2),
                discharge_unit_factor: row.get(3),
            });
        }

        Ok(scale_rows)
    }
}
