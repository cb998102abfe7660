//! Shapes for Strava activity data as it moves through the pipeline.
//!
//! The athlete-activities endpoint returns wide objects whose field set has
//! drifted across API versions. Rows stay raw JSON objects until projection;
//! only the columns in [`ACTIVITY_COLUMNS`] are ever persisted.

use serde_json::{Map, Value};

/// One activity exactly as returned by the API.
pub type RawActivity = Map<String, Value>;

/// Columns retained from the upstream schema, in output order.
///
/// `id` is the primary key of the warehouse base table.
pub const ACTIVITY_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "start_date_local",
    "type",
    "distance",
    "moving_time",
];

/// A narrowed, column-ordered table of activities staged for CSV export.
///
/// `rows` are in fetch order; each row has one cell per entry in `columns`
/// (`Value::Null` where an individual record lacked the field).
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Value>>,
}

impl ActivityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
