//! Column projection to the fixed warehouse schema.

use log::warn;
use serde_json::Value;

use crate::models::strava::{ACTIVITY_COLUMNS, ActivityTable, RawActivity};

/// Narrow fetched rows to the allow-listed columns, preserving row order.
///
/// A column is kept when it appears in at least one row; an expected column
/// absent from the whole input is logged and omitted so that upstream schema
/// drift narrows the output instead of failing it. Projecting an already
/// projected table is a no-op.
pub fn project_columns(rows: &[RawActivity]) -> ActivityTable {
    if rows.is_empty() {
        return ActivityTable {
            columns: Vec::new(),
            rows: Vec::new(),
        };
    }

    let columns: Vec<&'static str> = ACTIVITY_COLUMNS
        .iter()
        .copied()
        .filter(|col| {
            let present = rows.iter().any(|row| row.contains_key(*col));
            if !present {
                warn!("Expected column '{}' missing from fetched activities; omitting it", col);
            }
            present
        })
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| row.get(*col).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    ActivityTable { columns, rows }
}
