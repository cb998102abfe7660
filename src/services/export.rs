//! CSV staging of a projected activity table.

use std::path::Path;

use serde_json::Value;

use crate::models::strava::ActivityTable;

/// Serialize the table to `path` (header row, comma-delimited, UTF-8),
/// replacing any existing file of the same name.
///
/// An empty projection still truncates the file so a stale staging artifact
/// from an earlier run cannot be merged again as fresh data.
pub fn write_csv(table: &ActivityTable, path: &Path) -> Result<(), String> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| format!("creating {} failed: {}", path.display(), e))?;

    if !table.columns.is_empty() {
        writer
            .write_record(&table.columns)
            .map_err(|e| format!("writing {} failed: {}", path.display(), e))?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(csv_field))
                .map_err(|e| format!("writing {} failed: {}", path.display(), e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("writing {} failed: {}", path.display(), e))?;
    Ok(())
}

/// Scalar stringification: nulls become empty fields, strings are written
/// verbatim, everything else uses its JSON rendering.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempdir::TempDir;

    fn sample_table() -> ActivityTable {
        ActivityTable {
            columns: vec!["id", "name", "start_date_local", "type", "distance", "moving_time"],
            rows: vec![
                vec![
                    json!(1),
                    json!("Morning Run with Alex"),
                    json!("2024-03-01T07:00:00Z"),
                    json!("Workout"),
                    json!(5000.0),
                    json!(1800),
                ],
                vec![
                    json!(2),
                    json!("Evening Ride"),
                    json!("2024-03-01T18:00:00Z"),
                    json!("Ride"),
                    json!(123.4),
                    Value::Null,
                ],
            ],
        }
    }

    #[test]
    fn round_trips_rows_modulo_stringification() {
        let tmp = TempDir::new("export").expect("tempdir");
        let path = tmp.path().join("activities_2024.csv");
        write_csv(&sample_table(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap(),
            &vec!["id", "name", "start_date_local", "type", "distance", "moving_time"]
        );
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][1], "Morning Run with Alex");
        assert_eq!(&records[0][4], "5000.0");
        assert_eq!(&records[1][4], "123.4");
        assert_eq!(&records[1][5], "");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = TempDir::new("export").expect("tempdir");
        let path = tmp.path().join("activities_last_7_days.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let empty = ActivityTable {
            columns: Vec::new(),
            rows: Vec::new(),
        };
        write_csv(&empty, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
