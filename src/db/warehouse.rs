//! MotherDuck warehouse: idempotent schema setup and CSV upsert loading.
//!
//! All statements are plain DuckDB SQL. The base table `activities_raw` is
//! the authoritative store keyed by activity id; the `activities` view is
//! replaced on every run so definition changes take effect without a
//! migration step.

use std::path::{Path, PathBuf};

use duckdb::Connection;
use log::info;

/// Database holding the activity tables. The initializer connects to the
/// account default (`my_db`) to be able to create this one.
pub const WAREHOUSE_DATABASE: &str = "strava";
pub const BOOTSTRAP_DATABASE: &str = "my_db";

const CREATE_ACTIVITIES_RAW: &str = "\
create table if not exists activities_raw (
    id bigint primary key,
    name varchar,
    start_date_local timestamp,
    type varchar,
    distance double,
    moving_time int
);";

// distance // 1000 and moving_time // 60 floor before rounding, so both
// derived columns always render with a trailing .0; downstream consumers
// depend on that exact output.
const CREATE_ACTIVITIES_VIEW: &str = r"
create or replace view activities as select
    id,
    name,
    start_date_local as start_date,
    type,
    case when type = 'Workout'
        then regexp_extract(name, '^(.*)\s+with\s+(.+)$', 1)
        end as workout_type,
    case when type in ('Workout', 'VirtualRide')
        then regexp_extract(name, '^(.*)\s+with\s+(.+)$', 2)
        end as coach,
    round(distance // 1000, 1) as distance_km,
    round(moving_time // 60, 1) as moving_time_min
from activities_raw;";

const MERGE_STAGED_ACTIVITIES: &str = "\
merge into activities_raw
using (select * from activities_staging) as upserts
on (upserts.id = activities_raw.id)
when matched then update
when not matched then insert;";

/// Open a MotherDuck connection with the token bundled into the string.
pub fn connect(database: &str, motherduck_token: &str) -> Result<Connection, String> {
    Connection::open(format!("md:{}?motherduck_token={}", database, motherduck_token))
        .map_err(|e| format!("connecting to md:{} failed: {}", database, e))
}

/// Create the warehouse database if absent, select it, and (re)create the
/// base table and derived view. Safe to run on every invocation.
pub fn setup(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(&format!(
        "create database if not exists {db}; use {db};",
        db = WAREHOUSE_DATABASE
    ))
    .map_err(|e| format!("creating database {} failed: {}", WAREHOUSE_DATABASE, e))?;
    create_schema_objects(conn).map_err(|e| format!("creating warehouse schema failed: {}", e))
}

fn create_schema_objects(conn: &Connection) -> Result<(), duckdb::Error> {
    conn.execute_batch(CREATE_ACTIVITIES_RAW)?;
    conn.execute_batch(CREATE_ACTIVITIES_VIEW)
}

/// Merge every CSV file in `dir` (non-recursive) into `activities_raw`,
/// lexicographically by filename so batch outcomes are reproducible when
/// several files touch the same ids. Returns the number of files merged; the
/// first failure aborts the remainder of the batch.
pub fn upsert_csv_files(conn: &Connection, dir: &Path) -> Result<usize, String> {
    let files = csv_files_sorted(dir)?;
    for file in &files {
        merge_csv_file(conn, file).map_err(|e| format!("merging {} failed: {}", file.display(), e))?;
        info!("Uploaded {} to DuckDB", file.display());
    }
    Ok(files.len())
}

fn csv_files_sorted(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir).map_err(|e| format!("reading {} failed: {}", dir.display(), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("reading {} failed: {}", dir.display(), e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn merge_csv_file(conn: &Connection, file: &Path) -> Result<(), duckdb::Error> {
    let quoted = file.to_string_lossy().replace('\'', "''");
    conn.execute_batch(&format!(
        "create temp table activities_staging as select * from read_csv_auto('{}');",
        quoted
    ))?;
    conn.execute_batch(MERGE_STAGED_ACTIVITIES)?;
    conn.execute_batch("drop table activities_staging;")
}
