pub mod models {
    pub mod strava;
}

pub mod client;
pub mod config;
pub mod window;
pub mod services {
    pub mod export;
    pub mod fetch;
    pub mod project;
}
pub mod db {
    pub mod warehouse;
}

use std::ffi::OsString;
use std::path::Path;

use chrono::Utc;
use log::{error, info};

use crate::client::StravaClient;
use crate::config::Config;
use crate::db::warehouse;
use crate::services::{export, fetch, project};
use crate::window::FetchWindow;

/// Parse the one supported flag: `--year N` (also `--year=N`).
fn parse_year_arg<I>(args: I) -> Result<Option<i32>, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut year: Option<i32> = None;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--year") => {
                if year.is_some() {
                    return Err("`--year` provided more than once".to_string());
                }
                let value = args
                    .next()
                    .ok_or_else(|| "`--year` requires an integer argument".to_string())?;
                year = Some(parse_year_value(&value.to_string_lossy())?);
            }
            Some(s) if s.starts_with("--year=") => {
                if year.is_some() {
                    return Err("`--year` provided more than once".to_string());
                }
                year = Some(parse_year_value(&s["--year=".len()..])?);
            }
            Some(other) => return Err(format!("unrecognised argument: {}", other)),
            None => return Err("argument contains invalid UTF-8".to_string()),
        }
    }

    Ok(year)
}

fn parse_year_value(raw: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|_| format!("`--year` must be an integer, got: {}", raw))
}

pub fn run() -> Result<(), String> {
    let year = parse_year_arg(std::env::args_os().skip(1))?;
    let cfg = Config::from_env();
    let client = StravaClient::new();

    // 1) Fetch one window of activities and stage it as CSV
    match year {
        Some(y) => info!("Downloading activities for year {}", y),
        None => info!("No year specified; downloading activities from the last 7 days"),
    }
    let access_token = client
        .exchange_refresh_token(&cfg)
        .map_err(|e| format!("access token exchange failed: {}", e))?;
    let fetch_window = match year {
        Some(y) => FetchWindow::for_year(y)?,
        None => FetchWindow::last_7_days(Utc::now()),
    };
    let activities = fetch::fetch_activities(&client, &access_token, &fetch_window)?;
    let table = project::project_columns(&activities);
    info!("Downloaded {} activities", table.len());

    let csv_file = window::csv_file_name(year);
    export::write_csv(&table, Path::new(&csv_file))?;
    info!("Wrote {}", csv_file);

    // 2) Warehouse setup, then merge every staged CSV (not just this run's)
    let conn = warehouse::connect(warehouse::BOOTSTRAP_DATABASE, &cfg.motherduck_token)?;
    warehouse::setup(&conn)?;
    drop(conn);

    let conn = warehouse::connect(warehouse::WAREHOUSE_DATABASE, &cfg.motherduck_token)?;
    let merged = warehouse::upsert_csv_files(&conn, Path::new("."))?;
    info!("Merged {} csv file(s) into activities_raw", merged);

    Ok(())
}

fn main() {
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    info!(
        "strava-motherduck {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );

    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
