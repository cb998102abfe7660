//! Blocking HTTP client for the Strava API (token exchange + activity pages).
//!
//! - Blocking client using `ureq` (no async), 10 s timeout per call.
//! - Activity rows are returned as raw JSON objects (`crate::models::strava`)
//!   so that upstream schema drift survives until projection.
//!
//! Authentication
//! - Exchanges the long-lived refresh token for a short-lived access token
//!   via a single OAuth2 refresh grant. No caching, no re-refresh: one run
//!   performs exactly one exchange.

use log::{error, info};
use std::time::Duration;

use crate::config::Config;
use crate::models::strava::RawActivity;
use crate::window::FetchWindow;

const API_BASE_URL: &str = "https://www.strava.com/api/v3";
const OAUTH_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum StravaClientError {
    Transport(String),
    Http { status: u16, message: String },
    Json(serde_json::Error),
    Auth(String),
}

impl core::fmt::Display for StravaClientError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StravaClientError::Transport(s) => write!(f, "transport error: {}", s),
            StravaClientError::Http { status, message } => write!(f, "http {}: {}", status, message),
            StravaClientError::Json(e) => write!(f, "json error: {}", e),
            StravaClientError::Auth(e) => write!(f, "auth error: {}", e),
        }
    }
}

impl std::error::Error for StravaClientError {}

impl From<serde_json::Error> for StravaClientError {
    fn from(value: serde_json::Error) -> Self {
        StravaClientError::Json(value)
    }
}

pub struct StravaClient {
    agent: ureq::Agent,
}

impl StravaClient {
    pub fn new() -> Self {
        StravaClient {
            agent: ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build(),
        }
    }

    /// Exchange the refresh token for an access token (one POST, no retry).
    pub fn exchange_refresh_token(&self, cfg: &Config) -> Result<String, StravaClientError> {
        info!("Fetching new access token from Strava");
        let resp = self
            .agent
            .post(OAUTH_TOKEN_URL)
            .set("Accept", "application/json")
            .send_form(&[
                ("client_id", cfg.client_id.as_str()),
                ("client_secret", cfg.client_secret.as_str()),
                ("refresh_token", cfg.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ]);
        match resp {
            Ok(r) => {
                #[derive(serde::Deserialize)]
                struct TokenResponse {
                    access_token: String,
                }
                let TokenResponse { access_token } =
                    serde_json::from_reader(r.into_reader()).map_err(StravaClientError::Json)?;
                Ok(access_token)
            }
            Err(ureq::Error::Transport(t)) => Err(StravaClientError::Transport(t.to_string())),
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_else(|_| String::from("<no body>"));
                error!("Error fetching access token: {}", body);
                Err(StravaClientError::Auth(format!("http {}: {}", status, body)))
            }
        }
    }

    /// Fetch one page of athlete activities inside the window.
    ///
    /// Pages are 1-indexed request parameters; an empty page is the caller's
    /// termination signal.
    pub fn activities_page(
        &self,
        access_token: &str,
        window: &FetchWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawActivity>, StravaClientError> {
        let url = format!("{}/athlete/activities", API_BASE_URL);
        let req = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .set("Authorization", &format!("Bearer {}", access_token))
            .query("after", &window.after.to_string())
            .query("before", &window.before.to_string())
            .query("page", &page.to_string())
            .query("per_page", &per_page.to_string());

        match req.call() {
            Ok(res) => serde_json::from_reader(res.into_reader()).map_err(StravaClientError::Json),
            Err(ureq::Error::Transport(t)) => Err(StravaClientError::Transport(t.to_string())),
            Err(ureq::Error::Status(status, res)) => {
                let body = res.into_string().unwrap_or_else(|_| String::from("<no body>"));
                Err(StravaClientError::Http { status, message: body })
            }
        }
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}
