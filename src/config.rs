//! Process-wide configuration, read once at startup.
//!
//! Missing variables fall back to empty strings rather than erroring here:
//! the failure then surfaces at the call that needed the credential, which
//! keeps a misconfigured run's behavior identical whether a variable is
//! absent or merely wrong.

#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth application client id.
    pub client_id: String,
    /// Strava OAuth application client secret.
    pub client_secret: String,
    /// Long-lived refresh token exchanged for short-lived access tokens.
    pub refresh_token: String,
    /// MotherDuck service token bundled into the connection string.
    pub motherduck_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            client_id: env_or_empty("STRAVA_CLIENT_ID"),
            client_secret: env_or_empty("STRAVA_CLIENT_SECRET"),
            refresh_token: env_or_empty("STRAVA_REFRESH_TOKEN"),
            motherduck_token: env_or_empty("MOTHER_DUCK_API_KEY"),
        }
    }
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
