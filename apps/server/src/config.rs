//! Environment-driven server configuration.
//!
//! Missing API keys are reported as startup warnings, never as errors: the
//! server still runs, with the affected feature degraded (vendor calls that
//! fail, or commentary disabled).

use tracing::warn;

pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    pub alpha_vantage_key: Option<String>,
    pub gemini_key: Option<String>,
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        // A .env file is a convenience, not a requirement
        let _ = dotenvy::dotenv();

        Self {
            listen_addr: non_empty("MLENS_LISTEN_ADDR")
                .unwrap_or_else(|| "127.0.0.1:8484".to_string()),
            db_path: non_empty("MLENS_DB_PATH").unwrap_or_else(|| "marketlens.db".to_string()),
            alpha_vantage_key: non_empty("ALPHAVANTAGE_API_KEY"),
            gemini_key: non_empty("GEMINI_API_KEY"),
        }
    }

    /// Non-fatal startup validation.
    pub fn log_missing_keys(&self) {
        if self.alpha_vantage_key.is_none() {
            warn!("ALPHAVANTAGE_API_KEY is not set; market data requests will be rejected by the vendor");
        }
        if self.gemini_key.is_none() {
            warn!("GEMINI_API_KEY is not set; commentary endpoints are disabled");
        }
    }
}
