//! # config — session settings from environment variables

use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote agent + ledger service.
    pub backend_url:   String,
    /// Cadence of the background snapshot refresh.
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let poll_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("POLL_INTERVAL_SECS must be a number")?;

        Ok(Self {
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}
