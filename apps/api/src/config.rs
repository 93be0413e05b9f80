use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GENERATION_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_GENERATION_MODEL: &str = "mistral";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub generation_url: String,
    pub generation_model: String,
    /// `None` leaves the HTTP client without a request timeout.
    pub generation_timeout: Option<Duration>,
    pub session_ttl_hours: i64,
    /// Sets the `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let generation_timeout = optional_env("GENERATION_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            generation_url: optional_env("GENERATION_URL")
                .unwrap_or_else(|| DEFAULT_GENERATION_URL.to_string()),
            generation_model: optional_env("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            generation_timeout,
            session_ttl_hours: optional_env("SESSION_TTL_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse::<i64>()
                .context("SESSION_TTL_HOURS must be an integer")?,
            cookie_secure: optional_env("COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|| (10 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration for tests that never touch the network or a real database.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/resume_critic_test".to_string(),
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout: None,
            session_ttl_hours: 24,
            cookie_secure: false,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
