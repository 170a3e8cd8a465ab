use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Provider keys and the model name live here and nowhere else: clients receive
/// this struct in their constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub model_name: String,
    pub youtube_api_key: String,
    pub youtube_base_url: String,
    /// Upper bound applied to every outbound provider call.
    pub provider_timeout: Duration,
    /// How many videos the search step asks for.
    pub video_results: u32,
    pub port: u16,
    /// Browser origins allowed by CORS. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider_timeout = parse_timeout(&optional_env("PROVIDER_TIMEOUT_SECS", "30"))?;
        let video_results = parse_video_results(&optional_env("VIDEO_RESULTS", "5"))?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_base_url: optional_env("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            model_name: optional_env("MODEL_NAME", DEFAULT_MODEL),
            youtube_api_key: require_env("YOUTUBE_API_KEY")?,
            youtube_base_url: optional_env("YOUTUBE_BASE_URL", DEFAULT_YOUTUBE_BASE_URL),
            provider_timeout,
            video_results,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            cors_origins: parse_origins(&optional_env("CORS_ALLOWED_ORIGINS", "")),
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("PROVIDER_TIMEOUT_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn parse_video_results(raw: &str) -> Result<u32> {
    let n = raw
        .trim()
        .parse::<u32>()
        .context("VIDEO_RESULTS must be a positive integer")?;
    if !(1..=50).contains(&n) {
        bail!("VIDEO_RESULTS must be between 1 and 50, got {n}");
    }
    Ok(n)
}

/// Comma-separated list, blanks ignored.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
