use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub twilio_sid: String,
    pub twilio_token: String,
    pub hf_api_token: String,
    pub csv_path: String,
    pub media_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            twilio_sid: require_env("TWILIO_SID")?,
            twilio_token: require_env("TWILIO_TOKEN")?,
            hf_api_token: require_env("HF_API_TOKEN")?,
            csv_path: std::env::var("CSV_PATH").unwrap_or_else(|_| "resumes.csv".to_string()),
            media_dir: std::env::var("MEDIA_DIR").unwrap_or_else(|_| "resumes".to_string()),
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
