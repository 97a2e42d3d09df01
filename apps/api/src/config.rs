use anyhow::{bail, Context, Result};

/// Default Groq OpenAI-compatible chat completions endpoint.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const PLACEHOLDER_KEY: &str = "your-groq-api-key-here";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub groq_api_url: String,
    /// Origins allowed to call the API from a browser (comma-separated FRONTEND_URL).
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let allowed_origins = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?.trim().to_string(),
            groq_api_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),
            allowed_origins,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Startup precondition: the Groq credential must be present, not the
    /// README placeholder, and carry the provider's `gsk_` prefix.
    /// Checked once before any request is served, never per request.
    pub fn validate(&self) -> Result<()> {
        if self.groq_api_key.is_empty() || self.groq_api_key == PLACEHOLDER_KEY {
            bail!(
                "GROQ_API_KEY is missing or still set to the placeholder. \
                Get a free key at https://console.groq.com/keys"
            );
        }
        if !self.groq_api_key.starts_with("gsk_") {
            bail!(
                "GROQ_API_KEY looks invalid for Groq. It should start with 'gsk_'. \
                Get one from https://console.groq.com/keys"
            );
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
