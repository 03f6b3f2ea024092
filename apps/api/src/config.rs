use anyhow::{bail, Context, Result};

use crate::jobs::sources::SourceKind;

const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Startup fails if `GROQ_API_KEY` is missing or a numeric variable is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub tesseract_path: String,
    pub scrape_delay_ms: u64,
    pub scrape_timeout_secs: u64,
    pub job_sources: Vec<SourceKind>,
    pub usd_to_inr_rate: f64,
    pub max_upload_bytes: usize,
    /// Job match analysis via the LLM; keyword overlap only when false.
    pub enable_llm_matching: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            tesseract_path: env_or("TESSERACT_PATH", "tesseract"),
            scrape_delay_ms: parse_env("SCRAPE_DELAY_MS", 1000)?,
            scrape_timeout_secs: parse_env("SCRAPE_TIMEOUT_SECS", 10)?,
            job_sources: parse_sources(&env_or("JOB_SOURCES", "indeed,linkedin,glassdoor"))?,
            usd_to_inr_rate: parse_env("USD_TO_INR_RATE", 83.0)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            enable_llm_matching: parse_env("ENABLE_LLM_MATCHING", true)?,
        })
    }

    /// Defaults without touching the process environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            groq_api_key: "test-key".to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            tesseract_path: "tesseract".to_string(),
            scrape_delay_ms: 0,
            scrape_timeout_secs: 1,
            job_sources: vec![SourceKind::Indeed],
            usd_to_inr_rate: 83.0,
            max_upload_bytes: 1024 * 1024,
            enable_llm_matching: true,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Parses a comma-separated source list such as `indeed,glassdoor`.
pub fn parse_sources(raw: &str) -> Result<Vec<SourceKind>> {
    let mut sources = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some(kind) = SourceKind::from_name(name) else {
            bail!("JOB_SOURCES contains unknown source '{name}'");
        };
        if !sources.contains(&kind) {
            sources.push(kind);
        }
    }
    if sources.is_empty() {
        bail!("JOB_SOURCES must name at least one source");
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_dedupes_and_trims() {
        let sources = parse_sources(" indeed, glassdoor ,indeed").unwrap();
        assert_eq!(sources, vec![SourceKind::Indeed, SourceKind::Glassdoor]);
    }

    #[test]
    fn test_parse_sources_rejects_unknown() {
        let err = parse_sources("indeed,monster").unwrap_err();
        assert!(err.to_string().contains("monster"));
    }

    #[test]
    fn test_parse_sources_rejects_empty() {
        assert!(parse_sources(" , ").is_err());
    }
}
