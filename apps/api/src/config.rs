use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Application configuration, resolved once at startup and threaded through
/// constructors. No other module reads the environment.
///
/// Precedence for every value: explicit CLI argument (applied by `main` after
/// loading) > environment variable > `credentials.json` fallback (API key
/// only) > built-in default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub logs_dir: PathBuf,
    pub log_level: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    openai_api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openai_api_key = resolve_api_key(
            std::env::var("OPENAI_API_KEY").ok(),
            Path::new("credentials.json"),
        );
        if openai_api_key.is_empty() {
            eprintln!("Warning: No API key found. Set OPENAI_API_KEY in .env or credentials.json");
        }

        Ok(Config {
            openai_api_key,
            model: env_or("LLM_MODEL", "gpt-4"),
            temperature: env_parse("LLM_TEMPERATURE", 0.2)?,
            max_tokens: env_parse("MAX_TOKENS", 4000)?,
            logs_dir: PathBuf::from(env_or("LOGS_DIR", "logs")),
            log_level: env_or("LOG_LEVEL", "info"),
            port: env_parse("PORT", 8080)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}

/// API key precedence: a non-empty environment value wins over the
/// credentials file; an empty result means no key was found anywhere.
fn resolve_api_key(env_value: Option<String>, credentials_path: &Path) -> String {
    match env_value {
        Some(key) if !key.is_empty() => key,
        _ => key_from_credentials(credentials_path).unwrap_or_default(),
    }
}

fn key_from_credentials(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let creds: CredentialsFile = serde_json::from_str(&raw).ok()?;
    (!creds.openai_api_key.is_empty()).then_some(creds.openai_api_key)
}
