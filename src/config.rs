use crate::completion::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Option<Duration>,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Config {
    /// Read settings from the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
        let gemini_timeout = get("GEMINI_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>().map(Duration::from_secs))
            .transpose()
            .context("invalid GEMINI_TIMEOUT_SECS")?;
        let port = get("PORT")
            .map(|s| s.parse::<u16>())
            .transpose()
            .context("invalid PORT")?
            .unwrap_or(8080);

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            gemini_timeout,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("invalid HOST/PORT")
    }

    pub fn gemini_client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.gemini_api_key, &self.gemini_model)
            .with_base_url(&self.gemini_base_url);
        match self.gemini_timeout {
            Some(timeout) => client.with_timeout(timeout),
            None => client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("GEMINI_API_KEY", "k")]).unwrap();
        assert_eq!(cfg.gemini_model, DEFAULT_MODEL);
        assert_eq!(cfg.gemini_base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.static_dir, "public");
        assert!(cfg.gemini_timeout.is_none());
        assert_eq!(cfg.addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn api_key_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("GEMINI_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = config(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_TIMEOUT_SECS", "30"),
            ("PORT", "3001"),
        ])
        .unwrap();
        assert_eq!(cfg.gemini_model, "gemini-1.5-pro");
        assert_eq!(cfg.gemini_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.port, 3001);

        assert!(config(&[("GEMINI_API_KEY", "k"), ("PORT", "http")]).is_err());
        assert!(config(&[("GEMINI_API_KEY", "k"), ("GEMINI_TIMEOUT_SECS", "soon")]).is_err());
    }
}
