//! Runtime configuration from the process environment (and `.env`).

use std::time::Duration;

use crate::error::SmogError;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppConfig {
    /// OpenWeather `appid`
    pub api_key: String,
    pub base_url: String,
    pub port: u16,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub upstream_timeout: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_max_capacity", &self.cache_max_capacity)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, SmogError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. `lookup` returns `None` for unset names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SmogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SmogError::Config("API_KEY must be set".into()))?;

        let base_url = lookup("OPENWEATHER_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| SmogError::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let cache_enabled = lookup("CACHE_ENABLED").map_or(true, |raw| parse_bool(&raw));

        let cache_ttl = match lookup("CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_positive_u64(&raw, "CACHE_TTL_SECS")?),
            None => DEFAULT_CACHE_TTL,
        };

        let cache_max_capacity = match lookup("CACHE_MAX_CAPACITY") {
            Some(raw) => parse_positive_u64(&raw, "CACHE_MAX_CAPACITY")?,
            None => DEFAULT_CACHE_CAPACITY,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive_u64(&raw, "UPSTREAM_TIMEOUT_SECS")?),
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        Ok(Self {
            api_key,
            base_url,
            port,
            cache_enabled,
            cache_ttl,
            cache_max_capacity,
            upstream_timeout,
        })
    }
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, SmogError> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(SmogError::Config(format!("{env_name} must be an integer > 0"))),
    }
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.port, 3000);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.cache_max_capacity, 10_000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[])),
            Err(SmogError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("API_KEY", "  ")])),
            Err(SmogError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_KEY", "abc"),
            ("OPENWEATHER_BASE_URL", "http://127.0.0.1:9999/"),
            ("PORT", "8080"),
            ("CACHE_ENABLED", "off"),
            ("CACHE_TTL_SECS", "60"),
            ("CACHE_MAX_CAPACITY", "5"),
            ("UPSTREAM_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.port, 8080);
        assert!(!config.cache_enabled);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_max_capacity, 5);
        assert_eq!(config.upstream_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_numbers() {
        for (name, value) in [("PORT", "http"), ("CACHE_TTL_SECS", "0"), ("UPSTREAM_TIMEOUT_SECS", "-3")] {
            let result = AppConfig::from_lookup(lookup_from(&[("API_KEY", "abc"), (name, value)]));
            assert!(matches!(result, Err(SmogError::Config(_))), "{name}={value} accepted");
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "super-secret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
