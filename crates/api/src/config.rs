use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use rubberwatch_client::api::UpstreamUrls;
use rubberwatch_core::listing::DEFAULT_PAGE_SIZE;
use rubberwatch_core::prices::DEFAULT_EXCLUDED_MARKETS;

/// A configuration variable that is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against the
/// production upstream services.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URLs of the backend, price feed and quality service.
    pub upstream: UpstreamUrls,
    /// Per-request timeout for upstream calls in seconds (default: `30`).
    pub upstream_timeout_secs: u64,
    /// Where the session (token, name, theme) is persisted.
    pub session_file: PathBuf,
    /// Rows per page when a list page is first mounted.
    pub default_page_size: usize,
    /// Markets that never appear in the price trend.
    pub price_excluded_markets: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                            |
    /// |--------------------------|----------------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                          |
    /// | `PORT`                   | `3000`                                             |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                            |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                               |
    /// | `BACKEND_API_URL`        | `https://rubber-backend.solidaridadasia.com/api`   |
    /// | `PRICE_API_URL`          | `https://agribot-backend.demetrix.in`              |
    /// | `QUALITY_API_URL`        | `https://rubbersheetquality-backend.demetrix.in`   |
    /// | `UPSTREAM_TIMEOUT_SECS`  | `30`                                               |
    /// | `SESSION_FILE`           | `./data/session.json`                              |
    /// | `DEFAULT_PAGE_SIZE`      | `5`                                                |
    /// | `PRICE_EXCLUDED_MARKETS` | `Bangkok,Kuala Lumpur,Singapore`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", &var("PORT", "3000"), "a valid port")?;

        let cors_origins = list(&var("CORS_ORIGINS", "http://localhost:5173"));
        for origin in &cors_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError {
                    var: "CORS_ORIGINS",
                    expected: "a list of origins",
                    value: origin.clone(),
                });
            }
        }

        let request_timeout_secs = parse(
            "REQUEST_TIMEOUT_SECS",
            &var("REQUEST_TIMEOUT_SECS", "30"),
            "a number of seconds",
        )?;

        let upstream = UpstreamUrls {
            backend: base_url(&var(
                "BACKEND_API_URL",
                "https://rubber-backend.solidaridadasia.com/api",
            )),
            price: base_url(&var("PRICE_API_URL", "https://agribot-backend.demetrix.in")),
            quality: base_url(&var(
                "QUALITY_API_URL",
                "https://rubbersheetquality-backend.demetrix.in",
            )),
        };

        let upstream_timeout_secs = parse(
            "UPSTREAM_TIMEOUT_SECS",
            &var("UPSTREAM_TIMEOUT_SECS", "30"),
            "a number of seconds",
        )?;

        let session_file = PathBuf::from(var("SESSION_FILE", "./data/session.json"));

        let raw_page_size = var("DEFAULT_PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string());
        let default_page_size: usize =
            parse("DEFAULT_PAGE_SIZE", &raw_page_size, "a positive number")?;
        if default_page_size == 0 {
            return Err(ConfigError {
                var: "DEFAULT_PAGE_SIZE",
                expected: "a positive number",
                value: raw_page_size,
            });
        }

        let price_excluded_markets = match lookup("PRICE_EXCLUDED_MARKETS") {
            Some(raw) => list(&raw),
            None => DEFAULT_EXCLUDED_MARKETS.iter().map(|m| m.to_string()).collect(),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upstream,
            upstream_timeout_secs,
            session_file,
            default_page_size,
            price_excluded_markets,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Time allowed for a whole dashboard request. Never shorter than one
    /// upstream call, so a slow upstream surfaces as a gateway error rather
    /// than a server timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(self.upstream_timeout_secs))
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    raw: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError {
        var,
        expected,
        value: raw.to_string(),
    })
}

fn list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
