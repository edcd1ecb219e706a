use std::env;
use std::time::Duration;

use clap::Parser;

use crate::error::AppError;
use crate::routes::Route;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_sources(None, None)
    }

    /// Explicit values win; anything missing is read from the environment.
    pub fn from_sources(url: Option<String>, anon_key: Option<String>) -> Result<Self, AppError> {
        let url = match url {
            Some(url) => url,
            None => required_var("SUPABASE_URL")?,
        };
        let anon_key = match anon_key {
            Some(key) => key,
            None => required_var("SUPABASE_ANON_KEY")?,
        };

        let mut config = Self::new(url, anon_key);
        if let Ok(raw) = env::var("AKADEMIK_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("AKADEMIK_TIMEOUT_SECS is invalid: {}", e)))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn required_var(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::Config(format!("{} is not set", key)))
}

/// Command line of the `akademik` binary.
#[derive(Debug, Parser)]
#[command(name = "akademik", about = "Academic records front end")]
pub struct Cli {
    /// Project URL of the hosted backend (falls back to SUPABASE_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Public anon key (falls back to SUPABASE_ANON_KEY).
    #[arg(long)]
    pub anon_key: Option<String>,

    /// Page to open first, e.g. `/` or `/register`.
    #[arg(long, default_value = "/")]
    pub route: Route,

    #[arg(long, env = "RUST_LOG", default_value = "akademik=info")]
    pub log_level: String,
}

impl Cli {
    pub fn gateway_config(&self) -> Result<GatewayConfig, AppError> {
        GatewayConfig::from_sources(self.url.clone(), self.anon_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = GatewayConfig::new("https://abc.supabase.co/", "anon");
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_explicit_sources_skip_the_environment() {
        let config = GatewayConfig::from_sources(
            Some("https://abc.supabase.co".to_string()),
            Some("anon".to_string()),
        )
        .expect("config from explicit values");
        assert_eq!(config.anon_key, "anon");
    }

    #[test]
    fn test_cli_parses_route() {
        let cli = Cli::try_parse_from(["akademik", "--route", "/mahasiswa", "--anon-key", "k"])
            .expect("parse cli");
        assert_eq!(cli.route, Route::Students);
        assert_eq!(cli.anon_key.as_deref(), Some("k"));
    }
}
