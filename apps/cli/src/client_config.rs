use std::env;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tudu_core::{AppError, AppResult};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";

/// Page size used when `TUDU_PAGE_SIZE` is unset or no configuration is loaded.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub page_size: u32,
}

impl ClientConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_base_url = lookup("TUDU_API_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid TUDU_API_BASE_URL value '{api_base_url}': {error}"
            ))
        })?;

        let api_token = lookup("TUDU_API_TOKEN").filter(|value| !value.is_empty());
        let http_timeout_secs = parse_u64(&lookup, "TUDU_HTTP_TIMEOUT_SECS", 15)?;
        let page_size = parse_u32(&lookup, "TUDU_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "TUDU_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        if page_size == 0 {
            return Err(AppError::Validation(
                "TUDU_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            http_timeout: Duration::from_secs(http_timeout_secs),
            page_size,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_u32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> AppResult<u32> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tudu_core::AppError;

    use super::ClientConfig;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ClientConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&[]);

        assert_eq!(
            config,
            Ok(ClientConfig {
                api_base_url: "http://127.0.0.1:8080".to_owned(),
                api_token: None,
                http_timeout: Duration::from_secs(15),
                page_size: 20,
            })
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[
            ("TUDU_API_BASE_URL", "https://tudu.example.org/"),
            ("TUDU_API_TOKEN", "abc"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url, "https://tudu.example.org");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        assert!(matches!(
            config_from(&[("TUDU_API_BASE_URL", "::not a url")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("TUDU_PAGE_SIZE", "0")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("TUDU_HTTP_TIMEOUT_SECS", "soon")]),
            Err(AppError::Validation(_))
        ));
    }
}
