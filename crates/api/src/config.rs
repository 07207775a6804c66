use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://dev.api-v1.dreambigportal.in/api";
const DEFAULT_PUBLIC_API_URL: &str = "https://api-v5.dreambigportal.in/pub/public_api";
const DEFAULT_CERTIFICATE_URL: &str =
    "https://dreambigportal.com/public/api/certificate_download.php";
const DEFAULT_PACKAGE_NAME: &str = "lms.caddcentre.com";
const DEFAULT_APP_ID: u32 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Backend endpoints and client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Public API host serving the feedback operations.
    pub public_api_url: String,
    pub certificate_url: Url,
    pub package_name: String,
    pub app_id: u32,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            public_api_url: DEFAULT_PUBLIC_API_URL.to_owned(),
            certificate_url: default_certificate_url(),
            package_name: DEFAULT_PACKAGE_NAME.to_owned(),
            app_id: DEFAULT_APP_ID,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// # Panics
///
/// Never in practice: the default is a constant, valid URL.
fn default_certificate_url() -> Url {
    Url::parse(DEFAULT_CERTIFICATE_URL).expect("default certificate URL is valid")
}

impl ApiConfig {
    /// Read `PORTAL_*` environment variables, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let base_url = match read("PORTAL_API_BASE_URL") {
            Some(raw) => checked_url("PORTAL_API_BASE_URL", &raw)?.to_string(),
            None => defaults.base_url,
        };
        let public_api_url = match read("PORTAL_PUBLIC_API_URL") {
            Some(raw) => checked_url("PORTAL_PUBLIC_API_URL", &raw)?.to_string(),
            None => defaults.public_api_url,
        };
        let certificate_url = match read("PORTAL_CERTIFICATE_URL") {
            Some(raw) => checked_url("PORTAL_CERTIFICATE_URL", &raw)?,
            None => defaults.certificate_url,
        };
        let package_name = read("PORTAL_PACKAGE_NAME").unwrap_or(defaults.package_name);
        let app_id = match read("PORTAL_APP_ID") {
            Some(raw) => positive("PORTAL_APP_ID", &raw)?,
            None => defaults.app_id,
        };
        let timeout = match read("PORTAL_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(positive("PORTAL_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        Ok(Self {
            base_url,
            public_api_url,
            certificate_url,
            package_name,
            app_id,
            timeout,
        })
    }

    /// Point every endpoint at `base`; used by tests and the `--api-base-url` flag.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    #[must_use]
    pub fn with_public_api_url(mut self, url: impl Into<String>) -> Self {
        self.public_api_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base_url>/<path>`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn checked_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })
}

fn positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.app_id, 5);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(
            config.endpoint("my_courses"),
            "https://dev.api-v1.dreambigportal.in/api/my_courses"
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORTAL_API_BASE_URL", "http://localhost:8080/api/"),
            ("PORTAL_TIMEOUT_SECS", "3"),
            ("PORTAL_PACKAGE_NAME", "lms.example.com"),
            ("PORTAL_APP_ID", " 9 "),
        ]))
        .unwrap();
        assert_eq!(config.endpoint("login"), "http://localhost:8080/api/login");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.package_name, "lms.example.com");
        assert_eq!(config.app_id, 9);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("PORTAL_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "PORTAL_TIMEOUT_SECS", .. }));

        let err = ApiConfig::from_lookup(lookup(&[("PORTAL_CERTIFICATE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
