use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "api.appenlight.com";
pub const DEFAULT_PROTOCOL_VERSION: &str = "0.5";
pub const DEFAULT_CLIENT: &str = "rust";

/// Errors raised while building or validating [`Settings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("[appenlight] 'api_key' is required")]
    MissingApiKey,

    #[error("[appenlight] 'api_key' contains invalid characters")]
    InvalidApiKey,

    #[error("[appenlight] 'host' is required")]
    MissingHost,

    #[error("[appenlight] unsupported scheme '{0}', expected http or https")]
    InvalidScheme(String),
}

/// URL scheme used to reach the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(ConfigError::InvalidScheme(s.to_string())),
        }
    }
}

/// Connection settings for the AppEnlight API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Private API key, sent in the `X-errormator-api-key` header (required).
    pub api_key: String,
    /// Host (and optional port) of the API. Default: `api.appenlight.com`.
    pub host: String,
    /// Default: `https`.
    pub scheme: Scheme,
    /// Value of the `protocol_version` query parameter. Default: `0.5`.
    pub protocol_version: String,
    /// Name of the reporting client. Default: `rust`.
    pub client: String,
}

impl Settings {
    /// Create settings with the API key only; all other fields use defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: DEFAULT_HOST.to_string(),
            scheme: Scheme::Https,
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            client: DEFAULT_CLIENT.to_string(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Build settings from a key lookup.
    ///
    /// Reads `APPENLIGHT_API_KEY` (required), and optionally
    /// `APPENLIGHT_HOST`, `APPENLIGHT_SCHEME`, `APPENLIGHT_PROTOCOL_VERSION`
    /// and `APPENLIGHT_CLIENT`. Empty values count as unset.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| get(key).filter(|v| !v.is_empty());

        let api_key = value("APPENLIGHT_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let mut settings = Settings::new(api_key);
        if let Some(host) = value("APPENLIGHT_HOST") {
            settings.host = host;
        }
        if let Some(scheme) = value("APPENLIGHT_SCHEME") {
            settings.scheme = scheme.parse()?;
        }
        if let Some(version) = value("APPENLIGHT_PROTOCOL_VERSION") {
            settings.protocol_version = version;
        }
        if let Some(client) = value("APPENLIGHT_CLIENT") {
            settings.client = client;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// [`Settings::from_lookup`] over the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_key.contains(['\0', '\r', '\n']) {
            return Err(ConfigError::InvalidApiKey);
        }
        if self.host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_uses_defaults() {
        let s = Settings::new("key");
        assert_eq!(s.host, "api.appenlight.com");
        assert_eq!(s.scheme, Scheme::Https);
        assert_eq!(s.protocol_version, "0.5");
        assert_eq!(s.client, "rust");
    }

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("HTTP".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!("https".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!(matches!(
            "ftp".parse::<Scheme>(),
            Err(ConfigError::InvalidScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn validate_rejects_empty_key() {
        assert!(matches!(
            Settings::new("").validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn validate_rejects_header_breaking_key() {
        assert!(matches!(
            Settings::new("key\r\nX-Injected: 1").validate(),
            Err(ConfigError::InvalidApiKey)
        ));
    }

    #[test]
    fn validate_rejects_empty_host() {
        assert!(matches!(
            Settings::new("key").with_host("").validate(),
            Err(ConfigError::MissingHost)
        ));
    }

    #[test]
    fn from_lookup_reads_all_fields() {
        let s = Settings::from_lookup(lookup(&[
            ("APPENLIGHT_API_KEY", "secret"),
            ("APPENLIGHT_HOST", "localhost:6543"),
            ("APPENLIGHT_SCHEME", "http"),
            ("APPENLIGHT_PROTOCOL_VERSION", "0.4"),
            ("APPENLIGHT_CLIENT", "worker"),
        ]))
        .unwrap();
        assert_eq!(
            s,
            Settings::new("secret")
                .with_host("localhost:6543")
                .with_scheme(Scheme::Http)
                .with_protocol_version("0.4")
                .with_client("worker")
        );
    }

    #[test]
    fn from_lookup_requires_api_key() {
        let err = Settings::from_lookup(lookup(&[("APPENLIGHT_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }
}
