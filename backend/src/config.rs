//! Application configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `JOURNAL_*` environment variables and
//! an optional config file. Unset values fall back to the defaults exposed by
//! the accessor methods.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{Email, UserValidationError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSCODE: &str = "admin123";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 20;

/// Errors raised while interpreting configured values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// `admin_email` is not an e-mail address.
    #[error("invalid administrator e-mail '{value}': {source}")]
    AdminEmail {
        value: String,
        #[source]
        source: UserValidationError,
    },
    /// `ai_endpoint` is not an absolute URL.
    #[error("invalid AI endpoint '{value}': {source}")]
    AiEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Journal server settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOURNAL")]
pub struct JournalConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// JSON document holding all state; memory only when unset.
    pub data_file: Option<PathBuf>,
    /// E-mail address identifying the administrator.
    pub admin_email: Option<String>,
    /// Passcode unlocking administrator mode.
    pub admin_passcode: Option<String>,
    /// Chat completions URL; AI features are disabled when unset.
    pub ai_endpoint: Option<String>,
    /// Bearer token sent to the AI endpoint.
    pub ai_api_key: Option<String>,
    /// Model name sent to the AI endpoint.
    pub ai_model: Option<String>,
    /// Whole-request timeout for AI calls, in seconds.
    pub ai_timeout_secs: Option<u64>,
}

impl JournalConfig {
    /// Parsed bind address.
    ///
    /// # Errors
    /// Returns [`ConfigError::BindAddr`] for malformed addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Validated administrator e-mail.
    ///
    /// # Errors
    /// Returns [`ConfigError::AdminEmail`] for malformed addresses.
    pub fn admin_email(&self) -> Result<Email, ConfigError> {
        let value = self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL);
        Email::new(value).map_err(|source| ConfigError::AdminEmail {
            value: value.to_owned(),
            source,
        })
    }

    /// Administrator passcode.
    #[must_use]
    pub fn admin_passcode(&self) -> &str {
        self.admin_passcode
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSCODE)
    }

    /// Parsed AI endpoint, or `None` when AI features are disabled.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError::AiEndpoint`] for malformed URLs.
    pub fn ai_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        let Some(value) = self
            .ai_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Ok(None);
        };
        Url::parse(value)
            .map(Some)
            .map_err(|source| ConfigError::AiEndpoint {
                value: value.to_owned(),
                source,
            })
    }

    /// AI bearer token, if any.
    #[must_use]
    pub fn ai_api_key(&self) -> Option<Zeroizing<String>> {
        self.ai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new)
    }

    /// AI model name.
    #[must_use]
    pub fn ai_model(&self) -> &str {
        self.ai_model.as_deref().unwrap_or(DEFAULT_AI_MODEL)
    }

    /// AI request timeout.
    #[must_use]
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs.unwrap_or(DEFAULT_AI_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "JOURNAL_BIND_ADDR",
        "JOURNAL_DATA_FILE",
        "JOURNAL_ADMIN_EMAIL",
        "JOURNAL_ADMIN_PASSCODE",
        "JOURNAL_AI_ENDPOINT",
        "JOURNAL_AI_API_KEY",
        "JOURNAL_AI_MODEL",
        "JOURNAL_AI_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> JournalConfig {
        JournalConfig::load_from_iter([OsString::from("gratitude")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let config = load_from_empty_args();
        assert_eq!(
            config.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(config.data_file.is_none());
        assert_eq!(
            config.admin_email().expect("admin email").as_ref(),
            "admin@example.com"
        );
        assert_eq!(config.admin_passcode(), "admin123");
        assert!(config.ai_endpoint().expect("endpoint").is_none());
        assert!(config.ai_api_key().is_none());
        assert_eq!(config.ai_model(), "gpt-4o-mini");
        assert_eq!(config.ai_timeout(), Duration::from_secs(20));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("JOURNAL_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("JOURNAL_DATA_FILE", Some("/tmp/journal.json".to_owned())),
            ("JOURNAL_ADMIN_EMAIL", Some("Root@Example.org".to_owned())),
            ("JOURNAL_ADMIN_PASSCODE", Some("opensesame".to_owned())),
            (
                "JOURNAL_AI_ENDPOINT",
                Some("https://ai.example.com/v1/chat/completions".to_owned()),
            ),
            ("JOURNAL_AI_API_KEY", Some("sk-test".to_owned())),
            ("JOURNAL_AI_MODEL", Some("tiny".to_owned())),
            ("JOURNAL_AI_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let config = load_from_empty_args();
        assert_eq!(
            config.bind_addr().expect("bind addr").port(),
            9090
        );
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/journal.json")));
        assert_eq!(
            config.admin_email().expect("admin email").as_ref(),
            "root@example.org"
        );
        assert_eq!(config.admin_passcode(), "opensesame");
        assert_eq!(
            config
                .ai_endpoint()
                .expect("endpoint")
                .map(|url| url.host_str().map(str::to_owned)),
            Some(Some("ai.example.com".to_owned()))
        );
        assert_eq!(
            config.ai_api_key().as_deref().map(String::as_str),
            Some("sk-test")
        );
        assert_eq!(config.ai_model(), "tiny");
        assert_eq!(config.ai_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    #[case::bind(JournalConfig { bind_addr: Some("nowhere".to_owned()), ..JournalConfig::default() })]
    #[case::email(JournalConfig { admin_email: Some("root".to_owned()), ..JournalConfig::default() })]
    #[case::endpoint(JournalConfig { ai_endpoint: Some("not a url".to_owned()), ..JournalConfig::default() })]
    fn malformed_values_are_rejected(#[case] config: JournalConfig) {
        let failed = config.bind_addr().is_err()
            || config.admin_email().is_err()
            || config.ai_endpoint().is_err();
        assert!(failed);
    }

    #[rstest]
    fn blank_endpoint_disables_ai() {
        let config = JournalConfig {
            ai_endpoint: Some("   ".to_owned()),
            ..JournalConfig::default()
        };
        assert!(config.ai_endpoint().expect("blank endpoint").is_none());
    }
}
