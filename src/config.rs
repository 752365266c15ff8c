use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::{
    endpoints::Environment,
    error::{Result, SdkError},
};

pub const ENVIRONMENT_VAR: &str = "QUICKBOOKS_ENVIRONMENT";
pub const MINOR_VERSION_VAR: &str = "QUICKBOOKS_MINOR_VERSION";
pub const TIMEOUT_VAR: &str = "QUICKBOOKS_TIMEOUT_SECS";

/// Minor API version requested when none is configured.
pub const DEFAULT_MINOR_VERSION: u32 = 75;

/// Options appended to request URLs as query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// `minorversion`: selects the schema revision the service speaks.
    pub minor_version: Option<u32>,
    /// `requestid`: the service ignores a repeated create with the same id.
    pub request_id: Option<Uuid>,
}

impl RequestOptions {
    /// Apply the options as query parameters to a URL.
    pub fn apply_to_url(&self, url: &mut Url) {
        if let Some(request_id) = self.request_id {
            url.query_pairs_mut()
                .append_pair("requestid", &request_id.to_string());
        }
        if let Some(minor_version) = self.minor_version {
            url.query_pairs_mut()
                .append_pair("minorversion", &minor_version.to_string());
        }
    }
}

/// Settings for a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub minor_version: Option<u32>,
    /// Passed to the default HTTP transport; custom transports apply their own.
    pub timeout: Option<Duration>,
    /// Attach a fresh `requestid` to every request.
    pub request_ids: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            minor_version: Some(DEFAULT_MINOR_VERSION),
            timeout: None,
            request_ids: false,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            environment: Environment::Sandbox,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_minor_version(mut self, minor_version: Option<u32>) -> Self {
        self.minor_version = minor_version;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_request_ids(mut self, enabled: bool) -> Self {
        self.request_ids = enabled;
        self
    }

    /// Reads `QUICKBOOKS_ENVIRONMENT`, `QUICKBOOKS_MINOR_VERSION` and
    /// `QUICKBOOKS_TIMEOUT_SECS`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(environment) = lookup(ENVIRONMENT_VAR) {
            config.environment = environment.parse()?;
        }
        if let Some(minor_version) = lookup(MINOR_VERSION_VAR) {
            let parsed = minor_version.trim().parse::<u32>().map_err(|e| {
                SdkError::configuration(format!("invalid {MINOR_VERSION_VAR} '{minor_version}': {e}"))
            })?;
            config.minor_version = Some(parsed);
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                SdkError::configuration(format!("invalid {TIMEOUT_VAR} '{timeout}': {e}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        trace!(?config, "loaded client configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup_in(vars: &HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> {
        move |key| vars.get(key).map(ToString::to_string)
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_env_with(|_| None).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.minor_version, Some(DEFAULT_MINOR_VERSION));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let vars = HashMap::from([
            (ENVIRONMENT_VAR, "sandbox"),
            (MINOR_VERSION_VAR, "65"),
            (TIMEOUT_VAR, "30"),
        ]);
        let config = ClientConfig::from_env_with(lookup_in(&vars)).unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.minor_version, Some(65));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_minor_version() {
        let vars = HashMap::from([(MINOR_VERSION_VAR, "latest")]);
        let err = ClientConfig::from_env_with(lookup_in(&vars)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn options_become_query_parameters() {
        let mut url = Url::parse("https://example.com/v3/company/1/account").unwrap();
        let request_id = Uuid::nil();
        RequestOptions {
            minor_version: Some(70),
            request_id: Some(request_id),
        }
        .apply_to_url(&mut url);
        assert_eq!(
            url.query(),
            Some("requestid=00000000-0000-0000-0000-000000000000&minorversion=70")
        );
    }
}
