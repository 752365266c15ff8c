use std::{fmt, str::FromStr};
use url::Url;

use crate::{
    entities::EntityKind,
    error::{Error, Result, SdkError},
};

pub const PRODUCTION_BASE_URL: &str = "https://quickbooks.api.intuit.com/v3/";
pub const SANDBOX_BASE_URL: &str = "https://sandbox-quickbooks.api.intuit.com/v3/";

/// Which QuickBooks deployment requests are sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
    /// Any other base URL, e.g. a local mock server
    Custom(Url),
}

impl Environment {
    pub fn base_url(&self) -> Result<Url> {
        match self {
            Self::Production => Url::parse(PRODUCTION_BASE_URL),
            Self::Sandbox => Url::parse(SANDBOX_BASE_URL),
            Self::Custom(url) => Ok(url.clone()),
        }
        .map_err(|e| SdkError::invalid_request(format!("invalid base URL: {e}")).into())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" | "development" => Ok(Self::Sandbox),
            _ => Url::parse(s.trim()).map(Self::Custom).map_err(|e| {
                SdkError::configuration(format!("unknown environment '{s}': {e}")).into()
            }),
        }
    }
}

/// A typed representation of QuickBooks API endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickbooksEndpoint {
    /// The collection endpoint of an entity kind within a company,
    /// `company/{realm_id}/{kind}`; entities are created by POSTing to it.
    Entity { realm_id: String, kind: EntityKind },
}

impl QuickbooksEndpoint {
    #[must_use]
    pub fn entity(realm_id: impl Into<String>, kind: EntityKind) -> Self {
        Self::Entity {
            realm_id: realm_id.into(),
            kind,
        }
    }

    /// Resolves the endpoint against `base`. Path segments are
    /// percent-encoded, so a realm id cannot escape its segment.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        match self {
            Self::Entity { realm_id, kind } => {
                url.path_segments_mut()
                    .map_err(|()| SdkError::invalid_request(format!("base URL {base} cannot hold a path")))?
                    .pop_if_empty()
                    .extend(["company", realm_id.as_str(), kind.path().as_str()]);
            }
        }
        Ok(url)
    }
}

impl fmt::Display for QuickbooksEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity { realm_id, kind } => write!(f, "/company/{realm_id}/{}", kind.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_endpoint_extends_base_path() {
        let base = Environment::Sandbox.base_url().unwrap();
        let url = QuickbooksEndpoint::entity("9130347", EntityKind::JOURNAL_ENTRY)
            .to_url(&base)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sandbox-quickbooks.api.intuit.com/v3/company/9130347/journalentry"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        let url = QuickbooksEndpoint::entity("1", EntityKind::ACCOUNT)
            .to_url(&base)
            .unwrap();
        assert_eq!(url.path(), "/company/1/account");
    }

    #[test]
    fn realm_id_is_encoded_as_one_segment() {
        let base = Url::parse("http://localhost/").unwrap();
        let url = QuickbooksEndpoint::entity("12/../34?x", EntityKind::ACCOUNT)
            .to_url(&base)
            .unwrap();
        assert_eq!(url.path_segments().map(Iterator::count), Some(3));
        assert!(url.query().is_none());
    }

    #[test]
    fn environments_parse_from_strings() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "http://localhost:9000/v3/".parse::<Environment>().unwrap(),
            Environment::Custom(_)
        ));
        assert!("not a url".parse::<Environment>().is_err());
    }

    #[test]
    fn display_is_relative_path() {
        let endpoint = QuickbooksEndpoint::entity("42", EntityKind::ACCOUNT);
        assert_eq!(endpoint.to_string(), "/company/42/account");
    }
}
