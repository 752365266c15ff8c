use std::fmt;

use oauth2::AccessToken;

use crate::error::{Result, SdkError};

pub const REALM_ID_VAR: &str = "QUICKBOOKS_REALM_ID";
pub const ACCESS_TOKEN_VAR: &str = "QUICKBOOKS_ACCESS_TOKEN";

/// The company (realm) requests are scoped to and the `Authorization`
/// header value that authenticates them.
///
/// Both are treated as opaque strings; acquiring and refreshing tokens is
/// left to the caller's OAuth layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    realm_id: String,
    authorization: String,
}

impl Credentials {
    /// `authorization` is the full header value, e.g. `Bearer eyJ...`.
    #[must_use]
    pub fn new(realm_id: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            realm_id: realm_id.into(),
            authorization: authorization.into(),
        }
    }

    /// Builds a bearer header value from an OAuth 2 access token.
    #[must_use]
    pub fn from_access_token(realm_id: impl Into<String>, token: &AccessToken) -> Self {
        Self::new(realm_id, format!("Bearer {}", token.secret()))
    }

    /// Reads `QUICKBOOKS_REALM_ID` and `QUICKBOOKS_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`Credentials::from_env`] with a custom variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let realm_id = lookup(REALM_ID_VAR)
            .ok_or_else(|| SdkError::configuration(format!("{REALM_ID_VAR} not set")))?;
        let token = lookup(ACCESS_TOKEN_VAR)
            .ok_or_else(|| SdkError::configuration(format!("{ACCESS_TOKEN_VAR} not set")))?;
        Ok(Self::from_access_token(realm_id, &AccessToken::new(token)))
    }

    #[must_use]
    pub fn realm_id(&self) -> &str {
        &self.realm_id
    }

    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.realm_id.trim().is_empty() {
            return Err(SdkError::invalid_request("realm id must not be empty").into());
        }
        if self.authorization.trim().is_empty() {
            return Err(SdkError::invalid_request("authorization must not be empty").into());
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("realm_id", &self.realm_id)
            .field("authorization", &"[redacted]")
            .finish()
    }
}
