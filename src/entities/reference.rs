use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::date_format::rfc3339_option;

/// Points at another entity by its server-assigned identifier.
///
/// A reference never carries the referenced entity itself; `name` is only the
/// display name QuickBooks echoes back and is ignored on input by the service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

pub type AccountRef = Reference;
pub type ClassRef = Reference;
pub type CurrencyRef = Reference;
pub type DepartmentRef = Reference;
pub type EntityRef = Reference;
pub type JournalCodeRef = Reference;
pub type ParentRef = Reference;
pub type TaxCodeRef = Reference;
pub type TaxRateRef = Reference;

/// Creation and last-update timestamps, assigned by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetaData {
    #[serde(default, with = "rfc3339_option", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<OffsetDateTime>,
    #[serde(default, with = "rfc3339_option", skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<OffsetDateTime>,
}
