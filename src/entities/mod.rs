use std::{fmt, ops::Deref};

use serde::{Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap};
use time::OffsetDateTime;

pub mod account;
pub mod journal_entry;
pub mod reference;

/// Descriptor of an entity kind: the envelope key and the endpoint it is
/// created through. Every kind shares the same request and response handling,
/// so adding one is a matter of declaring its descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityKind {
    name: &'static str,
}

impl EntityKind {
    pub const ACCOUNT: Self = Self::new("Account");
    pub const JOURNAL_ENTRY: Self = Self::new("JournalEntry");

    /// Kinds with a schema in this crate.
    pub const REGISTRY: &'static [Self] = &[Self::ACCOUNT, Self::JOURNAL_ENTRY];

    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// The key wrapping the entity in request and response envelopes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// The endpoint path segment, e.g. `journalentry`.
    #[must_use]
    pub fn path(self) -> String {
        self.name.to_ascii_lowercase()
    }

    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::REGISTRY
            .iter()
            .copied()
            .find(|kind| kind.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Fields QuickBooks assigns on every entity.
pub const COMMON_SERVER_ASSIGNED: &[&str] = &["Id", "SyncToken", "MetaData", "domain", "sparse"];

/// A QuickBooks entity that can be created through the API.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    /// Top-level fields only the service may set. They are removed from
    /// every create request even when populated.
    const SERVER_ASSIGNED: &'static [&'static str] = COMMON_SERVER_ASSIGNED;

    /// Server-assigned fields inside arrays of the entity, as
    /// `(array key, field)`; removed from every element of the array.
    const SERVER_ASSIGNED_NESTED: &'static [(&'static str, &'static str)] = &[];

    /// Whether the fields a caller must supply are present, which is what
    /// distinguishes a created entity from an unrelated object under the
    /// same key.
    fn has_required_fields(&self) -> bool;
}

/// A single entity as returned by the API, with the response timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope<E> {
    pub entity: E,
    pub time: Option<OffsetDateTime>,
}

impl<E> Envelope<E> {
    #[must_use]
    pub fn into_entity(self) -> E {
        self.entity
    }
}

impl<E> Deref for Envelope<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

impl<E: Entity> Serialize for Envelope<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(E::KIND.name(), &self.entity)?;
        if let Some(time) = self.time {
            let formatted = time
                .format(&time::format_description::well_known::Rfc3339)
                .map_err(serde::ser::Error::custom)?;
            map.serialize_entry("time", &formatted)?;
        }
        map.end()
    }
}
