use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Deserializes a value, treating empty strings and `null` as None.
/// QuickBooks sends `""` for several unset enum and string fields.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}
