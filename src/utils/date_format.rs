use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

// QuickBooks reports the envelope `time` either as an RFC 3339 string
// ("2018-11-29T02:53:10.369-08:00") or as epoch milliseconds.
pub fn parse_response_time(time_str: &str) -> Result<OffsetDateTime, String> {
    if let Ok(dt) = OffsetDateTime::parse(time_str, &Rfc3339) {
        return Ok(dt);
    }

    if let Ok(millis) = time_str.parse::<i64>() {
        return from_epoch_millis(millis);
    }

    Err(format!("Failed to parse response time '{time_str}': no matching format"))
}

pub fn from_epoch_millis(millis: i64) -> Result<OffsetDateTime, String> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| format!("Invalid timestamp {millis}: {e}"))
}

pub fn parse_qbo_date(date_str: &str) -> Result<Date, String> {
    // Transaction dates occasionally arrive with a time component attached
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    Date::parse(date_part, &format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

/// Envelope timestamp: string or integer on the way in, RFC 3339 on the way out.
pub mod response_time {
    use std::fmt;

    use serde::de::{self, Visitor};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    use super::{Deserializer, Serializer, from_epoch_millis, parse_response_time, serde};

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = datetime
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ResponseTimeVisitor)
    }

    struct ResponseTimeVisitor;

    impl Visitor<'_> for ResponseTimeVisitor {
        type Value = OffsetDateTime;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an RFC 3339 timestamp or epoch milliseconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse_response_time(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            from_epoch_millis(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            let millis = i64::try_from(v).map_err(E::custom)?;
            from_epoch_millis(millis).map_err(E::custom)
        }
    }
}

/// Fault timestamp: like [`response_time`], but an unreadable value becomes
/// `None` instead of failing the whole fault.
pub mod lenient_response_time {
    use serde_json::Value;
    use time::OffsetDateTime;

    use super::{Deserialize, Deserializer, Serializer, response_time, rfc3339_option};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(datetime: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rfc3339_option::serialize(datetime, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|value| response_time::deserialize(&value).ok()))
    }
}

// Optional RFC 3339 timestamps, used by entity `MetaData`
pub mod rfc3339_option {
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    use super::{Deserialize, Deserializer, Serializer, serde};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(datetime: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(dt) => {
                let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => OffsetDateTime::parse(&s, &Rfc3339)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

// Optional `YYYY-MM-DD` dates such as `TxnDate`
pub mod qbo_date_option {
    use super::{Date, Deserialize, Deserializer, Serializer, format_description, parse_qbo_date, serde};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = date
                    .format(&format_description!("[year]-[month]-[day]"))
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => parse_qbo_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
