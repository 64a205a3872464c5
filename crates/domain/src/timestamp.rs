//! Timestamp normalization between the backend wire format and form inputs.

use chrono::{DateTime, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use tudu_core::{AppError, AppResult};

/// Date-time layout used by form inputs (`datetime-local`).
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Formats an instant the way the backend writes it.
#[must_use]
pub fn to_wire(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a backend instant into a UTC date-time.
pub fn from_wire(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| AppError::Validation(format!("invalid timestamp '{value}': {error}")))
}

/// Formats an instant for a form input.
#[must_use]
pub fn to_form(value: &DateTime<Utc>) -> String {
    value.format(FORM_DATETIME_FORMAT).to_string()
}

/// Parses a form input into an instant.
///
/// Accepts `YYYY-MM-DDTHH:mm`, the same with seconds, or a full wire value.
/// Local inputs carry no offset and are read as UTC.
pub fn from_form(value: &str) -> AppResult<DateTime<Utc>> {
    let trimmed = value.trim();
    for layout in [FORM_DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(parsed.and_utc());
        }
    }

    from_wire(trimmed)
}

/// Default value of a date-time input on a new form: the start of today.
#[must_use]
pub fn default_form_value(now: DateTime<Utc>) -> String {
    to_form(&now.date_naive().and_time(NaiveTime::MIN).and_utc())
}

/// Serde adapter for optional timestamps in the backend wire format.
pub mod wire_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes an optional instant.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::to_wire(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional instant.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::from_wire(raw.as_str()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{default_form_value, from_form, from_wire, to_form, to_wire};

    #[test]
    fn epoch_is_written_without_fraction() {
        let epoch = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
        assert_eq!(to_wire(&epoch), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn milliseconds_survive_the_wire() {
        let parsed = from_wire("2024-03-05T10:15:30.250Z");
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_default();
        assert_eq!(to_wire(&parsed), "2024-03-05T10:15:30.250Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = from_wire("2024-03-05T12:00:00+02:00").unwrap_or_default();
        assert_eq!(to_wire(&parsed), "2024-03-05T10:00:00Z");
    }

    #[test]
    fn form_values_round_trip_at_minute_precision() {
        let parsed = from_form("2024-03-05T09:30");
        assert!(parsed.is_ok());
        assert_eq!(to_form(&parsed.unwrap_or_default()), "2024-03-05T09:30");
    }

    #[test]
    fn form_accepts_wire_values() {
        let parsed = from_form("2024-03-05T09:30:00Z").unwrap_or_default();
        assert_eq!(to_form(&parsed), "2024-03-05T09:30");
    }

    #[test]
    fn garbage_is_a_validation_error() {
        assert!(from_form("next tuesday").is_err());
    }

    #[test]
    fn default_value_is_start_of_day() {
        let now = Utc
            .with_ymd_and_hms(2024, 7, 1, 17, 45, 12)
            .single()
            .unwrap_or_default();
        assert_eq!(default_form_value(now), "2024-07-01T00:00");
    }
}
