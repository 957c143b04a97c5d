use crate::error::{Error, TempoResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Wire format for timestamps produced by the API
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive layouts accepted for incoming timestamps, tried in order
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse an HH:MM string into a time of day
pub fn parse_time_of_day(time_str: &str) -> Option<NaiveTime> {
    let (hour, minute) = parse_time(time_str)?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(date_str: &str) -> TempoResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(date_str.to_string()))
}

/// Parse a local ISO-8601 timestamp.
///
/// Every timestamp is treated as naive wall-clock time. A bare date means
/// midnight, and an explicit UTC offset is dropped without converting.
pub fn parse_timestamp(value: &str) -> TempoResult<NaiveDateTime> {
    let trimmed = value.trim();

    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(Error::MalformedTimestamp(value.to_string()))
}

/// Format a timestamp in the API wire format
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for timestamps in the API wire format
pub mod iso_timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional YYYY-MM-DD dates where an empty string means none
pub mod optional_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", raw))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        // Valid cases
        assert_eq!(parse_time("00:00"), Some((0, 0)));
        assert_eq!(parse_time("09:30"), Some((9, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));

        // Invalid cases
        assert_eq!(parse_time("24:00"), None); // Hour out of range
        assert_eq!(parse_time("12:60"), None); // Minute out of range
        assert_eq!(parse_time("12:30:45"), None); // Too many parts
        assert_eq!(parse_time("12"), None); // Too few parts
        assert_eq!(parse_time("12:ab"), None); // Invalid minute
        assert_eq!(parse_time("ab:30"), None); // Invalid hour
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-04-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());

        assert!(matches!(parse_date("15/04/2025"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2025-02-30"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date(""), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2025-04-15T10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-04-15T10:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-04-15 10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-04-15T10:00:00.000").unwrap(), expected);

        // Offsets are dropped, the wall-clock time is kept
        assert_eq!(parse_timestamp("2025-04-15T10:00:00+03:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-04-15T10:00:00Z").unwrap(), expected);

        // A bare date is midnight
        assert_eq!(
            parse_timestamp("2025-04-15").unwrap().format("%H:%M").to_string(),
            "00:00"
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("tomorrow at noon"),
            Err(Error::MalformedTimestamp(_))
        ));
        assert!(matches!(
            parse_timestamp("2025-04-15T25:00:00"),
            Err(Error::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn test_format_timestamp() {
        let dt = parse_timestamp("2025-04-15T09:30").unwrap();
        assert_eq!(format_timestamp(&dt), "2025-04-15T09:30:00");
    }
}
