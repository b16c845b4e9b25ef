//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601 / XML format (Atom feed timestamps)
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Convert a Moment.js format string to a chrono one
///
/// Longest patterns first within each category so `MMMM` is not consumed
/// as two `MM`s.
fn moment_to_chrono_format(format: &str) -> String {
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = format.to_string();
    for (moment, chrono) in replacements {
        result = result.replace(moment, chrono);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};

    fn date() -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        DateTime::from_naive_utc_and_offset(naive, *Local::now().offset())
    }

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2024-01-15");
    }

    #[test]
    fn test_format_date_long_month() {
        assert_eq!(format_date(&date(), "MMMM DD, YYYY"), "January 15, 2024");
    }

    #[test]
    fn test_date_xml_shape() {
        let s = date_xml(&date());
        assert!(s.starts_with("2024-01-15T"));
        assert!(s.contains(':'));
    }
}
