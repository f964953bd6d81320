//! WhatsApp TXT line patterns.
//!
//! Exports targeted here print one header per message:
//!
//! ```text
//! 1/1/24, 9:00 AM - Alice: Hello 😀
//! 15/03/2024, 11:45 pm - Bob: first line
//! second line of the same message
//! ```
//!
//! Each line of the export falls into one of three [`LineKind`]s:
//!
//! - **Header** - timestamp, ` - `, author, `: `, start of the body
//! - **Notice** - starts with a timestamp but carries no `Author: ` part
//!   (encryption banners, "X added Y", ...)
//! - **Continuation** - anything else, part of the current body

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::DateOrder;

/// `D/M/YY(YY), H:MM[ ]AM|PM - Author: body`
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{2,4}), (\d{1,2}):(\d{2})\s?([APap][Mm]) - ([^:\n]+): ?(.*)$",
    )
    .expect("header pattern is valid")
});

/// Timestamp at line start, enough to end the previous message.
static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}, \d{1,2}:\d{2}").expect("prefix pattern is valid")
});

/// Raw pieces of a header line, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderParts<'a> {
    pub first: &'a str,
    pub second: &'a str,
    pub year: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
    pub meridiem: &'a str,
    pub author: &'a str,
    pub body: &'a str,
}

/// Classification of one export line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A new message starts on this line.
    Header(HeaderParts<'a>),
    /// Timestamped line without an author (system notice).
    Notice,
    /// Not timestamped; belongs to the current message body.
    Continuation,
}

/// Classifies a single line (without its trailing newline).
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = HEADER.captures(line) {
        let get = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        return LineKind::Header(HeaderParts {
            first: get(1),
            second: get(2),
            year: get(3),
            hour: get(4),
            minute: get(5),
            meridiem: get(6),
            author: get(7).trim(),
            body: get(8),
        });
    }

    if TIMESTAMP_PREFIX.is_match(line) {
        LineKind::Notice
    } else {
        LineKind::Continuation
    }
}

/// Normalises header pieces into a timestamp.
///
/// Returns `None` when the pieces do not form a real calendar date and
/// 12-hour clock time (`31/2/24`, `13:00 PM`, a three-digit year).
pub fn parse_whatsapp_timestamp(parts: &HeaderParts<'_>, order: DateOrder) -> Option<NaiveDateTime> {
    let first: u32 = parts.first.parse().ok()?;
    let second: u32 = parts.second.parse().ok()?;
    let (day, month) = match order {
        DateOrder::DayFirst => (first, second),
        DateOrder::MonthFirst => (second, first),
    };

    let year: i32 = match parts.year.len() {
        2 => 2000 + parts.year.parse::<i32>().ok()?,
        4 => parts.year.parse().ok()?,
        _ => return None,
    };

    let hour12: u32 = parts.hour.parse().ok()?;
    let minute: u32 = parts.minute.parse().ok()?;
    if !(1..=12).contains(&hour12) {
        return None;
    }
    let pm = parts.meridiem.eq_ignore_ascii_case("pm");
    let hour = match (hour12, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(line: &str) -> HeaderParts<'_> {
        match classify_line(line) {
            LineKind::Header(parts) => parts,
            other => panic!("expected header, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_header() {
        let parts = header("1/1/24, 9:00 AM - Alice: Hello 😀");
        assert_eq!(parts.author, "Alice");
        assert_eq!(parts.body, "Hello 😀");
        assert_eq!(parts.meridiem, "AM");
    }

    #[test]
    fn test_author_stops_at_first_colon() {
        let parts = header("2/3/2024, 10:15 pm - Bob: link: https://example.com");
        assert_eq!(parts.author, "Bob");
        assert_eq!(parts.body, "link: https://example.com");
    }

    #[test]
    fn test_meridiem_without_space() {
        let parts = header("2/3/24, 7:05PM - Carla Souza: oi");
        assert_eq!(parts.author, "Carla Souza");
        assert_eq!(parts.meridiem, "PM");
    }

    #[test]
    fn test_narrow_no_break_space_before_meridiem() {
        let parts = header("2/3/24, 7:05\u{202f}PM - Carla: oi");
        assert_eq!(parts.author, "Carla");
    }

    #[test]
    fn test_empty_body() {
        let parts = header("2/3/24, 7:05 PM - Carla: ");
        assert_eq!(parts.body, "");
    }

    #[test]
    fn test_classify_notice() {
        assert_eq!(
            classify_line("1/1/24, 9:00 AM - Messages and calls are end-to-end encrypted"),
            LineKind::Notice
        );
        assert_eq!(
            classify_line("1/1/24, 9:00 AM - Alice added Bob"),
            LineKind::Notice
        );
    }

    #[test]
    fn test_classify_continuation() {
        assert_eq!(classify_line("second line"), LineKind::Continuation);
        assert_eq!(classify_line(""), LineKind::Continuation);
        assert_eq!(
            classify_line("see you at 9:00 AM - Alice: nope"),
            LineKind::Continuation
        );
    }

    #[test]
    fn test_24h_lines_are_not_headers() {
        // No AM/PM marker: only the timestamp prefix matches.
        assert_eq!(
            classify_line("15/01/2024, 10:30 - Alice: Hello"),
            LineKind::Notice
        );
    }

    #[test]
    fn test_parse_timestamp_day_first() {
        let parts = header("15/3/24, 11:45 PM - Bob: hi");
        let ts = parse_whatsapp_timestamp(&parts, DateOrder::DayFirst).unwrap();
        assert_eq!(ts.to_string(), "2024-03-15 23:45:00");
        assert!(parse_whatsapp_timestamp(&parts, DateOrder::MonthFirst).is_none());
    }

    #[test]
    fn test_parse_timestamp_month_first() {
        let parts = header("3/15/2024, 12:10 AM - Bob: hi");
        let ts = parse_whatsapp_timestamp(&parts, DateOrder::MonthFirst).unwrap();
        assert_eq!(ts.to_string(), "2024-03-15 00:10:00");
    }

    #[test]
    fn test_noon_and_midnight() {
        let noon = header("1/1/24, 12:00 PM - A: x");
        let midnight = header("1/1/24, 12:00 AM - A: x");
        assert_eq!(
            parse_whatsapp_timestamp(&noon, DateOrder::DayFirst).unwrap().to_string(),
            "2024-01-01 12:00:00"
        );
        assert_eq!(
            parse_whatsapp_timestamp(&midnight, DateOrder::DayFirst).unwrap().to_string(),
            "2024-01-01 00:00:00"
        );
    }

    #[test]
    fn test_invalid_calendar_values() {
        for line in [
            "31/2/24, 9:00 AM - A: x",
            "1/1/24, 13:00 PM - A: x",
            "1/1/24, 0:30 AM - A: x",
            "1/1/24, 9:75 AM - A: x",
            "1/1/202, 9:00 AM - A: x",
        ] {
            let parts = header(line);
            assert!(
                parse_whatsapp_timestamp(&parts, DateOrder::DayFirst).is_none(),
                "{line} should not parse"
            );
        }
    }
}
