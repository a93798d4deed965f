//! # Local Responder
//!
//! Answers a narrow class of questions (date/time) synchronously, without
//! touching the network. This is a heuristic keyword match, not a parser:
//! "update my timeline" will trigger it, and that's acceptable.

use chrono::{DateTime, Datelike, Local, Timelike};

/// Keywords that route a question to the local clock instead of the
/// answering service. Matched case-insensitively as substrings.
const DATE_TIME_KEYWORDS: [&str; 5] = ["today", "date", "time", "day is it", "current year"];

/// Returns a formatted current-date-and-time answer if the question looks
/// like a date/time question, or None to let the remote path proceed.
pub fn local_answer(question: &str) -> Option<String> {
    let lower = question.to_lowercase();
    DATE_TIME_KEYWORDS
        .iter()
        .any(|kw| lower.contains(kw))
        .then(|| format_now(Local::now()))
}

/// Long-form date and time, e.g. "Friday, August 7, 2026 at 3:04 PM".
fn format_now(now: DateTime<Local>) -> String {
    let (is_pm, hour12) = now.hour12();
    format!(
        "It's {}, {} {}, {} at {}:{:02} {}.",
        weekday_name(now.weekday()),
        month_name(now.month()),
        now.day(),
        now.year(),
        hour12,
        now.minute(),
        if is_pm { "PM" } else { "AM" },
    )
}

fn weekday_name(day: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match day {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_matches_date_time_keywords() {
        assert!(local_answer("what's today's date").is_some());
        assert!(local_answer("What TIME is it?").is_some());
        assert!(local_answer("what day is it").is_some());
        assert!(local_answer("current year please").is_some());
    }

    #[test]
    fn test_no_match_passes_through() {
        assert!(local_answer("Help me with math").is_none());
        assert!(local_answer("explain photosynthesis").is_none());
        assert!(local_answer("").is_none());
    }

    #[test]
    fn test_format_now_long_form() {
        // 2026-08-07 15:04 local, a Friday
        let dt = Local.with_ymd_and_hms(2026, 8, 7, 15, 4, 0).unwrap();
        assert_eq!(format_now(dt), "It's Friday, August 7, 2026 at 3:04 PM.");
    }

    #[test]
    fn test_format_now_morning() {
        let dt = Local.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format_now(dt), "It's Monday, January 5, 2026 at 9:30 AM.");
    }

    #[test]
    fn test_format_now_midnight_uses_twelve() {
        let dt = Local.with_ymd_and_hms(2026, 3, 1, 0, 7, 0).unwrap();
        assert!(format_now(dt).contains("12:07 AM"));
    }
}
