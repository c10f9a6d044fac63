//! Date formatting with moment-style tokens
//!
//! Month and weekday names come from fixed English tables, never from the
//! system locale, so generated file names are identical on every machine.

use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Indexed from Sunday
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year,
    YearShort,
    IsoWeekYear,
    Quarter,
    MonthName,
    MonthShortName,
    MonthPadded,
    Month,
    DayOfYearPadded,
    DayOfYear,
    DayPadded,
    DayOrdinal,
    Day,
    WeekdayName,
    WeekdayShortName,
    WeekdayMinName,
    WeekdayIndex,
    IsoWeekday,
    IsoWeekPadded,
    IsoWeek,
}

// Longest tokens first so that "YYYY" wins over "YY" and "DDDD" over "DD"
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year),
    ("GGGG", Token::IsoWeekYear),
    ("MMMM", Token::MonthName),
    ("DDDD", Token::DayOfYearPadded),
    ("dddd", Token::WeekdayName),
    ("MMM", Token::MonthShortName),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayShortName),
    ("YY", Token::YearShort),
    ("MM", Token::MonthPadded),
    ("DD", Token::DayPadded),
    ("Do", Token::DayOrdinal),
    ("dd", Token::WeekdayMinName),
    ("WW", Token::IsoWeekPadded),
    ("Q", Token::Quarter),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::WeekdayIndex),
    ("E", Token::IsoWeekday),
    ("W", Token::IsoWeek),
];

/// Full English month name for a date (e.g., "May")
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Full English weekday name for a date (e.g., "Monday")
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Format a date with a moment-style pattern.
///
/// Recognized tokens are replaced, text inside `[...]` is copied verbatim
/// without brackets, and every other character is emitted unchanged.
///
/// ```
/// use chain_journal::domain::date_format::format_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2023, 5, 15).unwrap();
/// assert_eq!(format_date(date, "YYYY-MM-DD dddd"), "2023-05-15 Monday");
/// assert_eq!(format_date(date, "MM-MMMM"), "05-May");
/// ```
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut output = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                output.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        match TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
            Some((text, token)) => {
                push_token(&mut output, date, *token);
                rest = &rest[text.len()..];
            }
            None => {
                output.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    output
}

fn push_token(output: &mut String, date: NaiveDate, token: Token) {
    let rendered = match token {
        Token::Year => format!("{:04}", date.year()),
        Token::YearShort => format!("{:02}", date.year().rem_euclid(100)),
        Token::IsoWeekYear => format!("{:04}", date.iso_week().year()),
        Token::Quarter => (date.month0() / 3 + 1).to_string(),
        Token::MonthName => month_name(date).to_string(),
        Token::MonthShortName => month_name(date)[..3].to_string(),
        Token::MonthPadded => format!("{:02}", date.month()),
        Token::Month => date.month().to_string(),
        Token::DayOfYearPadded => format!("{:03}", date.ordinal()),
        Token::DayOfYear => date.ordinal().to_string(),
        Token::DayPadded => format!("{:02}", date.day()),
        Token::DayOrdinal => ordinal(date.day()),
        Token::Day => date.day().to_string(),
        Token::WeekdayName => weekday_name(date).to_string(),
        Token::WeekdayShortName => weekday_name(date)[..3].to_string(),
        Token::WeekdayMinName => weekday_name(date)[..2].to_string(),
        Token::WeekdayIndex => date.weekday().num_days_from_sunday().to_string(),
        Token::IsoWeekday => date.weekday().number_from_monday().to_string(),
        Token::IsoWeekPadded => format!("{:02}", date.iso_week().week()),
        Token::IsoWeek => date.iso_week().week().to_string(),
    };
    output.push_str(&rendered);
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
