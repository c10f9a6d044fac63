//! Parsing of user-supplied entry dates

use crate::error::{ChainError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A date as typed by the user, resolved against "today"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeReference {
    Today,
    Yesterday,
    Tomorrow,
    /// Today if it is that weekday, otherwise the most recent one
    Weekday(Weekday),
    /// Strictly before today
    LastWeekday(Weekday),
    /// Strictly after today
    NextWeekday(Weekday),
    /// Calendar date given as YYYY-MM-DD
    SpecificDate(NaiveDate),
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

impl TimeReference {
    /// Parse user input such as "today", "last friday" or "2023-05-15"
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        let invalid = || ChainError::InvalidDate(input.trim().to_string());

        match normalized.as_str() {
            "today" | "now" => return Ok(TimeReference::Today),
            "yesterday" => return Ok(TimeReference::Yesterday),
            "tomorrow" => return Ok(TimeReference::Tomorrow),
            _ => {}
        }

        if let Some(rest) = normalized.strip_prefix("last ") {
            return parse_weekday(rest.trim())
                .map(TimeReference::LastWeekday)
                .ok_or_else(invalid);
        }
        if let Some(rest) = normalized.strip_prefix("next ") {
            return parse_weekday(rest.trim())
                .map(TimeReference::NextWeekday)
                .ok_or_else(invalid);
        }
        if let Some(day) = parse_weekday(&normalized) {
            return Ok(TimeReference::Weekday(day));
        }

        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .map(TimeReference::SpecificDate)
            .map_err(|_| invalid())
    }

    /// Resolve against the given "today"
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeReference::Today => today,
            TimeReference::Yesterday => today - Duration::days(1),
            TimeReference::Tomorrow => today + Duration::days(1),
            TimeReference::Weekday(day) => today - Duration::days(days_back(today, *day)),
            TimeReference::LastWeekday(day) => {
                let back = match days_back(today, *day) {
                    0 => 7,
                    n => n,
                };
                today - Duration::days(back)
            }
            TimeReference::NextWeekday(day) => {
                let forward = match (7 - days_back(today, *day)) % 7 {
                    0 => 7,
                    n => n,
                };
                today + Duration::days(forward)
            }
            TimeReference::SpecificDate(date) => *date,
        }
    }
}

/// Days since the most recent `target` weekday, 0 when today is `target`
fn days_back(today: NaiveDate, target: Weekday) -> i64 {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    (current - wanted).rem_euclid(7)
}
