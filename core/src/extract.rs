//! Natural-language date/time extraction from free task text.
//!
//! Two ordered rule tables are tried against the raw input: time rules first,
//! then date rules. Within a table the first rule that both matches and
//! yields a value wins; a rule whose pattern matches but whose extractor
//! produces nothing (an out-of-range clock, a numeric date that is not in the
//! future) falls through to the next rule. The matched substring is removed
//! from the returned text, leftover connector words are stripped, and
//! whitespace is collapsed.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::time::next_weekday;

/// Result of scanning a raw input string.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Input with the matched phrases and connector words removed.
    pub text: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

type TimeRule = fn(&Captures) -> Option<NaiveTime>;
type DateRule = fn(&Captures, NaiveDate) -> Option<NaiveDate>;

static TIME_RULES: LazyLock<Vec<(Regex, TimeRule)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(am|pm)").unwrap(),
            clock_12h as TimeRule,
        ),
        (Regex::new(r"(\d{1,2}):(\d{2})").unwrap(), clock_24h),
        (
            Regex::new(r"(?i)at\s+(\d{1,2})\s*(am|pm)").unwrap(),
            hour_with_meridiem,
        ),
    ]
});

static DATE_RULES: LazyLock<Vec<(Regex, DateRule)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)tomorrow").unwrap(), tomorrow as DateRule),
        (Regex::new(r"(?i)today").unwrap(), today_rule),
        (
            Regex::new(r"(?i)next\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)")
                .unwrap(),
            upcoming_weekday,
        ),
        (
            Regex::new(r"(?i)(monday|tuesday|wednesday|thursday|friday|saturday|sunday)").unwrap(),
            upcoming_weekday,
        ),
        (Regex::new(r"(?i)in\s+(\d+)\s+days?").unwrap(), in_n_days),
        (
            Regex::new(r"(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?").unwrap(),
            month_slash_day,
        ),
    ]
});

static CONNECTORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(at|on|tomorrow|today|next|in)\b").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Scans `input` for a time phrase and a date phrase relative to the local
/// current day. The two extractions are independent; both may fire.
pub fn extract(input: &str) -> Extraction {
    extract_at(input, Local::now().date_naive())
}

/// Same as [`extract`] with an explicit "today", for deterministic callers.
pub fn extract_at(input: &str, today: NaiveDate) -> Extraction {
    let mut cleaned = input.to_string();

    let mut time = None;
    for (pattern, rule) in TIME_RULES.iter() {
        if let Some(caps) = pattern.captures(input) {
            if let Some(t) = rule(&caps) {
                time = Some(t);
                cleaned = cleaned.replacen(&caps[0], "", 1).trim().to_string();
                break;
            }
        }
    }

    let mut date = None;
    for (pattern, rule) in DATE_RULES.iter() {
        if let Some(caps) = pattern.captures(input) {
            if let Some(d) = rule(&caps, today) {
                date = Some(d);
                cleaned = cleaned.replacen(&caps[0], "", 1).trim().to_string();
                break;
            }
        }
    }

    let cleaned = CONNECTORS.replace_all(&cleaned, "");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();

    Extraction {
        text: cleaned,
        date,
        time,
    }
}

fn meridiem_hour(hour: u32, meridiem: &str) -> u32 {
    let meridiem = meridiem.to_lowercase();
    if meridiem == "pm" && hour != 12 {
        hour + 12
    } else if meridiem == "am" && hour == 12 {
        0
    } else {
        hour
    }
}

fn clock_12h(caps: &Captures) -> Option<NaiveTime> {
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(meridiem_hour(hour, &caps[3]), minute, 0)
}

fn clock_24h(caps: &Captures) -> Option<NaiveTime> {
    let hour: u32 = caps[1].parse().ok()?;
    if hour > 23 {
        return None;
    }
    let minute: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn hour_with_meridiem(caps: &Captures) -> Option<NaiveTime> {
    let hour: u32 = caps[1].parse().ok()?;
    NaiveTime::from_hms_opt(meridiem_hour(hour, &caps[2]), 0, 0)
}

fn tomorrow(_caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    today.succ_opt()
}

fn today_rule(_caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    Some(today)
}

fn upcoming_weekday(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    weekday_from_name(&caps[1]).map(|w| next_weekday(today, w))
}

fn in_n_days(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    let n: i64 = caps[1].parse().ok()?;
    today.checked_add_signed(Duration::days(n))
}

// Numeric M/D dates are only accepted when strictly in the future; a past or
// current date is ignored and the text left untouched.
fn month_slash_day(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        Some(m) => {
            let y: i32 = m.as_str().parse().ok()?;
            if y < 100 {
                y + 2000
            } else {
                y
            }
        }
        None => today.year(),
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if date > today {
        Some(date)
    } else {
        None
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-15 is a Saturday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn extracts_time_and_date_together() {
        let out = extract_at("Call mom at 5pm tomorrow", today());
        assert_eq!(out.time, Some(time(17, 0)));
        assert_eq!(out.date, Some(date(2024, 6, 16)));
        assert_eq!(out.text, "Call mom");
    }

    #[test]
    fn twelve_hour_clock_converts() {
        assert_eq!(extract_at("standup 9:30am", today()).time, Some(time(9, 30)));
        assert_eq!(extract_at("demo 1:05 pm", today()).time, Some(time(13, 5)));
        assert_eq!(extract_at("call 12:15pm", today()).time, Some(time(12, 15)));
        assert_eq!(extract_at("taxi 12:30am", today()).time, Some(time(0, 30)));
    }

    #[test]
    fn bare_clock_requires_valid_hour() {
        let out = extract_at("review 14:00", today());
        assert_eq!(out.time, Some(time(14, 0)));
        assert_eq!(out.text, "review");
    }

    #[test]
    fn failed_rule_falls_through_to_the_next() {
        // "99:30" matches the bare-clock pattern but is no valid hour; the
        // hour-only rule still gets its chance at "at 7pm".
        let out = extract_at("register 99:30 at 7pm", today());
        assert_eq!(out.time, Some(time(19, 0)));
        assert_eq!(out.text, "register 99:30");
    }

    #[test]
    fn hour_only_with_meridiem() {
        let out = extract_at("lunch at 12pm", today());
        assert_eq!(out.time, Some(time(12, 0)));
        assert_eq!(out.text, "lunch");
    }

    #[test]
    fn relative_day_words() {
        assert_eq!(
            extract_at("submit today", today()).date,
            Some(date(2024, 6, 15))
        );
        assert_eq!(
            extract_at("Submit TOMORROW", today()).date,
            Some(date(2024, 6, 16))
        );
    }

    #[test]
    fn weekdays_resolve_to_the_next_occurrence() {
        assert_eq!(
            extract_at("sync next monday", today()).date,
            Some(date(2024, 6, 17))
        );
        assert_eq!(
            extract_at("drinks friday", today()).date,
            Some(date(2024, 6, 21))
        );
        // Today is Saturday: a bare or "next" Saturday is a week out.
        assert_eq!(
            extract_at("brunch next saturday", today()).date,
            Some(date(2024, 6, 22))
        );
    }

    #[test]
    fn in_n_days_offsets_from_today() {
        assert_eq!(
            extract_at("renew passport in 3 days", today()).date,
            Some(date(2024, 6, 18))
        );
        let out = extract_at("ship in 1 day", today());
        assert_eq!(out.date, Some(date(2024, 6, 16)));
        assert_eq!(out.text, "ship");
    }

    #[test]
    fn numeric_dates_must_be_in_the_future() {
        // 6/1 is in the past relative to 2024-06-15: ignored, text untouched.
        let out = extract_at("pay rent 6/1", today());
        assert_eq!(out.date, None);
        assert_eq!(out.text, "pay rent 6/1");

        let out = extract_at("pay rent 12/1", today());
        assert_eq!(out.date, Some(date(2024, 12, 1)));
        assert_eq!(out.text, "pay rent");
    }

    #[test]
    fn numeric_dates_accept_two_and_four_digit_years() {
        assert_eq!(
            extract_at("renew 12/31/25", today()).date,
            Some(date(2025, 12, 31))
        );
        assert_eq!(
            extract_at("kickoff 1/1/2025", today()).date,
            Some(date(2025, 1, 1))
        );
    }

    #[test]
    fn date_rule_order_is_first_match_wins() {
        // Both "tomorrow" and a weekday are present; the tomorrow rule is
        // earlier in the table, and the weekday word survives in the text.
        let out = extract_at("tomorrow friday", today());
        assert_eq!(out.date, Some(date(2024, 6, 16)));
        assert_eq!(out.text, "friday");
    }

    #[test]
    fn connector_words_are_stripped() {
        let out = extract_at("follow up on invoices", today());
        assert_eq!(out.text, "follow up invoices");
        assert_eq!(out.date, None);
        assert_eq!(out.time, None);
    }

    #[test]
    fn plain_text_passes_through() {
        let out = extract_at("Water the plants", today());
        assert_eq!(out.text, "Water the plants");
        assert_eq!(out.date, None);
        assert_eq!(out.time, None);
    }

    #[test]
    fn empty_input_yields_empty_extraction() {
        let out = extract_at("", today());
        assert_eq!(out.text, "");
        assert_eq!(out.date, None);
        assert_eq!(out.time, None);
    }

    #[test]
    fn extraction_can_consume_the_entire_text() {
        let out = extract_at("tomorrow at 9am", today());
        assert_eq!(out.date, Some(date(2024, 6, 16)));
        assert_eq!(out.time, Some(time(9, 0)));
        assert_eq!(out.text, "");
    }
}
