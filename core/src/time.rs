use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};

/// Wire format for due dates, kept stable for previously saved data.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for due times (24-hour, no seconds).
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Current instant truncated to whole milliseconds, so a value round-trips
/// losslessly through the epoch-ms wire field.
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

/// The last representable moment of a day: 23:59:59.999 local wall time.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn to_local(dt: NaiveDateTime) -> DateTime<Local> {
    // On a DST gap, take the earlier valid interpretation.
    match Local.from_local_datetime(&dt).earliest() {
        Some(local) => local,
        None => Local.from_utc_datetime(&dt),
    }
}

/// A todo's deadline as an instant: the due date combined with the due time
/// when one is set, otherwise the end of that day.
pub fn effective_due_instant(date: NaiveDate, time: Option<NaiveTime>) -> DateTime<Local> {
    match time {
        Some(t) => to_local(date.and_time(t)),
        None => to_local(end_of_day(date)),
    }
}

/// Whole days from `now` until `instant`, rounded toward positive infinity.
/// An instant earlier today still counts as 0 ("due today"); only a deadline
/// a full day behind goes negative.
pub fn days_until(instant: DateTime<Local>, now: DateTime<Local>) -> i64 {
    const DAY_MS: f64 = 86_400_000.0;
    let diff_ms = instant.signed_duration_since(now).num_milliseconds();
    (diff_ms as f64 / DAY_MS).ceil() as i64
}

/// Next occurrence of `target` strictly after `from`; if `from` already is
/// that weekday the result is a full week out.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let from_w = from.weekday().num_days_from_sunday() as i64;
    let tgt_w = target.num_days_from_sunday() as i64;
    let mut delta = (tgt_w - from_w + 7) % 7;
    if delta == 0 {
        delta = 7;
    }
    from + Duration::days(delta)
}

/// 12-hour clock for display, e.g. "5:30 PM".
pub fn format_time_12h(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Short human date for display, e.g. "Jun 15, 2024".
pub fn format_date_short(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}
