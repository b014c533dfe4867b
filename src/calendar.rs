//! # Calendar Feed Synthesizer
//!
//! Walks a span of consecutive JST dates and emits one all-day VEVENT
//! per date, combining the lunar-age tide name with the day's parsed
//! high/low water times. The output is a complete RFC 5545 VCALENDAR
//! document with a fixed Asia/Tokyo VTIMEZONE block and CRLF line
//! endings throughout.
//!
//! ## Caching
//!
//! Year tables are fetched lazily through [`TideSource`] and memoized
//! in a map owned by the single `synthesize` call. A 90-day span that
//! crosses New Year therefore costs exactly two fetches, and concurrent
//! requests never share state.
//!
//! ## Degradation
//!
//! Missing daily records render as empty time lists, and a lunar age
//! outside the label table renders as an empty `[]` prefix. Only an
//! upstream fetch failure aborts the synthesis.

use crate::tide_table::{TideError, TideSource};
use crate::{DailyTideRecord, YearTideTable};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// JMA reference page linked from every event description.
const REFERENCE_URL: &str = "https://www.data.jma.go.jp/kaiyou/db/tide/suisan/suisan.php?stn=";

/// Fixed product identifier for the VCALENDAR header.
const PRODID: &str = "tide-calendar";

/// Generate the full iCalendar document for one station.
///
/// Iterates `days` consecutive dates from `start` (each date advanced
/// functionally, no shared cursor), fetching each touched year's tide
/// table at most once from `source`. `lunar_age` supplies the Moon's
/// age for a date and `labels` maps its rounded value to a tide name.
///
/// # Errors
/// Propagates [`TideError`] from the first failed year-table fetch; the
/// serving layer translates this into an HTTP error.
pub async fn synthesize<S, F>(
    station: &str,
    place: &str,
    start: NaiveDate,
    days: u32,
    source: &S,
    lunar_age: F,
    labels: &[&str],
) -> Result<String, TideError>
where
    S: TideSource + ?Sized,
    F: Fn(NaiveDate) -> f64,
{
    let mut cache: HashMap<i32, YearTideTable> = HashMap::new();
    let empty = DailyTideRecord::default();

    let mut ical = String::new();
    for line in header_lines(place) {
        push_line(&mut ical, &line);
    }

    let mut day = start;
    for _ in 0..days {
        let year = day.year();
        if !cache.contains_key(&year) {
            let table = source.year_table(year, station).await?;
            cache.insert(year, table);
        }

        let record = cache
            .get(&year)
            .and_then(|table| table.get(&date_key(day)))
            .unwrap_or(&empty);

        let label = label_for(labels, lunar_age(day));
        // All-day events use an exclusive end date.
        let next = day.succ_opt().unwrap_or(day);

        push_line(&mut ical, "BEGIN:VEVENT");
        push_line(&mut ical, &format!("DTSTART;VALUE=DATE:{}", date_key(day)));
        push_line(&mut ical, &format!("DTEND;VALUE=DATE:{}", date_key(next)));
        push_line(
            &mut ical,
            &format!("SUMMARY:[{label}] {}", summary_line(record)),
        );
        push_line(
            &mut ical,
            &format!("DESCRIPTION:{}", description_line(record, station)),
        );
        push_line(&mut ical, "END:VEVENT");

        day = next;
    }

    push_line(&mut ical, "END:VCALENDAR");
    Ok(ical)
}

/// Direct "YYYYMMDD" key formatting; deliberately not locale-aware.
fn date_key(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

/// Calendar header plus the fixed Asia/Tokyo VTIMEZONE sub-block.
fn header_lines(place: &str) -> Vec<String> {
    vec![
        "BEGIN:VCALENDAR".to_string(),
        format!("PRODID:{PRODID}"),
        "VERSION:2.0".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{place}の潮汐(MIRC方式)"),
        "X-WR-TIMEZONE:Asia/Tokyo".to_string(),
        "BEGIN:VTIMEZONE".to_string(),
        "TZID:Asia/Tokyo".to_string(),
        "X-LIC-LOCATION:Asia/Tokyo".to_string(),
        "BEGIN:STANDARD".to_string(),
        "TZOFFSETFROM:+0900".to_string(),
        "TZOFFSETTO:+0900".to_string(),
        "TZNAME:JST".to_string(),
        "DTSTART:19700101T000000".to_string(),
        "END:STANDARD".to_string(),
        "END:VTIMEZONE".to_string(),
    ]
}

/// Space-joined high then low water times: `満潮: 06:12 18:40 干潮: 12:25`.
fn summary_line(record: &DailyTideRecord) -> String {
    let highs: Vec<&str> = record.highs.iter().map(|e| e.time_of_day.as_str()).collect();
    let lows: Vec<&str> = record.lows.iter().map(|e| e.time_of_day.as_str()).collect();
    format!("満潮: {} 干潮: {}", highs.join(" "), lows.join(" "))
}

/// Time/height pairs plus the JMA reference link, with RFC 5545 `\n`
/// escapes (the literal two characters, not real newlines).
fn description_line(record: &DailyTideRecord, station: &str) -> String {
    fn pairs(extrema: &[crate::TideExtremum]) -> String {
        extrema
            .iter()
            .map(|e| format!("{} {}cm", e.time_of_day, e.height_cm))
            .collect::<Vec<_>>()
            .join(", ")
    }

    format!(
        "満潮 {}\\n干潮 {}\\n{REFERENCE_URL}{station}",
        pairs(&record.highs),
        pairs(&record.lows),
    )
}

/// Round the lunar age and look it up; blank outside the table.
fn label_for<'a>(labels: &[&'a str], age: f64) -> &'a str {
    usize::try_from(age.round() as i64)
        .ok()
        .and_then(|i| labels.get(i))
        .copied()
        .unwrap_or("")
}

/// iCalendar requires CRLF terminators on every content line.
fn push_line(ical: &mut String, line: &str) {
    ical.push_str(line);
    ical.push_str("\r\n");
}
