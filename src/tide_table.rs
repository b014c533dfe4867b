//! # JMA Tide Table Fetching and Parsing
//!
//! This module handles the upstream side of the pipeline: downloading
//! the per-year tide table for a station from the JMA suisan service and
//! decoding its fixed-width records into structured [`DailyTideRecord`]s.
//!
//! ## Data Source
//!
//! ### JMA 潮位表 (suisan) text files
//! - **URL**: `https://www.data.jma.go.jp/kaiyou/data/db/tide/suisan/txt/<year>/<station>.txt`
//! - **Granularity**: one file per station per calendar year, one line per day
//! - **Encoding**: ASCII, fixed column offsets, no header line
//!
//! ### Record layout (0-indexed character offsets)
//!
//! ```text
//! 0..72    hourly tide heights (24 × 3 chars, unused here)
//! 72..74   year within century ("24" → 2024)
//! 74..76   month, space-padded ("␣1" → 01)
//! 76..78   day, space-padded
//! 78..80   station symbol
//! 80..108  high-water slots: 4 × (hh 2, mm 2, height-cm 3)
//! 108..136 low-water slots: same layout
//! ```
//!
//! A slot whose hour+minute digits read "9999" means "no such event
//! that day" and is dropped entirely; heights keep their sign and lose
//! all padding spaces.
//!
//! ## Leniency
//!
//! The layout above is an undocumented upstream contract, so the parser
//! never raises: slices past the end of a line come back empty, empty
//! fields propagate as empty strings, and a blank trailing line decodes
//! to a degenerate record under the key `"20"` that no date lookup ever
//! hits. The offset tests at the bottom of this file are the regression
//! net for the layout itself.

use crate::{DailyTideRecord, TideExtremum, YearTideTable};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a year table from JMA.
///
/// Parsing itself never fails; only the network round-trip does.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (network, TLS, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JMA answered with a non-success status (unknown station or year)
    #[error("tide table for {year}/{station} unavailable (status {status})")]
    Unavailable {
        year: i32,
        station: String,
        status: u16,
    },
}

/// First character of the first high-water slot.
const HIGH_BASE: usize = 80;
/// First character of the first low-water slot.
const LOW_BASE: usize = 108;
/// Width of one extremum slot: hh + mm + height.
const SLOT_STRIDE: usize = 7;
/// Hour+minute digits marking an unused slot.
const SENTINEL: &str = "9999";

/// Provider of parsed year tables, keyed by (year, station).
///
/// The synthesizer depends on this trait rather than on the HTTP client
/// so tests can drive it with canned fixtures and count fetches.
#[async_trait]
pub trait TideSource {
    /// Fetch and parse the tide table for one station and calendar year.
    async fn year_table(&self, year: i32, station: &str) -> Result<YearTideTable, TideError>;
}

/// [`TideSource`] backed by the live JMA suisan text service.
#[derive(Clone)]
pub struct HttpTideSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTideSource {
    /// Create a source fetching from `base_url` (no trailing slash).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TideSource for HttpTideSource {
    async fn year_table(&self, year: i32, station: &str) -> Result<YearTideTable, TideError> {
        let url = format!("{}/{}/{}.txt", self.base_url, year, station);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TideError::Unavailable {
                year,
                station: station.to_string(),
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        Ok(parse(&raw))
    }
}

/// Parse one year of newline-separated fixed-width records.
///
/// Pure transform, never fails. Each line becomes one entry keyed by
/// "YYYYMMDD"; malformed lines become degenerate entries with blank
/// fields that are simply never looked up.
pub fn parse(raw: &str) -> YearTideTable {
    let mut table = YearTideTable::new();

    for line in raw.split('\n') {
        let yy = slice(line, 72, 74);
        let month = pad(slice(line, 74, 76));
        let day = pad(slice(line, 76, 78));
        let date_key = format!("20{yy}{month}{day}");

        let highs = (0..4)
            .filter_map(|j| parse_slot(line, HIGH_BASE + SLOT_STRIDE * j))
            .collect();
        let lows = (0..4)
            .filter_map(|j| parse_slot(line, LOW_BASE + SLOT_STRIDE * j))
            .collect();

        table.insert(date_key, DailyTideRecord { highs, lows });
    }

    table
}

/// Decode one 7-character extremum slot starting at `base`.
///
/// Returns `None` for the "9999" sentinel so unused slots vanish here
/// instead of leaking magic values into the rest of the pipeline.
fn parse_slot(line: &str, base: usize) -> Option<TideExtremum> {
    let hh = slice(line, base, base + 2);
    let mm = slice(line, base + 2, base + 4);
    if format!("{hh}{mm}") == SENTINEL {
        return None;
    }

    // Heights are right-aligned in 3 chars; strip every space but keep
    // the sign (heights below the datum print as e.g. " -5").
    let height_cm: String = slice(line, base + 4, base + 7)
        .chars()
        .filter(|c| *c != ' ')
        .collect();

    Some(TideExtremum {
        time_of_day: format!("{}:{}", pad(hh), pad(mm)),
        height_cm,
    })
}

/// Clamped substring: out-of-range offsets yield "" rather than panicking.
fn slice(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Replace the single leading pad space with a zero ("␣6" → "06").
fn pad(field: &str) -> String {
    field.replacen(' ', "0", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an offset-exact record line for tests.
    ///
    /// `yy`/`month`/`day` must already be 2 characters (space-padded as
    /// in the real table); each slot is (hh, mm, cm) with widths 2/2/3.
    /// Missing slots are filled with the "9999" sentinel.
    fn tide_line(
        yy: &str,
        month: &str,
        day: &str,
        highs: &[(&str, &str, &str)],
        lows: &[(&str, &str, &str)],
    ) -> String {
        fn slots(given: &[(&str, &str, &str)]) -> String {
            let mut out = String::new();
            for j in 0..4 {
                match given.get(j) {
                    Some((hh, mm, cm)) => {
                        assert_eq!(hh.len(), 2, "fixture hour must be 2 chars");
                        assert_eq!(mm.len(), 2, "fixture minute must be 2 chars");
                        assert_eq!(cm.len(), 3, "fixture height must be 3 chars");
                        out.push_str(hh);
                        out.push_str(mm);
                        out.push_str(cm);
                    }
                    None => out.push_str("9999999"),
                }
            }
            out
        }

        let mut line = " ".repeat(72); // hourly heights, unused by the parser
        line.push_str(yy);
        line.push_str(month);
        line.push_str(day);
        line.push_str("TK"); // station symbol column
        line.push_str(&slots(highs));
        line.push_str(&slots(lows));
        assert_eq!(line.len(), 136, "fixture line must match the JMA layout");
        line
    }

    #[test]
    fn parses_example_record_at_documented_offsets() {
        // 2024-01-05, first high water 06:12 at 154 cm.
        let line = tide_line(
            "24",
            " 1",
            " 5",
            &[("06", "12", "154"), ("18", "40", "148")],
            &[("00", "03", " 21"), ("12", "25", " 35")],
        );

        let table = parse(&line);
        let record = table.get("20240105").expect("record for 20240105");

        assert_eq!(record.highs.len(), 2);
        assert_eq!(record.highs[0].time_of_day, "06:12");
        assert_eq!(record.highs[0].height_cm, "154");
        assert_eq!(record.highs[1].time_of_day, "18:40");
        assert_eq!(record.lows.len(), 2);
        assert_eq!(record.lows[0].time_of_day, "00:03");
        assert_eq!(record.lows[0].height_cm, "21");
        assert_eq!(record.lows[1].time_of_day, "12:25");
    }

    #[test]
    fn pads_space_padded_hours_and_minutes() {
        let line = tide_line("24", "11", "30", &[(" 6", " 8", " 87")], &[]);
        let table = parse(&line);
        let record = &table["20241130"];

        assert_eq!(
            record.highs[0].time_of_day, "06:08",
            "single pad spaces in hh/mm should become leading zeros"
        );
        assert_eq!(record.highs[0].height_cm, "87");
    }

    #[test]
    fn keeps_sign_on_negative_heights() {
        let line = tide_line("24", " 3", " 9", &[], &[("05", "45", " -5")]);
        let table = parse(&line);
        let record = &table["20240309"];

        assert_eq!(record.lows[0].height_cm, "-5");
    }

    #[test]
    fn all_sentinel_slots_yield_empty_record() {
        let line = tide_line("24", " 2", "14", &[], &[]);
        let table = parse(&line);
        let record = &table["20240214"];

        assert!(record.highs.is_empty(), "all-9999 highs should be dropped");
        assert!(record.lows.is_empty(), "all-9999 lows should be dropped");
    }

    #[test]
    fn sentinel_slots_are_omitted_not_padded() {
        // Two real highs, slots 3 and 4 unused.
        let line = tide_line(
            "24",
            " 7",
            " 1",
            &[("04", "55", "120"), ("17", "02", "131")],
            &[("11", "20", " 44")],
        );
        let table = parse(&line);
        let record = &table["20240701"];

        assert_eq!(record.highs.len(), 2, "sentinel slots must not pad the list");
        assert_eq!(record.lows.len(), 1);
    }

    #[test]
    fn parse_is_idempotent() {
        let raw = [
            tide_line("24", " 1", " 5", &[("06", "12", "154")], &[("12", "25", " 35")]),
            tide_line("24", " 1", " 6", &[("07", "01", "150")], &[]),
        ]
        .join("\n");

        assert_eq!(
            parse(&raw),
            parse(&raw),
            "re-parsing identical input must yield identical output"
        );
    }

    #[test]
    fn tolerates_trailing_blank_line() {
        let raw = format!(
            "{}\n",
            tide_line("24", " 1", " 5", &[("06", "12", "154")], &[])
        );
        let table = parse(&raw);

        // The blank line decodes to a degenerate record that cannot
        // collide with any real "YYYYMMDD" key.
        assert!(table.contains_key("20240105"));
        let degenerate = table.get("20").expect("blank line record");
        assert!(degenerate.highs.is_empty());
        assert!(degenerate.lows.is_empty());
    }

    #[test]
    fn short_lines_decode_to_blank_fields_without_panic() {
        let table = parse("too short to hold anything");
        let record = table.get("20").expect("short line record");
        assert!(record.highs.is_empty());
        assert!(record.lows.is_empty());
    }

    #[test]
    fn one_line_per_day_keyed_by_date() {
        let raw = [
            tide_line("24", "12", "30", &[("08", "00", "140")], &[]),
            tide_line("24", "12", "31", &[("08", "44", "138")], &[]),
            tide_line("25", " 1", " 1", &[("09", "30", "135")], &[]),
        ]
        .join("\n");
        let table = parse(&raw);

        assert!(table.contains_key("20241230"));
        assert!(table.contains_key("20241231"));
        assert!(table.contains_key("20250101"));
    }
}
