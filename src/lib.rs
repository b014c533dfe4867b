//! # Tide Calendar Core Library
//!
//! This library turns the Japan Meteorological Agency (JMA) fixed-width
//! tide-table text format into an iCalendar feed annotated with the
//! traditional Japanese tide names (大潮, 中潮, 小潮, 長潮, 若潮) derived
//! from the lunar age.
//!
//! ## Data Flow
//!
//! 1. **Fetch**: download the per-year, per-station tide table text from
//!    the JMA suisan service ([`tide_table::HttpTideSource`])
//! 2. **Parse**: decode each fixed-width daily record into high/low tide
//!    extrema, dropping "9999" sentinel slots ([`tide_table::parse`])
//! 3. **Synthesize**: walk the requested date span, join the parsed
//!    extrema with the lunar-age tide name, and emit one all-day VEVENT
//!    per date inside a VCALENDAR envelope ([`calendar::synthesize`])
//!
//! The serving binary wires this pipeline behind `GET /tide/{station}`.
//!
//! ## Design Notes
//!
//! - The parser is a pure transform and never fails: malformed or short
//!   lines decode to empty fields, and the synthesizer renders missing
//!   data as blank rather than erroring (the upstream format is
//!   undocumented, so leniency beats false precision).
//! - Tide heights stay as the decimal strings the table carries
//!   (sign-prefixed centimeters); the feed reproduces them verbatim and
//!   nothing downstream does arithmetic on them.
//! - The only cache is a per-synthesis map of year tables; nothing is
//!   persisted across requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Module declarations
pub mod calendar;
pub mod config;
pub mod lunar;
pub mod stations;
pub mod tide_label;
pub mod tide_table;

/// A single tide extremum (one high or low water) within a day.
///
/// Both fields are kept as strings straight out of the fixed-width
/// table: the time is already formatted for display, and the height is
/// reproduced verbatim in the feed (including a possible `-` sign for
/// heights below the datum, or an empty string for malformed input).
///
/// # Example
/// ```
/// use tide_cal_lib::TideExtremum;
///
/// let morning_high = TideExtremum {
///     time_of_day: "06:12".to_string(),
///     height_cm: "154".to_string(),
/// };
/// assert_eq!(morning_high.time_of_day, "06:12");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TideExtremum {
    /// Time of day as "HH:MM", zero-padded
    pub time_of_day: String,
    /// Height in centimeters as printed in the table (sign kept, may be empty)
    pub height_cm: String,
}

/// All tide extrema for one calendar day, in source (chronological) order.
///
/// The JMA table reserves four high-water and four low-water slots per
/// day and fills unused slots with the "9999" time sentinel; stations
/// with a small tidal range routinely have fewer than four of each.
/// Sentinel slots are filtered out at parse time, so both lists hold
/// only real events (possibly none).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTideRecord {
    /// High waters (満潮), up to 4
    pub highs: Vec<TideExtremum>,
    /// Low waters (干潮), up to 4
    pub lows: Vec<TideExtremum>,
}

/// One year of daily tide records keyed by "YYYYMMDD".
///
/// Built once per (year, station) by [`tide_table::parse`] and cached
/// per synthesis call; never persisted.
pub type YearTideTable = HashMap<String, DailyTideRecord>;
