//! Lunar age from the low-precision Schaefer phase routine
//! (Sky & Telescope, Mar 1985). Accuracy ±1 day, which is all the tide
//! naming scheme needs: the name buckets are 1–4 days wide.

use chrono::{Datelike, NaiveDate};

/// Mean synodic month length in civil days.
const SYNODIC_MONTH: f64 = 29.530_588_2;

/// Age of the Moon in civil days since New, in `[0, SYNODIC_MONTH)`.
///
/// Evaluated at civil midnight of `date`; the tide tables and the feed
/// both work in whole JST days, so no finer resolution is warranted.
pub fn lunar_age(date: NaiveDate) -> f64 {
    // Calendar shift so Jan/Feb count as months 13/14 of the prior
    // year, which keeps the day-count arithmetic leap-year-safe.
    let (mut y, mut m) = (date.year(), date.month() as i32);
    if m < 3 {
        y -= 1;
        m += 12;
    }
    m += 1;

    // Days since the 1900-01-00 12UT new-moon epoch (S&T 1985).
    let days = (365.25 * y as f64).floor() + (30.6 * m as f64).floor() + date.day() as f64
        - 694_039.09;

    // Fractional part of elapsed synodic months, scaled back to days.
    let mut cycles = days / SYNODIC_MONTH;
    cycles -= cycles.floor();
    if cycles < 0.0 {
        cycles += 1.0;
    }
    cycles * SYNODIC_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_is_always_within_one_synodic_month() {
        let mut day = date(2024, 1, 1);
        for _ in 0..800 {
            let age = lunar_age(day);
            assert!(
                (0.0..SYNODIC_MONTH).contains(&age),
                "lunar age {} out of range on {}",
                age,
                day
            );
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn age_near_zero_at_known_new_moon() {
        // Astronomical new moon: 2024-01-11.
        let age = lunar_age(date(2024, 1, 11));
        assert!(
            age > SYNODIC_MONTH - 1.5 || age < 1.5,
            "new moon date should sit at the cycle boundary, got {age}"
        );
    }

    #[test]
    fn age_near_half_cycle_at_known_full_moon() {
        // Astronomical full moon: 2024-01-25.
        let age = lunar_age(date(2024, 1, 25));
        assert!(
            (13.0..16.5).contains(&age),
            "full moon date should sit near mid-cycle, got {age}"
        );
    }

    #[test]
    fn age_advances_one_day_per_day() {
        let a = lunar_age(date(2024, 3, 1));
        let b = lunar_age(date(2024, 3, 2));
        let delta = (b - a).rem_euclid(SYNODIC_MONTH);
        assert!(
            (delta - 1.0).abs() < 1e-6,
            "age should advance by exactly one civil day, got {delta}"
        );
    }
}
