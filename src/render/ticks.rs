use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::data::datetime;

/// Upper bound on requested tick counts.
pub const MAX_TICK_COUNT: usize = 50;

/// Step chosen by the "nice numbers" rule: 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(min: f64, max: f64, count: usize) -> Option<f64> {
    let range = (max - min).abs();
    if range <= 0.0 || !range.is_finite() {
        return None;
    }

    let raw_step = range / (count.clamp(2, MAX_TICK_COUNT) - 1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let multiplier = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    Some(multiplier * magnitude)
}

/// Nice tick values covering `[min, max]`, aiming for about `count` ticks.
///
/// The first and last tick are the data bounds rounded outward to the step,
/// so they always enclose the data. Equal bounds give the single tick `[min]`.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let Some(step) = nice_step(min, max, count) else {
        return vec![min];
    };

    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let scale = 10f64.powi(decimals);
    let tick = |i: i64| {
        let v = i as f64 * step;
        if decimals > 0 { (v * scale).round() / scale } else { v }
    };

    // Only the top boundary gets a tolerance; the bottom tick must not pass min.
    let mut start = (min / step).floor() as i64;
    while tick(start) > min {
        start -= 1;
    }
    let mut end = (max / step - 1e-9).ceil() as i64;
    while tick(end) < max {
        end += 1;
    }

    (start..=end).map(tick).collect()
}

/// `{1, 2, 5} x 10^k` ticks inside `[min, max]`, ascending.
///
/// Falls back to the bounds themselves when no candidate lands inside. Empty
/// when the range is not strictly positive.
pub fn log_ticks(min: f64, max: f64) -> Vec<f64> {
    if !(min > 0.0) || !max.is_finite() || max < min {
        return Vec::new();
    }

    let lo = min.log10().floor() as i32;
    let hi = max.log10().ceil() as i32;
    let lower = min * (1.0 - 1e-9);
    let upper = max * (1.0 + 1e-9);

    let mut ticks: Vec<f64> = (lo..=hi)
        .flat_map(|k| {
            let base = 10f64.powi(k);
            [1.0, 2.0, 5.0].into_iter().map(move |m| m * base)
        })
        .filter(|v| *v >= lower && *v <= upper)
        .collect();
    ticks.dedup();

    if ticks.is_empty() {
        ticks.push(min);
        if max > min {
            ticks.push(max);
        }
    }
    ticks
}

/// First-of-month instants from `start` through `end` inclusive.
pub fn month_ticks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    months_aligned(start, end, 1, datetime::first_of_month)
}

/// Quarter starts (Jan/Apr/Jul/Oct 1) from `start` through `end`.
pub fn quarter_ticks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    months_aligned(start, end, 3, datetime::first_of_quarter)
}

/// January 1sts from `start` through `end`.
pub fn year_ticks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    months_aligned(start, end, 12, datetime::first_of_year)
}

fn months_aligned(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step_months: u32,
    align: fn(NaiveDate) -> NaiveDate,
) -> Vec<NaiveDateTime> {
    let mut ticks = Vec::new();
    let mut current = align(start.date());
    if datetime::midnight(current) < start {
        match datetime::add_months(current, step_months) {
            Some(next) => current = next,
            None => return ticks,
        }
    }
    while datetime::midnight(current) <= end {
        ticks.push(datetime::midnight(current));
        match datetime::add_months(current, step_months) {
            Some(next) => current = next,
            None => break,
        }
    }
    ticks
}

/// Midnights every `step_days` days from `start` through `end`.
pub fn day_ticks(start: NaiveDateTime, end: NaiveDateTime, step_days: u32) -> Vec<NaiveDateTime> {
    let step = Days::new(u64::from(step_days.max(1)));
    let mut ticks = Vec::new();
    let mut current = start.date();
    if datetime::midnight(current) < start {
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => return ticks,
        }
    }
    while datetime::midnight(current) <= end {
        ticks.push(datetime::midnight(current));
        match current.checked_add_days(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        datetime::midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn nice_ticks_round_outward() {
        assert_eq!(nice_ticks(3.0, 97.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.12, 0.31, 3), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn nice_ticks_degenerate_inputs() {
        assert_eq!(nice_ticks(5.0, 5.0, 5), vec![5.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, f64::INFINITY, 5).is_empty());
        // Reversed bounds are accepted.
        assert_eq!(nice_ticks(10.0, 0.0, 6), nice_ticks(0.0, 10.0, 6));
    }

    #[test]
    fn nice_ticks_handle_negative_ranges() {
        assert_eq!(nice_ticks(-7.0, 7.0, 3), vec![-10.0, 0.0, 10.0]);
        assert_eq!(nice_ticks(-6.0, 6.0, 3), vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn lowest_tick_never_sits_above_the_data() {
        let min = 0.4 - 1e-11;
        let ticks = nice_ticks(min, 1.0, 4);
        assert_eq!(ticks, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!(ticks[0] <= min);
        // An exact multiple stays the first tick.
        assert_eq!(nice_ticks(0.4, 1.0, 4)[0], 0.4);
    }

    #[test]
    fn huge_tick_counts_are_capped() {
        assert_eq!(nice_step(0.0, 1.0, usize::MAX), nice_step(0.0, 1.0, MAX_TICK_COUNT));
        assert!(nice_ticks(0.0, 1.0, usize::MAX).len() <= MAX_TICK_COUNT * 2);
    }

    #[test]
    fn log_ticks_enumerate_one_two_five() {
        assert_eq!(log_ticks(1.0, 100.0), vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]);
        assert_eq!(log_ticks(3.0, 60.0), vec![5.0, 10.0, 20.0, 50.0]);
        // The topmost candidate is kept when it equals the maximum.
        assert_eq!(log_ticks(0.5, 500.0).last(), Some(&500.0));
    }

    #[test]
    fn log_ticks_fall_back_to_bounds() {
        assert_eq!(log_ticks(3.0, 4.0), vec![3.0, 4.0]);
        assert_eq!(log_ticks(3.0, 3.0), vec![3.0]);
        assert!(log_ticks(0.0, 10.0).is_empty());
        assert!(log_ticks(-1.0, 10.0).is_empty());
    }

    #[test]
    fn month_ticks_are_inclusive() {
        let ticks = month_ticks(at(2024, 1, 15), at(2024, 4, 1));
        assert_eq!(ticks, vec![at(2024, 2, 1), at(2024, 3, 1), at(2024, 4, 1)]);
        let ticks = month_ticks(at(2024, 1, 1), at(2024, 1, 31));
        assert_eq!(ticks, vec![at(2024, 1, 1)]);
    }

    #[test]
    fn quarter_and_year_ticks() {
        let q = quarter_ticks(at(2023, 2, 10), at(2024, 1, 1));
        assert_eq!(q, vec![at(2023, 4, 1), at(2023, 7, 1), at(2023, 10, 1), at(2024, 1, 1)]);
        let y = year_ticks(at(2020, 6, 1), at(2023, 6, 1));
        assert_eq!(y, vec![at(2021, 1, 1), at(2022, 1, 1), at(2023, 1, 1)]);
    }

    #[test]
    fn day_ticks_start_at_next_midnight() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let ticks = day_ticks(start, at(2024, 3, 4), 2);
        assert_eq!(ticks, vec![at(2024, 2, 28), at(2024, 3, 1), at(2024, 3, 3)]);
    }

    proptest! {
        #[test]
        fn nice_step_is_one_two_five_times_power_of_ten(
            min in -1e4f64..1e4,
            span in 1e-2f64..1e6,
            count in 2usize..12,
        ) {
            let max = min + span;
            let step = nice_step(min, max, count).unwrap();
            let normalized = step / 10f64.powf(step.log10().floor());
            let ok = [1.0, 2.0, 5.0, 10.0].iter().any(|m| (normalized - m).abs() < 1e-6);
            prop_assert!(ok, "step {} normalized {}", step, normalized);

            let ticks = nice_ticks(min, max, count);
            prop_assert!(ticks[0] <= min);
            prop_assert!(*ticks.last().unwrap() >= max);
        }
    }
}
