use crate::data::datetime;
use crate::data::entry::SeriesKind;
use crate::render::scale::{TimeTickUnit, YScale, YScaleKind};

const MAX_DECIMALS: f64 = 10.0;

/// Magnitude thresholds for abbreviated labels: `(at least, divisor, suffix)`.
const COMPACT_UNITS: [(f64, f64, &str); 3] = [(1e9, 1e9, "B"), (1e6, 1e6, "M"), (1e4, 1e3, "k")];

fn compact_unit(magnitude: f64) -> (f64, &'static str) {
    COMPACT_UNITS
        .iter()
        .find(|(threshold, _, _)| magnitude >= *threshold)
        .map_or((1.0, ""), |(_, divisor, suffix)| (*divisor, *suffix))
}

/// Decimal places needed to tell values `step` apart.
pub fn step_decimals(step: f64) -> usize {
    if step.is_finite() && step > 0.0 {
        // Absorbs gaps like 0.3 - 0.2 landing just under 0.1.
        (-(step.log10() + 1e-9).floor()).clamp(0.0, MAX_DECIMALS) as usize
    } else {
        0
    }
}

/// Fixed-point text; anything that rounds to zero reads "0".
fn format_fixed(val: f64, decimals: usize, suffix: &str) -> String {
    let text = format!("{val:.decimals$}");
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return "0".to_string();
    }
    format!("{text}{suffix}")
}

/// A standalone value, abbreviated by its own magnitude with two places past
/// its leading digit and trailing zeros dropped.
pub fn format_tick_value(val: f64) -> String {
    if !val.is_finite() {
        return val.to_string();
    }
    let (divisor, suffix) = compact_unit(val.abs());
    let scaled = val / divisor;
    let mut text = format_fixed(scaled, step_decimals(scaled.abs()) + 2, "");
    if text.contains('.') {
        let kept = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(kept);
    }
    text.push_str(suffix);
    text
}

/// Labels for evenly spaced ticks. All share one unit and the precision the
/// tick step needs, so `0.5, 1.0, 1.5` stay aligned.
pub fn format_linear_ticks(ticks: &[f64]) -> Vec<String> {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !step.is_finite() {
        return ticks.iter().map(|v| format_tick_value(*v)).collect();
    }

    let largest = ticks.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let (divisor, suffix) = compact_unit(largest);
    let decimals = step_decimals(step / divisor);
    ticks.iter().map(|v| format_fixed(v / divisor, decimals, suffix)).collect()
}

/// Y-axis labels for a scale, formatted for the series kind.
pub fn format_y_ticks(scale: &YScale, kind: SeriesKind) -> Vec<String> {
    match (kind, scale.kind) {
        (SeriesKind::DurationSeconds, _) => scale.ticks.iter().map(|v| format_duration(*v)).collect(),
        (SeriesKind::Number, YScaleKind::Linear) => format_linear_ticks(&scale.ticks),
        (SeriesKind::Number, YScaleKind::Log) => {
            scale.ticks.iter().map(|v| format_tick_value(*v)).collect()
        }
    }
}

/// `H:MM:SS` for an hour or more, `M:SS` below; fractions are rounded.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return seconds.to_string();
    }
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{sign}{h}:{m:02}:{s:02}")
    } else {
        format!("{sign}{m}:{s:02}")
    }
}

/// Label for a time-axis tick at unix seconds `ts`.
pub fn format_time_tick(ts: f64, unit: TimeTickUnit) -> String {
    let Some(dt) = datetime::from_unix_seconds(ts) else {
        return format_tick_value(ts);
    };
    match unit {
        TimeTickUnit::Seconds => dt.format("%H:%M").to_string(),
        TimeTickUnit::Days(_) => dt.format("%b %-d").to_string(),
        TimeTickUnit::Months => dt.format("%b").to_string(),
        TimeTickUnit::Quarters => {
            use chrono::Datelike;
            format!("Q{} {}", dt.month0() / 3 + 1, dt.year())
        }
        TimeTickUnit::Years => dt.format("%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> f64 {
        datetime::to_unix_seconds(datetime::midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    #[test]
    fn tick_values() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(2.5), "2.5");
        assert_eq!(format_tick_value(40.0), "40");
        assert_eq!(format_tick_value(-0.5), "-0.5");
        assert_eq!(format_tick_value(0.0002), "0.0002");
        assert_eq!(format_tick_value(12_500.0), "12.5k");
        assert_eq!(format_tick_value(2_000_000.0), "2M");
    }

    #[test]
    fn linear_ticks_share_step_precision() {
        assert_eq!(format_linear_ticks(&[0.0, 0.5, 1.0, 1.5]), vec!["0", "0.5", "1.0", "1.5"]);
        assert_eq!(format_linear_ticks(&[0.1, 0.2, 0.3, 0.4]), vec!["0.1", "0.2", "0.3", "0.4"]);
        assert_eq!(format_linear_ticks(&[-10.0, 0.0, 10.0]), vec!["-10", "0", "10"]);
        assert_eq!(
            format_linear_ticks(&[0.0, 5000.0, 10_000.0, 15_000.0]),
            vec!["0", "5k", "10k", "15k"]
        );
        assert_eq!(format_linear_ticks(&[1.5e6, 2e6, 2.5e6]), vec!["1.5M", "2.0M", "2.5M"]);
        assert_eq!(format_linear_ticks(&[80.25]), vec!["80.25"]);
    }

    #[test]
    fn y_ticks_follow_scale_and_series_kind() {
        let linear = YScale::build(&[3.0, 42.0, 97.0], YScaleKind::Linear, 200.0, 5);
        assert_eq!(format_y_ticks(&linear, SeriesKind::Number), vec!["0", "20", "40", "60", "80", "100"]);

        let log = YScale::build(&[-3.0, 0.0, 2.0, 50.0], YScaleKind::Log, 100.0, 5);
        assert_eq!(format_y_ticks(&log, SeriesKind::Number), vec!["2", "5", "10", "20", "50"]);

        let durations = YScale::build(&[0.0, 4000.0], YScaleKind::Linear, 100.0, 5);
        assert_eq!(
            format_y_ticks(&durations, SeriesKind::DurationSeconds),
            vec!["0:00", "16:40", "33:20", "50:00", "1:06:40"]
        );
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.0), "1:05");
        assert_eq!(format_duration(3723.4), "1:02:03");
        assert_eq!(format_duration(-90.0), "-1:30");
    }

    #[test]
    fn time_ticks() {
        assert_eq!(format_time_tick(ts(2024, 3, 5), TimeTickUnit::Days(1)), "Mar 5");
        assert_eq!(format_time_tick(ts(2024, 3, 1), TimeTickUnit::Months), "Mar");
        assert_eq!(format_time_tick(ts(2024, 7, 1), TimeTickUnit::Quarters), "Q3 2024");
        assert_eq!(format_time_tick(ts(2024, 1, 1), TimeTickUnit::Years), "2024");
    }
}
