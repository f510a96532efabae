use serde::{Deserialize, Serialize};

use crate::data::entry::SeriesKind;
use crate::error::Result;
use crate::render::scale::YScaleKind;
use crate::render::ticks::MAX_TICK_COUNT;

/// Rendering parameters for one chart. Treated as an immutable snapshot: each
/// computation borrows it and returns fresh results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Plot area size in pixels.
    pub width: f64,
    pub height: f64,
    pub y_scale: YScaleKind,
    /// Curve smoothness, 0 for straight segments.
    pub tension: f64,
    pub x_tick_count: usize,
    pub y_tick_count: usize,
    /// Visible window in days; 0 shows everything.
    pub view_days: f64,
    pub series_kind: SeriesKind,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            y_scale: YScaleKind::Linear,
            tension: 0.5,
            x_tick_count: 8,
            y_tick_count: 5,
            view_days: 0.0,
            series_kind: SeriesKind::Number,
        }
    }
}

impl ChartConfig {
    /// Parse a config; missing fields take their defaults and tick counts
    /// are capped at [`MAX_TICK_COUNT`].
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.x_tick_count = config.x_tick_count.min(MAX_TICK_COUNT);
        config.y_tick_count = config.y_tick_count.min(MAX_TICK_COUNT);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ChartConfig::from_json(r#"{"width": 640, "yScale": "log", "seriesKind": "duration-seconds"}"#)
            .unwrap();
        assert_eq!(cfg.width, 640.0);
        assert_eq!(cfg.height, 300.0);
        assert_eq!(cfg.y_scale, YScaleKind::Log);
        assert_eq!(cfg.series_kind, SeriesKind::DurationSeconds);
        assert_eq!(cfg.tension, 0.5);
    }

    #[test]
    fn tick_counts_are_capped() {
        let cfg = ChartConfig::from_json(r#"{"xTickCount": 18446744073709551615, "yTickCount": 12}"#).unwrap();
        assert_eq!(cfg.x_tick_count, MAX_TICK_COUNT);
        assert_eq!(cfg.y_tick_count, 12);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ChartConfig::from_json("{\"width\": \"wide\"}").is_err());
    }
}
