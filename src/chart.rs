use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::datetime::{self, SECONDS_PER_DAY};
use crate::data::entry::Entry;
use crate::processing::aggregation::{self, AggregatedSeries, Period};
use crate::processing::running::{running_metric, SeriesPoint};
use crate::processing::statistics::Statistic;
use crate::render::labels;
use crate::render::path::{self, CurvePath, Point};
use crate::render::scale::{XScale, YScale};
use crate::render::viewport::{ViewWindow, ViewportController};
use crate::state::chart_config::ChartConfig;
use crate::state::request::ChartRequest;

/// Everything the drawing layer needs for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    /// Data points; `x` is unix seconds.
    pub points: Vec<SeriesPoint<f64>>,
    /// Bucketed statistics, when the request asked for a period.
    pub aggregation: Option<AggregatedSeries>,
    /// `None` when there is nothing to draw.
    pub x_scale: Option<XScale>,
    pub y_scale: YScale,
    /// Points inside the visible window, in pixels.
    pub pixels: Vec<Point>,
    pub path: CurvePath,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl ChartFrame {
    pub fn total_domain_days(&self) -> f64 {
        self.x_scale.as_ref().map_or(0.0, XScale::total_domain_days)
    }
}

/// Filter, bucket and roll entries into chart points, chronologically.
pub fn chart_points(
    entries: &[Entry],
    request: &ChartRequest,
    now: NaiveDateTime,
) -> (Vec<SeriesPoint<f64>>, Option<AggregatedSeries>) {
    let mut filtered = request.range.filter(entries, now);

    if request.period == Period::None {
        filtered.sort_by_key(|e| e.timestamp);
        let points = filtered
            .iter()
            .map(|e| SeriesPoint::new(e.unix_seconds(), e.value))
            .collect();
        return (points, None);
    }

    let agg = aggregation::aggregate(filtered.iter().copied(), request.period);
    let starts: Vec<f64> = agg
        .starts
        .iter()
        .map(|d| datetime::to_unix_seconds(datetime::midnight(*d)))
        .collect();
    let column = agg.column(request.statistic);

    // A rolling window averages the chosen per-bucket column.
    let points = match request.window {
        Some(window) => running_metric(&column, &starts, Statistic::Mean, window),
        None => starts
            .iter()
            .zip(column.iter())
            .map(|(x, y)| SeriesPoint::new(*x, *y))
            .collect(),
    };
    (points, Some(agg))
}

/// Build scales, pixel positions and the line path for a set of points.
pub fn build_frame(
    points: Vec<SeriesPoint<f64>>,
    aggregation: Option<AggregatedSeries>,
    config: &ChartConfig,
    window: ViewWindow,
) -> ChartFrame {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let x_scale = XScale::build(&xs, window, config.width, config.x_tick_count);

    let visible: Vec<&SeriesPoint<f64>> = match &x_scale {
        Some(scale) => points.iter().filter(|p| scale.contains(p.x)).collect(),
        None => Vec::new(),
    };
    let ys: Vec<f64> = visible.iter().map(|p| p.y).collect();
    let y_scale = YScale::build(&ys, config.y_scale, config.height, config.y_tick_count);

    let pixels: Vec<Point> = match &x_scale {
        Some(scale) => visible
            .iter()
            .map(|p| Point::new(scale.map(p.x), y_scale.map(p.y)))
            .collect(),
        None => Vec::new(),
    };
    let path = path::interpolate(&pixels, config.tension);

    let x_labels: Vec<String> = x_scale
        .as_ref()
        .map(|s| s.ticks.iter().map(|t| labels::format_time_tick(*t, s.unit)).collect())
        .unwrap_or_default();
    let y_labels = labels::format_y_ticks(&y_scale, config.series_kind);

    ChartFrame {
        points,
        aggregation,
        x_scale,
        y_scale,
        pixels,
        path,
        x_labels,
        y_labels,
    }
}

/// One chart instance: its configuration snapshot and its pan state.
#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    viewport: ViewportController,
    points: Vec<SeriesPoint<f64>>,
    aggregation: Option<AggregatedSeries>,
}

impl Chart {
    pub fn new(config: ChartConfig) -> Self {
        let viewport = ViewportController::new(config.view_days);
        Self {
            config,
            viewport,
            points: Vec::new(),
            aggregation: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Pointer events are forwarded here by the view layer.
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Swap in a new configuration. A different view width resets panning.
    pub fn set_config(&mut self, config: ChartConfig) {
        if config.view_days != self.viewport.view_days() {
            self.viewport.set_view_days(config.view_days);
        }
        self.config = config;
    }

    /// Recompute points from entries and reset the view to the latest data.
    pub fn load(&mut self, entries: &[Entry], request: &ChartRequest, now: NaiveDateTime) {
        let (points, aggregation) = chart_points(entries, request, now);
        let span_days = match (
            points.iter().map(|p| p.x).reduce(f64::min),
            points.iter().map(|p| p.x).reduce(f64::max),
        ) {
            (Some(lo), Some(hi)) => (hi - lo) / SECONDS_PER_DAY,
            _ => 0.0,
        };
        tracing::debug!(points = points.len(), span_days, "chart data loaded");

        self.points = points;
        self.aggregation = aggregation;
        self.viewport.load_data(span_days);
    }

    /// Geometry for the current data and pan position.
    pub fn frame(&self) -> ChartFrame {
        build_frame(
            self.points.clone(),
            self.aggregation.clone(),
            &self.config,
            self.viewport.window(),
        )
    }
}
