use serde::{Deserialize, Serialize};

use crate::data::datetime::{self, SECONDS_PER_DAY};
use crate::render::ticks;
use crate::render::viewport::ViewWindow;

/// Timestamps within this distance of a month tick are drawn on the tick.
pub const MONTH_SNAP_TOLERANCE_DAYS: f64 = 2.0;

/// Candidate day steps for short spans.
const DAY_STEPS: [u32; 5] = [1, 2, 3, 7, 14];

/// Calendar unit the time axis ticks on, chosen from the visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeTickUnit {
    /// Plain nice-number ticks on seconds, for spans under two days.
    Seconds,
    Days(u32),
    Months,
    Quarters,
    Years,
}

impl TimeTickUnit {
    pub fn for_span(span_days: f64, tick_count: usize) -> Self {
        if span_days < 2.0 {
            TimeTickUnit::Seconds
        } else if span_days <= 90.0 {
            let target = tick_count.clamp(2, ticks::MAX_TICK_COUNT) as f64;
            let step = DAY_STEPS
                .iter()
                .copied()
                .find(|s| span_days / f64::from(*s) <= target)
                .unwrap_or(DAY_STEPS[DAY_STEPS.len() - 1]);
            TimeTickUnit::Days(step)
        } else if span_days <= 365.0 {
            TimeTickUnit::Months
        } else if span_days <= 3.0 * 365.0 {
            TimeTickUnit::Quarters
        } else {
            TimeTickUnit::Years
        }
    }
}

/// Alternating month background band, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthBand {
    pub start: f64,
    pub end: f64,
    pub shaded: bool,
}

/// Visible `[min, max]` of a time domain under a bounded view.
///
/// The window ends `pan_offset_days` before the latest timestamp and never
/// starts before the earliest one; when it would, it is pushed forward so it
/// spans at most the available data.
pub fn visible_range(domain_min: f64, domain_max: f64, window: ViewWindow) -> (f64, f64) {
    if !window.is_bounded() {
        return (domain_min, domain_max);
    }
    let view = window.view_days * SECONDS_PER_DAY;
    let offset = window.pan_offset_days.max(0.0) * SECONDS_PER_DAY;

    let mut visible_max = domain_max - offset;
    let visible_min = domain_min.max(visible_max - view);
    if visible_min <= domain_min {
        visible_max = domain_max.min(visible_min + view);
    }
    (visible_min, visible_max)
}

/// Horizontal time scale: unix seconds to pixels from the left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XScale {
    pub domain_min: f64,
    pub domain_max: f64,
    pub visible_min: f64,
    pub visible_max: f64,
    pub width: f64,
    pub unit: TimeTickUnit,
    /// Tick positions in unix seconds, ascending.
    pub ticks: Vec<f64>,
    /// Month shading; only populated when ticking on months.
    pub bands: Vec<MonthBand>,
}

impl XScale {
    /// Build from the timestamps of every point in the dataset.
    /// Returns `None` when there is no finite timestamp.
    pub fn build(timestamps: &[f64], window: ViewWindow, width: f64, tick_count: usize) -> Option<Self> {
        let (domain_min, domain_max) = finite_extent(timestamps)?;
        let (visible_min, visible_max) = visible_range(domain_min, domain_max, window);
        let span_days = (visible_max - visible_min) / SECONDS_PER_DAY;
        let unit = TimeTickUnit::for_span(span_days, tick_count);

        let ticks = time_ticks(visible_min, visible_max, unit, tick_count);
        let bands = if unit == TimeTickUnit::Months {
            month_bands(domain_min, visible_min, visible_max)
        } else {
            Vec::new()
        };

        tracing::trace!(?unit, visible_min, visible_max, ticks = ticks.len(), "built x scale");
        Some(Self {
            domain_min,
            domain_max,
            visible_min,
            visible_max,
            width,
            unit,
            ticks,
            bands,
        })
    }

    pub fn span_days(&self) -> f64 {
        (self.visible_max - self.visible_min) / SECONDS_PER_DAY
    }

    pub fn total_domain_days(&self) -> f64 {
        (self.domain_max - self.domain_min) / SECONDS_PER_DAY
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.visible_min && t <= self.visible_max
    }

    /// In month mode, pull a timestamp onto a month tick within tolerance.
    pub fn snap(&self, t: f64) -> f64 {
        if self.unit != TimeTickUnit::Months || self.ticks.is_empty() {
            return t;
        }
        let idx = self.ticks.partition_point(|&tick| tick < t);
        let nearest = [idx.wrapping_sub(1), idx]
            .into_iter()
            .filter_map(|i| self.ticks.get(i).copied())
            .min_by(|a, b| {
                (a - t)
                    .abs()
                    .partial_cmp(&(b - t).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        match nearest {
            Some(tick) if (tick - t).abs() <= MONTH_SNAP_TOLERANCE_DAYS * SECONDS_PER_DAY => tick,
            _ => t,
        }
    }

    /// Pixel offset of a timestamp. A zero-width visible span maps to the middle.
    pub fn map(&self, t: f64) -> f64 {
        let span = self.visible_max - self.visible_min;
        if span <= 0.0 {
            return self.width / 2.0;
        }
        (self.snap(t) - self.visible_min) / span * self.width
    }
}

fn time_ticks(visible_min: f64, visible_max: f64, unit: TimeTickUnit, tick_count: usize) -> Vec<f64> {
    let (Some(start), Some(end)) = (
        datetime::from_unix_seconds(visible_min),
        datetime::from_unix_seconds(visible_max.ceil()),
    ) else {
        return Vec::new();
    };

    let instants = match unit {
        TimeTickUnit::Seconds => return ticks::nice_ticks(visible_min, visible_max, tick_count),
        TimeTickUnit::Days(step) => ticks::day_ticks(start, end, step),
        TimeTickUnit::Months => ticks::month_ticks(start, end),
        TimeTickUnit::Quarters => ticks::quarter_ticks(start, end),
        TimeTickUnit::Years => ticks::year_ticks(start, end),
    };
    instants
        .into_iter()
        .map(datetime::to_unix_seconds)
        .filter(|t| *t >= visible_min && *t <= visible_max)
        .collect()
}

/// One band per calendar month overlapping the visible window. Parity is
/// counted from the month of `dataset_min`, so bands keep their shading while
/// the window pans.
fn month_bands(dataset_min: f64, visible_min: f64, visible_max: f64) -> Vec<MonthBand> {
    let (Some(first), Some(start), Some(end)) = (
        datetime::from_unix_seconds(dataset_min),
        datetime::from_unix_seconds(visible_min),
        datetime::from_unix_seconds(visible_max),
    ) else {
        return Vec::new();
    };
    let first_month = datetime::first_of_month(first.date());

    let mut bands = Vec::new();
    let mut month = datetime::first_of_month(start.date());
    while datetime::midnight(month) <= end {
        let Some(next) = datetime::add_months(month, 1) else {
            break;
        };
        let band_start = datetime::to_unix_seconds(datetime::midnight(month)).max(visible_min);
        let band_end = datetime::to_unix_seconds(datetime::midnight(next)).min(visible_max);
        if band_end > band_start {
            let parity = datetime::months_between(first_month, month).rem_euclid(2);
            bands.push(MonthBand {
                start: band_start,
                end: band_end,
                shaded: parity == 1,
            });
        }
        month = next;
    }
    bands
}

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Vertical axis transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YScaleKind {
    #[default]
    Linear,
    Log,
}

/// Vertical value scale. The rendered range is the tick range, so the outer
/// gridlines bound the plot exactly. Pixel 0 is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YScale {
    pub kind: YScaleKind,
    pub graph_min: f64,
    pub graph_max: f64,
    pub height: f64,
    pub ticks: Vec<f64>,
}

impl YScale {
    pub fn build(values: &[f64], kind: YScaleKind, height: f64, tick_count: usize) -> Self {
        let ticks = match kind {
            YScaleKind::Linear => match finite_extent(values) {
                Some((min, max)) => ticks::nice_ticks(min, max, tick_count),
                None => Vec::new(),
            },
            YScaleKind::Log => {
                let non_positive = values.iter().filter(|v| **v <= 0.0).count();
                if non_positive > 0 {
                    tracing::warn!(non_positive, "log scale given non-positive values; drawing them at the bottom edge");
                }
                let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
                match finite_extent(&positive) {
                    Some((min, max)) => ticks::log_ticks(min, max),
                    None => Vec::new(),
                }
            }
        };

        let graph_min = ticks.first().copied().unwrap_or(0.0);
        let graph_max = ticks.last().copied().unwrap_or(0.0);
        Self {
            kind,
            graph_min,
            graph_max,
            height,
            ticks,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.graph_min == self.graph_max
    }

    /// Distance above the bottom edge; increases with the value.
    pub fn offset_from_bottom(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            return self.height / 2.0;
        }
        let fraction = match self.kind {
            YScaleKind::Linear => (v - self.graph_min) / (self.graph_max - self.graph_min),
            YScaleKind::Log => {
                if v <= 0.0 {
                    return 0.0;
                }
                let lo = self.graph_min.log10();
                let hi = self.graph_max.log10();
                (v.log10() - lo) / (hi - lo)
            }
        };
        fraction * self.height
    }

    /// Pixel offset from the top edge.
    pub fn map(&self, v: f64) -> f64 {
        self.height - self.offset_from_bottom(v)
    }
}
