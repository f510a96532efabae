use serde::{Deserialize, Serialize};

use crate::processing::statistics::{sorted_copy, Statistic, StatsResult};

/// A chart point; `x` is a label, a date or a pixel coordinate depending on the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<X> {
    pub x: X,
    pub y: f64,
}

impl<X> SeriesPoint<X> {
    pub fn new(x: X, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rolling statistic over a sliding window of `window` consecutive values.
///
/// Each window yields one point labelled with the label at its middle index
/// `i + (window - 1) / 2`, so there are exactly `n - window + 1` points.
/// Fewer values than `window`, or a window under 2, gives no points. When the
/// label and value slices differ in length the shorter one bounds `n`.
pub fn running_metric<X: Clone>(
    values: &[f64],
    labels: &[X],
    statistic: Statistic,
    window: usize,
) -> Vec<SeriesPoint<X>> {
    let n = values.len().min(labels.len());
    if window < 2 || n < window {
        return Vec::new();
    }

    let half = (window - 1) / 2;
    values[..n]
        .windows(window)
        .enumerate()
        .map(|(i, slice)| {
            let sorted = sorted_copy(slice);
            let stats = StatsResult::compute(&sorted, Some(slice), std::iter::empty());
            SeriesPoint::new(labels[i + half].clone(), stats.get(statistic))
        })
        .collect()
}
