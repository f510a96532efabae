use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::entry::Entry;
use crate::error::Error;

/// Summary statistics for a set of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub mean: f64,
    pub day_mean: f64,
    pub sum: f64,
    pub count: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub first: f64,
    pub last: f64,
}

impl StatsResult {
    /// Compute statistics from values already sorted ascending.
    ///
    /// `original` is the same set in chronological order and supplies
    /// `first`/`last`; without it the sorted extremes are used. `entries` are
    /// only consulted to count distinct calendar days for `day_mean`.
    pub fn compute<'a, I>(sorted: &[f64], original: Option<&[f64]>, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        if sorted.is_empty() {
            return Self::default();
        }

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let days: HashSet<_> = entries.into_iter().map(Entry::date).collect();
        let day_mean = if days.is_empty() {
            0.0
        } else {
            sum / days.len() as f64
        };

        let (first, last) = match original {
            Some(order) if !order.is_empty() => (order[0], order[order.len() - 1]),
            _ => (sorted[0], sorted[count - 1]),
        };

        Self {
            mean: sum / count as f64,
            day_mean,
            sum,
            count: count as f64,
            min: sorted[0],
            q1: quantile(sorted, 0.25),
            median: quantile(sorted, 0.5),
            q3: quantile(sorted, 0.75),
            max: sorted[count - 1],
            first,
            last,
        }
    }

    /// Statistics over values in chronological order, with no day information.
    pub fn from_values(values: &[f64]) -> Self {
        let sorted = sorted_copy(values);
        Self::compute(&sorted, Some(values), std::iter::empty())
    }

    /// Statistics over entries in their given order.
    pub fn from_entries<'a>(entries: &[&'a Entry]) -> Self {
        let original: Vec<f64> = entries.iter().map(|e| e.value).collect();
        let sorted = sorted_copy(&original);
        Self::compute(&sorted, Some(&original), entries.iter().copied())
    }

    pub fn get(&self, statistic: Statistic) -> f64 {
        (STATISTIC_TABLE[statistic as usize].2)(self)
    }

    /// Look a statistic up by its string id. Unknown ids read as 0.
    pub fn get_by_id(&self, id: &str) -> f64 {
        Statistic::from_id(id).map_or(0.0, |s| self.get(s))
    }
}

/// Ascending copy; NaN sorts as equal so the order stays total.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Linear-interpolation quantile over an ascending slice.
/// Position is `(n - 1) * q`, interpolated between the neighbouring ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    let value = sorted[lo] + (sorted[hi] - sorted[lo]) * frac;
    // Rounding must not push the result outside its two ranks.
    value.max(sorted[lo]).min(sorted[hi])
}

/// One field of [`StatsResult`].
///
/// Deserializing never fails: ids outside the table decode to
/// [`Statistic::Unknown`], which reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Statistic {
    #[default]
    Mean,
    DayMean,
    Sum,
    Count,
    Min,
    Q1,
    Median,
    Q3,
    Max,
    First,
    Last,
    Unknown,
}

type Accessor = fn(&StatsResult) -> f64;

/// Indexed by `Statistic as usize`.
const STATISTIC_TABLE: [(Statistic, &str, Accessor); 12] = [
    (Statistic::Mean, "mean", |s| s.mean),
    (Statistic::DayMean, "dayMean", |s| s.day_mean),
    (Statistic::Sum, "sum", |s| s.sum),
    (Statistic::Count, "count", |s| s.count),
    (Statistic::Min, "min", |s| s.min),
    (Statistic::Q1, "q1", |s| s.q1),
    (Statistic::Median, "median", |s| s.median),
    (Statistic::Q3, "q3", |s| s.q3),
    (Statistic::Max, "max", |s| s.max),
    (Statistic::First, "first", |s| s.first),
    (Statistic::Last, "last", |s| s.last),
    (Statistic::Unknown, "unknown", |_| 0.0),
];

impl Statistic {
    /// Every statistic the engine computes.
    pub const ALL: [Statistic; 11] = [
        Statistic::Mean,
        Statistic::DayMean,
        Statistic::Sum,
        Statistic::Count,
        Statistic::Min,
        Statistic::Q1,
        Statistic::Median,
        Statistic::Q3,
        Statistic::Max,
        Statistic::First,
        Statistic::Last,
    ];

    pub fn id(&self) -> &'static str {
        STATISTIC_TABLE[*self as usize].1
    }

    pub fn from_id(id: &str) -> Option<Self> {
        STATISTIC_TABLE
            .iter()
            .find(|(_, name, _)| *name == id)
            .map(|(stat, _, _)| *stat)
    }

}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::from_id(s.trim()).ok_or_else(|| Error::InvalidStatistic(s.to_string()))
    }
}

impl From<String> for Statistic {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "statistic reads as 0");
            Statistic::Unknown
        })
    }
}

impl From<Statistic> for String {
    fn from(stat: Statistic) -> Self {
        stat.id().to_string()
    }
}
