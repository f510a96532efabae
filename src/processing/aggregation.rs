use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::datetime;
use crate::data::entry::Entry;
use crate::error::Error;
use crate::processing::statistics::{sorted_copy, Statistic, StatsResult};

/// Calendar granularity for bucketing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// No bucketing; entries are charted raw.
    #[default]
    None,
    Day,
    /// ISO weeks, starting on Monday.
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Start date of the period containing `date`, or `None` for [`Period::None`].
    pub fn bucket_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::None => None,
            Period::Day => Some(date),
            Period::Week => Some(datetime::start_of_week(date)),
            Period::Month => Some(datetime::first_of_month(date)),
            Period::Quarter => Some(datetime::first_of_quarter(date)),
            Period::Year => Some(datetime::first_of_year(date)),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Period::None => "none",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Period::None),
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

/// Per-bucket statistics as index-aligned columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    /// Bucket keys as `YYYY-MM-DD`, ascending.
    pub labels: Vec<String>,
    /// The same keys as dates.
    pub starts: Vec<NaiveDate>,
    pub mean: Vec<f64>,
    pub day_mean: Vec<f64>,
    pub sum: Vec<f64>,
    pub count: Vec<f64>,
    pub min: Vec<f64>,
    pub q1: Vec<f64>,
    pub median: Vec<f64>,
    pub q3: Vec<f64>,
    pub max: Vec<f64>,
    pub first: Vec<f64>,
    pub last: Vec<f64>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Per-bucket values of one statistic; an unknown statistic is all zeros.
    pub fn column(&self, statistic: Statistic) -> Cow<'_, [f64]> {
        let values = match statistic {
            Statistic::Mean => &self.mean,
            Statistic::DayMean => &self.day_mean,
            Statistic::Sum => &self.sum,
            Statistic::Count => &self.count,
            Statistic::Min => &self.min,
            Statistic::Q1 => &self.q1,
            Statistic::Median => &self.median,
            Statistic::Q3 => &self.q3,
            Statistic::Max => &self.max,
            Statistic::First => &self.first,
            Statistic::Last => &self.last,
            Statistic::Unknown => return Cow::Owned(vec![0.0; self.len()]),
        };
        Cow::Borrowed(values)
    }

    fn push(&mut self, start: NaiveDate, stats: &StatsResult) {
        self.labels.push(datetime::format_date_key(start));
        self.starts.push(start);
        self.mean.push(stats.mean);
        self.day_mean.push(stats.day_mean);
        self.sum.push(stats.sum);
        self.count.push(stats.count);
        self.min.push(stats.min);
        self.q1.push(stats.q1);
        self.median.push(stats.median);
        self.q3.push(stats.q3);
        self.max.push(stats.max);
        self.first.push(stats.first);
        self.last.push(stats.last);
    }
}

/// Group entries into calendar buckets and summarize each one.
///
/// Within a bucket, entries keep the order they were given in; that order
/// supplies `first` and `last`.
pub fn aggregate<'a, I>(entries: I, period: Period) -> AggregatedSeries
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut out = AggregatedSeries::default();
    if period == Period::None {
        return out;
    }

    let mut buckets: BTreeMap<NaiveDate, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        if let Some(start) = period.bucket_start(entry.date()) {
            buckets.entry(start).or_default().push(entry);
        }
    }

    for (start, bucket) in &buckets {
        let original: Vec<f64> = bucket.iter().map(|e| e.value).collect();
        let sorted = sorted_copy(&original);
        let stats = StatsResult::compute(&sorted, Some(&original), bucket.iter().copied());
        out.push(*start, &stats);
    }

    tracing::debug!(%period, buckets = out.len(), "aggregated entries");
    out
}
