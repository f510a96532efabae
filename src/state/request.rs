use serde::{Deserialize, Serialize};

use crate::data::range_filter::RelativeRange;
use crate::error::{Error, Result};
use crate::processing::aggregation::Period;
use crate::processing::statistics::Statistic;

/// What the view layer wants charted from a series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawChartRequest", rename_all = "camelCase")]
pub struct ChartRequest {
    pub period: Period,
    pub statistic: Statistic,
    pub range: RelativeRange,
    /// Rolling window over the aggregated buckets.
    pub window: Option<usize>,
}

impl ChartRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wire shape: `range` is a token and `customDays` accompanies `"custom"`.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawChartRequest {
    period: Period,
    statistic: Statistic,
    range: String,
    custom_days: Option<u32>,
    window: Option<usize>,
}

impl Default for RawChartRequest {
    fn default() -> Self {
        Self {
            period: Period::None,
            statistic: Statistic::Mean,
            range: "all".to_string(),
            custom_days: None,
            window: None,
        }
    }
}

impl TryFrom<RawChartRequest> for ChartRequest {
    type Error = Error;

    fn try_from(raw: RawChartRequest) -> Result<Self> {
        let range = if raw.range.trim().eq_ignore_ascii_case("custom") {
            let days = raw.custom_days.ok_or_else(|| Error::InvalidRange(raw.range.clone()))?;
            RelativeRange::Custom(days)
        } else {
            raw.range.parse()?
        };
        Ok(Self {
            period: raw.period,
            statistic: raw.statistic,
            range,
            window: raw.window,
        })
    }
}
