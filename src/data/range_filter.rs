use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::data::entry::Entry;
use crate::error::Error;

/// A window of recent history, relative to a reference "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RelativeRange {
    #[default]
    All,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    /// The last N days.
    Custom(u32),
}

impl RelativeRange {
    /// Earliest instant still inside the range, or `None` when nothing is cut.
    ///
    /// Months, quarters and years step back by calendar months, clamping to the
    /// end of shorter months (Mar 31 minus one month is Feb 28/29).
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match *self {
            RelativeRange::All => None,
            RelativeRange::Day => now.checked_sub_days(Days::new(1)),
            RelativeRange::Week => now.checked_sub_days(Days::new(7)),
            RelativeRange::Month => now.checked_sub_months(Months::new(1)),
            RelativeRange::Quarter => now.checked_sub_months(Months::new(3)),
            RelativeRange::Year => now.checked_sub_months(Months::new(12)),
            RelativeRange::Custom(days) => now.checked_sub_days(Days::new(u64::from(days))),
        }
    }

    /// Keep entries at or after the cutoff, preserving their order.
    pub fn filter<'a>(&self, entries: &'a [Entry], now: NaiveDateTime) -> Vec<&'a Entry> {
        match self.cutoff(now) {
            Some(cutoff) => {
                let kept: Vec<&Entry> = entries.iter().filter(|e| e.timestamp >= cutoff).collect();
                tracing::trace!(range = %self, %cutoff, kept = kept.len(), total = entries.len(), "filtered entries");
                kept
            }
            None => entries.iter().collect(),
        }
    }
}

impl fmt::Display for RelativeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeRange::All => f.write_str("all"),
            RelativeRange::Day => f.write_str("day"),
            RelativeRange::Week => f.write_str("week"),
            RelativeRange::Month => f.write_str("month"),
            RelativeRange::Quarter => f.write_str("quarter"),
            RelativeRange::Year => f.write_str("year"),
            RelativeRange::Custom(days) => write!(f, "custom:{days}"),
        }
    }
}

impl FromStr for RelativeRange {
    type Err = Error;

    /// Accepts `all`, `day`, `week`, `month`, `quarter`, `year` and `custom:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        let range = match token.as_str() {
            "all" | "" => RelativeRange::All,
            "day" => RelativeRange::Day,
            "week" => RelativeRange::Week,
            "month" => RelativeRange::Month,
            "quarter" => RelativeRange::Quarter,
            "year" => RelativeRange::Year,
            other => {
                let days = other
                    .strip_prefix("custom:")
                    .and_then(|n| n.trim().parse::<u32>().ok())
                    .ok_or_else(|| Error::InvalidRange(s.to_string()))?;
                RelativeRange::Custom(days)
            }
        };
        Ok(range)
    }
}

impl TryFrom<String> for RelativeRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RelativeRange> for String {
    fn from(range: RelativeRange) -> Self {
        range.to_string()
    }
}
