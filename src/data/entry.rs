use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One timestamped observation within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub series_id: u64,
}

impl Entry {
    pub fn new(timestamp: NaiveDateTime, value: f64, series_id: u64) -> Self {
        Self {
            timestamp,
            value,
            notes: None,
            series_id,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Calendar date the entry was logged on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Unix seconds, treating the wall-clock timestamp as UTC.
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.and_utc().timestamp() as f64
    }
}

/// How a series' values are interpreted when formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    #[default]
    Number,
    DurationSeconds,
}

/// A named series. Display configuration belongs to the view layer and is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub kind: SeriesKind,
    #[serde(default)]
    pub display: serde_json::Value,
}

impl Series {
    pub fn new(id: u64, name: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            display: serde_json::Value::Null,
        }
    }

    /// Entries belonging to this series, in their original order.
    pub fn entries_in<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|e| e.series_id == self.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_kind_uses_kebab_case_tags() {
        let json = serde_json::to_string(&SeriesKind::DurationSeconds).unwrap();
        assert_eq!(json, "\"duration-seconds\"");
        let kind: SeriesKind = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(kind, SeriesKind::Number);
    }

    #[test]
    fn entries_in_selects_by_series_id() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let entries = vec![
            Entry::new(ts, 1.0, 1),
            Entry::new(ts, 2.0, 2),
            Entry::new(ts, 3.0, 1).with_notes("evening"),
        ];
        let series = Series::new(1, "Weight", SeriesKind::Number);
        let picked = series.entries_in(&entries);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].notes.as_deref(), Some("evening"));
    }
}
