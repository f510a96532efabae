//! Time-series analytics and chart geometry for a personal tracking dashboard.
//!
//! Entries flow through [`data::range_filter`], optionally into
//! [`processing::aggregation`] and [`processing::running`], and end up as
//! scales, pixel points and a line path built by [`chart`]. Nothing here does
//! I/O; every function is synchronous and deterministic, and the only mutable
//! state is the pan position inside [`render::viewport::ViewportController`].

pub mod chart;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod state;

pub use chart::{Chart, ChartFrame};
pub use data::entry::{Entry, Series, SeriesKind};
pub use data::range_filter::RelativeRange;
pub use error::{Error, Result};
pub use processing::aggregation::{aggregate, AggregatedSeries, Period};
pub use processing::running::{running_metric, SeriesPoint};
pub use processing::statistics::{Statistic, StatsResult};
pub use render::scale::{XScale, YScale, YScaleKind};
pub use render::viewport::{ViewWindow, ViewportController};
pub use state::chart_config::ChartConfig;
pub use state::request::ChartRequest;
