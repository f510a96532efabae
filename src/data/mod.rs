pub mod datetime;
pub mod entry;
pub mod range_filter;
