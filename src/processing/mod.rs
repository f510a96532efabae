pub mod aggregation;
pub mod running;
pub mod statistics;
