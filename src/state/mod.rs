pub mod chart_config;
pub mod request;
