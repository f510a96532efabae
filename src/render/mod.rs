pub mod labels;
pub mod path;
pub mod scale;
pub mod ticks;
pub mod viewport;
