pub mod compare;
pub mod dataset;
pub mod rolling_stats;
pub mod state;
