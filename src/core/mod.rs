pub mod accessor;
pub mod orchestrator;
pub mod rate_limiter;
pub mod timeseries;
