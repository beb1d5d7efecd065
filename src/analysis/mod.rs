pub mod judge;
pub mod scorecard;
