use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// One observation as returned by a data source. `value` is `None` for a
/// reported gap (FRED's ".").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value: Some(value) }
    }

    pub fn gap(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, value: None }
    }
}
