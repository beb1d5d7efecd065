use async_trait::async_trait;
use anyhow::Result;
use crate::models::DataPoint;

pub mod fred;

/// Upstream time-series source addressed by opaque series ids.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches the whole series. An unknown id, an empty result or a
    /// transport failure is an error.
    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>>;
}
