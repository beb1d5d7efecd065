use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::rate_limiter::RateLimiter;
use super::timeseries::TimeSeries;
use crate::error::Unavailable;
use crate::fetcher::DataSource;
use crate::indicators::Cadence;

/// Retrieves series from a `DataSource`, one bounded request each.
///
/// Every failure (transport, timeout, unknown id, empty body) comes back
/// as `Unavailable::SeriesUnavailable` so the caller can degrade a single
/// row instead of aborting the refresh.
pub struct SeriesAccessor {
    source: Box<dyn DataSource>,
    timeout: Duration,
    limiter: RateLimiter,
}

impl SeriesAccessor {
    pub fn new(source: Box<dyn DataSource>, timeout: Duration, limiter: RateLimiter) -> Self {
        Self { source, timeout, limiter }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Paces, then fetches `series_id`. Daily series drop their gap
    /// observations (holidays); other cadences keep them for positional
    /// lookups.
    pub async fn fetch(&self, series_id: &str, cadence: Cadence) -> Result<TimeSeries, Unavailable> {
        self.limiter.wait().await;

        let points = match timeout(self.timeout, self.source.fetch_data(series_id)).await {
            Ok(Ok(points)) => points,
            Ok(Err(e)) => {
                warn!(series_id, source = self.source.name(), "fetch failed: {e}");
                return Err(Unavailable::SeriesUnavailable(e.to_string()));
            }
            Err(_) => {
                warn!(series_id, source = self.source.name(), "fetch timed out after {:?}", self.timeout);
                return Err(Unavailable::SeriesUnavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
        };

        let mut series = TimeSeries::new(series_id, points);
        if cadence == Cadence::Daily {
            series = series.without_gaps();
        }

        if series.is_empty() {
            warn!(series_id, "series has no observations");
            return Err(Unavailable::SeriesUnavailable(format!("{} returned no observations", series_id)));
        }

        debug!(series_id = series.series_id(), points = series.len(), "series fetched");
        Ok(series)
    }
}
