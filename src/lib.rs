pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod indicators;
pub mod models;
pub mod report;

use std::future::Future;
use std::time::Duration;

use crate::analysis::scorecard::Scorecard;
use crate::config::Config;
use crate::core::accessor::SeriesAccessor;
use crate::core::rate_limiter::RateLimiter;
use crate::error::{AppError, Result};
use crate::fetcher::fred::FredFetcher;
use crate::indicators::registry::{Profile, Registry};

/// Resolves the configured profile and builds a FRED-backed accessor.
/// Any problem here is a configuration error and no request is made.
pub fn setup(config: &Config) -> Result<(&'static Profile, SeriesAccessor)> {
    let profile = Registry::load(&config.profile).map_err(AppError::Config)?;

    let fetcher = FredFetcher::new(config)?;
    let (min_ms, max_ms) = config.pacing_ms;
    let accessor = SeriesAccessor::new(
        Box::new(fetcher),
        config.fetch_timeout,
        RateLimiter::new(min_ms, max_ms),
    );

    Ok((profile, accessor))
}

/// One refresh of the configured profile.
pub async fn refresh(profile: &Profile, accessor: &SeriesAccessor) -> Scorecard {
    crate::core::orchestrator::run_scorecard(profile, accessor).await
}

/// Refreshes on every `interval` tick until `shutdown` resolves, handing
/// each scorecard to `on_card`. `shutdown` is polled for the whole loop,
/// including while a refresh is in flight, so it is never missed.
pub async fn refresh_until<S, F>(
    profile: &Profile,
    accessor: &SeriesAccessor,
    interval: Duration,
    shutdown: S,
    mut on_card: F,
) -> Result<usize>
where
    S: Future,
    F: FnMut(&Scorecard) -> Result<()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    let mut completed = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            card = refresh(profile, accessor) => {
                on_card(&card)?;
                completed += 1;
            }
        }
    }

    Ok(completed)
}
