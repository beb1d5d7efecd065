use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::accessor::SeriesAccessor;
use super::timeseries::TimeSeries;
use crate::analysis::scorecard::{JudgedRow, Scorecard};
use crate::error::Unavailable;
use crate::indicators::derive::{self, Derived};
use crate::indicators::registry::Profile;
use crate::indicators::{Derivation, IndicatorDefinition, SeriesSpec};

/// Series fetched for one refresh, keyed by series id.
pub type SeriesBatch = HashMap<String, Result<TimeSeries, Unavailable>>;

/// Runs one refresh: fetch every series the profile needs, then derive,
/// judge and aggregate. A failed fetch only degrades the rows that read it.
pub async fn run_scorecard(profile: &Profile, accessor: &SeriesAccessor) -> Scorecard {
    info!(
        "Orchestrator: Refreshing '{}' ({} indicators, source: {})",
        profile.slug,
        profile.indicators.len(),
        accessor.source_name()
    );

    let batch = fetch_batch(profile, accessor).await;
    let card = score(profile, &batch);

    info!(
        "Orchestrator: {} (domestic {}, foreign {}, neutral {}, no data {})",
        card.label, card.tally.domestic, card.tally.foreign, card.tally.neutral, card.tally.no_data
    );
    card
}

/// Fetches each distinct series once, in first-use order. All fetches
/// finish before anything is judged.
pub async fn fetch_batch(profile: &Profile, accessor: &SeriesAccessor) -> SeriesBatch {
    let mut batch = SeriesBatch::new();
    let (mut ok, mut failed) = (0usize, 0usize);

    for spec in distinct_series(&profile.indicators) {
        let result = accessor.fetch(&spec.series_id, spec.cadence).await;
        match &result {
            Ok(series) => {
                ok += 1;
                info!("  > {} ({} points)", spec.series_id, series.len());
            }
            Err(reason) => {
                failed += 1;
                warn!("  > {} unavailable: {}", spec.series_id, reason);
            }
        }
        batch.insert(spec.series_id.clone(), result);
    }

    info!("Orchestrator: fetched {} series ({} failed)", ok + failed, failed);
    batch
}

/// Judges every indicator of `profile` against an already-fetched batch.
pub fn score(profile: &Profile, batch: &SeriesBatch) -> Scorecard {
    let rows = profile
        .indicators
        .iter()
        .map(|definition| judge_indicator(definition, profile, batch))
        .collect();

    Scorecard::aggregate(&profile.slug, profile.pair.clone(), rows)
}

fn judge_indicator(definition: &IndicatorDefinition, profile: &Profile, batch: &SeriesBatch) -> JudgedRow {
    let derive_from = |spec: &SeriesSpec, derivation: Derivation, scale: f64| -> Derived {
        let series = lookup(batch, &spec.series_id)?;
        derive::derive(series, derivation, spec.cadence, scale)
    };

    let domestic = derive_from(&definition.domestic, definition.derivation, definition.scale);
    let foreign = definition
        .foreign
        .as_ref()
        .map(|spec| derive_from(spec, definition.derivation, definition.scale));
    // forward signals are compared with raw levels, so no scale
    let forward = definition
        .forward
        .as_ref()
        .map(|spec| derive_from(spec, Derivation::LatestValue, 1.0));

    let as_of = as_of(batch, &definition.domestic.series_id);

    JudgedRow::judge(definition, &profile.pair, domestic, foreign, forward, as_of)
}

fn lookup<'a>(batch: &'a SeriesBatch, series_id: &str) -> Result<&'a TimeSeries, Unavailable> {
    match batch.get(series_id) {
        Some(Ok(series)) => Ok(series),
        Some(Err(reason)) => Err(reason.clone()),
        None => Err(Unavailable::SeriesUnavailable(format!("{} was not fetched", series_id))),
    }
}

fn as_of(batch: &SeriesBatch, series_id: &str) -> Option<DateTime<Utc>> {
    batch
        .get(series_id)
        .and_then(|result| result.as_ref().ok())
        .and_then(TimeSeries::last_timestamp)
}

fn distinct_series(indicators: &[IndicatorDefinition]) -> Vec<&SeriesSpec> {
    let mut seen: Vec<&SeriesSpec> = Vec::new();
    for definition in indicators {
        for spec in definition.series() {
            if !seen.iter().any(|s| s.series_id == spec.series_id) {
                seen.push(spec);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::judge::Verdict;
    use crate::indicators::registry::Registry;

    #[test]
    fn test_distinct_series_first_use_order() {
        let profile = Registry::get_profile("eurusd").unwrap();
        let ids: Vec<&str> = distinct_series(&profile.indicators)
            .into_iter()
            .map(|s| s.series_id.as_str())
            .collect();

        assert_eq!(ids[0], "DFEDTARU");
        assert_eq!(ids.iter().filter(|id| **id == "DGS10").count(), 1);
        assert_eq!(ids.iter().filter(|id| **id == "IRLTLT01DEM156N").count(), 1);
    }

    #[test]
    fn test_score_empty_batch_is_all_no_data() {
        let profile = Registry::get_profile("eurusd-events").unwrap();
        let card = score(profile, &SeriesBatch::new());

        assert_eq!(card.rows.len(), profile.indicators.len());
        assert!(card.rows.iter().all(|r| r.verdict == Verdict::NoData));
        assert!(card.rows.iter().all(|r| r.as_of.is_none()));
        assert_eq!(card.tally.no_data, profile.indicators.len());
        assert_eq!(card.net_score, 0);
    }
}
