//! Derived metrics computed from the tail of a series.
//!
//! Every function returns `Unavailable` instead of a placeholder number
//! when the input cannot support the calculation.

use serde::Serialize;

use super::{Cadence, Derivation};
use crate::core::timeseries::TimeSeries;
use crate::error::Unavailable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

/// Output of a derivation: a scalar or a trend direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    Trend(Trend),
}

impl Metric {
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Trend(_) => None,
        }
    }

    pub fn as_trend(&self) -> Option<Trend> {
        match self {
            Metric::Trend(t) => Some(*t),
            Metric::Value(_) => None,
        }
    }
}

pub type Derived = Result<Metric, Unavailable>;

pub fn latest_value(series: &TimeSeries) -> Result<f64, Unavailable> {
    series.latest().map(|(value, _)| value)
}

/// latest - previous
pub fn absolute_change(series: &TimeSeries) -> Result<f64, Unavailable> {
    let (latest, previous) = last_two(series)?;
    finite(latest - previous)
}

/// (latest - previous) / previous * 100
pub fn percent_change(series: &TimeSeries) -> Result<f64, Unavailable> {
    let (latest, previous) = last_two(series)?;
    growth(latest, previous)
}

/// Growth versus the same period one year earlier.
pub fn year_over_year_growth(series: &TimeSeries, cadence: Cadence) -> Result<f64, Unavailable> {
    let periods = cadence
        .periods_per_year()
        .ok_or(Unavailable::UnsupportedCadence(cadence))?;

    let latest = series.nth_from_end(0)?;
    let year_ago = series.nth_from_end(periods)?;
    growth(latest, year_ago)
}

pub fn trend_direction(series: &TimeSeries) -> Result<Trend, Unavailable> {
    let (latest, previous) = last_two(series)?;
    let diff = finite(latest - previous)?;

    Ok(if diff > 0.0 {
        Trend::Rising
    } else if diff < 0.0 {
        Trend::Falling
    } else {
        Trend::Flat
    })
}

/// Applies `derivation` to `series`, multiplying scalar results by `scale`.
pub fn derive(series: &TimeSeries, derivation: Derivation, cadence: Cadence, scale: f64) -> Derived {
    let scaled = |value: f64| finite(value * scale).map(Metric::Value);

    match derivation {
        Derivation::LatestValue => latest_value(series).and_then(scaled),
        Derivation::AbsoluteChange => absolute_change(series).and_then(scaled),
        Derivation::PercentChange => percent_change(series).and_then(scaled),
        Derivation::YearOverYearGrowth => year_over_year_growth(series, cadence).and_then(scaled),
        Derivation::TrendDirection => trend_direction(series).map(Metric::Trend),
    }
}

fn last_two(series: &TimeSeries) -> Result<(f64, f64), Unavailable> {
    if series.len() < 2 {
        return Err(Unavailable::InsufficientHistory { needed: 2, available: series.len() });
    }
    Ok((series.nth_from_end(0)?, series.nth_from_end(1)?))
}

fn growth(current: f64, base: f64) -> Result<f64, Unavailable> {
    if base == 0.0 {
        return Err(Unavailable::DivisionByZero);
    }
    finite((current - base) / base * 100.0)
}

// Upstream values should always be finite, but a NaN must never reach a judge.
fn finite(value: f64) -> Result<f64, Unavailable> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Unavailable::MissingValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;
    use chrono::{Months, NaiveDate};

    fn monthly(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = start.checked_add_months(Months::new(i as u32)).unwrap();
                DataPoint::new(date.and_hms_opt(0, 0, 0).unwrap().and_utc(), *v)
            })
            .collect();
        TimeSeries::new("TEST", points)
    }

    #[test]
    fn test_changes_need_two_points() {
        for series in [monthly(&[]), monthly(&[100.0])] {
            assert!(matches!(absolute_change(&series), Err(Unavailable::InsufficientHistory { .. })));
            assert!(matches!(percent_change(&series), Err(Unavailable::InsufficientHistory { .. })));
            assert!(trend_direction(&series).is_err());
        }
    }

    #[test]
    fn test_absolute_and_percent_change() {
        let series = monthly(&[200.0, 210.0]);
        assert_eq!(absolute_change(&series).unwrap(), 10.0);
        assert!((percent_change(&series).unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_zero_base() {
        let series = monthly(&[0.0, 5.0]);
        assert_eq!(percent_change(&series), Err(Unavailable::DivisionByZero));
        // absolute change is still defined
        assert_eq!(absolute_change(&series).unwrap(), 5.0);
    }

    #[test]
    fn test_yoy_monthly_needs_thirteen_points() {
        let mut values: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let twelve = monthly(&values);
        assert!(matches!(
            year_over_year_growth(&twelve, Cadence::Monthly),
            Err(Unavailable::InsufficientHistory { needed: 13, available: 12 })
        ));

        values.push(103.0);
        let thirteen = monthly(&values);
        // 103 vs 100 twelve months earlier
        let yoy = year_over_year_growth(&thirteen, Cadence::Monthly).unwrap();
        assert!((yoy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_yoy_quarterly() {
        let series = monthly(&[200.0, 201.0, 202.0, 203.0, 210.0]);
        let yoy = year_over_year_growth(&series, Cadence::Quarterly).unwrap();
        assert!((yoy - 5.0).abs() < 1e-9);

        let short = monthly(&[200.0, 201.0, 202.0, 203.0]);
        assert!(year_over_year_growth(&short, Cadence::Quarterly).is_err());
    }

    #[test]
    fn test_yoy_daily_unsupported() {
        let series = monthly(&[1.0; 400]);
        assert_eq!(
            year_over_year_growth(&series, Cadence::Daily),
            Err(Unavailable::UnsupportedCadence(Cadence::Daily))
        );
    }

    #[test]
    fn test_yoy_gap_at_base() {
        let mut points: Vec<DataPoint> = monthly(&[100.0; 13]).points().to_vec();
        points[0].value = None;
        let series = TimeSeries::new("TEST", points);
        assert_eq!(year_over_year_growth(&series, Cadence::Monthly), Err(Unavailable::MissingValue));
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(trend_direction(&monthly(&[1.0, 2.0])).unwrap(), Trend::Rising);
        assert_eq!(trend_direction(&monthly(&[2.0, 1.0])).unwrap(), Trend::Falling);
        assert_eq!(trend_direction(&monthly(&[2.0, 2.0])).unwrap(), Trend::Flat);
    }

    #[test]
    fn test_derive_applies_scale() {
        // PAYEMS is reported in thousands of persons
        let series = monthly(&[158_000.0, 158_180.0]);
        let metric = derive(&series, Derivation::AbsoluteChange, Cadence::Monthly, 1000.0).unwrap();
        assert!((metric.as_value().unwrap() - 180_000.0).abs() < 1e-3);

        let trend = derive(&series, Derivation::TrendDirection, Cadence::Monthly, 1000.0).unwrap();
        assert_eq!(trend.as_trend(), Some(Trend::Rising));
    }
}
