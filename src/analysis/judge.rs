use serde::Serialize;

use crate::indicators::derive::{Derived, Metric, Trend};
use crate::indicators::{Judgment, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    StrongDomestic,
    StrongForeign,
    Tie,
    Neutral,
    NoData,
}

impl Verdict {
    fn favoring(region: Region) -> Verdict {
        match region {
            Region::Domestic => Verdict::StrongDomestic,
            Region::Foreign => Verdict::StrongForeign,
        }
    }

    /// The same verdict seen from the other side of the pair.
    pub fn swapped(&self) -> Verdict {
        match self {
            Verdict::StrongDomestic => Verdict::StrongForeign,
            Verdict::StrongForeign => Verdict::StrongDomestic,
            other => *other,
        }
    }
}

/// Metrics handed to a judge. `foreign` and `forward` are `None` when the
/// indicator does not use that slot.
#[derive(Debug, Clone, Copy)]
pub struct JudgeInputs<'a> {
    pub domestic: &'a Derived,
    pub foreign: Option<&'a Derived>,
    pub forward: Option<&'a Derived>,
}

/// Applies `judgment` to the inputs. Any unavailable (or missing) input
/// the rule needs yields `NoData`.
pub fn judge(judgment: &Judgment, inputs: JudgeInputs<'_>) -> Verdict {
    match *judgment {
        Judgment::HigherIsBetter { threshold } => match scalar_pair(inputs) {
            Some((d, f)) => higher_is_better(d, f, threshold),
            None => Verdict::NoData,
        },
        Judgment::LowerIsBetter { threshold } => match scalar_pair(inputs) {
            Some((d, f)) => lower_is_better(d, f, threshold),
            None => Verdict::NoData,
        },
        Judgment::AbsoluteCutoff { upper, lower, high_favors } => match scalar(inputs.domestic) {
            Some(value) => absolute_cutoff(value, upper, lower, high_favors),
            None => Verdict::NoData,
        },
        Judgment::TrendComparison => {
            match (trend(inputs.domestic), inputs.foreign.and_then(trend)) {
                (Some(d), Some(f)) => trend_comparison(d, f),
                _ => Verdict::NoData,
            }
        }
        Judgment::ForwardLookingSpread { threshold, override_threshold } => {
            match (scalar_pair(inputs), inputs.forward.and_then(scalar)) {
                (Some((d, f)), Some(forward)) => {
                    forward_looking_spread(d, f, forward, threshold, override_threshold)
                }
                _ => Verdict::NoData,
            }
        }
    }
}

pub fn higher_is_better(domestic: f64, foreign: f64, threshold: f64) -> Verdict {
    let diff = domestic - foreign;
    if diff > threshold {
        Verdict::StrongDomestic
    } else if diff < -threshold {
        Verdict::StrongForeign
    } else {
        Verdict::Tie
    }
}

pub fn lower_is_better(domestic: f64, foreign: f64, threshold: f64) -> Verdict {
    // lower wins: flip the sign of the difference
    higher_is_better(-domestic, -foreign, threshold)
}

pub fn absolute_cutoff(value: f64, upper: f64, lower: f64, high_favors: Region) -> Verdict {
    if value > upper {
        Verdict::favoring(high_favors)
    } else if value < lower {
        Verdict::favoring(high_favors.other())
    } else {
        Verdict::Neutral
    }
}

pub fn trend_comparison(domestic: Trend, foreign: Trend) -> Verdict {
    match (domestic, foreign) {
        (Trend::Rising, Trend::Falling) => Verdict::StrongDomestic,
        (Trend::Falling, Trend::Rising) => Verdict::StrongForeign,
        (Trend::Rising, Trend::Rising) | (Trend::Falling, Trend::Falling) => Verdict::Tie,
        _ => Verdict::Neutral,
    }
}

/// Level comparison overridden by a forward-looking rate.
///
/// `forward - domestic` below `-override_threshold` means the market expects
/// the domestic level to fall toward the foreign one; above it, to rise.
/// When that expected move closes the gap behind a naive verdict, the
/// advantage is already priced in and the verdict is `Neutral`.
pub fn forward_looking_spread(
    domestic: f64,
    foreign: f64,
    forward: f64,
    threshold: f64,
    override_threshold: f64,
) -> Verdict {
    let naive = higher_is_better(domestic, foreign, threshold);
    let spread = forward - domestic;

    match naive {
        Verdict::StrongDomestic if spread < -override_threshold => Verdict::Neutral,
        Verdict::StrongForeign if spread > override_threshold => Verdict::Neutral,
        other => other,
    }
}

fn scalar(metric: &Derived) -> Option<f64> {
    metric.as_ref().ok().and_then(Metric::as_value)
}

fn trend(metric: &Derived) -> Option<Trend> {
    metric.as_ref().ok().and_then(Metric::as_trend)
}

fn scalar_pair(inputs: JudgeInputs<'_>) -> Option<(f64, f64)> {
    Some((scalar(inputs.domestic)?, scalar(inputs.foreign?)?))
}
