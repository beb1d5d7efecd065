use serde::Serialize;

use self::derive::Metric;

pub mod derive;
pub mod registry;

/// Natural reporting frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Cadence {
    /// Number of observations back to the same period one year earlier.
    /// Daily series skip holidays, so there is no positional offset.
    pub fn periods_per_year(&self) -> Option<usize> {
        match self {
            Cadence::Daily => None,
            Cadence::Weekly => Some(52),
            Cadence::Monthly => Some(12),
            Cadence::Quarterly => Some(4),
        }
    }
}

/// The two sides of a comparison. Domestic is the pair's quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Domestic,
    Foreign,
}

impl Region {
    pub fn other(&self) -> Region {
        match self {
            Region::Domestic => Region::Foreign,
            Region::Foreign => Region::Domestic,
        }
    }
}

/// How a raw series is reduced to a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    LatestValue,
    AbsoluteChange,
    PercentChange,
    YearOverYearGrowth,
    TrendDirection,
}

/// Threshold rule that turns metrics into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Judgment {
    HigherIsBetter { threshold: f64 },
    LowerIsBetter { threshold: f64 },
    /// Single region. A reading above `upper` favors `high_favors`, below
    /// `lower` favors the other region, anything in between is neutral.
    AbsoluteCutoff { upper: f64, lower: f64, high_favors: Region },
    TrendComparison,
    /// Level comparison that a forward-looking rate can override.
    ForwardLookingSpread { threshold: f64, override_threshold: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub series_id: String,
    pub cadence: Cadence,
}

/// Defines how the derived value should be formatted for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitType {
    /// Percentage level, e.g. a policy rate (5.5 -> "5.50%")
    Percent,
    /// Percentage change (0.3 -> "+0.30%")
    PercentChange,
    /// Headcount or other count (180000 -> "180,000")
    Count,
    /// Signed count change (-35000 -> "-35,000")
    CountChange,
    /// Rising / Falling / Flat
    Trend,
}

impl UnitType {
    pub fn format(&self, metric: &Metric) -> String {
        match (self, metric) {
            (_, Metric::Trend(trend)) => format!("{:?}", trend),
            (UnitType::Percent, Metric::Value(v)) => format!("{:.2}%", v),
            (UnitType::PercentChange, Metric::Value(v)) => format!("{:+.2}%", v),
            (UnitType::Count, Metric::Value(v)) => group_thousands(*v, false),
            (UnitType::CountChange, Metric::Value(v)) => group_thousands(*v, true),
            (UnitType::Trend, Metric::Value(v)) => format!("{:.2}", v),
        }
    }
}

/// 180000.0 -> "180,000" (or "+180,000" when `signed`)
fn group_thousands(value: f64, signed: bool) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 {
        "-"
    } else if signed && rounded > 0.0 {
        "+"
    } else {
        ""
    };
    format!("{}{}", sign, grouped)
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorDefinition {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: UnitType,
    /// Series judged on the domestic side. Single-region cutoffs read
    /// their one series from here whichever region it describes; the
    /// cutoff's `high_favors` carries the polarity.
    pub domestic: SeriesSpec,
    pub foreign: Option<SeriesSpec>,
    /// Forward-looking series read with `LatestValue`, only for `ForwardLookingSpread`.
    pub forward: Option<SeriesSpec>,
    pub derivation: Derivation,
    /// Multiplier applied to derived scalars (FRED reports payrolls in thousands).
    pub scale: f64,
    pub judgment: Judgment,
}

impl IndicatorDefinition {
    /// Every series this indicator reads, domestic first.
    pub fn series(&self) -> impl Iterator<Item = &SeriesSpec> {
        [Some(&self.domestic), self.foreign.as_ref(), self.forward.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Checks that the derivation, judgment and series slots agree.
    pub fn validate(&self) -> Result<(), String> {
        let fail = |msg: &str| -> Result<(), String> {
            Err(format!("indicator '{}': {}", self.slug, msg))
        };

        if !self.scale.is_finite() || self.scale == 0.0 {
            return fail("scale must be finite and non-zero");
        }

        match self.judgment {
            Judgment::HigherIsBetter { threshold } | Judgment::LowerIsBetter { threshold } => {
                if !(threshold.is_finite() && threshold >= 0.0) {
                    return fail("threshold must be finite and non-negative");
                }
                if self.foreign.is_none() {
                    return fail("comparison judgment needs a foreign series");
                }
                if self.derivation == Derivation::TrendDirection {
                    return fail("comparison judgment needs a scalar derivation");
                }
            }
            Judgment::AbsoluteCutoff { upper, lower, .. } => {
                if !(upper.is_finite() && lower.is_finite()) || lower > upper {
                    return fail("cutoffs must be finite with lower <= upper");
                }
                if self.foreign.is_some() {
                    return fail("absolute cutoff is single-region");
                }
                if self.derivation == Derivation::TrendDirection {
                    return fail("absolute cutoff needs a scalar derivation");
                }
            }
            Judgment::TrendComparison => {
                if self.derivation != Derivation::TrendDirection {
                    return fail("trend comparison needs the trend derivation");
                }
                if self.foreign.is_none() {
                    return fail("trend comparison needs a foreign series");
                }
            }
            Judgment::ForwardLookingSpread { threshold, override_threshold } => {
                if !(threshold.is_finite() && threshold >= 0.0)
                    || !(override_threshold.is_finite() && override_threshold >= 0.0)
                {
                    return fail("thresholds must be finite and non-negative");
                }
                if self.derivation != Derivation::LatestValue {
                    return fail("forward spread compares latest levels");
                }
                if self.foreign.is_none() || self.forward.is_none() {
                    return fail("forward spread needs foreign and forward series");
                }
            }
        }

        if self.forward.is_some() && !matches!(self.judgment, Judgment::ForwardLookingSpread { .. }) {
            return fail("forward series is only read by the forward spread judgment");
        }

        Ok(())
    }
}
