use chrono::{DateTime, Utc};
use serde::Serialize;

use super::judge::{judge, JudgeInputs, Verdict};
use crate::indicators::derive::{Derived, Metric};
use crate::indicators::{IndicatorDefinition, Judgment, UnitType};

/// Pair quoted base/quote. The quote currency is the domestic side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self { base: base.to_string(), quote: quote.to_string() }
    }

    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JudgedRow {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: UnitType,
    pub domestic: Derived,
    pub foreign: Option<Derived>,
    pub forward: Option<Derived>,
    pub verdict: Verdict,
    /// Date of the latest domestic observation, when the series was fetched.
    pub as_of: Option<DateTime<Utc>>,
    pub rationale: String,
}

impl JudgedRow {
    /// Judges one indicator's metrics and writes the row's rationale.
    pub fn judge(
        definition: &IndicatorDefinition,
        pair: &CurrencyPair,
        domestic: Derived,
        foreign: Option<Derived>,
        forward: Option<Derived>,
        as_of: Option<DateTime<Utc>>,
    ) -> Self {
        let verdict = judge(
            &definition.judgment,
            JudgeInputs { domestic: &domestic, foreign: foreign.as_ref(), forward: forward.as_ref() },
        );

        let rationale = if verdict == Verdict::NoData {
            no_data_reason(&domestic, foreign.as_ref(), forward.as_ref())
        } else {
            describe(definition, pair, &domestic, foreign.as_ref(), forward.as_ref(), verdict)
        };

        Self {
            slug: definition.slug.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            unit: definition.unit,
            domestic,
            foreign,
            forward,
            verdict,
            as_of,
            rationale,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub domestic: usize,
    pub foreign: usize,
    /// Tie and Neutral rows
    pub neutral: usize,
    pub no_data: usize,
}

impl Tally {
    pub fn from_verdicts<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = Verdict>,
    {
        let mut tally = Tally::default();
        for verdict in verdicts {
            match verdict {
                Verdict::StrongDomestic => tally.domestic += 1,
                Verdict::StrongForeign => tally.foreign += 1,
                Verdict::Tie | Verdict::Neutral => tally.neutral += 1,
                Verdict::NoData => tally.no_data += 1,
            }
        }
        tally
    }

    /// Positive favors the domestic currency.
    pub fn net(&self) -> i64 {
        self.domestic as i64 - self.foreign as i64
    }

    /// Domestic strength is bearish for a pair quoted foreign/domestic.
    pub fn bias(&self) -> Bias {
        match self.domestic.cmp(&self.foreign) {
            std::cmp::Ordering::Greater => Bias::Bearish,
            std::cmp::Ordering::Less => Bias::Bullish,
            std::cmp::Ordering::Equal => Bias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    pub fn label(&self, pair: &CurrencyPair) -> String {
        match self {
            Bias::Bearish => format!("BEARISH {} (Strong {})", pair.symbol(), pair.quote),
            Bias::Bullish => format!("BULLISH {} (Weak {})", pair.symbol(), pair.quote),
            Bias::Neutral => "NEUTRAL / MIXED".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scorecard {
    pub profile: String,
    pub pair: CurrencyPair,
    pub rows: Vec<JudgedRow>,
    pub tally: Tally,
    pub net_score: i64,
    pub bias: Bias,
    pub label: String,
    /// Rationales of the rows that moved the score
    pub drivers: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Scorecard {
    pub fn aggregate(profile: &str, pair: CurrencyPair, rows: Vec<JudgedRow>) -> Self {
        let tally = Tally::from_verdicts(rows.iter().map(|row| row.verdict));
        let bias = tally.bias();

        let drivers = rows
            .iter()
            .filter(|row| matches!(row.verdict, Verdict::StrongDomestic | Verdict::StrongForeign))
            .map(|row| {
                let winner = match row.verdict {
                    Verdict::StrongDomestic => &pair.quote,
                    _ => &pair.base,
                };
                format!("{} favors {}: {}", row.name, winner, row.rationale)
            })
            .collect();

        Self {
            profile: profile.to_string(),
            label: bias.label(&pair),
            pair,
            rows,
            tally,
            net_score: tally.net(),
            bias,
            drivers,
            generated_at: Utc::now(),
        }
    }

    /// Latest as-of date among rows that carry data.
    pub fn data_date(&self) -> Option<DateTime<Utc>> {
        self.rows
            .iter()
            .filter(|row| row.verdict != Verdict::NoData)
            .filter_map(|row| row.as_of)
            .max()
    }
}

fn no_data_reason(domestic: &Derived, foreign: Option<&Derived>, forward: Option<&Derived>) -> String {
    let reason = [Some(domestic), foreign, forward]
        .into_iter()
        .flatten()
        .find_map(|metric| metric.as_ref().err());

    match reason {
        Some(err) => format!("No data: {}", err),
        None => "No data: metric kind does not match the judgment".to_string(),
    }
}

fn describe(
    definition: &IndicatorDefinition,
    pair: &CurrencyPair,
    domestic: &Derived,
    foreign: Option<&Derived>,
    forward: Option<&Derived>,
    verdict: Verdict,
) -> String {
    let unit = definition.unit;
    let show = |metric: Option<&Derived>| match metric {
        Some(Ok(m)) => unit.format(m),
        _ => "n/a".to_string(),
    };
    let diff = |metric: Option<&Derived>| match (domestic, metric) {
        (Ok(Metric::Value(d)), Some(Ok(Metric::Value(f)))) => d - f,
        _ => 0.0,
    };

    match definition.judgment {
        Judgment::HigherIsBetter { threshold } | Judgment::LowerIsBetter { threshold } => format!(
            "{} {} vs {} {} (diff {:+.2}, threshold {:.2})",
            pair.quote,
            show(Some(domestic)),
            pair.base,
            show(foreign),
            diff(foreign),
            threshold
        ),
        Judgment::AbsoluteCutoff { upper, lower, .. } => {
            let value = show(Some(domestic));
            let bound = |b: f64| unit.format(&Metric::Value(b));
            match domestic {
                Ok(Metric::Value(v)) if *v > upper => format!("{} above {}", value, bound(upper)),
                Ok(Metric::Value(v)) if *v < lower => format!("{} below {}", value, bound(lower)),
                _ => format!("{} between {} and {}", value, bound(lower), bound(upper)),
            }
        }
        Judgment::TrendComparison => format!(
            "{} {} vs {} {}",
            pair.quote,
            show(Some(domestic)),
            pair.base,
            show(foreign)
        ),
        Judgment::ForwardLookingSpread { threshold, .. } => {
            let base = format!(
                "{} {} vs {} {}, forward {}",
                pair.quote,
                show(Some(domestic)),
                pair.base,
                show(foreign),
                show(forward)
            );
            let naive = match (domestic, foreign) {
                (Ok(Metric::Value(d)), Some(Ok(Metric::Value(f)))) => {
                    super::judge::higher_is_better(*d, *f, threshold)
                }
                _ => verdict,
            };
            if naive != verdict {
                format!("{} (differential priced in)", base)
            } else {
                base
            }
        }
    }
}
