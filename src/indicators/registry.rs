use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::{Cadence, Derivation, IndicatorDefinition, Judgment, Region, SeriesSpec, UnitType};
use crate::analysis::scorecard::CurrencyPair;

// ============================================================================
// PROFILE STRUCT
// ============================================================================

/// A named, ordered indicator table for one currency pair.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub slug: String,
    pub name: String,
    pub pair: CurrencyPair,
    pub indicators: Vec<IndicatorDefinition>,
}

fn series(id: &str, cadence: Cadence) -> SeriesSpec {
    SeriesSpec { series_id: id.to_string(), cadence }
}

// Helper macro to reduce boilerplate
macro_rules! ind {
    // Single region, unscaled
    ($slug:expr, $name:expr, $desc:expr, $unit:expr, $domestic:expr, $deriv:expr, $judge:expr) => {
        ind!($slug, $name, $desc, $unit, $domestic, None, None, $deriv, 1.0, $judge)
    };
    // Two-region comparison
    ($slug:expr, $name:expr, $desc:expr, $unit:expr, $domestic:expr, $foreign:expr, $deriv:expr, $judge:expr) => {
        ind!($slug, $name, $desc, $unit, $domestic, Some($foreign), None, $deriv, 1.0, $judge)
    };
    // Full form
    ($slug:expr, $name:expr, $desc:expr, $unit:expr, $domestic:expr, $foreign:expr, $forward:expr, $deriv:expr, $scale:expr, $judge:expr) => {
        IndicatorDefinition {
            slug: $slug.to_string(),
            name: $name.to_string(),
            description: Some($desc.to_string()),
            unit: $unit,
            domestic: $domestic,
            foreign: $foreign,
            forward: $forward,
            derivation: $deriv,
            scale: $scale,
            judgment: $judge,
        }
    };
}

// ============================================================================
// SHARED DEFINITIONS
// ============================================================================

fn nonfarm_payrolls() -> IndicatorDefinition {
    // PAYEMS is in thousands of persons
    ind!("nfp_change", "Non-Farm Payrolls (Jobs Added)",
         "Monthly change in US payrolls. Above 150k is USD-positive, below 100k USD-negative",
         UnitType::CountChange, series("PAYEMS", Cadence::Monthly), None, None,
         Derivation::AbsoluteChange, 1000.0,
         Judgment::AbsoluteCutoff { upper: 150_000.0, lower: 100_000.0, high_favors: Region::Domestic })
}

fn unemployment() -> IndicatorDefinition {
    ind!("unemployment", "Unemployment Rate",
         "US vs euro area harmonised unemployment. Lower is stronger",
         UnitType::Percent, series("UNRATE", Cadence::Monthly), series("LRHUTTTTEZM156S", Cadence::Monthly),
         Derivation::LatestValue, Judgment::LowerIsBetter { threshold: 0.25 })
}

fn german_production() -> IndicatorDefinition {
    ind!("de_industrial_production", "German Industrial Production (MoM)",
         "Proxy for euro area manufacturing PMI. A slump is euro-negative",
         UnitType::PercentChange, series("DEUPROINDMISMEI", Cadence::Monthly),
         Derivation::PercentChange,
         Judgment::AbsoluteCutoff { upper: 0.5, lower: -0.5, high_favors: Region::Foreign })
}

// ============================================================================
// STATIC PROFILE REGISTRY (Lazy initialization, O(1) lookup)
// ============================================================================

static PROFILES: Lazy<Vec<Profile>> = Lazy::new(|| {
    vec![
        // =====================================================================
        // EUR/USD MACRO SCORECARD
        // =====================================================================
        Profile {
            slug: "eurusd".to_string(),
            name: "EUR/USD Macro Scorecard".to_string(),
            pair: CurrencyPair::new("EUR", "USD"),
            indicators: vec![
                ind!("policy_rate", "Policy Rate (Fed vs ECB)",
                     "Fed target upper bound vs ECB deposit rate. The US 2Y yield overrides when cuts or hikes are priced in",
                     UnitType::Percent, series("DFEDTARU", Cadence::Daily),
                     Some(series("ECBDFR", Cadence::Daily)), Some(series("DGS2", Cadence::Daily)),
                     Derivation::LatestValue, 1.0,
                     Judgment::ForwardLookingSpread { threshold: 0.25, override_threshold: 0.5 }),
                ind!("yield_10y", "10Y Government Yield",
                     "US Treasury 10Y vs German Bund 10Y",
                     UnitType::Percent, series("DGS10", Cadence::Daily), series("IRLTLT01DEM156N", Cadence::Monthly),
                     Derivation::LatestValue, Judgment::HigherIsBetter { threshold: 0.25 }),
                ind!("inflation_yoy", "Inflation (YoY)",
                     "US CPI vs euro area HICP, year-over-year. Hotter inflation keeps rates higher",
                     UnitType::PercentChange, series("CPIAUCSL", Cadence::Monthly), series("CP0000EZ19M086NEST", Cadence::Monthly),
                     Derivation::YearOverYearGrowth, Judgment::HigherIsBetter { threshold: 0.25 }),
                unemployment(),
                ind!("gdp_yoy", "Real GDP Growth (YoY)",
                     "US vs euro area real GDP, same quarter one year earlier",
                     UnitType::PercentChange, series("GDPC1", Cadence::Quarterly), series("CLVMNACSCAB1GQEA19", Cadence::Quarterly),
                     Derivation::YearOverYearGrowth, Judgment::HigherIsBetter { threshold: 0.5 }),
                ind!("industrial_production", "Industrial Production (MoM)",
                     "US vs German industrial production, month-over-month",
                     UnitType::PercentChange, series("INDPRO", Cadence::Monthly), series("DEUPROINDMISMEI", Cadence::Monthly),
                     Derivation::PercentChange, Judgment::HigherIsBetter { threshold: 0.2 }),
                ind!("yield_trend", "10Y Yield Trend",
                     "Direction of the latest move in US vs German 10Y yields",
                     UnitType::Trend, series("DGS10", Cadence::Daily), series("IRLTLT01DEM156N", Cadence::Monthly),
                     Derivation::TrendDirection, Judgment::TrendComparison),
                nonfarm_payrolls(),
                ind!("jobless_claims", "Initial Jobless Claims",
                     "Weekly US initial claims. Below 220k is USD-positive, above 250k USD-negative",
                     UnitType::Count, series("ICSA", Cadence::Weekly),
                     Derivation::LatestValue,
                     Judgment::AbsoluteCutoff { upper: 250_000.0, lower: 220_000.0, high_favors: Region::Foreign }),
            ],
        },
        // =====================================================================
        // EUR/USD HIGH-IMPACT EVENTS
        // =====================================================================
        Profile {
            slug: "eurusd-events".to_string(),
            name: "EUR/USD High-Impact Event Dashboard".to_string(),
            pair: CurrencyPair::new("EUR", "USD"),
            indicators: vec![
                nonfarm_payrolls(),
                unemployment(),
                ind!("hourly_earnings", "Avg Hourly Earnings (MoM)",
                     "Wage growth. Higher wages = inflation risk = hawkish Fed",
                     UnitType::PercentChange, series("CES0500000003", Cadence::Monthly),
                     Derivation::PercentChange,
                     Judgment::AbsoluteCutoff { upper: 0.4, lower: 0.2, high_favors: Region::Domestic }),
                ind!("retail_sales", "Retail Sales (MoM)",
                     "Advance retail sales excluding food services. Consumer spending strength",
                     UnitType::PercentChange, series("RSXFS", Cadence::Monthly),
                     Derivation::PercentChange,
                     Judgment::AbsoluteCutoff { upper: 0.3, lower: 0.0, high_favors: Region::Domestic }),
                german_production(),
                ind!("fr_industrial_production", "French Industrial Production (MoM)",
                     "Second euro area manufacturing proxy",
                     UnitType::PercentChange, series("FRAPROINDMISMEI", Cadence::Monthly),
                     Derivation::PercentChange,
                     Judgment::AbsoluteCutoff { upper: 0.5, lower: -0.5, high_favors: Region::Foreign }),
            ],
        },
    ]
});

/// HashMap for O(1) slug -> index lookup
static PROFILE_MAP: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    PROFILES
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.slug.clone(), idx))
        .collect()
});

// ============================================================================
// REGISTRY STRUCT & IMPL
// ============================================================================

pub struct Registry;

impl Registry {
    pub fn get_profiles() -> &'static [Profile] {
        &PROFILES
    }

    pub fn profile_slugs() -> Vec<&'static str> {
        PROFILES.iter().map(|p| p.slug.as_str()).collect()
    }

    /// O(1) lookup by slug
    pub fn get_profile(slug: &str) -> Option<&'static Profile> {
        PROFILE_MAP.get(slug).and_then(|&idx| PROFILES.get(idx))
    }

    /// Looks up a profile and checks every definition in it.
    pub fn load(slug: &str) -> Result<&'static Profile, String> {
        let profile = Self::get_profile(slug).ok_or_else(|| {
            format!("unknown profile '{}' (available: {})", slug, Self::profile_slugs().join(", "))
        })?;
        validate_profile(profile)?;
        Ok(profile)
    }
}

pub fn validate_profile(profile: &Profile) -> Result<(), String> {
    if profile.indicators.is_empty() {
        return Err(format!("profile '{}' has no indicators", profile.slug));
    }

    let mut slugs = HashSet::new();
    // a series is fetched once per refresh, so every use must agree on its cadence
    let mut cadences: HashMap<&str, Cadence> = HashMap::new();
    for definition in &profile.indicators {
        if !slugs.insert(definition.slug.as_str()) {
            return Err(format!("profile '{}': duplicate indicator '{}'", profile.slug, definition.slug));
        }
        definition.validate()?;

        for spec in definition.series() {
            let first = *cadences.entry(spec.series_id.as_str()).or_insert(spec.cadence);
            if first != spec.cadence {
                return Err(format!(
                    "profile '{}': series '{}' declared as both {:?} and {:?}",
                    profile.slug, spec.series_id, first, spec.cadence
                ));
            }
        }
    }
    Ok(())
}
