//! Text and JSON rendering of a scorecard for the command line.

use std::fmt::Write;

use crate::analysis::judge::Verdict;
use crate::analysis::scorecard::{CurrencyPair, JudgedRow, Scorecard};
use crate::error::Result;
use crate::indicators::derive::Derived;

pub fn to_json(card: &Scorecard) -> Result<String> {
    Ok(serde_json::to_string_pretty(card)?)
}

pub fn to_text(card: &Scorecard) -> String {
    let mut out = String::new();
    let title = format!("{} ({})", card.pair.symbol(), card.profile);

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    match card.data_date() {
        Some(date) => {
            let _ = writeln!(out, "Data date: {}", date.format("%Y-%m-%d"));
        }
        None => {
            let _ = writeln!(out, "Data date: n/a");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Verdict: {}", card.label);
    let _ = writeln!(
        out,
        "Score:   {:+} ({} {} / {} {} / {} neutral / {} no data)",
        card.net_score,
        card.tally.domestic,
        card.pair.quote,
        card.tally.foreign,
        card.pair.base,
        card.tally.neutral,
        card.tally.no_data
    );

    if !card.drivers.is_empty() {
        let _ = writeln!(out, "Drivers:");
        for driver in &card.drivers {
            let _ = writeln!(out, "  - {}", driver);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<36} {:>14} {:>14}  {:<12} {}",
        "Indicator", card.pair.quote, card.pair.base, "Verdict", "Detail"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));
    for row in &card.rows {
        let _ = writeln!(out, "{}", render_row(row, &card.pair));
    }

    let notes: Vec<_> = card
        .rows
        .iter()
        .filter_map(|row| row.description.as_ref().map(|d| (&row.name, d)))
        .collect();
    if !notes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Notes:");
        for (name, description) in notes {
            let _ = writeln!(out, "  {}: {}", name, description);
        }
    }

    out
}

fn render_row(row: &JudgedRow, pair: &CurrencyPair) -> String {
    let cell = |metric: Option<&Derived>| match metric {
        Some(Ok(m)) => row.unit.format(m),
        Some(Err(_)) => "No Data".to_string(),
        None => "-".to_string(),
    };

    format!(
        "{:<36} {:>14} {:>14}  {:<12} {}",
        row.name,
        cell(Some(&row.domestic)),
        cell(row.foreign.as_ref()),
        badge(row.verdict, pair),
        row.rationale
    )
}

fn badge(verdict: Verdict, pair: &CurrencyPair) -> String {
    match verdict {
        Verdict::StrongDomestic => format!("{} +", pair.quote),
        Verdict::StrongForeign => format!("{} +", pair.base),
        Verdict::Tie => "Tie".to_string(),
        Verdict::Neutral => "Neutral".to_string(),
        Verdict::NoData => "No Data".to_string(),
    }
}
