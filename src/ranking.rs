//! Ranking and comparison on top of the per-listing scorer.

use crate::models::{Listing, Preferences};
use crate::scoring::{self, Criterion, ScoreBreakdown};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    pub min_score: u8,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedListing<'a> {
    pub listing: &'a Listing,
    pub score: u8,
}

/// Scores every listing, keeps those at or above `min_score` and sorts best
/// first. Ties go to the cheaper listing, then to input order.
pub fn rank<'a>(
    listings: &'a [Listing],
    prefs: &Preferences,
    options: RankOptions,
) -> Vec<RankedListing<'a>> {
    let mut ranked: Vec<RankedListing<'a>> = listings
        .iter()
        .map(|listing| RankedListing {
            listing,
            score: scoring::score(listing, prefs),
        })
        .filter(|r| r.score >= options.min_score)
        .collect();

    // sort_by is stable, so equal keys keep input order
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| cheaper_first(a.listing.resale_price, b.listing.resale_price))
    });
    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }
    tracing::debug!(
        candidates = listings.len(),
        kept = ranked.len(),
        "ranked listings"
    );
    ranked
}

fn cheaper_first(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    First,
    Second,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionDelta {
    pub criterion: Criterion,
    /// `first.raw - second.raw`; positive favours the first listing.
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub first: ScoreBreakdown,
    pub second: ScoreBreakdown,
    pub deltas: Vec<CriterionDelta>,
    pub winner: Winner,
}

pub fn compare(first: &Listing, second: &Listing, prefs: &Preferences) -> Comparison {
    let a = scoring::explain(first, prefs);
    let b = scoring::explain(second, prefs);
    let deltas = a
        .criteria
        .iter()
        .filter_map(|da| {
            let db = b.get(da.criterion)?;
            Some(CriterionDelta {
                criterion: da.criterion,
                delta: da.raw - db.raw,
            })
        })
        .collect();
    let winner = match a.score.cmp(&b.score) {
        Ordering::Greater => Winner::First,
        Ordering::Less => Winner::Second,
        Ordering::Equal => Winner::Tie,
    };
    Comparison {
        first: a,
        second: b,
        deltas,
        winner,
    }
}
