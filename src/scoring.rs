use crate::criteria;
use crate::models::{Listing, Preferences};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    FlatType,
    PriceRange,
    FloorArea,
    StoreyRange,
    FlatModel,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::FlatType,
        Criterion::PriceRange,
        Criterion::FloorArea,
        Criterion::StoreyRange,
        Criterion::FlatModel,
    ];

    /// Fixed weights; they sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Criterion::FlatType => 0.25,
            Criterion::PriceRange => 0.25,
            Criterion::FloorArea => 0.20,
            Criterion::StoreyRange => 0.15,
            Criterion::FlatModel => 0.15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::FlatType => "Flat type",
            Criterion::PriceRange => "Price",
            Criterion::FloorArea => "Floor area",
            Criterion::StoreyRange => "Storey range",
            Criterion::FlatModel => "Flat model",
        }
    }

    pub fn preference(self, prefs: &Preferences) -> &str {
        match self {
            Criterion::FlatType => &prefs.flat_type,
            Criterion::PriceRange => &prefs.price_range,
            Criterion::FloorArea => &prefs.floor_area_sqm,
            Criterion::StoreyRange => &prefs.storey_range,
            Criterion::FlatModel => &prefs.flat_model,
        }
    }

    pub fn actual(self, listing: &Listing) -> String {
        match self {
            Criterion::FlatType => listing.flat_type.clone(),
            Criterion::PriceRange => format_number(listing.resale_price),
            Criterion::FloorArea => format_number(listing.floor_area_sqm),
            Criterion::StoreyRange => listing.storey_range.clone(),
            Criterion::FlatModel => listing.flat_model.clone(),
        }
    }

    fn raw(self, listing: &Listing, preference: &str) -> f64 {
        let raw = match self {
            Criterion::FlatType => criteria::flat_type(&listing.flat_type, preference),
            Criterion::PriceRange => criteria::price(listing.resale_price, preference),
            Criterion::FloorArea => criteria::floor_area(listing.floor_area_sqm, preference),
            Criterion::StoreyRange => criteria::storey_range(&listing.storey_range, preference),
            Criterion::FlatModel => criteria::flat_model(&listing.flat_model, preference),
        };
        raw.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchQuality {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl MatchQuality {
    pub fn from_raw(raw: f64) -> Self {
        if raw >= 0.9 {
            MatchQuality::Excellent
        } else if raw >= 0.75 {
            MatchQuality::VeryGood
        } else if raw >= 0.6 {
            MatchQuality::Good
        } else if raw >= 0.4 {
            MatchQuality::Fair
        } else if raw >= 0.2 {
            MatchQuality::Poor
        } else {
            MatchQuality::VeryPoor
        }
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchQuality::Excellent => "Excellent",
            MatchQuality::VeryGood => "Very Good",
            MatchQuality::Good => "Good",
            MatchQuality::Fair => "Fair",
            MatchQuality::Poor => "Poor",
            MatchQuality::VeryPoor => "Very Poor",
        };
        f.write_str(s)
    }
}

/// One active criterion, evaluated once and shared by `score` and `explain`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub raw: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionDetail {
    pub criterion: Criterion,
    pub raw: f64,
    pub weight: f64,
    /// `100 * raw * weight`
    pub contribution: f64,
    pub preference: String,
    pub actual: String,
    pub quality: MatchQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub criteria: Vec<CriterionDetail>,
}

impl ScoreBreakdown {
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionDetail> {
        self.criteria.iter().find(|d| d.criterion == criterion)
    }
}

/// Raw scores for every criterion the preferences actually set.
pub fn evaluate(listing: &Listing, prefs: &Preferences) -> Vec<CriterionScore> {
    Criterion::ALL
        .iter()
        .filter_map(|&criterion| {
            let preference = criterion.preference(prefs).trim();
            if preference.is_empty() {
                return None;
            }
            Some(CriterionScore {
                criterion,
                raw: criterion.raw(listing, preference),
                weight: criterion.weight(),
            })
        })
        .collect()
}

/// Weighted mean over the active criteria, scaled to 0..=100.
pub fn aggregate(scores: &[CriterionScore]) -> u8 {
    let num: f64 = scores.iter().map(|s| s.raw * s.weight).sum();
    let den: f64 = scores.iter().map(|s| s.weight).sum();
    if den == 0.0 {
        0
    } else {
        (100.0 * num / den).round().clamp(0.0, 100.0) as u8
    }
}

pub fn score(listing: &Listing, prefs: &Preferences) -> u8 {
    aggregate(&evaluate(listing, prefs))
}

pub fn explain(listing: &Listing, prefs: &Preferences) -> ScoreBreakdown {
    let scores = evaluate(listing, prefs);
    let criteria = scores
        .iter()
        .map(|s| CriterionDetail {
            criterion: s.criterion,
            raw: s.raw,
            weight: s.weight,
            contribution: 100.0 * s.raw * s.weight,
            preference: s.criterion.preference(prefs).trim().to_string(),
            actual: s.criterion.actual(listing),
            quality: MatchQuality::from_raw(s.raw),
        })
        .collect();
    ScoreBreakdown {
        score: aggregate(&scores),
        criteria,
    }
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        "N/A".into()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences {
            flat_type: "4 ROOM".into(),
            storey_range: "07 TO 09".into(),
            floor_area_sqm: "91-110".into(),
            flat_model: "Improved".into(),
            price_range: "400k-500k".into(),
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = Criterion::ALL.iter().map(|c| c.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unset_criteria_are_skipped() {
        let listing = Listing::new("4 ROOM", "07 TO 09", 100.5, "Improved", 400_000.0);
        let only_type = Preferences {
            flat_type: "4 ROOM".into(),
            flat_model: "   ".into(),
            ..Default::default()
        };
        let scores = evaluate(&listing, &only_type);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].criterion, Criterion::FlatType);
    }

    #[test]
    fn empty_preferences_score_zero() {
        let listing = Listing::new("4 ROOM", "07 TO 09", 100.5, "Improved", 400_000.0);
        assert_eq!(score(&listing, &Preferences::default()), 0);
        assert!(explain(&listing, &Preferences::default()).criteria.is_empty());
    }

    #[test]
    fn ideal_listing_scores_hundred() {
        let listing = Listing::new("4 ROOM", "07 TO 09", 100.5, "Improved", 400_000.0);
        assert_eq!(score(&listing, &prefs()), 100);
    }

    #[test]
    fn breakdown_matches_score() {
        let listing = Listing::new("3 ROOM", "10 TO 12", 85.0, "Standard", 550_000.0);
        let breakdown = explain(&listing, &prefs());
        assert_eq!(breakdown.score, score(&listing, &prefs()));
        assert_eq!(breakdown.criteria.len(), 5);
        let total: f64 = breakdown.criteria.iter().map(|d| d.contribution).sum();
        assert_eq!(breakdown.score, total.round() as u8);

        let flat_type = breakdown.get(Criterion::FlatType).unwrap();
        assert_eq!(flat_type.raw, 0.6);
        assert_eq!(flat_type.quality, MatchQuality::Good);
        assert_eq!(flat_type.actual, "3 ROOM");
        assert_eq!(breakdown.get(Criterion::PriceRange).unwrap().actual, "550000");
    }

    #[test]
    fn quality_thresholds() {
        assert_eq!(MatchQuality::from_raw(0.9), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_raw(0.85), MatchQuality::VeryGood);
        assert_eq!(MatchQuality::from_raw(0.6), MatchQuality::Good);
        assert_eq!(MatchQuality::from_raw(0.45), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_raw(0.2), MatchQuality::Poor);
        assert_eq!(MatchQuality::from_raw(0.05), MatchQuality::VeryPoor);
        assert_eq!(MatchQuality::VeryGood.to_string(), "Very Good");
    }

    #[test]
    fn non_finite_actuals_render_as_na() {
        let listing = Listing::new("4 ROOM", "07 TO 09", f64::NAN, "Improved", 95.5);
        assert_eq!(Criterion::FloorArea.actual(&listing), "N/A");
        assert_eq!(Criterion::PriceRange.actual(&listing), "95.5");
    }
}
