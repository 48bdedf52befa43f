use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resale flat as it comes out of a listing export.
///
/// Only `flat_type`, `storey_range`, `floor_area_sqm`, `flat_model` and
/// `resale_price` take part in scoring; the rest is carried for display.
/// Numeric fields may hold `NaN` when the source cell was unparseable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub town: String,
    pub block: String,
    pub street_name: String,
    pub flat_type: String,
    pub storey_range: String,
    pub floor_area_sqm: f64,
    pub flat_model: String,
    pub lease_commence_date: Option<i32>,
    pub resale_price: f64,
}

/// What a user asked for. An empty field means "no opinion".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub flat_type: String,
    pub storey_range: String,
    /// Floor area band identifier, e.g. `"91-110"`.
    pub floor_area_sqm: String,
    pub flat_model: String,
    /// Price band identifier, e.g. `"400k-500k"`.
    pub price_range: String,
}

impl Listing {
    pub fn new(
        flat_type: impl Into<String>,
        storey_range: impl Into<String>,
        floor_area_sqm: f64,
        flat_model: impl Into<String>,
        resale_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            town: String::new(),
            block: String::new(),
            street_name: String::new(),
            flat_type: flat_type.into(),
            storey_range: storey_range.into(),
            floor_area_sqm,
            flat_model: flat_model.into(),
            lease_commence_date: None,
            resale_price,
        }
    }

    pub fn address(&self) -> String {
        let parts: Vec<&str> = [self.block.as_str(), self.street_name.as_str(), self.town.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            "(no address)".into()
        } else {
            parts.join(" ")
        }
    }
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        [
            &self.flat_type,
            &self.storey_range,
            &self.floor_area_sqm,
            &self.flat_model,
            &self.price_range,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }

    /// Fills every field of `self` that `other` sets, leaving the rest alone.
    pub fn overlay(mut self, other: &Preferences) -> Self {
        let pick = |mine: &mut String, theirs: &String| {
            if !theirs.trim().is_empty() {
                mine.clone_from(theirs);
            }
        };
        pick(&mut self.flat_type, &other.flat_type);
        pick(&mut self.storey_range, &other.storey_range);
        pick(&mut self.floor_area_sqm, &other.floor_area_sqm);
        pick(&mut self.flat_model, &other.flat_model);
        pick(&mut self.price_range, &other.price_range);
        self
    }
}
