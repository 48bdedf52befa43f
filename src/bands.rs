//! Named numeric bands used to express range-valued preferences, and the
//! piecewise-linear decay curves applied outside them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Band {
    const fn new(label: &'static str, min: f64, max: f64) -> Self {
        Self { label, min, max }
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// "151+" is open-ended; 200 sqm stands in for its upper edge.
pub const AREA_BANDS: [Band; 7] = [
    Band::new("30-50", 30.0, 50.0),
    Band::new("51-70", 51.0, 70.0),
    Band::new("71-90", 71.0, 90.0),
    Band::new("91-110", 91.0, 110.0),
    Band::new("111-130", 111.0, 130.0),
    Band::new("131-150", 131.0, 150.0),
    Band::new("151+", 151.0, 200.0),
];

// Open-ended ends are capped at 50k and 2M so every band has a finite size.
pub const PRICE_BANDS: [Band; 9] = [
    Band::new("Under 200k", 50_000.0, 200_000.0),
    Band::new("200k-300k", 200_000.0, 300_000.0),
    Band::new("300k-400k", 300_000.0, 400_000.0),
    Band::new("400k-500k", 400_000.0, 500_000.0),
    Band::new("500k-600k", 500_000.0, 600_000.0),
    Band::new("600k-700k", 600_000.0, 700_000.0),
    Band::new("700k-800k", 700_000.0, 800_000.0),
    Band::new("800k-1M", 800_000.0, 1_000_000.0),
    Band::new("Over 1M", 1_000_000.0, 2_000_000.0),
];

pub fn resolve_area_band(label: &str) -> Option<Band> {
    lookup(&AREA_BANDS, label)
}

pub fn resolve_price_band(label: &str) -> Option<Band> {
    lookup(&PRICE_BANDS, label)
}

pub fn area_band_labels() -> impl Iterator<Item = &'static str> {
    AREA_BANDS.iter().map(|b| b.label)
}

pub fn price_band_labels() -> impl Iterator<Item = &'static str> {
    PRICE_BANDS.iter().map(|b| b.label)
}

fn lookup(table: &[Band], label: &str) -> Option<Band> {
    let label = label.trim();
    table
        .iter()
        .find(|b| b.label.eq_ignore_ascii_case(label))
        .copied()
}

/// A continuous, piecewise-linear score curve over a distance measured in
/// multiples of the band size. Knots must have strictly increasing `x`.
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    knots: &'static [(f64, f64)],
}

impl Curve {
    pub const fn new(knots: &'static [(f64, f64)]) -> Self {
        Self { knots }
    }

    /// Interpolated score at `x`, or `None` once `x` runs past the last knot.
    pub fn at(&self, x: f64) -> Option<f64> {
        let (first_x, first_y) = *self.knots.first()?;
        if x <= first_x {
            return Some(first_y);
        }
        self.knots.windows(2).find_map(|pair| {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            (x <= x1).then(|| y0 + (y1 - y0) * (x - x0) / (x1 - x0))
        })
    }
}

pub const AREA_OUTSIDE: Curve = Curve::new(&[(0.0, 0.7), (1.0, 0.4), (2.0, 0.15), (3.0, 0.05)]);

pub const PRICE_BELOW: Curve = Curve::new(&[(0.0, 1.0), (0.5, 0.85), (1.0, 0.65), (2.0, 0.35)]);

pub const PRICE_ABOVE: Curve = Curve::new(&[
    (0.0, 0.70),
    (0.3, 0.45),
    (0.5, 0.325),
    (0.8, 0.20),
    (1.5, 0.05),
]);
