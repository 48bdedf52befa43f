//! Raw [0,1] match scores, one function per criterion.
//!
//! Every scorer fails soft: a missing, unparseable or unknown value yields a
//! low score (or an exact-string comparison), never an error.

use crate::bands::{self, AREA_OUTSIDE, PRICE_ABOVE, PRICE_BELOW};

/// Ordinal room count for a flat type label.
pub fn room_count(flat_type: &str) -> Option<u8> {
    match flat_type.trim().to_ascii_uppercase().as_str() {
        "1 ROOM" => Some(1),
        "2 ROOM" => Some(2),
        "3 ROOM" => Some(3),
        "4 ROOM" => Some(4),
        "5 ROOM" => Some(5),
        "EXECUTIVE" | "MULTI-GENERATION" => Some(6),
        _ => None,
    }
}

pub fn flat_type(actual: &str, preferred: &str) -> f64 {
    if actual.trim().is_empty() || preferred.trim().is_empty() {
        return 0.0;
    }
    let (Some(have), Some(want)) = (room_count(actual), room_count(preferred)) else {
        return exact(actual, preferred);
    };
    match have.abs_diff(want) {
        0 => 1.0,
        1 => 0.6,
        2 => 0.3,
        _ => 0.1,
    }
}

/// Midpoint of a `"07 TO 09"` style storey range.
pub fn storey_midpoint(range: &str) -> Option<f64> {
    let upper = range.trim().to_ascii_uppercase();
    let (low, high) = upper.split_once("TO")?;
    let low: u32 = low.trim().parse().ok()?;
    let high: u32 = high.trim().parse().ok()?;
    Some((f64::from(low) + f64::from(high)) / 2.0)
}

pub fn storey_range(actual: &str, preferred: &str) -> f64 {
    if actual.trim().is_empty() || preferred.trim().is_empty() {
        return 0.0;
    }
    let (Some(have), Some(want)) = (storey_midpoint(actual), storey_midpoint(preferred)) else {
        return exact(actual, preferred);
    };
    let d = (have - want).abs();
    if d == 0.0 {
        1.0
    } else if d <= 3.0 {
        0.85
    } else if d <= 6.0 {
        0.6
    } else if d <= 9.0 {
        0.35
    } else if d <= 12.0 {
        0.15
    } else {
        0.05
    }
}

pub fn floor_area(area: f64, band_label: &str) -> f64 {
    if !area.is_finite() || area <= 0.0 {
        return 0.0;
    }
    let Some(band) = bands::resolve_area_band(band_label) else {
        return 0.0;
    };
    let size = band.size();
    let distance = (area - band.center()).abs();
    if band.contains(area) {
        return 1.0 - 0.1 * (distance / (size / 2.0));
    }
    let beyond = (distance - size / 2.0) / size;
    AREA_OUTSIDE
        .at(beyond)
        .unwrap_or_else(|| (0.15 * (1.0 - (distance / (size * 5.0)).min(1.0))).max(0.05))
}

pub fn price(price: f64, band_label: &str) -> f64 {
    if !price.is_finite() || price <= 0.0 {
        return 0.0;
    }
    let Some(band) = bands::resolve_price_band(band_label) else {
        return 0.0;
    };
    let size = band.size();
    if band.contains(price) {
        let position = (price - band.min) / size;
        return 1.0 - 0.05 * position;
    }
    if price < band.min {
        let distance = band.min - price;
        PRICE_BELOW
            .at(distance / size)
            .unwrap_or_else(|| (0.35 * (1.0 - (distance / (size * 4.0)).min(1.0))).max(0.1))
    } else {
        let distance = price - band.max;
        PRICE_ABOVE
            .at(distance / size)
            .unwrap_or_else(|| (0.05 * (1.0 - (distance / (size * 3.0)).min(1.0))).max(0.01))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Premium,
    Improved,
    Standard,
    Special,
}

const MODEL_FAMILIES: [(ModelFamily, &[&str]); 4] = [
    (
        ModelFamily::Premium,
        &["PREMIUM APARTMENT", "DBSS", "PREMIUM MAISONETTE"],
    ),
    (
        ModelFamily::Improved,
        &["IMPROVED", "IMPROVED-MAISONETTE", "NEW GENERATION"],
    ),
    (
        ModelFamily::Standard,
        &["STANDARD", "MODEL A", "MODEL A2", "SIMPLIFIED"],
    ),
    (
        ModelFamily::Special,
        &["MAISONETTE", "APARTMENT", "TERRACE", "PREMIUM APARTMENT LOFT"],
    ),
];

/// Family of an already-normalized model name. Later families in the table
/// win, so "IMPROVED-MAISONETTE" lands in `Special`.
pub fn model_family(normalized: &str) -> Option<ModelFamily> {
    MODEL_FAMILIES
        .iter()
        .rev()
        .find(|(_, keys)| keys.iter().any(|k| normalized.contains(k)))
        .map(|(family, _)| *family)
}

pub fn flat_model(actual: &str, preferred: &str) -> f64 {
    let actual = normalize(actual);
    let preferred = normalize(preferred);
    if actual.is_empty() || preferred.is_empty() {
        return 0.0;
    }
    if actual == preferred {
        return 1.0;
    }
    use ModelFamily::*;
    match (model_family(&actual), model_family(&preferred)) {
        (Some(a), Some(b)) if a == b => 0.75,
        (Some(Premium), Some(Improved)) | (Some(Improved), Some(Premium)) => 0.5,
        (Some(Standard), Some(Improved)) | (Some(Improved), Some(Standard)) => 0.4,
        (Some(_), Some(_)) => 0.2,
        _ if actual.contains(&preferred) || preferred.contains(&actual) => 0.6,
        _ => 0.1,
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

fn exact(a: &str, b: &str) -> f64 {
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn flat_type_tiers() {
        assert_eq!(flat_type("4 ROOM", "4 room"), 1.0);
        assert_eq!(flat_type("3 ROOM", "4 ROOM"), 0.6);
        assert_eq!(flat_type("2 ROOM", "4 ROOM"), 0.3);
        assert_eq!(flat_type("1 ROOM", "4 ROOM"), 0.1);
        assert_eq!(flat_type("EXECUTIVE", "MULTI-GENERATION"), 1.0);
        assert_eq!(flat_type("EXECUTIVE", "5 ROOM"), 0.6);
    }

    #[test]
    fn flat_type_falls_back_to_exact_match() {
        assert_eq!(flat_type("Studio", "studio"), 1.0);
        assert_eq!(flat_type("Studio", "4 ROOM"), 0.0);
        assert_eq!(flat_type("", "4 ROOM"), 0.0);
    }

    #[test]
    fn storey_midpoints() {
        assert_eq!(storey_midpoint("07 TO 09"), Some(8.0));
        assert_eq!(storey_midpoint(" 01 to 05 "), Some(3.0));
        assert_eq!(storey_midpoint("ground"), None);
        assert_eq!(storey_midpoint("07 TO high"), None);
    }

    #[test]
    fn storey_tiers() {
        assert_eq!(storey_range("07 TO 09", "07 TO 09"), 1.0);
        assert_eq!(storey_range("10 TO 12", "07 TO 09"), 0.85);
        assert_eq!(storey_range("13 TO 15", "07 TO 09"), 0.6);
        assert_eq!(storey_range("16 TO 18", "07 TO 09"), 0.35);
        assert_eq!(storey_range("19 TO 21", "07 TO 09"), 0.15);
        assert_eq!(storey_range("40 TO 42", "07 TO 09"), 0.05);
        assert_eq!(storey_range("Penthouse", "penthouse"), 1.0);
        assert_eq!(storey_range("Penthouse", "07 TO 09"), 0.0);
    }

    #[test]
    fn floor_area_inside_band_tapers_to_ninety_percent() {
        assert!(close(floor_area(100.5, "91-110"), 1.0));
        assert!(close(floor_area(91.0, "91-110"), 0.9));
        assert!(close(floor_area(110.0, "91-110"), 0.9));
    }

    #[test]
    fn floor_area_outside_band_decays_by_zone() {
        // band 91-110: size 19, edges at 91 and 110
        assert!(close(floor_area(110.0 + 19.0, "91-110"), 0.4));
        assert!(close(floor_area(91.0 - 38.0, "91-110"), 0.15));
        assert!(close(floor_area(110.0 + 57.0, "91-110"), 0.05));
        assert!(close(floor_area(400.0, "91-110"), 0.05));
        let near = floor_area(85.0, "91-110");
        assert!(near < 0.7 && near > 0.4);
    }

    #[test]
    fn floor_area_rejects_bad_input() {
        assert_eq!(floor_area(f64::NAN, "91-110"), 0.0);
        assert_eq!(floor_area(0.0, "91-110"), 0.0);
        assert_eq!(floor_area(-5.0, "91-110"), 0.0);
        assert_eq!(floor_area(95.0, "huge"), 0.0);
    }

    #[test]
    fn price_inside_band_prefers_cheaper_end() {
        assert!(close(price(400_000.0, "400k-500k"), 1.0));
        assert!(close(price(450_000.0, "400k-500k"), 0.975));
        assert!(close(price(500_000.0, "400k-500k"), 0.95));
    }

    #[test]
    fn price_below_band_is_lenient() {
        assert!(close(price(350_000.0, "400k-500k"), 0.85));
        assert!(close(price(300_000.0, "400k-500k"), 0.65));
        assert!(close(price(200_000.0, "400k-500k"), 0.35));
        assert!(close(price(100_000.0, "400k-500k"), 0.1));
    }

    #[test]
    fn price_above_band_is_steep() {
        assert!(close(price(530_000.0, "400k-500k"), 0.45));
        assert!((price(550_000.0, "400k-500k") - 0.325).abs() < 0.01);
        assert!(close(price(580_000.0, "400k-500k"), 0.20));
        assert!(close(price(650_000.0, "400k-500k"), 0.05));
        assert!(close(price(900_000.0, "400k-500k"), 0.01));
    }

    #[test]
    fn price_rejects_bad_input() {
        assert_eq!(price(f64::INFINITY, "400k-500k"), 0.0);
        assert_eq!(price(0.0, "400k-500k"), 0.0);
        assert_eq!(price(450_000.0, "cheap"), 0.0);
    }

    #[test]
    fn model_families() {
        assert_eq!(model_family("DBSS"), Some(ModelFamily::Premium));
        assert_eq!(model_family("NEW GENERATION"), Some(ModelFamily::Improved));
        assert_eq!(model_family("MODEL A2"), Some(ModelFamily::Standard));
        assert_eq!(model_family("IMPROVED-MAISONETTE"), Some(ModelFamily::Special));
        assert_eq!(model_family("TYPE S1"), None);
    }

    #[test]
    fn flat_model_similarity() {
        assert_eq!(flat_model("Improved", " improved "), 1.0);
        assert_eq!(flat_model("New Generation", "Improved"), 0.75);
        assert_eq!(flat_model("DBSS", "Improved"), 0.5);
        assert_eq!(flat_model("Model A", "Improved"), 0.4);
        assert_eq!(flat_model("Terrace", "Standard"), 0.2);
        assert_eq!(flat_model("Type S1", "Type S1 Loft"), 0.6);
        assert_eq!(flat_model("Type S1", "2-room"), 0.1);
        assert_eq!(flat_model("", "Improved"), 0.0);
    }
}
