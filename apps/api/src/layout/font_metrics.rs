//! Static font metrics, the service's measurement collaborator.
//!
//! Widths are em units relative to the font size. One reference table
//! (Inter) covers ASCII 0x20..=0x7E; the other families are expressed as a
//! uniform scale of it. Good enough to place glyphs on an arc without a
//! shaping engine; a browser host measures for real.
//!
//! Index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arc::session::Measure;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Humanist sans-serif; the reference table.
    #[default]
    Inter,
    /// Old-style serif, about 85% of Inter.
    EbGaramond,
    /// Geometric sans-serif, about 105% of Inter.
    Lato,
    /// Condensed display sans-serif, about 68% of Inter.
    Oswald,
    /// TeX's Computer Modern, about 90% of Inter.
    ComputerModern,
}

impl FontFamily {
    /// Width of this family relative to the reference table.
    pub fn width_scale(self) -> f32 {
        match self {
            FontFamily::Inter => 1.0,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "inter" => Ok(FontFamily::Inter),
            "eb_garamond" | "garamond" => Ok(FontFamily::EbGaramond),
            "lato" => Ok(FontFamily::Lato),
            "oswald" => Ok(FontFamily::Oswald),
            "computer_modern" | "cm" => Ok(FontFamily::ComputerModern),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reference table
// ────────────────────────────────────────────────────────────────────────────

/// `REFERENCE_WIDTHS[i]` = em width of ASCII `(i + 32)` in Inter.
#[rustfmt::skip]
static REFERENCE_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0-9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A-M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N-Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a-m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n-z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

/// Fallback for codepoints outside the table.
const REFERENCE_AVERAGE_WIDTH: f32 = 0.52;

fn reference_width(c: char) -> f32 {
    let code = match c {
        // NBSP placeholders occupy a regular space
        '\u{a0}' => 0x20,
        c => c as usize,
    };
    if (32..=126).contains(&code) {
        REFERENCE_WIDTHS[code - 32]
    } else if c.is_control() {
        0.0
    } else {
        REFERENCE_AVERAGE_WIDTH
    }
}

/// Em width of `s` in `family`.
pub fn measure_em(s: &str, family: FontFamily) -> f32 {
    let reference: f32 = s.chars().map(reference_width).sum();
    reference * family.width_scale()
}

// ────────────────────────────────────────────────────────────────────────────
// Measurer
// ────────────────────────────────────────────────────────────────────────────

/// Measures unit text in pixels for one family at one size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMeasurer {
    pub family: FontFamily,
    pub size_px: f32,
}

impl FontMeasurer {
    pub fn new(family: FontFamily, size_px: f32) -> Self {
        Self { family, size_px }
    }
}

impl Measure for FontMeasurer {
    fn measure(&self, content: &str) -> f64 {
        f64::from(measure_em(content, self.family)) * f64::from(self.size_px)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(measure_em("", FontFamily::Inter), 0.0);
    }

    #[test]
    fn test_measure_ascii_word() {
        // "Arc" = A(0.67) + r(0.33) + c(0.50) = 1.50
        let w = measure_em("Arc", FontFamily::Inter);
        assert!((w - 1.50).abs() < 1e-4, "got {w}");
    }

    #[test]
    fn test_nbsp_measures_like_space() {
        let space = measure_em(" ", FontFamily::Lato);
        let nbsp = measure_em("\u{a0}", FontFamily::Lato);
        assert!(space > 0.0);
        assert_eq!(space, nbsp);
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let w = measure_em("é", FontFamily::Inter);
        assert!((w - REFERENCE_AVERAGE_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_condensed_family_is_narrower() {
        let text = "Curved headline";
        assert!(measure_em(text, FontFamily::Oswald) < measure_em(text, FontFamily::Lato));
    }

    #[test]
    fn test_measurer_scales_with_pixel_size() {
        let small = FontMeasurer::new(FontFamily::Inter, 10.0).measure("m");
        let large = FontMeasurer::new(FontFamily::Inter, 20.0).measure("m");
        assert!((small - 8.3).abs() < 1e-4, "got {small}");
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_every_printable_ascii_has_positive_width() {
        for c in ' '..='~' {
            assert!(reference_width(c) > 0.0, "{c:?}");
        }
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("Inter".parse::<FontFamily>(), Ok(FontFamily::Inter));
        assert_eq!("eb-garamond".parse::<FontFamily>(), Ok(FontFamily::EbGaramond));
        assert_eq!("Computer Modern".parse::<FontFamily>(), Ok(FontFamily::ComputerModern));
        assert!("comic sans".parse::<FontFamily>().is_err());
    }
}
