//! fitText-style font sizing: the font size follows the container width.
//!
//! `size = clamp(container_width / (compressor * 10), min, max)`.
//! Sessions with fit-text on are re-measured at the new size on every
//! viewport resize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitText {
    /// Larger values shrink text faster. Non-positive values count as 1.
    pub compressor: f32,
    pub min_font_px: f32,
    pub max_font_px: f32,
}

impl Default for FitText {
    fn default() -> Self {
        Self {
            compressor: 1.0,
            min_font_px: f32::NEG_INFINITY,
            max_font_px: f32::INFINITY,
        }
    }
}

impl FitText {
    pub fn font_size_px(&self, container_width_px: f32) -> f32 {
        let compressor = if self.compressor > 0.0 { self.compressor } else { 1.0 };
        (container_width_px / (compressor * 10.0))
            .min(self.max_font_px)
            .max(self.min_font_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_is_width_over_ten() {
        let fit = FitText::default();
        assert_eq!(fit.font_size_px(640.0), 64.0);
    }

    #[test]
    fn test_compressor_divides() {
        let fit = FitText {
            compressor: 2.0,
            ..FitText::default()
        };
        assert_eq!(fit.font_size_px(640.0), 32.0);
    }

    #[test]
    fn test_non_positive_compressor_counts_as_one() {
        let fit = FitText {
            compressor: 0.0,
            ..FitText::default()
        };
        assert_eq!(fit.font_size_px(300.0), 30.0);
    }

    #[test]
    fn test_bounds_clamp_both_ends() {
        let fit = FitText {
            compressor: 1.0,
            min_font_px: 12.0,
            max_font_px: 48.0,
        };
        assert_eq!(fit.font_size_px(50.0), 12.0);
        assert_eq!(fit.font_size_px(300.0), 30.0);
        assert_eq!(fit.font_size_px(2000.0), 48.0);
    }
}
