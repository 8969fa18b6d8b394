// Measurement side of the host: static font metrics and fitText sizing.
// The arc core only sees these through the `Measure` trait.

pub mod fit_text;
pub mod font_metrics;

pub use fit_text::FitText;
pub use font_metrics::{FontFamily, FontMeasurer};
