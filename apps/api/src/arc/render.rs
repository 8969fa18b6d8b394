//! Transform application: the hand-off from a layout pass to whatever draws
//! the units.
//!
//! The core only calls [`TransformSink::apply`]; [`CssTransformSink`] is the
//! browser-facing implementation returned by the HTTP API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arc::engine::UnitTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn as_css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Ease => "ease",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Optional animation for a reconfigure. Absent means snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub duration_ms: u32,
    #[serde(default)]
    pub easing: Easing,
}

/// Receives every unit's transform after a layout pass, in unit order.
///
/// `transform` is `None` while curvature is disabled (radius -1), telling the
/// renderer to hand the unit back to normal flow.
pub trait TransformSink {
    fn apply(
        &mut self,
        index: usize,
        transform: Option<&UnitTransform>,
        transition: Option<&Transition>,
    );
}

/// Ignores everything; for callers that read transforms off the session.
pub struct DiscardSink;

impl TransformSink for DiscardSink {
    fn apply(
        &mut self,
        _index: usize,
        _transform: Option<&UnitTransform>,
        _transition: Option<&Transition>,
    ) {
    }
}

/// CSS for one unit, ready to drop into a `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitCss {
    pub index: usize,
    pub transform: String,
    pub transition: String,
}

/// Renders each applied transform to CSS `transform` / `transition` values.
///
/// A disabled curve renders as `none`. A curved layout always renders the
/// full translate/rotate string, even for a unit that lands at the origin.
#[derive(Debug, Default)]
pub struct CssTransformSink {
    pub units: Vec<UnitCss>,
}

impl CssTransformSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_units(self) -> Vec<UnitCss> {
        self.units
    }
}

impl TransformSink for CssTransformSink {
    fn apply(
        &mut self,
        index: usize,
        transform: Option<&UnitTransform>,
        transition: Option<&Transition>,
    ) {
        self.units.push(UnitCss {
            index,
            transform: transform.map_or_else(|| "none".to_string(), css_transform),
            transition: css_transition(transition),
        });
    }
}

pub fn css_transform(t: &UnitTransform) -> String {
    format!(
        "translateX({}px) translateY({}px) rotate({}deg)",
        t.x, t.y, t.angle_degrees
    )
}

pub fn css_transition(transition: Option<&Transition>) -> String {
    match transition {
        Some(t) => format!("all {}ms {}", t.duration_ms, t.easing),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_transform_format() {
        let t = UnitTransform {
            x: -3,
            y: 12,
            angle_degrees: -27,
        };
        assert_eq!(
            css_transform(&t),
            "translateX(-3px) translateY(12px) rotate(-27deg)"
        );
    }

    #[test]
    fn test_identity_on_a_curve_renders_full_transform() {
        assert_eq!(
            css_transform(&UnitTransform::IDENTITY),
            "translateX(0px) translateY(0px) rotate(0deg)"
        );
    }

    #[test]
    fn test_disabled_curve_renders_none() {
        let mut sink = CssTransformSink::new();
        sink.apply(0, None, None);
        assert_eq!(sink.into_units()[0].transform, "none");
    }

    #[test]
    fn test_transition_format_and_absence() {
        let t = Transition {
            duration_ms: 300,
            easing: Easing::EaseOut,
        };
        assert_eq!(css_transition(Some(&t)), "all 300ms ease-out");
        assert_eq!(css_transition(None), "none");
    }

    #[test]
    fn test_transition_defaults_from_json() {
        let t: Transition = serde_json::from_str(r#"{"duration_ms": 200}"#).unwrap();
        assert_eq!(t.easing, Easing::Linear);

        let t: Transition = serde_json::from_str(r#"{"easing": "ease-in-out"}"#).unwrap();
        assert_eq!(t.duration_ms, 0);
        assert_eq!(t.easing, Easing::EaseInOut);
    }

    #[test]
    fn test_css_sink_collects_in_order() {
        let mut sink = CssTransformSink::new();
        sink.apply(0, None, None);
        sink.apply(
            1,
            Some(&UnitTransform {
                x: 1,
                y: 2,
                angle_degrees: 3,
            }),
            None,
        );
        let units = sink.into_units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].index, 0);
        assert_eq!(units[1].transform, "translateX(1px) translateY(2px) rotate(3deg)");
    }
}
