//! Name-based operation dispatch onto an existing session.
//!
//! Names resolve to the closed [`SessionOp`] set; anything else is reported
//! through the diagnostic channel and changes nothing. `set` accepts both the
//! snake_case patch shape and the classic `{radius, dir, rotate, animation}`
//! shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::arc::diagnostics::{Diagnostic, DiagnosticSink};
use crate::arc::engine::Direction;
use crate::arc::render::{Easing, Transition, TransformSink};
use crate::arc::session::{ArcPatch, Session};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOp {
    Set(ArcPatch),
    Disable,
}

/// What became of a dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// A layout pass ran and reached the transform sink.
    Applied,
    /// Valid call that changed nothing (empty patch, already flat).
    Unchanged,
    /// Rejected with a diagnostic.
    Skipped,
}

impl SessionOp {
    pub fn parse(name: &str, args: Value) -> Result<Self, Diagnostic> {
        match name {
            "set" | "reconfigure" => parse_set_args(name, args).map(SessionOp::Set),
            "disable" | "destroy" => Ok(SessionOp::Disable),
            _ => Err(Diagnostic::UnknownOperation { op: name.to_string() }),
        }
    }
}

/// Runs `name` against `target`. A missing target is the "called before
/// initialization" case.
pub fn dispatch(
    target: Option<&mut Session>,
    name: &str,
    args: Value,
    sink: &mut dyn TransformSink,
    diagnostics: &mut dyn DiagnosticSink,
) -> DispatchOutcome {
    let Some(session) = target else {
        diagnostics.report(Diagnostic::NotInitialized { op: name.to_string() });
        return DispatchOutcome::Skipped;
    };

    let op = match SessionOp::parse(name, args) {
        Ok(op) => op,
        Err(diagnostic) => {
            diagnostics.report(diagnostic);
            return DispatchOutcome::Skipped;
        }
    };

    match op {
        SessionOp::Set(patch) => {
            if !session.is_active() {
                diagnostics.report(Diagnostic::SessionFlattened { op: name.to_string() });
                return DispatchOutcome::Skipped;
            }
            if session.reconfigure(&patch, sink, diagnostics) {
                DispatchOutcome::Applied
            } else {
                DispatchOutcome::Unchanged
            }
        }
        SessionOp::Disable => {
            if !session.is_active() {
                return DispatchOutcome::Unchanged;
            }
            session.disable(sink);
            DispatchOutcome::Applied
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SetArgs {
    radius: Option<f64>,
    direction: Option<Direction>,
    /// `1` curves down, `-1` curves up.
    dir: Option<i64>,
    rotate_units: Option<bool>,
    rotate: Option<bool>,
    transition: Option<Transition>,
    animation: Option<AnimationArgs>,
}

#[derive(Debug, Deserialize)]
struct AnimationArgs {
    #[serde(default)]
    speed: u32,
    #[serde(default)]
    easing: Easing,
}

fn parse_set_args(name: &str, args: Value) -> Result<ArcPatch, Diagnostic> {
    let invalid = |reason: String| Diagnostic::InvalidArguments {
        op: name.to_string(),
        reason,
    };

    let args: SetArgs = if args.is_null() {
        SetArgs::default()
    } else {
        serde_json::from_value(args).map_err(|e| invalid(e.to_string()))?
    };

    let dir = match args.dir {
        Some(sign) => Some(
            Direction::from_sign(sign)
                .ok_or_else(|| invalid(format!("dir must be 1 or -1, got {sign}")))?,
        ),
        None => None,
    };

    let animation = args.animation.map(|a| Transition {
        duration_ms: a.speed,
        easing: a.easing,
    });

    let patch = ArcPatch {
        radius: args.radius,
        direction: args.direction.or(dir),
        rotate_units: args.rotate_units.or(args.rotate),
        transition: args.transition.or(animation),
    };
    patch.validate().map_err(invalid)?;
    Ok(patch)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::diagnostics::{CollectingSink, NullSink};
    use crate::arc::render::{CssTransformSink, DiscardSink};
    use crate::arc::session::{Measure, SessionOptions, SessionState};
    use crate::arc::splitter::SplitMode;
    use serde_json::json;

    struct Fixed;

    impl Measure for Fixed {
        fn measure(&self, _content: &str) -> f64 {
            10.0
        }
    }

    fn session() -> Session {
        Session::create(
            "arc",
            SplitMode::Characters,
            SessionOptions::default(),
            &Fixed,
            &mut DiscardSink,
            &mut NullSink,
        )
    }

    #[test]
    fn test_missing_session_reports_not_initialized() {
        let mut diags = CollectingSink::new();
        let out = dispatch(None, "set", json!({"radius": 50}), &mut DiscardSink, &mut diags);
        assert_eq!(out, DispatchOutcome::Skipped);
        assert_eq!(
            diags.into_inner(),
            vec![Diagnostic::NotInitialized { op: "set".into() }]
        );
    }

    #[test]
    fn test_unknown_and_private_names_are_rejected() {
        for name in ["spin", "_calc", "_rotateWord", ""] {
            let mut s = session();
            let before = s.transforms();
            let mut diags = CollectingSink::new();
            let out = dispatch(Some(&mut s), name, Value::Null, &mut DiscardSink, &mut diags);
            assert_eq!(out, DispatchOutcome::Skipped, "{name}");
            assert!(matches!(
                diags.into_inner().as_slice(),
                [Diagnostic::UnknownOperation { .. }]
            ));
            assert_eq!(s.transforms(), before);
        }
    }

    #[test]
    fn test_set_with_classic_arguments() {
        let op = SessionOp::parse(
            "set",
            json!({"radius": 300, "dir": -1, "animation": {"speed": 300, "easing": "ease-out"}}),
        )
        .unwrap();
        assert_eq!(
            op,
            SessionOp::Set(ArcPatch {
                radius: Some(300.0),
                direction: Some(Direction::Up),
                rotate_units: None,
                transition: Some(Transition {
                    duration_ms: 300,
                    easing: Easing::EaseOut,
                }),
            })
        );
    }

    #[test]
    fn test_set_with_patch_arguments() {
        let op = SessionOp::parse(
            "reconfigure",
            json!({"direction": "up", "rotate_units": false}),
        )
        .unwrap();
        let SessionOp::Set(patch) = op else {
            panic!("expected Set");
        };
        assert_eq!(patch.direction, Some(Direction::Up));
        assert_eq!(patch.rotate_units, Some(false));
        assert_eq!(patch.radius, None);
    }

    #[test]
    fn test_animation_speed_defaults_to_zero_linear() {
        let SessionOp::Set(patch) =
            SessionOp::parse("set", json!({"radius": 200, "animation": {}})).unwrap()
        else {
            panic!("expected Set");
        };
        assert_eq!(patch.transition, Some(Transition::default()));
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        for args in [
            json!({"dir": 2}),
            json!({"radius": -7}),
            json!({"radius": "big"}),
            json!({"animation": {"easing": "bounce"}}),
        ] {
            let err = SessionOp::parse("set", args.clone()).unwrap_err();
            assert!(
                matches!(err, Diagnostic::InvalidArguments { .. }),
                "{args} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_set_without_shape_fields_is_unchanged() {
        let mut s = session();
        let out = dispatch(
            Some(&mut s),
            "set",
            json!({"animation": {"speed": 300}}),
            &mut DiscardSink,
            &mut NullSink,
        );
        assert_eq!(out, DispatchOutcome::Unchanged);
    }

    #[test]
    fn test_set_applies_and_renders() {
        let mut s = session();
        let mut sink = CssTransformSink::new();
        let out = dispatch(
            Some(&mut s),
            "set",
            json!({"radius": 140, "dir": -1}),
            &mut sink,
            &mut NullSink,
        );
        assert_eq!(out, DispatchOutcome::Applied);
        assert_eq!(s.params().radius, 140.0);
        assert_eq!(sink.into_units().len(), 3);
    }

    #[test]
    fn test_destroy_then_set_stays_flat() {
        let mut s = session();
        assert_eq!(
            dispatch(Some(&mut s), "destroy", Value::Null, &mut DiscardSink, &mut NullSink),
            DispatchOutcome::Applied
        );
        assert_eq!(s.state(), SessionState::Flattened);

        let mut diags = CollectingSink::new();
        let out = dispatch(
            Some(&mut s),
            "set",
            json!({"radius": 300}),
            &mut DiscardSink,
            &mut diags,
        );
        assert_eq!(out, DispatchOutcome::Skipped);
        assert_eq!(s.state(), SessionState::Flattened);
        assert!(matches!(
            diags.into_inner().as_slice(),
            [Diagnostic::SessionFlattened { .. }]
        ));

        assert_eq!(
            dispatch(Some(&mut s), "disable", Value::Null, &mut DiscardSink, &mut NullSink),
            DispatchOutcome::Unchanged
        );
    }
}
