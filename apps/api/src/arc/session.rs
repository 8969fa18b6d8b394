//! Layout Session: owns one arc instance's parameters and cached layout.
//!
//! Two states: `Active` (curvature may be non-zero) and `Flattened`
//! (terminal, identity transforms). Every parameter change or resize runs a
//! full layout pass; nothing is diffed or coalesced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::arc::diagnostics::{Diagnostic, DiagnosticSink};
use crate::arc::engine::{
    layout, ArcLayout, ArcParameters, Direction, MeasuredUnit, UnitTransform, FLAT_RADIUS,
};
use crate::arc::render::{Transition, TransformSink};
use crate::arc::resize::{ResizeHub, ResizeSubscription, SessionId};
use crate::arc::splitter::{split, DisplayUnit, SplitMode};

/// Measurement collaborator: width of a unit's text in its natural form.
pub trait Measure {
    fn measure(&self, content: &str) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Flattened,
}

/// Initial configuration for [`Session::create`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionOptions {
    pub params: ArcParameters,
    /// Recompute on resize notifications (fitText-style sizing).
    pub fit_text: bool,
}

/// Partial update for [`Session::reconfigure`]. Only the three shape fields
/// count as a change; a lone `transition` is not.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcPatch {
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub rotate_units: Option<bool>,
    #[serde(default)]
    pub transition: Option<Transition>,
}

impl ArcPatch {
    pub fn is_empty(&self) -> bool {
        self.radius.is_none() && self.direction.is_none() && self.rotate_units.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.radius {
            Some(radius) => validate_radius(radius),
            None => Ok(()),
        }
    }

    fn merge_into(&self, params: &mut ArcParameters) {
        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(direction) = self.direction {
            params.direction = direction;
        }
        if let Some(rotate_units) = self.rotate_units {
            params.rotate_units = rotate_units;
        }
    }
}

/// A radius is either non-negative or exactly [`FLAT_RADIUS`].
pub fn validate_radius(radius: f64) -> Result<(), String> {
    if radius.is_finite() && (radius >= 0.0 || radius == FLAT_RADIUS) {
        Ok(())
    } else {
        Err(format!("radius must be >= 0 or -1, got {radius}"))
    }
}

/// Per-unit cache slot, addressed by unit index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitRecord {
    pub width: f64,
    pub center: f64,
    pub transform: UnitTransform,
}

/// Geometry of the last pass, without the per-unit arrays.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayoutSummary {
    pub total_width: f64,
    pub effective_radius: Option<f64>,
    pub arc_length: f64,
}

impl From<&ArcLayout> for LayoutSummary {
    fn from(l: &ArcLayout) -> Self {
        Self {
            total_width: l.total_width,
            effective_radius: l.effective_radius,
            arc_length: l.arc_length,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    mode: SplitMode,
    units: Vec<DisplayUnit>,
    params: ArcParameters,
    fit_text: bool,
    state: SessionState,
    records: Vec<UnitRecord>,
    summary: LayoutSummary,
    resize: Option<ResizeSubscription>,
}

impl Session {
    /// Splits `text`, measures every unit, runs the first layout pass and
    /// hands the result to `sink`.
    pub fn create(
        text: &str,
        mode: SplitMode,
        options: SessionOptions,
        measurer: &dyn Measure,
        sink: &mut dyn TransformSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Self {
        let units = split(text, mode);
        let mut session = Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            mode,
            records: Vec::with_capacity(units.len()),
            units,
            params: options.params,
            fit_text: options.fit_text,
            state: SessionState::Active,
            summary: LayoutSummary::default(),
            resize: None,
        };

        session.measure(measurer, diagnostics);
        session.recompute();
        session.apply(sink, None);

        info!(
            session_id = %session.id,
            units = session.units.len(),
            mode = ?mode,
            radius = ?session.summary.effective_radius,
            "arc session created"
        );
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    pub fn params(&self) -> &ArcParameters {
        &self.params
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn fit_text(&self) -> bool {
        self.fit_text
    }

    pub fn summary(&self) -> &LayoutSummary {
        &self.summary
    }

    /// Cached records; empty once flattened.
    pub fn records(&self) -> &[UnitRecord] {
        &self.records
    }

    pub fn is_subscribed_to_resize(&self) -> bool {
        self.resize.is_some()
    }

    /// Current transform for every unit, in unit order.
    pub fn transforms(&self) -> Vec<UnitTransform> {
        if self.records.len() == self.units.len() {
            self.records.iter().map(|r| r.transform).collect()
        } else {
            vec![UnitTransform::IDENTITY; self.units.len()]
        }
    }

    /// Pushes the current transforms to `sink`, in unit order.
    pub fn apply(&self, sink: &mut dyn TransformSink, transition: Option<&Transition>) {
        let curved = !self.params.is_flat();
        for (index, transform) in self.transforms().iter().enumerate() {
            sink.apply(index, curved.then_some(transform), transition);
        }
    }

    /// Subscribes to `hub` if this session wants resize notifications.
    pub fn attach_resize(&mut self, hub: &ResizeHub) {
        if self.is_active() && self.fit_text && self.resize.is_none() {
            self.resize = Some(hub.subscribe(self.id));
        }
    }

    /// Merges `patch` over the current parameters and relays out. Returns
    /// whether a layout pass ran.
    pub fn reconfigure(
        &mut self,
        patch: &ArcPatch,
        sink: &mut dyn TransformSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> bool {
        if !self.is_active() {
            diagnostics.report(Diagnostic::SessionFlattened { op: "set".into() });
            return false;
        }
        if patch.is_empty() {
            debug!(session_id = %self.id, "reconfigure: nothing to change");
            return false;
        }

        patch.merge_into(&mut self.params);
        self.recompute();
        self.apply(sink, patch.transition.as_ref());

        debug!(
            session_id = %self.id,
            radius = self.params.radius,
            direction = ?self.params.direction,
            rotate_units = self.params.rotate_units,
            "reconfigured"
        );
        true
    }

    /// Flattens the arc for good: identity transforms go to `sink`, the
    /// per-unit cache is released and the resize subscription dropped.
    /// The unit sequence stays for the host's own teardown.
    pub fn disable(&mut self, sink: &mut dyn TransformSink) {
        if !self.is_active() {
            return;
        }
        self.state = SessionState::Flattened;
        self.params.radius = FLAT_RADIUS;
        self.records = Vec::new();
        self.summary = LayoutSummary::default();
        self.resize = None;
        self.apply(sink, None);

        info!(session_id = %self.id, "arc session flattened");
    }

    /// Resize notification: widths may have changed, so re-measure and run
    /// a full pass. Returns whether anything ran.
    pub fn on_resize(
        &mut self,
        measurer: &dyn Measure,
        sink: &mut dyn TransformSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> bool {
        if !self.is_active() {
            return false;
        }
        self.measure(measurer, diagnostics);
        self.recompute();
        self.apply(sink, None);
        true
    }

    fn measure(&mut self, measurer: &dyn Measure, diagnostics: &mut dyn DiagnosticSink) {
        self.records = self
            .units
            .iter()
            .map(|unit| {
                let raw = measurer.measure(&unit.content);
                let width = if raw.is_finite() && raw >= 0.0 {
                    raw
                } else {
                    diagnostics.report(Diagnostic::InvalidWidth {
                        index: unit.index,
                        width: raw,
                    });
                    0.0
                };
                UnitRecord {
                    width,
                    center: 0.0,
                    transform: UnitTransform::IDENTITY,
                }
            })
            .collect();
    }

    fn recompute(&mut self) {
        let measured: Vec<MeasuredUnit> = self
            .units
            .iter()
            .zip(&self.records)
            .map(|(unit, record)| MeasuredUnit::new(unit, record.width))
            .collect();

        let result = layout(&measured, &self.params);

        for ((record, transform), center) in self
            .records
            .iter_mut()
            .zip(&result.transforms)
            .zip(&result.centers)
        {
            record.transform = *transform;
            record.center = *center;
        }
        self.summary = LayoutSummary::from(&result);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
