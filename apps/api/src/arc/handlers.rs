//! Axum route handlers for the Arc API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::arc::diagnostics::{CollectingSink, Diagnostic, TracingSink};
use crate::arc::engine::{ArcParameters, Direction, UnitTransform};
use crate::arc::ops::{dispatch, DispatchOutcome};
use crate::arc::registry::ArcEntry;
use crate::arc::render::{CssTransformSink, DiscardSink};
use crate::arc::session::{
    validate_radius, ArcPatch, LayoutSummary, Session, SessionOptions, SessionState,
};
use crate::arc::splitter::SplitMode;
use crate::errors::AppError;
use crate::layout::{FontFamily, FontMeasurer};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateArcRequest {
    pub text: String,
    #[serde(default)]
    pub mode: SplitMode,
    pub font: Option<FontFamily>,
    pub font_size_px: Option<f32>,
    pub radius: Option<f64>,
    pub direction: Option<Direction>,
    pub rotate_units: Option<bool>,
    #[serde(default)]
    pub fit_text: bool,
    /// Only used with `fit_text`: sizes the font from the container.
    pub container_width_px: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    pub container_width_px: f32,
}

#[derive(Debug, Serialize)]
pub struct UnitView {
    pub index: usize,
    pub content: String,
    pub placeholder: bool,
    pub trailing: String,
    /// Measured width; absent once the session is flattened.
    pub width: Option<f64>,
    pub transform: UnitTransform,
    pub css_transform: String,
    pub css_transition: String,
}

#[derive(Debug, Serialize)]
pub struct ArcResponse {
    pub arc_id: Uuid,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub mode: SplitMode,
    pub params: ArcParameters,
    pub fit_text: bool,
    pub resize_subscribed: bool,
    pub font: FontMeasurer,
    pub layout: LayoutSummary,
    pub units: Vec<UnitView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct OpResponse {
    pub outcome: DispatchOutcome,
    pub diagnostics: Vec<Diagnostic>,
    pub arc: Option<ArcResponse>,
}

#[derive(Debug, Serialize)]
pub struct ResizeResponse {
    pub container_width_px: f32,
    pub font_size_px: f32,
    pub recomputed: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/arcs
///
/// Splits and measures the text, runs the first layout pass and stores the
/// session.
pub async fn handle_create_arc(
    State(state): State<AppState>,
    Json(req): Json<CreateArcRequest>,
) -> Result<(StatusCode, Json<ArcResponse>), AppError> {
    if let Some(radius) = req.radius {
        validate_radius(radius).map_err(AppError::Validation)?;
    }
    if let Some(size) = req.font_size_px {
        require_positive("font_size_px", size)?;
    }
    if let Some(width) = req.container_width_px {
        require_positive("container_width_px", width)?;
    }

    let size_px = match (req.fit_text, req.container_width_px) {
        (true, Some(width)) => state.config.fit_text.font_size_px(width),
        _ => req.font_size_px.unwrap_or(state.config.default_font_size_px),
    };
    let font = FontMeasurer::new(req.font.unwrap_or(state.config.default_font), size_px);

    let defaults = ArcParameters::default();
    let options = SessionOptions {
        params: ArcParameters {
            radius: req.radius.unwrap_or(defaults.radius),
            direction: req.direction.unwrap_or(defaults.direction),
            rotate_units: req.rotate_units.unwrap_or(defaults.rotate_units),
        },
        fit_text: req.fit_text,
    };

    let mut css = CssTransformSink::new();
    let mut diagnostics = CollectingSink::new();
    let mut session = Session::create(
        &req.text,
        req.mode,
        options,
        &font,
        &mut css,
        &mut diagnostics,
    );
    session.attach_resize(&state.resize);

    let entry = ArcEntry { session, font };
    let view = arc_view(&entry, css, diagnostics.into_inner());
    state.sessions.insert(entry)?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/arcs/:id
pub async fn handle_get_arc(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArcResponse>, AppError> {
    state
        .sessions
        .with_entry(id, |entry| {
            entry.map(|e| arc_view(e, CssTransformSink::new(), Vec::new()))
        })
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/v1/arcs/:id
///
/// Partial update of radius / direction / rotate_units with an optional
/// transition. A body with none of the three changes nothing.
pub async fn handle_reconfigure_arc(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ArcPatch>,
) -> Result<Json<ArcResponse>, AppError> {
    patch.validate().map_err(AppError::Validation)?;

    state.sessions.with_entry(id, |entry| {
        let entry = entry.ok_or_else(|| not_found(id))?;
        let mut css = CssTransformSink::new();
        let mut diagnostics = CollectingSink::new();
        entry.session.reconfigure(&patch, &mut css, &mut diagnostics);
        Ok(Json(arc_view(entry, css, diagnostics.into_inner())))
    })
}

/// POST /api/v1/arcs/:id/disable
///
/// Flattens the arc permanently. Curving the same text again needs a new
/// session.
pub async fn handle_disable_arc(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArcResponse>, AppError> {
    state.sessions.with_entry(id, |entry| {
        let entry = entry.ok_or_else(|| not_found(id))?;
        let mut css = CssTransformSink::new();
        entry.session.disable(&mut css);
        Ok(Json(arc_view(entry, css, Vec::new())))
    })
}

/// DELETE /api/v1/arcs/:id
pub async fn handle_delete_arc(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/arcs/:id/ops/:op
///
/// Name-based dispatch. Unknown sessions and unknown operations are not HTTP
/// errors: they come back as `skipped` with a diagnostic.
pub async fn handle_dispatch_op(
    State(state): State<AppState>,
    Path((id, op)): Path<(Uuid, String)>,
    body: Option<Json<Value>>,
) -> Json<OpResponse> {
    let args = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let response = state.sessions.with_entry(id, |entry| {
        let mut css = CssTransformSink::new();
        let mut diagnostics = CollectingSink::new();
        match entry {
            Some(entry) => {
                let outcome = dispatch(
                    Some(&mut entry.session),
                    &op,
                    args,
                    &mut css,
                    &mut diagnostics,
                );
                OpResponse {
                    outcome,
                    diagnostics: diagnostics.into_inner(),
                    arc: Some(arc_view(entry, css, Vec::new())),
                }
            }
            None => {
                let outcome = dispatch(None, &op, args, &mut css, &mut diagnostics);
                OpResponse {
                    outcome,
                    diagnostics: diagnostics.into_inner(),
                    arc: None,
                }
            }
        }
    });

    Json(response)
}

/// POST /api/v1/viewport/resize
///
/// The container changed width: every fit-text session gets a new font size,
/// is re-measured and laid out again.
pub async fn handle_viewport_resize(
    State(state): State<AppState>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<ResizeResponse>, AppError> {
    require_positive("container_width_px", req.container_width_px)?;
    let font_size_px = state.config.fit_text.font_size_px(req.container_width_px);

    let mut recomputed = 0;
    for id in state.resize.notify() {
        let ran = state.sessions.with_entry(id, |entry| match entry {
            Some(entry) => {
                entry.font.size_px = font_size_px;
                entry
                    .session
                    .on_resize(&entry.font, &mut DiscardSink, &mut TracingSink)
            }
            None => false,
        });
        if ran {
            recomputed += 1;
        }
    }

    tracing::debug!(
        width = req.container_width_px,
        font_size_px,
        recomputed,
        "viewport resize handled"
    );

    Ok(Json(ResizeResponse {
        container_width_px: req.container_width_px,
        font_size_px,
        recomputed,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Arc {id} not found"))
}

fn require_positive(field: &str, value: f32) -> Result<(), AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be a positive number"
        )))
    }
}

/// Builds the response for `entry`. `css` holds whatever the last operation
/// applied; if it applied nothing, the current transforms are rendered
/// without a transition.
fn arc_view(entry: &ArcEntry, mut css: CssTransformSink, diagnostics: Vec<Diagnostic>) -> ArcResponse {
    let session = &entry.session;
    if css.units.is_empty() {
        session.apply(&mut css, None);
    }

    let records = session.records();
    let units = session
        .units()
        .iter()
        .zip(session.transforms())
        .zip(css.into_units())
        .map(|((unit, transform), css)| UnitView {
            index: unit.index,
            content: unit.content.clone(),
            placeholder: unit.placeholder,
            trailing: unit.trailing.clone(),
            width: records.get(unit.index).map(|r| r.width),
            transform,
            css_transform: css.transform,
            css_transition: css.transition,
        })
        .collect();

    ArcResponse {
        arc_id: session.id(),
        state: session.state(),
        created_at: session.created_at(),
        mode: session.mode(),
        params: *session.params(),
        fit_text: session.fit_text(),
        resize_subscribed: session.is_subscribed_to_resize(),
        font: entry.font,
        layout: *session.summary(),
        units,
        diagnostics,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
