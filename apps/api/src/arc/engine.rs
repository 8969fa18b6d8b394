//! Arc Layout Engine: pure geometry from measured widths to per-unit transforms.
//!
//! # Algorithm
//! 1. `radius == -1` → identity transform for every unit.
//! 2. Accumulate the flat baseline: total width and each unit's center.
//! 3. Clamp the radius to at least half the total width, so the whole text
//!    fits as a chord and every inverse-trig argument stays in [-1, 1].
//! 4. The arc spanned by that chord is shared out to the units in
//!    proportion to their widths, not their count.
//! 5. Each unit sits on the midpoint of its own chord; the offset is the
//!    difference between that midpoint and its flat-baseline center.
//!
//! Offsets and angles are truncated toward zero, matching what browsers
//! get from `0 | value`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::arc::splitter::DisplayUnit;

/// Radius sentinel meaning "curvature disabled".
pub const FLAT_RADIUS: f64 = -1.0;

// ────────────────────────────────────────────────────────────────────────────
// Parameters
// ────────────────────────────────────────────────────────────────────────────

/// Which side of the baseline the circle's center lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Curve bends down (`dir: 1`).
    #[default]
    Down,
    /// Curve bends up (`dir: -1`).
    Up,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Down => 1,
            Direction::Up => -1,
        }
    }

    pub fn from_sign(sign: i64) -> Option<Self> {
        match sign {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcParameters {
    /// Requested radius. `0` means "as tight as the text allows";
    /// [`FLAT_RADIUS`] disables curvature.
    pub radius: f64,
    pub direction: Direction,
    pub rotate_units: bool,
}

impl Default for ArcParameters {
    fn default() -> Self {
        Self {
            radius: 0.0,
            direction: Direction::Down,
            rotate_units: true,
        }
    }
}

impl ArcParameters {
    pub fn is_flat(&self) -> bool {
        self.radius == FLAT_RADIUS
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs and outputs
// ────────────────────────────────────────────────────────────────────────────

/// A display unit (by index) with the width its natural, unrotated
/// rendering takes up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasuredUnit {
    pub index: usize,
    pub width: f64,
}

impl MeasuredUnit {
    pub fn new(unit: &DisplayUnit, width: f64) -> Self {
        Self {
            index: unit.index,
            width,
        }
    }
}

/// Translation and rotation for one unit. Identity means "leave it flat".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitTransform {
    pub x: i32,
    pub y: i32,
    pub angle_degrees: i32,
}

impl UnitTransform {
    pub const IDENTITY: UnitTransform = UnitTransform {
        x: 0,
        y: 0,
        angle_degrees: 0,
    };
}

/// Result of one layout pass. `transforms` and `centers` are parallel to the
/// input units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcLayout {
    pub transforms: Vec<UnitTransform>,
    /// Flat-baseline midpoint of every unit.
    pub centers: Vec<f64>,
    pub total_width: f64,
    /// Radius actually used after clamping; `None` when nothing was curved.
    pub effective_radius: Option<f64>,
    pub arc_length: f64,
}

impl ArcLayout {
    fn identity(units: &[MeasuredUnit], centers: Vec<f64>, total_width: f64) -> Self {
        Self {
            transforms: vec![UnitTransform::IDENTITY; units.len()],
            centers,
            total_width,
            effective_radius: None,
            arc_length: total_width,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Smallest radius at which a text of `total_width` fits on the circle.
pub fn min_radius(total_width: f64) -> f64 {
    total_width / 2.0
}

/// Radius the engine will use for a requested radius. Applied before any
/// trigonometry, unconditionally.
pub fn clamp_radius(requested: f64, total_width: f64) -> f64 {
    requested.max(min_radius(total_width))
}

pub fn layout(units: &[MeasuredUnit], params: &ArcParameters) -> ArcLayout {
    let (total_width, centers) = accumulate_baseline(units);

    if params.is_flat() || total_width <= 0.0 {
        return ArcLayout::identity(units, centers, total_width);
    }

    let radius = clamp_radius(params.radius, total_width);
    let half_width = total_width / 2.0;

    let angle_total = 2.0 * (total_width / (2.0 * radius)).asin();
    let arc_length = radius * angle_total;

    let sign = params.direction.sign();
    let mut iterator_x = 0.0_f64;
    let mut transforms = Vec::with_capacity(units.len());

    for (measured, &center) in units.iter().zip(&centers) {
        let unit_arc_length = (measured.width / total_width) * arc_length;
        let beta = unit_arc_length / radius;
        // distance from the circle's center to the midpoint of this unit's chord
        let h = radius * (beta / 2.0).cos();
        let alpha = unit_acos((half_width - iterator_x) / radius);
        let theta = alpha + beta / 2.0;

        let x = theta.cos() * h;
        let y = theta.sin() * h;

        let xpos = iterator_x + (half_width - x - iterator_x).abs();

        let x_offset = truncate(xpos - center);
        let y_offset = truncate(radius - y);
        let angle = if params.rotate_units {
            truncate(-(x / radius).asin() * (180.0 / PI))
        } else {
            0
        };

        iterator_x = 2.0 * xpos - iterator_x;

        transforms.push(UnitTransform {
            x: x_offset,
            y: y_offset * sign,
            angle_degrees: angle * sign,
        });
    }

    ArcLayout {
        transforms,
        centers,
        total_width,
        effective_radius: Some(radius),
        arc_length,
    }
}

/// Total width plus the running-sum midpoint of each unit.
fn accumulate_baseline(units: &[MeasuredUnit]) -> (f64, Vec<f64>) {
    let mut running = 0.0_f64;
    let centers = units
        .iter()
        .map(|u| {
            running += u.width;
            running - u.width / 2.0
        })
        .collect();
    (running, centers)
}

/// `acos` whose ratio is pinned to [-1, 1]; accumulated rounding in the
/// cursor can overshoot by an ulp or two.
fn unit_acos(ratio: f64) -> f64 {
    ratio.clamp(-1.0, 1.0).acos()
}

fn truncate(v: f64) -> i32 {
    // `as` truncates toward zero and saturates
    v as i32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
