//! Rotation angle arithmetic.
//!
//! Angles are degrees in `[0, 360)`. Rotation operations only ever touch the
//! angle of a slot, never its image.

/// Degrees of rotation per pixel of pointer drag.
pub const DEFAULT_DRAG_SENSITIVITY: f64 = 0.2;

/// Wrap `angle` into `[0, 360)`.
///
/// Non-finite input maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Relative delta for a pointer drag of `(dx, dy)` pixels.
///
/// Dragging right or down turns the image counter-clockwise.
pub fn drag_delta(dx: f64, dy: f64, sensitivity: f64) -> f64 {
    -(dx + dy) * sensitivity
}

/// One rotation gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationOp {
    /// Add a relative delta in degrees (may be negative)
    By(f64),
    /// Quarter turn
    Quarter,
    /// Half turn
    Half,
    /// Back to 0
    Reset,
}

impl RotationOp {
    /// New angle after applying this operation to `current`.
    pub fn apply(self, current: f64) -> f64 {
        match self {
            RotationOp::By(delta) => normalize_angle(current + delta),
            RotationOp::Quarter => normalize_angle(current + 90.0),
            RotationOp::Half => normalize_angle(current + 180.0),
            RotationOp::Reset => 0.0,
        }
    }
}
