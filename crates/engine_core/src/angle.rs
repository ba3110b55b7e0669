//! Helpers for attitude angles in degrees.

/// Wrap an angle in degrees into `(-180, 180]`.
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
