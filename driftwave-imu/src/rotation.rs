//! Body-frame to navigation-frame rotation
//!
//! The attitude filter tracks the buoy's orientation as a unit quaternion.
//! Rotating the measured body-frame acceleration through that quaternion
//! (`v' = q v q⁻¹`, vector part) yields acceleration in the North-East-Down
//! navigation frame, which is what wave-height integration downstream
//! consumes.
//!
//! Pure functions, no state. The quaternion must be normalized; the attitude
//! filter guarantees this for its outputs.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Rotate a body-frame vector into the navigation (NED) frame.
#[inline]
pub fn body_to_ned(orientation: &UnitQuaternion<f32>, body: Vector3<f32>) -> Vector3<f32> {
    orientation.transform_vector(&body)
}

/// Build a unit quaternion from scalar-first components.
///
/// Attitude filters hand back raw `(w, x, y, z)` components; this
/// renormalizes them, so a filter output that drifted slightly off unit
/// length is still usable.
#[inline]
pub fn quaternion_from_wxyz(w: f32, x: f32, y: f32, z: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
}
