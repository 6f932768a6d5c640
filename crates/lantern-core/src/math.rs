// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Math types shared by the engine, re-exported from `glam`.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Builds a rotation from Euler angles in degrees, applied X then Y then Z,
/// which yields the matrix `Rz * Ry * Rx`.
pub fn rotation_from_euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    )
}

/// Composes `T * Rz * Ry * Rx * S`.
pub fn compose_trs(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        scale,
        rotation_from_euler_degrees(rotation_degrees),
        position,
    )
}

/// A right-handed perspective projection with a 0..1 depth range.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect.max(f32::EPSILON), near, far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_order_matches_matrix_product() {
        let deg = Vec3::new(30.0, 45.0, 60.0);
        let expected = Mat4::from_rotation_z(deg.z.to_radians())
            * Mat4::from_rotation_y(deg.y.to_radians())
            * Mat4::from_rotation_x(deg.x.to_radians());
        let actual = Mat4::from_quat(rotation_from_euler_degrees(deg));
        assert!(actual.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn trs_places_translation_in_last_column() {
        let m = compose_trs(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector3(Vec3::X), Vec3::new(2.0, 0.0, 0.0));
    }
}
