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

//! Defines the `Mat4` type used for marker poses and node transforms.

use super::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A 4x4 column-major matrix holding an affine 3D transform.
///
/// This is the representation of a marker pose as delivered by the detection
/// pipeline and of a node's local transform in the scene. The upper-left 3x3
/// block holds rotation and scale, the fourth column holds translation.
///
/// In RON the columns are written as a tuple of four `Vec4` structs:
/// `(cols: ((x: 1.0, y: 0.0, z: 0.0, w: 0.0), ...))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat4 {
    /// The four columns, first column first.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    /// Builds a matrix from its four columns.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// A pure translation by `v`.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// A right-handed rotation of `angle` radians about `axis`.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. Must be a unit vector.
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;

        Self::from_cols(
            Vec4::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0),
            Vec4::new(t * y * x - s * z, t * y * y + c, t * y * z + s * x, 0.0),
            Vec4::new(t * z * x + s * y, t * z * y - s * x, t * z * z + c, 0.0),
            Self::IDENTITY.cols[3],
        )
    }

    /// The translation held in the fourth column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// The per-axis scale, measured as the length of each basis column.
    #[inline]
    pub fn scale(&self) -> Vec3 {
        Vec3::new(
            self.cols[0].truncate().length(),
            self.cols[1].truncate().length(),
            self.cols[2].truncate().length(),
        )
    }

    /// Returns a copy of this matrix whose three basis columns have length `scale`.
    ///
    /// Rotation and translation are preserved; whatever scale the matrix carried
    /// before is discarded. A degenerate (zero-length) basis column stays zero.
    #[inline]
    pub fn with_uniform_scale(&self, scale: f32) -> Self {
        let rescale = |col: Vec4| Vec4::from_vec3(col.truncate().normalize() * scale, col.w);
        Self::from_cols(
            rescale(self.cols[0]),
            rescale(self.cols[1]),
            rescale(self.cols[2]),
            self.cols[3],
        )
    }

    fn row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0].get(index),
            self.cols[1].get(index),
            self.cols[2].get(index),
            self.cols[3].get(index),
        )
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Composes two transforms; `a * b` applies `b` first.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let rows = [self.row(0), self.row(1), self.row(2), self.row(3)];
        let column = |col: Vec4| {
            Vec4::new(
                rows[0].dot(col),
                rows[1].dot(col),
                rows[2].dot(col),
                rows[3].dot(col),
            )
        };
        Self::from_cols(
            column(rhs.cols[0]),
            column(rhs.cols[1]),
            column(rhs.cols[2]),
            column(rhs.cols[3]),
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn stretched(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(sx, 0.0, 0.0, 0.0),
            Vec4::new(0.0, sy, 0.0, 0.0),
            Vec4::new(0.0, 0.0, sz, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn translation_moves_origin() {
        let t = Vec3::new(0.1, -0.2, -0.5);
        let m = Mat4::from_translation(t);
        assert_eq!(m.translation(), t);
        assert_eq!((m * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate(), t);
    }

    #[test]
    fn identity_is_neutral_for_composition() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * stretched(2.0, 2.0, 2.0);
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
        assert_eq!(m.translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let m = Mat4::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let x_axis = (m * Vec4::new(1.0, 0.0, 0.0, 0.0)).truncate();
        assert!(vec3_approx_eq(x_axis, Vec3::Y));
    }

    #[test]
    fn with_uniform_scale_overrides_existing_scale() {
        let pose = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0))
            * Mat4::from_axis_angle(Vec3::Y, 0.7)
            * stretched(3.0, 0.5, 2.0);

        let scaled = pose.with_uniform_scale(0.1);
        let scale = scaled.scale();

        assert_relative_eq!(scale.x, 0.1, epsilon = 1e-5);
        assert_relative_eq!(scale.y, 0.1, epsilon = 1e-5);
        assert_relative_eq!(scale.z, 0.1, epsilon = 1e-5);
        assert_eq!(scaled.translation(), pose.translation());
    }

    #[test]
    fn with_uniform_scale_keeps_rotation() {
        let pose = Mat4::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let scaled = pose.with_uniform_scale(2.0);
        let x_axis = (scaled * Vec4::new(1.0, 0.0, 0.0, 0.0)).truncate();
        assert!(vec3_approx_eq(x_axis, Vec3::new(0.0, 2.0, 0.0)));
    }
}
