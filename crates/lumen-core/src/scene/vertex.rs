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

//! Defines the `Vertex` type: a position, a color and a homogeneous `w`.

use crate::math::{Color, Mat4, Vec3, Vec4};
use std::fmt;
use std::ops::Mul;

/// A single vertex of a [`Shape`](super::Shape).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// The position of the vertex in the shape's local space.
    pub position: Vec3,
    /// The color of the vertex.
    pub color: Color,
    /// The homogeneous coordinate. `1.0` for positional vertices.
    pub w: f32,
}

impl Vertex {
    /// Creates a new vertex at `(x, y, z)` with the given color and `w = 1`.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            color,
            w: 1.0,
        }
    }

    /// Creates a black vertex at `position` with `w = 1`.
    #[inline]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            color: Color::BLACK,
            w: 1.0,
        }
    }

    /// Returns a copy of this vertex with a different homogeneous coordinate.
    #[inline]
    pub const fn with_w(mut self, w: f32) -> Self {
        self.w = w;
        self
    }

    /// Assigns a color. Only the color channels change; the position and `w` stay untouched.
    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The vertex as a homogeneous `(x, y, z, w)` vector.
    #[inline]
    pub fn to_homogeneous(&self) -> Vec4 {
        self.position.extend(self.w)
    }
}

impl Default for Vertex {
    /// The origin, in black, with `w = 1`.
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.position.x, self.position.y, self.position.z
        )
    }
}

impl Mul<Vertex> for Mat4 {
    type Output = Vertex;
    /// Transforms the vertex's homogeneous coordinates. The color is carried over.
    #[inline]
    fn mul(self, rhs: Vertex) -> Self::Output {
        let p = self * rhs.to_homogeneous();
        Vertex {
            position: p.truncate(),
            color: rhs.color,
            w: p.w,
        }
    }
}

impl Mul<Mat4> for Vertex {
    type Output = Vertex;
    /// Same as `matrix * vertex`. The operand order is a convenience, not a transpose.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        rhs * self
    }
}
