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

//! Defines `Shape`, an ordered vertex list with an accumulated model transform.

use super::Vertex;
use crate::math::{Color, Mat4, Vec3};
use std::ops::{Index, IndexMut};

/// An ordered collection of vertices plus the model transform placing them in the world.
///
/// Every three consecutive vertices form one triangle, so insertion order matters.
/// Transforms are accumulated on the model matrix; the stored vertex coordinates
/// are never rewritten. World positions are recovered on demand with
/// [`Shape::world_vertices`] or by the device at draw time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    vertices: Vec<Vertex>,
    transform: Mat4,
}

impl Shape {
    /// Creates an empty shape with an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shape from the given vertices, with an identity transform.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            transform: Mat4::IDENTITY,
        }
    }

    /// Appends a vertex.
    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// The number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the shape holds no vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The stored, untransformed vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the vertex at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Composes a rotation (in radians, applied around X, then Y, then Z)
    /// onto the current model transform.
    ///
    /// Successive calls accumulate: `rotate(a, b, c)` followed by
    /// `rotate(d, e, f)` leaves `R(d, e, f) * R(a, b, c) * previous`.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform = Mat4::from_euler_xyz(dx, dy, dz) * self.transform;
    }

    /// Composes a translation onto the current model transform.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform = Mat4::from_translation(Vec3::new(dx, dy, dz)) * self.transform;
    }

    /// The current model transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Replaces the model transform.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Resets the model transform to identity.
    pub fn reset_transform(&mut self) {
        self.transform = Mat4::IDENTITY;
    }

    /// Returns every vertex multiplied by the model transform.
    pub fn world_vertices(&self) -> Vec<Vertex> {
        self.vertices.iter().map(|v| self.transform * *v).collect()
    }

    // --- Primitives ---

    /// A single triangle in the XY plane with red, green and blue corners.
    pub fn triangle() -> Self {
        Self::from_vertices(vec![
            Vertex::new(-0.5, -0.5, 0.0, Color::RED),
            Vertex::new(0.5, -0.5, 0.0, Color::GREEN),
            Vertex::new(0.0, 0.5, 0.0, Color::BLUE),
        ])
    }

    /// A unit quad in the XY plane, as two triangles.
    pub fn quad() -> Self {
        let bl = Vertex::new(-0.5, -0.5, 0.0, Color::RED);
        let br = Vertex::new(0.5, -0.5, 0.0, Color::GREEN);
        let tr = Vertex::new(0.5, 0.5, 0.0, Color::BLUE);
        let tl = Vertex::new(-0.5, 0.5, 0.0, Color::WHITE);
        Self::from_vertices(vec![bl, br, tr, bl, tr, tl])
    }

    /// An axis-aligned cube centred on the origin, as 12 triangles with one color per face.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // Corners listed counter-clockwise when seen from outside.
        let faces: [([[f32; 3]; 4], Color); 6] = [
            ([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], Color::BLUE),
            ([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], Color::YELLOW),
            ([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], Color::GREEN),
            ([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], Color::MAGENTA),
            ([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], Color::RED),
            ([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], Color::CYAN),
        ];

        let mut shape = Self::new();
        for (corners, color) in faces {
            for i in [0, 1, 2, 0, 2, 3] {
                let [x, y, z] = corners[i];
                shape.push(Vertex::new(x, y, z, color));
            }
        }
        shape
    }
}

impl Index<usize> for Shape {
    type Output = Vertex;
    /// # Panics
    /// Panics if `index` is past the end. Staying in bounds is the caller's contract.
    fn index(&self, index: usize) -> &Self::Output {
        &self.vertices[index]
    }
}

impl IndexMut<usize> for Shape {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

impl FromIterator<Vertex> for Shape {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        Self::from_vertices(iter.into_iter().collect())
    }
}
