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

//! Builds the two per-vertex float streams uploaded on every draw.

use lumen_core::renderer::COMPONENTS_PER_VERTEX;
use lumen_core::Vertex;

/// Emits `(x, y, z, 1.0)` for every vertex, in order.
///
/// The stored `w` is not uploaded; positions always reach the device as points.
pub fn position_stream(vertices: &[Vertex]) -> Vec<f32> {
    let mut out = Vec::with_capacity(vertices.len() * COMPONENTS_PER_VERTEX as usize);
    for v in vertices {
        out.extend_from_slice(&[v.position.x, v.position.y, v.position.z, 1.0]);
    }
    out
}

/// Emits `(r / 255, g / 255, b / 255, 1.0)` for every vertex, in order.
///
/// Alpha is always uploaded as `1.0`; the vertex's own alpha is discarded.
pub fn color_stream(vertices: &[Vertex]) -> Vec<f32> {
    let mut out = Vec::with_capacity(vertices.len() * COMPONENTS_PER_VERTEX as usize);
    for v in vertices {
        let [r, g, b, _] = v.color.to_normalized();
        out.extend_from_slice(&[r, g, b, 1.0]);
    }
    out
}
