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

//! Fixed pipeline contract: rasterization mode, attribute slots and uniform names.

use serde::{Deserialize, Serialize};

/// How triangles are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonMode {
    /// Filled triangles.
    #[default]
    Fill,
    /// Wireframe edges only.
    Line,
}

impl PolygonMode {
    /// Picks `Fill` when `fill` is set, `Line` otherwise.
    pub fn from_fill(fill: bool) -> Self {
        if fill {
            PolygonMode::Fill
        } else {
            PolygonMode::Line
        }
    }
}

/// Attribute slot of the vertex position stream.
pub const ATTRIBUTE_POSITION: u32 = 0;
/// Attribute slot of the vertex color stream.
pub const ATTRIBUTE_COLOR: u32 = 1;

/// Shader-side name bound to [`ATTRIBUTE_POSITION`].
pub const ATTRIBUTE_POSITION_NAME: &str = "position";
/// Shader-side name bound to [`ATTRIBUTE_COLOR`].
pub const ATTRIBUTE_COLOR_NAME: &str = "color";

/// Number of floats per vertex in each stream.
pub const COMPONENTS_PER_VERTEX: u32 = 4;

/// Uniform holding the shape's model transform.
pub const UNIFORM_MODEL: &str = "matrix_model";
/// Uniform holding the camera's orientation matrix.
pub const UNIFORM_VIEW: &str = "matrix_view";
/// Uniform holding the camera's perspective matrix.
pub const UNIFORM_PROJECTION: &str = "matrix_projection";
