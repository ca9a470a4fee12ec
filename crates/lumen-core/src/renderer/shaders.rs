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

//! Built-in GLSL sources used when the caller does not bring its own shaders.

/// Default vertex stage: applies `projection * view * model` to `position`
/// and forwards `color`.
pub const DEFAULT_VERTEX: &str = r#"#version 330 core
layout(location = 0) in vec4 position;
layout(location = 1) in vec4 color;

uniform mat4 matrix_model;
uniform mat4 matrix_view;
uniform mat4 matrix_projection;

out vec4 frag_color;

void main()
{
    gl_Position = matrix_projection * matrix_view * matrix_model * position;
    frag_color = color;
}
"#;

/// Default fragment stage: writes the interpolated vertex color.
pub const DEFAULT_FRAGMENT: &str = r#"#version 330 core
in vec4 frag_color;
out vec4 out_color;

void main()
{
    out_color = frag_color;
}
"#;
