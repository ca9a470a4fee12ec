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

//! Shader stages, shader sources and the program lifecycle.

use std::borrow::Cow;
use std::fmt;

/// A pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
    /// Optional per-primitive stage between vertex and fragment.
    Geometry,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        })
    }
}

/// A shader stage together with its source text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    stage: ShaderStage,
    source: Cow<'static, str>,
}

impl Shader {
    /// Creates a shader for `stage` from `source`.
    pub fn new(stage: ShaderStage, source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Returns the built-in GLSL 330 source for `stage`.
    ///
    /// The built-in vertex stage reads `position` and `color` and applies the
    /// three matrix uniforms; the fragment stage writes the interpolated color.
    /// There is no built-in geometry stage.
    pub fn builtin(stage: ShaderStage) -> Option<Self> {
        match stage {
            ShaderStage::Vertex => Some(Self::new(stage, crate::renderer::shaders::DEFAULT_VERTEX)),
            ShaderStage::Fragment => Some(Self::new(stage, crate::renderer::shaders::DEFAULT_FRAGMENT)),
            ShaderStage::Geometry => None,
        }
    }

    /// The stage this shader runs in.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Where a shader program is in its lifecycle.
///
/// `Uncompiled -> Compiled -> Attached -> Linked -> Active`. Any step before
/// `Active` can fail and move the program to `Failed`, which is terminal: a
/// compile failure leaves `Uncompiled`, a link failure leaves `Attached`, and
/// errors creating, attaching or binding the program leave `Compiled` or
/// `Linked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgramState {
    /// Nothing has been submitted yet.
    #[default]
    Uncompiled,
    /// All stages compiled into shader objects.
    Compiled,
    /// The shader objects are attached to a program.
    Attached,
    /// The program linked successfully.
    Linked,
    /// The program is bound for subsequent draws.
    Active,
    /// Compilation or linking failed.
    Failed,
}

impl ProgramState {
    /// Returns `true` if `next` is a legal successor of this state.
    pub fn can_advance_to(self, next: ProgramState) -> bool {
        use ProgramState::*;
        matches!(
            (self, next),
            (Uncompiled, Compiled)
                | (Compiled, Attached)
                | (Attached, Linked)
                | (Linked, Active)
                | (Uncompiled, Failed)
                | (Compiled, Failed)
                | (Attached, Failed)
                | (Linked, Failed)
        )
    }
}

/// An opaque handle to a compiled shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderObjectId(pub usize);

/// An opaque handle to a shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub usize);

/// An opaque handle to a uniform variable of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_declare_the_uniform_contract() {
        let vertex = Shader::builtin(ShaderStage::Vertex).expect("vertex builtin");
        for name in ["matrix_model", "matrix_view", "matrix_projection", "position", "color"] {
            assert!(vertex.source().contains(name), "missing {name}");
        }
        assert!(Shader::builtin(ShaderStage::Fragment).is_some());
        assert!(Shader::builtin(ShaderStage::Geometry).is_none());
    }

    #[test]
    fn program_state_transitions() {
        use ProgramState::*;
        assert!(Uncompiled.can_advance_to(Compiled));
        assert!(Linked.can_advance_to(Active));
        assert!(Linked.can_advance_to(Failed));
        assert!(Uncompiled.can_advance_to(Failed));
        assert!(Attached.can_advance_to(Failed));
        assert!(!Uncompiled.can_advance_to(Linked));
        assert!(!Failed.can_advance_to(Compiled));
        assert!(!Active.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Failed));
    }

    #[test]
    fn shader_is_an_immutable_pair() {
        let s = Shader::new(ShaderStage::Geometry, String::from("void main() {}"));
        assert_eq!(s.stage(), ShaderStage::Geometry);
        assert_eq!(s.source(), "void main() {}");
        assert_eq!(ShaderStage::Geometry.to_string(), "geometry");
    }
}
