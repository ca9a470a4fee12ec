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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Every error produced here is fatal for the session: the frame loop stops at
//! the first one and no partial state is trusted afterwards. Warning-class
//! conditions live with the collaborator that raises them (see
//! [`BufferError`](crate::net::BufferError)).

use super::api::ShaderStage;
use std::fmt;

/// How an error affects the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Reported, but the session continues.
    Warning,
    /// Unrecoverable; the session must terminate.
    Fatal,
}

/// An error related to compiling shader stages or linking them into a program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The backend rejected a shader stage.
    CompilationFailed {
        /// The stage that failed to compile.
        stage: ShaderStage,
        /// The diagnostic log collected from the backend.
        log: String,
    },
    /// The backend failed to link the attached stages into a program.
    LinkFailed {
        /// The diagnostic log collected from the backend.
        log: String,
    },
    /// The backend does not support this stage.
    UnsupportedStage(ShaderStage),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "Failed to compile {stage} shader: {log}")
            }
            ShaderError::LinkFailed { log } => {
                write!(f, "Failed to link shader program: {log}")
            }
            ShaderError::UnsupportedStage(stage) => {
                write!(f, "Unsupported shader stage: {stage}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a device resource (buffers, shaders, programs).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A generic resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
    /// An attempt was made to access a resource out of its bounds.
    OutOfBounds,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
            ResourceError::OutOfBounds => {
                write!(f, "Resource access out of bounds.")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error raised by the render backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A backend instance is already alive in this process.
    InstanceAlreadyExists,
    /// A failure occurred during the initialization of the graphics backend.
    InitializationFailed(String),
    /// An error occurred while managing a device resource.
    ResourceError(ResourceError),
    /// A draw was issued before any shader program was made active.
    NoActiveProgram,
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl RenderError {
    /// Every render error terminates the session.
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InstanceAlreadyExists => {
                write!(f, "Only one render backend may be alive at a time.")
            }
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::NoActiveProgram => {
                write!(f, "No shader program is active; call set_shaders first.")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(ResourceError::Shader(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationFailed {
            stage: ShaderStage::Vertex,
            log: "0:3: syntax error".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to compile vertex shader: 0:3: syntax error"
        );
    }

    #[test]
    fn render_error_wraps_shader_error() {
        let err: RenderError = ShaderError::LinkFailed {
            log: "missing fragment stage".to_string(),
        }
        .into();
        assert_eq!(
            format!("{err}"),
            "Graphics resource operation failed: Shader resource error: Failed to link shader program: missing fragment stage"
        );
        let source = err.source().and_then(|e| e.source());
        assert!(source.is_some());
    }

    #[test]
    fn every_render_error_is_fatal() {
        let errors = [
            RenderError::InstanceAlreadyExists,
            RenderError::InitializationFailed("no context".into()),
            RenderError::ResourceError(ResourceError::NotFound),
            RenderError::NoActiveProgram,
            RenderError::Internal("oops".into()),
        ];
        assert!(errors.iter().all(|e| e.severity() == Severity::Fatal));
    }
}
