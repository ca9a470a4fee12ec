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

//! The draw orchestrator and its single-instance ownership token.

use super::program::ProgramLinker;
use super::upload::{color_stream, position_stream};
use lumen_core::math::{Color, Mat4};
use lumen_core::renderer::api::*;
use lumen_core::renderer::{GraphicsDevice, RenderError};
use lumen_core::scene::{Camera, Shape, Vertex};
use lumen_core::utils::timer::FrameRate;
use std::sync::atomic::{AtomicBool, Ordering};

static BACKEND_ALIVE: AtomicBool = AtomicBool::new(false);

/// Proof that the caller owns the process's single render backend slot.
///
/// There is at most one token alive at a time. It cannot be cloned or copied,
/// and dropping it (normally together with the [`RenderBackend`] it was moved
/// into) frees the slot for a new backend.
#[derive(Debug)]
pub struct BackendToken {
    _private: (),
}

impl BackendToken {
    /// Claims the backend slot.
    ///
    /// # Errors
    /// Returns [`RenderError::InstanceAlreadyExists`] while another token is alive.
    pub fn acquire() -> Result<Self, RenderError> {
        BACKEND_ALIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                log::error!("RenderBackend: An instance already exists in this process");
                RenderError::InstanceAlreadyExists
            })?;
        log::debug!("RenderBackend: Token acquired");
        Ok(Self { _private: () })
    }

    /// Returns `true` while some token is alive.
    pub fn is_held() -> bool {
        BACKEND_ALIVE.load(Ordering::Acquire)
    }
}

impl Drop for BackendToken {
    fn drop(&mut self) {
        BACKEND_ALIVE.store(false, Ordering::Release);
        log::debug!("RenderBackend: Token released");
    }
}

/// Turns shapes and an optional camera into draw calls on a [`GraphicsDevice`].
///
/// The backend owns one program and two dynamic buffers (positions and
/// colors). The buffers are created once and rewritten on every draw. All of
/// them are released when the backend is dropped, including when
/// construction fails half-way.
#[derive(Debug)]
pub struct RenderBackend<D: GraphicsDevice> {
    device: D,
    position_buffer: Option<BufferId>,
    color_buffer: Option<BufferId>,
    program: Option<ProgramId>,
    program_state: ProgramState,
    frame_rate: FrameRate,
    _token: BackendToken,
}

impl<D: GraphicsDevice> RenderBackend<D> {
    /// Acquires the backend token, then builds the backend.
    pub fn create(device: D, window: &WindowDescriptor) -> Result<Self, RenderError> {
        let token = BackendToken::acquire()?;
        Self::new(device, token, window)
    }

    /// Opens the window, sets the viewport and creates the vertex buffers.
    pub fn new(device: D, token: BackendToken, window: &WindowDescriptor) -> Result<Self, RenderError> {
        let mut backend = Self {
            device,
            position_buffer: None,
            color_buffer: None,
            program: None,
            program_state: ProgramState::Uncompiled,
            frame_rate: FrameRate::new(),
            _token: token,
        };

        backend.device.create_window(window)?;
        backend.device.set_viewport(window.viewport())?;
        backend.position_buffer = Some(backend.device.create_buffer()?);
        backend.color_buffer = Some(backend.device.create_buffer()?);

        log::info!(
            "RenderBackend: Initialized {}x{} '{}'",
            window.width,
            window.height,
            window.title
        );
        Ok(backend)
    }

    /// Compiles and links the given stages into the active program.
    ///
    /// A previously active program is replaced once the new one is linked. If
    /// compiling or linking fails, the previous program is released as well and
    /// draws fail with [`RenderError::NoActiveProgram`] until shaders are set again.
    ///
    /// # Errors
    /// A compile or link error carrying the device's diagnostic log. The
    /// intermediate shader objects are released in every case.
    pub fn set_shaders(
        &mut self,
        vertex: &Shader,
        fragment: &Shader,
        geometry: Option<&Shader>,
    ) -> Result<(), RenderError> {
        for (shader, expected) in [
            (Some(vertex), ShaderStage::Vertex),
            (Some(fragment), ShaderStage::Fragment),
            (geometry, ShaderStage::Geometry),
        ] {
            if let Some(shader) = shader {
                if shader.stage() != expected {
                    return Err(RenderError::Internal(format!(
                        "a {} shader was passed as the {expected} stage",
                        shader.stage()
                    )));
                }
            }
        }

        let mut stages = vec![vertex, fragment];
        stages.extend(geometry);

        let mut linker = ProgramLinker::new();
        let result = linker.link(&mut self.device, &stages);
        self.program_state = linker.state();

        let previous = match result {
            Ok(linked) => self.program.replace(linked.id),
            Err(e) => {
                if let Some(previous) = self.program.take() {
                    if let Err(destroy) = self.device.destroy_program(previous) {
                        log::warn!("RenderBackend: Failed to destroy {previous:?}: {destroy}");
                    }
                }
                return Err(e);
            }
        };
        if let Some(previous) = previous {
            self.device.destroy_program(previous)?;
        }

        if let Some(program) = self.program {
            for name in [UNIFORM_MODEL, UNIFORM_VIEW, UNIFORM_PROJECTION] {
                if self.device.uniform_location(program, name)?.is_none() {
                    log::warn!(
                        "RenderBackend: {program:?} does not declare uniform '{name}'; draws skip it"
                    );
                }
            }
        }
        Ok(())
    }

    /// Uses the built-in vertex and fragment stages.
    pub fn use_builtin_shaders(&mut self) -> Result<(), RenderError> {
        let missing = |stage: ShaderStage| RenderError::Internal(format!("no builtin {stage} shader"));
        let vertex = Shader::builtin(ShaderStage::Vertex).ok_or_else(|| missing(ShaderStage::Vertex))?;
        let fragment =
            Shader::builtin(ShaderStage::Fragment).ok_or_else(|| missing(ShaderStage::Fragment))?;
        self.set_shaders(&vertex, &fragment, None)
    }

    /// Draws a shape with its own model transform.
    pub fn draw(
        &mut self,
        shape: &Shape,
        camera: Option<&Camera>,
        mode: PolygonMode,
    ) -> Result<(), RenderError> {
        self.draw_vertices(shape.vertices(), &shape.transform(), camera, mode)
    }

    /// Uploads `vertices`, binds the model, view and projection matrices and
    /// issues one triangle-list draw over all of them. Both attribute slots are
    /// disabled again afterwards, whether or not the draw succeeded.
    ///
    /// Without a camera both view and projection are identity. Neither the
    /// vertices nor the camera are modified.
    pub fn draw_vertices(
        &mut self,
        vertices: &[Vertex],
        model: &Mat4,
        camera: Option<&Camera>,
        mode: PolygonMode,
    ) -> Result<(), RenderError> {
        let program = self.program.ok_or(RenderError::NoActiveProgram)?;
        let (position_buffer, color_buffer) = self.buffers()?;
        let count = u32::try_from(vertices.len()).map_err(|_| {
            RenderError::Internal(format!("{} vertices exceed one draw", vertices.len()))
        })?;

        self.device.set_polygon_mode(mode)?;

        let positions = position_stream(vertices);
        let colors = color_stream(vertices);
        self.device.upload_buffer(
            position_buffer,
            bytemuck::cast_slice(&positions),
            BufferUsage::Dynamic,
        )?;
        self.device.upload_buffer(
            color_buffer,
            bytemuck::cast_slice(&colors),
            BufferUsage::Dynamic,
        )?;
        self.device
            .bind_vertex_buffer(ATTRIBUTE_POSITION, position_buffer, COMPONENTS_PER_VERTEX)?;
        self.device
            .bind_vertex_buffer(ATTRIBUTE_COLOR, color_buffer, COMPONENTS_PER_VERTEX)?;

        let view = ViewInfo::extract(camera);
        for (name, matrix) in [
            (UNIFORM_MODEL, *model),
            (UNIFORM_VIEW, view.view_matrix),
            (UNIFORM_PROJECTION, view.projection_matrix),
        ] {
            match self.device.uniform_location(program, name)? {
                Some(location) => self.device.set_uniform_matrix(location, &matrix)?,
                None => log::trace!("RenderBackend: Uniform '{name}' is not active in {program:?}"),
            }
        }

        let drawn = self.device.draw_triangles(0, count);
        let disabled = [ATTRIBUTE_POSITION, ATTRIBUTE_COLOR]
            .into_iter()
            .try_for_each(|slot| self.device.disable_vertex_attribute(slot));
        drawn?;
        disabled?;
        log::trace!("RenderBackend: Drew {count} vertices");
        Ok(())
    }

    /// Clears the frame to `color`.
    pub fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.device.clear(color)?;
        Ok(())
    }

    /// Presents the frame and counts it towards the frame rate.
    pub fn display(&mut self) -> Result<(), RenderError> {
        self.device.swap_buffers()?;
        self.frame_rate.tally();
        Ok(())
    }

    /// Replaces the window title.
    pub fn set_window_title(&mut self, title: &str) -> Result<(), RenderError> {
        self.device.set_title(title)?;
        Ok(())
    }

    /// Frames per second over the last completed second.
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate.get()
    }

    /// Where the program is in its lifecycle.
    pub fn program_state(&self) -> ProgramState {
        self.program_state
    }

    /// The active program, once shaders are set.
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// The position and color buffers, in that order.
    pub fn buffers(&self) -> Result<(BufferId, BufferId), RenderError> {
        match (self.position_buffer, self.color_buffer) {
            (Some(position), Some(color)) => Ok((position, color)),
            _ => Err(RenderError::Internal(
                "vertex buffers were not created".to_string(),
            )),
        }
    }

    /// The underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: GraphicsDevice> Drop for RenderBackend<D> {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            if let Err(e) = self.device.destroy_program(program) {
                log::warn!("RenderBackend: Failed to destroy {program:?}: {e}");
            }
        }
        for buffer in [self.position_buffer.take(), self.color_buffer.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = self.device.destroy_buffer(buffer) {
                log::warn!("RenderBackend: Failed to destroy {buffer:?}: {e}");
            }
        }
        log::info!("RenderBackend: Released");
    }
}
