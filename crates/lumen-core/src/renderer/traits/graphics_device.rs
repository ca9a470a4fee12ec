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

use crate::math::{Color, Mat4};
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use std::fmt::Debug;

/// The low-level graphics capability the render backend drives.
///
/// Implementations own every device-side object and hand out opaque ids.
/// All calls are synchronous and issued from a single thread, in order.
pub trait GraphicsDevice: Debug {
    /// Opens the window and makes its context current.
    /// ## Errors
    /// * `RenderError::InitializationFailed` - If no window or context could be created.
    fn create_window(&mut self, descriptor: &WindowDescriptor) -> Result<(), RenderError>;

    /// Sets the region of the window draws map to.
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), ResourceError>;

    /// Replaces the window title.
    fn set_title(&mut self, title: &str) -> Result<(), ResourceError>;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<(), ResourceError>;

    /// Clears the color buffer to `color`.
    fn clear(&mut self, color: Color) -> Result<(), ResourceError>;

    /// Creates a new, empty buffer.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer(&mut self) -> Result<BufferId, ResourceError>;

    /// Destroys a buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to be destroyed.
    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError>;

    /// Replaces the whole content of a buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to write to.
    /// * `data` - The new content; the buffer takes its size.
    /// * `usage` - How often the content is expected to change.
    fn upload_buffer(
        &mut self,
        id: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError>;

    /// Feeds attribute `slot` from `id`, reading `components` floats per vertex.
    fn bind_vertex_buffer(
        &mut self,
        slot: u32,
        id: BufferId,
        components: u32,
    ) -> Result<(), ResourceError>;

    /// Stops feeding attribute `slot`.
    fn disable_vertex_attribute(&mut self, slot: u32) -> Result<(), ResourceError>;

    /// Compiles one shader stage.
    /// ## Errors
    /// * `ResourceError::Shader` - Carrying the compiler's diagnostic log when compilation fails,
    ///   or `UnsupportedStage` when the device has no such stage.
    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderObjectId, ResourceError>;

    /// Releases a compiled shader object.
    fn destroy_shader(&mut self, id: ShaderObjectId) -> Result<(), ResourceError>;

    /// Creates an empty program.
    fn create_program(&mut self) -> Result<ProgramId, ResourceError>;

    /// Releases a program.
    fn destroy_program(&mut self, id: ProgramId) -> Result<(), ResourceError>;

    /// Binds the attribute `name` to `slot`. Takes effect at the next link.
    fn bind_attribute(
        &mut self,
        program: ProgramId,
        slot: u32,
        name: &str,
    ) -> Result<(), ResourceError>;

    /// Attaches a compiled shader object to a program.
    fn attach_shader(
        &mut self,
        program: ProgramId,
        shader: ShaderObjectId,
    ) -> Result<(), ResourceError>;

    /// Detaches a shader object from a program.
    fn detach_shader(
        &mut self,
        program: ProgramId,
        shader: ShaderObjectId,
    ) -> Result<(), ResourceError>;

    /// Links the attached stages.
    /// ## Errors
    /// * `ResourceError::Shader(ShaderError::LinkFailed)` - Carrying the linker's diagnostic log.
    fn link_program(&mut self, program: ProgramId) -> Result<(), ResourceError>;

    /// Makes `program` the program subsequent draws use.
    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError>;

    /// Looks up a uniform of a linked program by name.
    /// ## Returns
    /// `Ok(None)` if the program has no active uniform with that name.
    fn uniform_location(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Result<Option<UniformLocation>, ResourceError>;

    /// Writes a 4x4 matrix to a uniform of the active program, column-major.
    fn set_uniform_matrix(
        &mut self,
        location: UniformLocation,
        matrix: &Mat4,
    ) -> Result<(), ResourceError>;

    /// Selects filled or wireframe rasterization.
    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<(), ResourceError>;

    /// Draws `count` vertices as a triangle list, starting at vertex `first`.
    fn draw_triangles(&mut self, first: u32, count: u32) -> Result<(), ResourceError>;
}
