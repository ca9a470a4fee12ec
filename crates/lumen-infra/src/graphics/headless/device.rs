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

use super::compiler;
use lumen_core::math::{Color, Mat4};
use lumen_core::renderer::api::*;
use lumen_core::renderer::{GraphicsDevice, RenderError, ResourceError, ShaderError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options of a [`HeadlessDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessConfig {
    /// Whether the geometry stage is available.
    pub geometry_shaders: bool,
    /// How many recorded calls are kept. Older calls are dropped first; `0`
    /// turns recording off.
    pub command_capacity: usize,
}

impl HeadlessConfig {
    /// Default number of recorded calls kept by [`HeadlessDevice::commands`].
    pub const DEFAULT_COMMAND_CAPACITY: usize = 4096;
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            geometry_shaders: true,
            command_capacity: Self::DEFAULT_COMMAND_CAPACITY,
        }
    }
}

/// A device call that can be made to fail once with [`HeadlessDevice::fail_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    /// `create_window` fails with an initialization error.
    CreateWindow,
    /// `create_buffer` fails.
    CreateBuffer,
    /// `upload_buffer` fails.
    UploadBuffer,
    /// `compile_shader` reports a compile error.
    CompileShader,
    /// `create_program` fails.
    CreateProgram,
    /// `link_program` reports a link error.
    LinkProgram,
    /// `set_uniform_matrix` fails.
    SetUniform,
    /// `draw_triangles` fails.
    Draw,
}

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A window was opened.
    CreateWindow {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Initial title.
        title: String,
    },
    /// The viewport changed.
    SetViewport(Viewport),
    /// The title changed.
    SetTitle(String),
    /// A frame was presented.
    SwapBuffers,
    /// The color buffer was cleared.
    Clear(Color),
    /// A buffer was created.
    CreateBuffer(BufferId),
    /// A buffer was destroyed.
    DestroyBuffer(BufferId),
    /// A buffer's content was replaced.
    UploadBuffer {
        /// Target buffer.
        id: BufferId,
        /// New size in bytes.
        len: usize,
        /// Declared update frequency.
        usage: BufferUsage,
    },
    /// An attribute slot was fed from a buffer.
    BindVertexBuffer {
        /// Attribute slot.
        slot: u32,
        /// Source buffer.
        id: BufferId,
        /// Floats per vertex.
        components: u32,
    },
    /// An attribute slot was disabled.
    DisableVertexAttribute(u32),
    /// A stage compiled.
    CompileShader {
        /// The new shader object.
        id: ShaderObjectId,
        /// Its stage.
        stage: ShaderStage,
    },
    /// A shader object was released.
    DestroyShader(ShaderObjectId),
    /// A program was created.
    CreateProgram(ProgramId),
    /// A program was released.
    DestroyProgram(ProgramId),
    /// An attribute name was bound to a slot.
    BindAttribute {
        /// Target program.
        program: ProgramId,
        /// Attribute slot.
        slot: u32,
        /// Attribute name.
        name: String,
    },
    /// A shader object was attached.
    AttachShader {
        /// Target program.
        program: ProgramId,
        /// Attached shader.
        shader: ShaderObjectId,
    },
    /// A shader object was detached.
    DetachShader {
        /// Target program.
        program: ProgramId,
        /// Detached shader.
        shader: ShaderObjectId,
    },
    /// A program linked.
    LinkProgram(ProgramId),
    /// A program became active.
    UseProgram(ProgramId),
    /// A uniform matrix was written.
    SetUniformMatrix {
        /// Target uniform.
        location: UniformLocation,
        /// Written value.
        matrix: Mat4,
    },
    /// The rasterization mode changed.
    SetPolygonMode(PolygonMode),
    /// Triangles were drawn.
    DrawTriangles {
        /// First vertex.
        first: u32,
        /// Vertex count.
        count: u32,
    },
}

/// The state of the headless window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Current title.
    pub title: String,
    /// Current viewport.
    pub viewport: Viewport,
    /// Last clear color.
    pub clear_color: Color,
    /// Number of `swap_buffers` calls.
    pub frames_presented: u64,
}

#[derive(Debug, Default)]
struct BufferEntry {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug)]
struct ShaderEntry {
    stage: ShaderStage,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct ProgramEntry {
    attached: Vec<ShaderObjectId>,
    attributes: HashMap<u32, String>,
    linked: bool,
    uniforms: HashMap<String, UniformLocation>,
    values: HashMap<UniformLocation, Mat4>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    config: HeadlessConfig,
    window: Option<WindowState>,
    commands: VecDeque<Command>,
    buffers: HashMap<BufferId, BufferEntry>,
    shaders: HashMap<ShaderObjectId, ShaderEntry>,
    programs: HashMap<ProgramId, ProgramEntry>,
    uniform_owners: HashMap<UniformLocation, ProgramId>,
    attributes: HashMap<u32, (BufferId, u32)>,
    active_program: Option<ProgramId>,
    polygon_mode: PolygonMode,
    pending_failures: Vec<(FailurePoint, usize)>,
    draw_calls: usize,
}

#[derive(Debug, Default)]
struct IdGenerators {
    buffer: AtomicUsize,
    shader: AtomicUsize,
    program: AtomicUsize,
    uniform: AtomicUsize,
}

/// An in-memory [`GraphicsDevice`] that validates and records every call.
///
/// Cloning a `HeadlessDevice` yields another handle to the same device, so a
/// test can hand one handle to the render backend and keep another to
/// inspect what was uploaded, bound and drawn.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDevice {
    state: Arc<Mutex<HeadlessState>>,
    ids: Arc<IdGenerators>,
}

impl HeadlessDevice {
    /// Creates a device with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    /// Creates a device with the given configuration.
    pub fn with_config(config: HeadlessConfig) -> Self {
        log::info!("HeadlessDevice: Created (geometry shaders: {})", config.geometry_shaders);
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                config,
                ..Default::default()
            })),
            ids: Arc::new(IdGenerators::default()),
        }
    }

    /// Makes the next call matching `point` fail once.
    pub fn fail_next(&self, point: FailurePoint) {
        self.fail_after(point, 0);
    }

    /// Lets `successes` calls matching `point` through, then fails the next one.
    pub fn fail_after(&self, point: FailurePoint, successes: usize) {
        self.state().pending_failures.push((point, successes));
    }

    // --- Inspection ---

    /// The most recent recorded calls, oldest first, at most
    /// [`HeadlessConfig::command_capacity`] of them.
    pub fn commands(&self) -> Vec<Command> {
        self.state().commands.iter().cloned().collect()
    }

    /// Forgets the recorded calls.
    pub fn clear_commands(&self) {
        self.state().commands.clear();
    }

    /// The content of a buffer, read as floats.
    pub fn buffer_floats(&self, id: BufferId) -> Option<Vec<f32>> {
        self.state()
            .buffers
            .get(&id)
            .map(|b| {
                b.data
                    .chunks_exact(std::mem::size_of::<f32>())
                    .map(bytemuck::pod_read_unaligned::<f32>)
                    .collect()
            })
    }

    /// The usage declared by the last upload to a buffer.
    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        self.state().buffers.get(&id).and_then(|b| b.usage)
    }

    /// The last value written to a program's uniform.
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<Mat4> {
        let state = self.state();
        let entry = state.programs.get(&program)?;
        let location = entry.uniforms.get(name)?;
        entry.values.get(location).copied()
    }

    /// The attribute names bound on a program, by slot.
    pub fn program_attributes(&self, program: ProgramId) -> Option<HashMap<u32, String>> {
        self.state()
            .programs
            .get(&program)
            .map(|p| p.attributes.clone())
    }

    /// The buffer and component count feeding an attribute slot.
    pub fn vertex_attribute(&self, slot: u32) -> Option<(BufferId, u32)> {
        self.state().attributes.get(&slot).copied()
    }

    /// Number of buffers alive.
    pub fn live_buffers(&self) -> usize {
        self.state().buffers.len()
    }

    /// Number of shader objects alive.
    pub fn live_shaders(&self) -> usize {
        self.state().shaders.len()
    }

    /// Number of programs alive.
    pub fn live_programs(&self) -> usize {
        self.state().programs.len()
    }

    /// The program draws currently use.
    pub fn active_program(&self) -> Option<ProgramId> {
        self.state().active_program
    }

    /// The current rasterization mode.
    pub fn polygon_mode(&self) -> PolygonMode {
        self.state().polygon_mode
    }

    /// The window, once opened.
    pub fn window(&self) -> Option<WindowState> {
        self.state().window.clone()
    }

    /// Number of successful draws.
    pub fn draw_calls(&self) -> usize {
        self.state().draw_calls
    }

    // --- Internals ---

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HeadlessState {
    fn record(&mut self, command: Command) {
        let capacity = self.config.command_capacity;
        if capacity == 0 {
            return;
        }
        while self.commands.len() >= capacity {
            self.commands.pop_front();
        }
        self.commands.push_back(command);
    }

    fn take_failure(&mut self, point: FailurePoint) -> bool {
        let Some(index) = self.pending_failures.iter().position(|(p, _)| *p == point) else {
            return false;
        };
        let (_, successes) = &mut self.pending_failures[index];
        if *successes > 0 {
            *successes -= 1;
            return false;
        }
        self.pending_failures.remove(index);
        log::debug!("HeadlessDevice: Injected failure at {point:?}");
        true
    }

    fn injected(&mut self, point: FailurePoint) -> Result<(), ResourceError> {
        if self.take_failure(point) {
            Err(ResourceError::BackendError(format!(
                "injected failure at {point:?}"
            )))
        } else {
            Ok(())
        }
    }

    fn require_context(&self) -> Result<(), ResourceError> {
        if self.window.is_some() {
            Ok(())
        } else {
            Err(ResourceError::BackendError(
                "no current context; create the window first".to_string(),
            ))
        }
    }

    fn program_mut(&mut self, id: ProgramId) -> Result<&mut ProgramEntry, ResourceError> {
        self.programs.get_mut(&id).ok_or(ResourceError::NotFound)
    }

    fn window_mut(&mut self) -> Result<&mut WindowState, ResourceError> {
        self.window.as_mut().ok_or_else(|| {
            ResourceError::BackendError("no current context; create the window first".to_string())
        })
    }

    fn link(&self, program: ProgramId) -> Result<Vec<String>, String> {
        let Some(program) = self.programs.get(&program) else {
            return Err(format!("error: unknown program {program:?}"));
        };
        let count = |stage: ShaderStage| {
            program
                .attached
                .iter()
                .filter(|id| self.shaders.get(*id).is_some_and(|s| s.stage == stage))
                .count()
        };
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            match count(stage) {
                0 => return Err(format!("error: program has no {stage} stage attached")),
                1 => {}
                n => return Err(format!("error: {n} {stage} stages attached, expected one")),
            }
        }
        if count(ShaderStage::Geometry) > 1 {
            return Err("error: more than one geometry stage attached".to_string());
        }

        let mut uniforms = Vec::new();
        for id in &program.attached {
            if let Some(shader) = self.shaders.get(id) {
                for name in &shader.uniforms {
                    if !uniforms.contains(name) {
                        uniforms.push(name.clone());
                    }
                }
            }
        }
        Ok(uniforms)
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_window(&mut self, descriptor: &WindowDescriptor) -> Result<(), RenderError> {
        let mut state = self.state();
        if state.take_failure(FailurePoint::CreateWindow) {
            return Err(RenderError::InitializationFailed(
                "injected failure while opening the window".to_string(),
            ));
        }
        if state.window.is_some() {
            return Err(RenderError::InitializationFailed(
                "a window is already open on this device".to_string(),
            ));
        }
        state.window = Some(WindowState {
            width: descriptor.width,
            height: descriptor.height,
            title: descriptor.title.to_string(),
            viewport: descriptor.viewport(),
            clear_color: Color::BLACK,
            frames_presented: 0,
        });
        state.record(Command::CreateWindow {
            width: descriptor.width,
            height: descriptor.height,
            title: descriptor.title.to_string(),
        });
        log::info!(
            "HeadlessDevice: Opened {}x{} window '{}'",
            descriptor.width,
            descriptor.height,
            descriptor.title
        );
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.window_mut()?.viewport = viewport;
        state.record(Command::SetViewport(viewport));
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.window_mut()?.title = title.to_string();
        state.record(Command::SetTitle(title.to_string()));
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.window_mut()?.frames_presented += 1;
        state.record(Command::SwapBuffers);
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.window_mut()?.clear_color = color;
        state.record(Command::Clear(color));
        Ok(())
    }

    fn create_buffer(&mut self) -> Result<BufferId, ResourceError> {
        let mut state = self.state();
        state.require_context()?;
        state.injected(FailurePoint::CreateBuffer)?;
        let id = BufferId(self.ids.buffer.fetch_add(1, Ordering::Relaxed));
        state.buffers.insert(id, BufferEntry::default());
        state.record(Command::CreateBuffer(id));
        log::debug!("HeadlessDevice: Created buffer with ID: {id:?}");
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.state();
        if state.buffers.remove(&id).is_none() {
            return Err(ResourceError::NotFound);
        }
        state.attributes.retain(|_, (buffer, _)| *buffer != id);
        state.record(Command::DestroyBuffer(id));
        log::debug!("HeadlessDevice: Destroyed buffer with ID: {id:?}");
        Ok(())
    }

    fn upload_buffer(
        &mut self,
        id: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.injected(FailurePoint::UploadBuffer)?;
        let entry = state.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        entry.data.clear();
        entry.data.extend_from_slice(data);
        entry.usage = Some(usage);
        state.record(Command::UploadBuffer {
            id,
            len: data.len(),
            usage,
        });
        log::trace!("HeadlessDevice: Uploaded {} bytes to buffer {id:?}", data.len());
        Ok(())
    }

    fn bind_vertex_buffer(
        &mut self,
        slot: u32,
        id: BufferId,
        components: u32,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        if !state.buffers.contains_key(&id) {
            return Err(ResourceError::NotFound);
        }
        if !(1..=4).contains(&components) {
            return Err(ResourceError::BackendError(format!(
                "invalid component count {components} for attribute {slot}"
            )));
        }
        state.attributes.insert(slot, (id, components));
        state.record(Command::BindVertexBuffer {
            slot,
            id,
            components,
        });
        Ok(())
    }

    fn disable_vertex_attribute(&mut self, slot: u32) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.attributes.remove(&slot);
        state.record(Command::DisableVertexAttribute(slot));
        Ok(())
    }

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderObjectId, ResourceError> {
        let mut state = self.state();
        state.require_context()?;
        if stage == ShaderStage::Geometry && !state.config.geometry_shaders {
            return Err(ShaderError::UnsupportedStage(stage).into());
        }
        let compiled = if state.take_failure(FailurePoint::CompileShader) {
            Err("0:0: error: injected compiler failure".to_string())
        } else {
            compiler::compile(source)
        };
        let compiled = compiled.map_err(|message| {
            log::error!("HeadlessDevice: Failed to compile {stage} shader: {message}");
            ShaderError::CompilationFailed {
                stage,
                log: message,
            }
        })?;

        let id = ShaderObjectId(self.ids.shader.fetch_add(1, Ordering::Relaxed));
        state.shaders.insert(
            id,
            ShaderEntry {
                stage,
                uniforms: compiled.uniforms,
            },
        );
        state.record(Command::CompileShader { id, stage });
        log::debug!("HeadlessDevice: Compiled {stage} shader with ID: {id:?}");
        Ok(id)
    }

    fn destroy_shader(&mut self, id: ShaderObjectId) -> Result<(), ResourceError> {
        let mut state = self.state();
        if state.shaders.remove(&id).is_none() {
            return Err(ResourceError::NotFound);
        }
        state.record(Command::DestroyShader(id));
        log::debug!("HeadlessDevice: Destroyed shader with ID: {id:?}");
        Ok(())
    }

    fn create_program(&mut self) -> Result<ProgramId, ResourceError> {
        let mut state = self.state();
        state.require_context()?;
        state.injected(FailurePoint::CreateProgram)?;
        let id = ProgramId(self.ids.program.fetch_add(1, Ordering::Relaxed));
        state.programs.insert(id, ProgramEntry::default());
        state.record(Command::CreateProgram(id));
        log::debug!("HeadlessDevice: Created program with ID: {id:?}");
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) -> Result<(), ResourceError> {
        let mut state = self.state();
        let entry = state.programs.remove(&id).ok_or(ResourceError::NotFound)?;
        for location in entry.uniforms.values() {
            state.uniform_owners.remove(location);
        }
        if state.active_program == Some(id) {
            state.active_program = None;
        }
        state.record(Command::DestroyProgram(id));
        log::debug!("HeadlessDevice: Destroyed program with ID: {id:?}");
        Ok(())
    }

    fn bind_attribute(
        &mut self,
        program: ProgramId,
        slot: u32,
        name: &str,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        state
            .program_mut(program)?
            .attributes
            .insert(slot, name.to_string());
        state.record(Command::BindAttribute {
            program,
            slot,
            name: name.to_string(),
        });
        Ok(())
    }

    fn attach_shader(
        &mut self,
        program: ProgramId,
        shader: ShaderObjectId,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        if !state.shaders.contains_key(&shader) {
            return Err(ResourceError::InvalidHandle);
        }
        let entry = state.program_mut(program)?;
        if !entry.attached.contains(&shader) {
            entry.attached.push(shader);
        }
        state.record(Command::AttachShader { program, shader });
        Ok(())
    }

    fn detach_shader(
        &mut self,
        program: ProgramId,
        shader: ShaderObjectId,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        let entry = state.program_mut(program)?;
        let before = entry.attached.len();
        entry.attached.retain(|s| *s != shader);
        if entry.attached.len() == before {
            return Err(ResourceError::InvalidHandle);
        }
        state.record(Command::DetachShader { program, shader });
        Ok(())
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), ResourceError> {
        let mut state = self.state();
        if !state.programs.contains_key(&program) {
            return Err(ResourceError::NotFound);
        }
        let linked = if state.take_failure(FailurePoint::LinkProgram) {
            Err("error: injected linker failure".to_string())
        } else {
            state.link(program)
        };
        let names = linked.map_err(|message| {
            log::error!("HeadlessDevice: Failed to link program {program:?}: {message}");
            ShaderError::LinkFailed { log: message }
        })?;

        let locations: Vec<(String, UniformLocation)> = names
            .into_iter()
            .map(|name| {
                let location = UniformLocation(self.ids.uniform.fetch_add(1, Ordering::Relaxed));
                (name, location)
            })
            .collect();
        let stale: Vec<UniformLocation> = state
            .program_mut(program)?
            .uniforms
            .values()
            .copied()
            .collect();
        for location in &stale {
            state.uniform_owners.remove(location);
        }
        for (_, location) in &locations {
            state.uniform_owners.insert(*location, program);
        }
        let entry = state.program_mut(program)?;
        entry.values.clear();
        entry.uniforms = locations.into_iter().collect();
        entry.linked = true;
        state.record(Command::LinkProgram(program));
        log::info!("HeadlessDevice: Linked program {program:?}");
        Ok(())
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError> {
        let mut state = self.state();
        let entry = state.programs.get(&program).ok_or(ResourceError::NotFound)?;
        if !entry.linked {
            return Err(ResourceError::BackendError(format!(
                "program {program:?} is not linked"
            )));
        }
        state.active_program = Some(program);
        state.record(Command::UseProgram(program));
        Ok(())
    }

    fn uniform_location(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Result<Option<UniformLocation>, ResourceError> {
        let state = self.state();
        let entry = state.programs.get(&program).ok_or(ResourceError::NotFound)?;
        if !entry.linked {
            return Err(ResourceError::BackendError(format!(
                "program {program:?} is not linked"
            )));
        }
        Ok(entry.uniforms.get(name).copied())
    }

    fn set_uniform_matrix(
        &mut self,
        location: UniformLocation,
        matrix: &Mat4,
    ) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.injected(FailurePoint::SetUniform)?;
        let active = state
            .active_program
            .ok_or_else(|| ResourceError::BackendError("no program in use".to_string()))?;
        if state.uniform_owners.get(&location) != Some(&active) {
            return Err(ResourceError::InvalidHandle);
        }
        state.program_mut(active)?.values.insert(location, *matrix);
        state.record(Command::SetUniformMatrix {
            location,
            matrix: *matrix,
        });
        Ok(())
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.polygon_mode = mode;
        state.record(Command::SetPolygonMode(mode));
        Ok(())
    }

    fn draw_triangles(&mut self, first: u32, count: u32) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.injected(FailurePoint::Draw)?;
        let program = state
            .active_program
            .ok_or_else(|| ResourceError::BackendError("no program in use".to_string()))?;

        let end = first as usize + count as usize;
        let slots: Vec<u32> = state
            .programs
            .get(&program)
            .map(|p| p.attributes.keys().copied().collect())
            .unwrap_or_default();
        for slot in slots {
            let Some((buffer, components)) = state.attributes.get(&slot).copied() else {
                return Err(ResourceError::BackendError(format!(
                    "attribute {slot} is not fed by any buffer"
                )));
            };
            let available = state
                .buffers
                .get(&buffer)
                .map(|b| b.data.len())
                .unwrap_or_default();
            if end * components as usize * std::mem::size_of::<f32>() > available {
                return Err(ResourceError::OutOfBounds);
            }
        }

        state.draw_calls += 1;
        state.record(Command::DrawTriangles { first, count });
        log::trace!("HeadlessDevice: Drew {count} vertices from {first}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::shaders::{DEFAULT_FRAGMENT, DEFAULT_VERTEX};

    fn opened() -> HeadlessDevice {
        let mut device = HeadlessDevice::new();
        device
            .create_window(&WindowDescriptor::default())
            .expect("window");
        device
    }

    fn linked(device: &mut HeadlessDevice) -> ProgramId {
        let vs = device.compile_shader(ShaderStage::Vertex, DEFAULT_VERTEX).unwrap();
        let fs = device.compile_shader(ShaderStage::Fragment, DEFAULT_FRAGMENT).unwrap();
        let program = device.create_program().unwrap();
        device.attach_shader(program, vs).unwrap();
        device.attach_shader(program, fs).unwrap();
        device.link_program(program).unwrap();
        program
    }

    #[test]
    fn calls_before_window_fail() {
        let mut device = HeadlessDevice::new();
        assert!(device.create_buffer().is_err());
        assert!(device.compile_shader(ShaderStage::Vertex, DEFAULT_VERTEX).is_err());
    }

    #[test]
    fn second_window_is_refused() {
        let mut device = opened();
        let err = device.create_window(&WindowDescriptor::default()).unwrap_err();
        assert!(matches!(err, RenderError::InitializationFailed(_)));
    }

    #[test]
    fn buffer_upload_round_trip() {
        let mut device = opened();
        let id = device.create_buffer().unwrap();
        let floats = [1.0f32, 2.0, 3.0, 4.0];
        device
            .upload_buffer(id, bytemuck::cast_slice(&floats), BufferUsage::Dynamic)
            .unwrap();
        assert_eq!(device.buffer_floats(id), Some(floats.to_vec()));
        assert_eq!(device.buffer_usage(id), Some(BufferUsage::Dynamic));

        device.destroy_buffer(id).unwrap();
        assert_eq!(device.live_buffers(), 0);
        assert_eq!(device.destroy_buffer(id), Err(ResourceError::NotFound));
    }

    #[test]
    fn compile_failure_carries_log() {
        let mut device = opened();
        let err = device
            .compile_shader(ShaderStage::Fragment, "void main() {")
            .unwrap_err();
        match err {
            ResourceError::Shader(ShaderError::CompilationFailed { stage, log }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(device.live_shaders(), 0);
    }

    #[test]
    fn geometry_stage_can_be_disabled() {
        let mut device = HeadlessDevice::with_config(HeadlessConfig {
            geometry_shaders: false,
            ..Default::default()
        });
        device.create_window(&WindowDescriptor::default()).unwrap();
        assert_eq!(
            device.compile_shader(ShaderStage::Geometry, "void main() {}"),
            Err(ResourceError::Shader(ShaderError::UnsupportedStage(
                ShaderStage::Geometry
            )))
        );
    }

    #[test]
    fn link_requires_vertex_and_fragment() {
        let mut device = opened();
        let vs = device.compile_shader(ShaderStage::Vertex, DEFAULT_VERTEX).unwrap();
        let program = device.create_program().unwrap();
        device.attach_shader(program, vs).unwrap();
        let err = device.link_program(program).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Shader(ShaderError::LinkFailed { ref log }) if log.contains("fragment")
        ));
    }

    #[test]
    fn uniforms_resolve_only_when_declared() {
        let mut device = opened();
        let program = linked(&mut device);
        assert!(device.uniform_location(program, "matrix_model").unwrap().is_some());
        assert!(device.uniform_location(program, "matrix_other").unwrap().is_none());
    }

    #[test]
    fn uniform_write_requires_active_owner() {
        let mut device = opened();
        let program = linked(&mut device);
        let location = device
            .uniform_location(program, "matrix_view")
            .unwrap()
            .unwrap();
        assert!(device.set_uniform_matrix(location, &Mat4::IDENTITY).is_err());

        device.use_program(program).unwrap();
        device.set_uniform_matrix(location, &Mat4::IDENTITY).unwrap();
        assert_eq!(device.uniform(program, "matrix_view"), Some(Mat4::IDENTITY));
    }

    #[test]
    fn draw_checks_attribute_buffers() {
        let mut device = opened();
        let program = linked(&mut device);
        device.bind_attribute(program, 0, "position").unwrap();
        device.link_program(program).unwrap();
        device.use_program(program).unwrap();

        let buffer = device.create_buffer().unwrap();
        device
            .upload_buffer(buffer, bytemuck::cast_slice(&[0.0f32; 12]), BufferUsage::Dynamic)
            .unwrap();
        assert!(device.draw_triangles(0, 3).is_err());

        device.bind_vertex_buffer(0, buffer, 4).unwrap();
        device.draw_triangles(0, 3).unwrap();
        assert_eq!(device.draw_triangles(0, 6), Err(ResourceError::OutOfBounds));
        assert_eq!(device.draw_calls(), 1);
    }

    #[test]
    fn injected_failures_fire_once() {
        let mut device = opened();
        device.fail_next(FailurePoint::CreateBuffer);
        assert!(device.create_buffer().is_err());
        assert!(device.create_buffer().is_ok());
    }

    #[test]
    fn delayed_failure_skips_successes() {
        let mut device = opened();
        device.fail_after(FailurePoint::CreateProgram, 2);
        assert!(device.create_program().is_ok());
        assert!(device.create_program().is_ok());
        assert!(device.create_program().is_err());
        assert!(device.create_program().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let mut device = opened();
        let probe = device.clone();
        device.set_title("hello").unwrap();
        device.swap_buffers().unwrap();
        let window = probe.window().unwrap();
        assert_eq!(window.title, "hello");
        assert_eq!(window.frames_presented, 1);
        assert_eq!(probe.commands().last(), Some(&Command::SwapBuffers));
    }

    #[test]
    fn command_log_keeps_only_the_latest_calls() {
        let mut device = HeadlessDevice::with_config(HeadlessConfig {
            command_capacity: 3,
            ..Default::default()
        });
        device.create_window(&WindowDescriptor::default()).unwrap();
        for _ in 0..1000 {
            device.clear(Color::BLACK).unwrap();
            device.swap_buffers().unwrap();
        }
        device.set_title("last").unwrap();

        assert_eq!(
            device.commands(),
            vec![
                Command::Clear(Color::BLACK),
                Command::SwapBuffers,
                Command::SetTitle("last".to_string()),
            ]
        );
        assert_eq!(device.window().unwrap().frames_presented, 1000);
    }

    #[test]
    fn default_command_log_is_bounded() {
        let mut device = opened();
        for _ in 0..HeadlessConfig::DEFAULT_COMMAND_CAPACITY {
            device.swap_buffers().unwrap();
        }
        device.set_title("overflow").unwrap();
        let commands = device.commands();
        assert_eq!(commands.len(), HeadlessConfig::DEFAULT_COMMAND_CAPACITY);
        assert_eq!(commands.last(), Some(&Command::SetTitle("overflow".to_string())));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, Command::CreateWindow { .. })));
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut device = HeadlessDevice::with_config(HeadlessConfig {
            command_capacity: 0,
            ..Default::default()
        });
        device.create_window(&WindowDescriptor::default()).unwrap();
        device.swap_buffers().unwrap();
        assert!(device.commands().is_empty());
        assert_eq!(device.window().unwrap().frames_presented, 1);
    }
}
