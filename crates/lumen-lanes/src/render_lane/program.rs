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

//! Compiles shader stages and links them into the program draws use.

use lumen_core::renderer::api::*;
use lumen_core::renderer::{GraphicsDevice, RenderError};

/// A program that went through the full lifecycle and is bound for draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedProgram {
    /// Device handle of the program.
    pub id: ProgramId,
    /// Always [`ProgramState::Active`] once returned.
    pub state: ProgramState,
}

/// Drives one program through `Uncompiled -> Compiled -> Attached -> Linked -> Active`.
#[derive(Debug, Default)]
pub struct ProgramLinker {
    state: ProgramState,
    history: Vec<ProgramState>,
}

impl ProgramLinker {
    /// A linker in the `Uncompiled` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Every state the last `link` went through, starting with `Uncompiled`.
    pub fn history(&self) -> &[ProgramState] {
        &self.history
    }

    fn advance(&mut self, next: ProgramState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal program transition {:?} -> {:?}",
            self.state,
            next
        );
        log::trace!("ProgramLinker: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    fn fail(&mut self) {
        self.advance(ProgramState::Failed);
    }

    /// Compiles every stage, links them with the fixed attribute slots bound,
    /// and makes the program active.
    ///
    /// The intermediate shader objects are detached and destroyed whatever the
    /// outcome. On failure the program itself is destroyed too and the linker
    /// ends in `Failed`.
    pub fn link<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        stages: &[&Shader],
    ) -> Result<LinkedProgram, RenderError> {
        self.state = ProgramState::Uncompiled;
        self.history.clear();
        self.history.push(self.state);
        let mut objects = Vec::with_capacity(stages.len());
        let mut program = None;

        let result = self.build(device, stages, &mut objects, &mut program);

        for shader in objects {
            if let Some(program) = program {
                if let Err(e) = device.detach_shader(program, shader) {
                    log::debug!("ProgramLinker: Failed to detach {shader:?}: {e}");
                }
            }
            if let Err(e) = device.destroy_shader(shader) {
                log::warn!("ProgramLinker: Failed to destroy {shader:?}: {e}");
            }
        }

        match result {
            Ok(id) => {
                self.advance(ProgramState::Active);
                log::info!("ProgramLinker: Program {id:?} is active");
                Ok(LinkedProgram {
                    id,
                    state: self.state,
                })
            }
            Err(e) => {
                if let Some(id) = program {
                    if let Err(destroy) = device.destroy_program(id) {
                        log::warn!("ProgramLinker: Failed to destroy {id:?}: {destroy}");
                    }
                }
                self.fail();
                log::error!("ProgramLinker: {e}");
                Err(e)
            }
        }
    }

    fn build<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        stages: &[&Shader],
        objects: &mut Vec<ShaderObjectId>,
        program: &mut Option<ProgramId>,
    ) -> Result<ProgramId, RenderError> {
        for shader in stages {
            objects.push(device.compile_shader(shader.stage(), shader.source())?);
        }
        self.advance(ProgramState::Compiled);

        let id = device.create_program()?;
        *program = Some(id);
        device.bind_attribute(id, ATTRIBUTE_POSITION, ATTRIBUTE_POSITION_NAME)?;
        device.bind_attribute(id, ATTRIBUTE_COLOR, ATTRIBUTE_COLOR_NAME)?;
        for shader in objects.iter() {
            device.attach_shader(id, *shader)?;
        }
        self.advance(ProgramState::Attached);

        device.link_program(id)?;
        self.advance(ProgramState::Linked);

        device.use_program(id)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::{ResourceError, ShaderError};
    use lumen_infra::{FailurePoint, HeadlessDevice};

    fn device() -> HeadlessDevice {
        let mut device = HeadlessDevice::new();
        device
            .create_window(&WindowDescriptor::default())
            .expect("window");
        device
    }

    fn builtins() -> (Shader, Shader) {
        (
            Shader::builtin(ShaderStage::Vertex).expect("vertex"),
            Shader::builtin(ShaderStage::Fragment).expect("fragment"),
        )
    }

    #[test]
    fn successful_link_is_active_and_cleans_up() {
        let mut device = device();
        let (vs, fs) = builtins();
        let mut linker = ProgramLinker::new();

        let program = linker.link(&mut device, &[&vs, &fs]).unwrap();
        assert_eq!(program.state, ProgramState::Active);
        assert_eq!(linker.state(), ProgramState::Active);
        assert_eq!(device.active_program(), Some(program.id));
        assert_eq!(device.live_shaders(), 0);
        assert_eq!(device.live_programs(), 1);

        let attributes = device.program_attributes(program.id).unwrap();
        assert_eq!(attributes.get(&0).map(String::as_str), Some("position"));
        assert_eq!(attributes.get(&1).map(String::as_str), Some("color"));
    }

    #[test]
    fn compile_failure_destroys_earlier_stages() {
        let mut device = device();
        let (vs, _) = builtins();
        let broken = Shader::new(ShaderStage::Fragment, "void main() {");
        let mut linker = ProgramLinker::new();

        let err = linker.link(&mut device, &[&vs, &broken]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ResourceError(ResourceError::Shader(ShaderError::CompilationFailed {
                stage: ShaderStage::Fragment,
                ..
            }))
        ));
        assert_eq!(linker.state(), ProgramState::Failed);
        assert_eq!(device.live_shaders(), 0);
        assert_eq!(device.live_programs(), 0);
    }

    #[test]
    fn link_failure_destroys_shaders_and_program() {
        let mut device = device();
        let (vs, fs) = builtins();
        device.fail_next(FailurePoint::LinkProgram);
        let mut linker = ProgramLinker::new();

        let err = linker.link(&mut device, &[&vs, &fs]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ResourceError(ResourceError::Shader(ShaderError::LinkFailed { .. }))
        ));
        assert_eq!(linker.state(), ProgramState::Failed);
        assert_eq!(device.live_shaders(), 0);
        assert_eq!(device.live_programs(), 0);
        assert_eq!(device.active_program(), None);
    }

    fn assert_legal(history: &[ProgramState]) {
        for pair in history.windows(2) {
            assert!(
                pair[0].can_advance_to(pair[1]),
                "illegal transition {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn transitions_follow_the_lifecycle_table() {
        use ProgramState::*;
        let (vs, fs) = builtins();
        let broken = Shader::new(ShaderStage::Fragment, "void main() {");
        let mut linker = ProgramLinker::new();

        let mut device = device();
        linker.link(&mut device, &[&vs, &fs]).unwrap();
        assert_eq!(
            linker.history(),
            &[Uncompiled, Compiled, Attached, Linked, Active]
        );
        assert_legal(linker.history());

        linker.link(&mut device, &[&vs, &broken]).unwrap_err();
        assert_eq!(linker.history(), &[Uncompiled, Failed]);
        assert_legal(linker.history());

        device.fail_next(FailurePoint::LinkProgram);
        linker.link(&mut device, &[&vs, &fs]).unwrap_err();
        assert_eq!(
            linker.history(),
            &[Uncompiled, Compiled, Attached, Failed]
        );
        assert_legal(linker.history());

        device.fail_next(FailurePoint::CreateProgram);
        linker.link(&mut device, &[&vs, &fs]).unwrap_err();
        assert_eq!(linker.history(), &[Uncompiled, Compiled, Failed]);
        assert_legal(linker.history());
    }

    #[test]
    fn missing_fragment_stage_fails_to_link() {
        let mut device = device();
        let (vs, _) = builtins();
        let mut linker = ProgramLinker::new();
        assert!(linker.link(&mut device, &[&vs]).is_err());
        assert_eq!(device.live_shaders(), 0);
    }
}
