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

//! # Lumen Core
//!
//! Foundational crate containing the value types, scene primitives, and
//! interface contracts shared by every other lumen crate.
//!
//! Nothing in here talks to a GPU. The [`renderer::GraphicsDevice`] trait is the
//! seam behind which a concrete backend lives (see `lumen-infra`), and the draw
//! orchestration that drives it lives in `lumen-lanes`.

#![warn(missing_docs)]

pub mod config;
pub mod math;
pub mod net;
pub mod renderer;
pub mod scene;
pub mod utils;

pub use config::{CameraConfig, RendererConfig};
pub use scene::{Camera, Shape, Vertex};
pub use utils::timer::{FrameRate, Stopwatch};
