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

//! Renderer and camera configuration, loaded from JSON.

use crate::math::{Color, Vec3};
use crate::renderer::{PolygonMode, WindowDescriptor};
use crate::scene::{Camera, Positioned};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Initial camera placement and perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    /// Width / height. Taken from the window when absent.
    pub aspect: Option<f32>,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: Camera::DEFAULT_FOV,
            aspect: None,
            near: Camera::DEFAULT_NEAR,
            far: Camera::DEFAULT_FAR,
        }
    }
}

impl CameraConfig {
    /// Builds a camera with every parameter applied.
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new(self.position, self.target, self.up);
        camera.set_fov(self.fov_degrees);
        camera.set_aspect(self.aspect.unwrap_or(Camera::DEFAULT_ASPECT));
        camera.set_z(self.near, self.far);
        camera
    }
}

/// Window, frame loop and camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Base window title.
    pub title: String,
    /// Filled or wireframe rasterization.
    pub fill: PolygonMode,
    /// Color the frame is cleared to.
    pub clear_color: Color,
    /// Number of frames to run; `0` runs until stopped.
    pub frames: u64,
    /// How often the title's frame-rate readout refreshes, in milliseconds.
    pub title_refresh_ms: u64,
    /// Initial camera.
    pub camera: CameraConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "lumen".to_string(),
            fill: PolygonMode::Fill,
            clear_color: Color::BLACK,
            frames: 0,
            title_refresh_ms: 100,
            camera: CameraConfig::default(),
        }
    }
}

impl RendererConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse renderer configuration")
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid configuration in '{}'", path.display()))
    }

    /// The window to open.
    pub fn window_descriptor(&self) -> WindowDescriptor<'_> {
        WindowDescriptor {
            width: self.width,
            height: self.height,
            title: Cow::Borrowed(&self.title),
        }
    }

    /// Builds the camera, defaulting its aspect ratio to the window's.
    pub fn camera(&self) -> Camera {
        let mut camera = self.camera.build();
        if self.camera.aspect.is_none() {
            camera.set_aspect(self.window_descriptor().aspect_ratio());
        }
        log::debug!(
            "Camera at {:?} looking at {:?}, aspect {}",
            camera.position(),
            camera.target(),
            camera.aspect()
        );
        camera
    }
}
