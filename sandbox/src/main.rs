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

//! Spins a colored triangle on the headless device and reports the frame rate
//! through the window title.
//!
//! Usage: `sandbox [config.json]`

use anyhow::{Context, Result};
use lumen_core::{RendererConfig, Shape, Stopwatch};
use lumen_infra::HeadlessDevice;
use lumen_lanes::RenderBackend;

/// Radians added around each axis per frame.
const SPIN_PER_FRAME: (f32, f32, f32) = (0.0, 0.02, 0.01);

fn load_config() -> Result<RendererConfig> {
    match std::env::args().nth(1) {
        Some(path) => RendererConfig::load(&path),
        None => {
            log::info!("No config file given, using defaults");
            Ok(RendererConfig::default())
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let camera = config.camera();
    let device = HeadlessDevice::new();
    let probe = device.clone();

    let mut backend = RenderBackend::create(device, &config.window_descriptor())
        .context("failed to create the render backend")?;
    backend
        .use_builtin_shaders()
        .context("failed to build the default shader program")?;

    let mut triangle = Shape::triangle();
    let mut title_timer = Stopwatch::new();

    let mut frame: u64 = 0;
    while config.frames == 0 || frame < config.frames {
        backend.clear(config.clear_color)?;
        let (dx, dy, dz) = SPIN_PER_FRAME;
        triangle.rotate(dx, dy, dz);
        backend.draw(&triangle, Some(&camera), config.fill)?;
        backend.display()?;

        if title_timer.elapsed_ms() >= config.title_refresh_ms {
            let title = format!("{} - {:.0} fps", config.title, backend.frame_rate());
            backend.set_window_title(&title)?;
            title_timer.reset();
        }
        frame += 1;
    }

    if let Some(window) = probe.window() {
        log::info!(
            "Presented {} frames on a {}x{} window titled '{}'",
            window.frames_presented,
            window.width,
            window.height,
            window.title
        );
    }
    log::info!("Issued {} draw calls", probe.draw_calls());
    Ok(())
}
