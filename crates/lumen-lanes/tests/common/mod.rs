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

use lumen_core::renderer::WindowDescriptor;
use lumen_infra::HeadlessDevice;
use lumen_lanes::RenderBackend;
use std::sync::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());

/// Serializes tests that build a backend; only one may exist per process.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// A backend over a fresh headless device, with the built-in shaders active,
/// plus a second handle to the device for inspection.
#[allow(dead_code)]
pub fn ready_backend() -> (RenderBackend<HeadlessDevice>, HeadlessDevice) {
    let device = HeadlessDevice::new();
    let probe = device.clone();
    let mut backend =
        RenderBackend::create(device, &WindowDescriptor::default()).expect("backend");
    backend.use_builtin_shaders().expect("builtin shaders");
    probe.clear_commands();
    (backend, probe)
}
