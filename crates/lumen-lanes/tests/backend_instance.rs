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

mod common;

use lumen_core::renderer::{RenderError, Severity, WindowDescriptor};
use lumen_infra::HeadlessDevice;
use lumen_lanes::{BackendToken, RenderBackend};

#[test]
fn second_instance_is_refused_until_the_first_is_dropped() {
    let _guard = common::serial();

    let first = RenderBackend::create(HeadlessDevice::new(), &WindowDescriptor::default())
        .expect("first backend");

    let err = RenderBackend::create(HeadlessDevice::new(), &WindowDescriptor::default())
        .unwrap_err();
    assert_eq!(err, RenderError::InstanceAlreadyExists);
    assert_eq!(err.severity(), Severity::Fatal);

    drop(first);

    let again = RenderBackend::create(HeadlessDevice::new(), &WindowDescriptor::default());
    assert!(again.is_ok());
}

#[test]
fn token_cannot_be_acquired_twice() {
    let _guard = common::serial();

    let token = BackendToken::acquire().expect("token");
    assert!(BackendToken::is_held());
    assert!(matches!(
        BackendToken::acquire(),
        Err(RenderError::InstanceAlreadyExists)
    ));

    let backend = RenderBackend::new(HeadlessDevice::new(), token, &WindowDescriptor::default())
        .expect("backend from token");
    assert!(BackendToken::is_held());
    drop(backend);
    assert!(!BackendToken::is_held());
}

#[test]
fn failed_construction_frees_the_slot() {
    let _guard = common::serial();

    let device = HeadlessDevice::new();
    device.fail_next(lumen_infra::FailurePoint::CreateWindow);
    assert!(RenderBackend::create(device, &WindowDescriptor::default()).is_err());
    assert!(!BackendToken::is_held());
    assert!(BackendToken::acquire().is_ok());
}
