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

//! Window and viewport descriptions handed to the device.

use std::borrow::Cow;

/// Describes the window a device should open.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor<'a> {
    /// Width of the drawable area, in pixels.
    pub width: u32,
    /// Height of the drawable area, in pixels.
    pub height: u32,
    /// Initial window title.
    pub title: Cow<'a, str>,
}

impl Default for WindowDescriptor<'_> {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: Cow::Borrowed("lumen"),
        }
    }
}

impl WindowDescriptor<'_> {
    /// The full-window viewport.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Width divided by height, or `1.0` for a zero-height window.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A rectangle of the window, in pixels, that draws map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
