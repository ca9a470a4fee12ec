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

//! Defines the 8-bit-per-channel `Color` type carried by vertices.

use serde::{Deserialize, Serialize};

/// A color with four 8-bit channels in the `[0, 255]` range.
///
/// This is the color representation stored on every [`Vertex`](crate::scene::Vertex).
/// It is normalized to `[0.0, 1.0]` floats only when uploaded to the device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Color {
    /// The red channel.
    pub r: u8,
    /// The green channel.
    pub g: u8,
    /// The blue channel.
    pub b: u8,
    /// The alpha (opacity) channel.
    pub a: u8,
}

impl Color {
    // --- Common Color Constants ---

    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a new `Color` with explicit RGBA values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `Color` (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns the four channels divided by 255, in `r, g, b, a` order.
    #[inline]
    pub fn to_normalized(&self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

impl Default for Color {
    /// Returns opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 4]> for Color {
    #[inline]
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [u8; 4] {
    #[inline]
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_normalized_divides_by_255() {
        let c = Color::new(255, 0, 51, 102);
        let n = c.to_normalized();
        assert_eq!(n[0], 1.0);
        assert_eq!(n[1], 0.0);
        assert_relative_eq!(n[2], 0.2, epsilon = 1e-6);
        assert_relative_eq!(n[3], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_constants_are_opaque() {
        assert_eq!(Color::RED.a, 255);
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_array_conversions() {
        let c: Color = [1, 2, 3, 4].into();
        let back: [u8; 4] = c.into();
        assert_eq!(back, [1, 2, 3, 4]);
    }
}
