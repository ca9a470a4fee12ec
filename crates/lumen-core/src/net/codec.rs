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

//! Byte-level encoding of fixed-size plain-data values.
//!
//! Each type that may travel through a [`NetBuffer`](super::NetBuffer)
//! implements [`Wire`], declaring its encoded size and how to turn itself into
//! little-endian bytes and back.

use super::BufferError;
use crate::math::{Color, Vec3};

/// A fixed-size value with an explicit byte encoding.
pub trait Wire: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Writes `Self::SIZE` bytes into the front of `out`.
    ///
    /// # Panics
    /// Panics if `out` is shorter than `Self::SIZE`.
    fn encode(&self, out: &mut [u8]);

    /// Reads a value from the front of `bytes`.
    ///
    /// # Errors
    /// Returns [`BufferError::Underflow`] if `bytes` is shorter than `Self::SIZE`.
    fn decode(bytes: &[u8]) -> Result<Self, BufferError>;
}

fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N], BufferError> {
    bytes
        .get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(BufferError::Underflow {
            requested: N,
            remaining: bytes.len(),
        })
}

macro_rules! impl_wire_le {
    ($($t:ty),* $(,)?) => {
        $(
            impl Wire for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn encode(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
                    take::<{ std::mem::size_of::<$t>() }>(bytes).map(<$t>::from_le_bytes)
                }
            }
        )*
    };
}

impl_wire_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Wire for bool {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        u8::decode(bytes).map(|b| b != 0)
    }
}

impl Wire for Vec3 {
    const SIZE: usize = 3 * f32::SIZE;

    fn encode(&self, out: &mut [u8]) {
        self.x.encode(&mut out[0..4]);
        self.y.encode(&mut out[4..8]);
        self.z.encode(&mut out[8..12]);
    }

    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        let raw = take::<12>(bytes)?;
        Ok(Vec3::new(
            f32::decode(&raw[0..4])?,
            f32::decode(&raw[4..8])?,
            f32::decode(&raw[8..12])?,
        ))
    }
}

impl Wire for Color {
    const SIZE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }

    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        take::<4>(bytes).map(Color::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        let mut out = [0u8; 4];
        0x0102_0304u32.encode(&mut out);
        assert_eq!(out, [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(u32::decode(&out), Ok(0x0102_0304));
    }

    #[test]
    fn short_input_is_an_underflow() {
        assert_eq!(
            i64::decode(&[1, 2, 3]),
            Err(BufferError::Underflow {
                requested: 8,
                remaining: 3
            })
        );
        assert!(Vec3::decode(&[0; 11]).is_err());
    }

    #[test]
    fn bool_accepts_any_non_zero_byte() {
        assert_eq!(bool::decode(&[0]), Ok(false));
        assert_eq!(bool::decode(&[7]), Ok(true));
    }

    #[test]
    fn vec3_and_color_layout() {
        let mut out = [0u8; 16];
        Vec3::new(1.0, -2.0, 0.5).encode(&mut out[..12]);
        Color::new(9, 8, 7, 6).encode(&mut out[12..]);
        assert_eq!(&out[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&out[12..], &[9, 8, 7, 6]);
        assert_eq!(Vec3::decode(&out), Ok(Vec3::new(1.0, -2.0, 0.5)));
    }
}
