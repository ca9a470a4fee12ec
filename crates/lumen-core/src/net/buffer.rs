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

//! A growable byte buffer with a shared read/write cursor.

use super::{BufferError, Wire};

/// Raw bytes with a cursor, used to assemble and parse network messages.
///
/// Reads and writes both start at the cursor and advance it. Writing past the
/// end grows the buffer; reading past the end fails with
/// [`BufferError::Underflow`] and leaves the cursor where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl NetBuffer {
    /// Creates a zero-filled buffer of `len` bytes with the cursor at the start.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0; len],
            cursor: 0,
        }
    }

    /// Wraps existing bytes, cursor at the start.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, cursor: 0 }
    }

    /// Drops all content and resets the cursor.
    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    /// Moves the cursor back to the start.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Length in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes between the cursor and the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Resizes to `len` bytes, keeping existing content and zero-filling new bytes.
    /// The cursor is clamped to the new end when it would fall outside.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(len, 0);
        self.cursor = self.cursor.min(len);
    }

    /// Returns the next `len` bytes and advances the cursor past them.
    pub fn read_raw(&mut self, len: usize) -> Result<&[u8], BufferError> {
        if len > self.remaining() {
            log::warn!(
                "NetBuffer: read of {len} bytes with only {} remaining",
                self.remaining()
            );
            return Err(BufferError::Underflow {
                requested: len,
                remaining: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.data[start..self.cursor])
    }

    /// Writes `bytes` at the cursor, growing the buffer as needed, and advances the cursor.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
    }

    /// Decodes a `T` at the cursor.
    pub fn read<T: Wire>(&mut self) -> Result<T, BufferError> {
        let bytes = self.read_raw(T::SIZE)?;
        T::decode(bytes)
    }

    /// Encodes `value` at the cursor.
    pub fn write<T: Wire>(&mut self, value: &T) {
        let end = self.cursor + T::SIZE;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        value.encode(&mut self.data[self.cursor..end]);
        self.cursor = end;
    }

    /// The whole content, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Color, Vec3};

    #[test]
    fn write_then_read_back() {
        let mut buf = NetBuffer::default();
        buf.write(&42u16);
        buf.write(&Vec3::new(1.0, 2.0, 3.0));
        buf.write(&Color::CYAN);
        buf.write(&true);
        assert_eq!(buf.size(), 2 + 12 + 4 + 1);

        buf.reset();
        assert_eq!(buf.read::<u16>(), Ok(42));
        assert_eq!(buf.read::<Vec3>(), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(buf.read::<Color>(), Ok(Color::CYAN));
        assert_eq!(buf.read::<bool>(), Ok(true));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn underflow_leaves_cursor_unchanged() {
        let mut buf = NetBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buf.read::<u8>(), Ok(1));

        let err = buf.read::<u32>().unwrap_err();
        assert_eq!(
            err,
            BufferError::Underflow {
                requested: 4,
                remaining: 2
            }
        );
        assert_eq!(err.severity(), crate::renderer::Severity::Warning);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.read_raw(2), Ok(&[2u8, 3][..]));
    }

    #[test]
    fn write_in_the_middle_overwrites() {
        let mut buf = NetBuffer::new(4);
        buf.write_raw(&[9, 9]);
        buf.reset();
        buf.write_raw(&[1]);
        assert_eq!(buf.as_bytes(), &[1, 9, 0, 0]);
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn resize_clamps_cursor() {
        let mut buf = NetBuffer::new(8);
        buf.write(&0u64);
        assert_eq!(buf.cursor(), 8);
        buf.resize(3);
        assert_eq!(buf.cursor(), 3);
        buf.resize(10);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.size(), 10);
    }

    #[test]
    fn clear_empties_everything() {
        let mut buf = NetBuffer::new(5);
        buf.write(&1u8);
        buf.clear();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.cursor(), 0);
    }
}
