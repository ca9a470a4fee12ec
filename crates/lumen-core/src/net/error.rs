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

//! Warning-class errors of the network buffer.

use crate::renderer::Severity;
use thiserror::Error;

/// An error raised while reading from a [`NetBuffer`](super::NetBuffer).
///
/// These are reported to the caller through `Result` and never terminate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A read asked for more bytes than remain after the cursor.
    #[error("buffer underflow: requested {requested} bytes, {remaining} remaining")]
    Underflow {
        /// Bytes the read needed.
        requested: usize,
        /// Bytes left between the cursor and the end of the buffer.
        remaining: usize,
    },
}

impl BufferError {
    /// Buffer errors are always recoverable.
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }
}
