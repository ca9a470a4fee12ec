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

//! Camera matrices extracted for one draw.

use crate::math::{Mat4, Vec3};
use crate::scene::{Camera, Positioned};

/// The view and projection matrices a draw binds, plus the eye position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewInfo {
    /// The camera's view matrix (world to view space).
    pub view_matrix: Mat4,
    /// The camera's projection matrix (view to clip space).
    pub projection_matrix: Mat4,
    /// The camera's position in world space.
    pub camera_position: Vec3,
}

impl ViewInfo {
    /// Creates a new `ViewInfo` from individual components.
    pub fn new(view_matrix: Mat4, projection_matrix: Mat4, camera_position: Vec3) -> Self {
        Self {
            view_matrix,
            projection_matrix,
            camera_position,
        }
    }

    /// Reads the matrices of `camera`, or substitutes identity for both when
    /// no camera is bound.
    pub fn extract(camera: Option<&Camera>) -> Self {
        match camera {
            Some(camera) => Self::new(
                camera.orientation(),
                camera.perspective(),
                camera.position(),
            ),
            None => Self::default(),
        }
    }

    /// The product of the projection and view matrices.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

impl Default for ViewInfo {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_camera_yields_identity() {
        let info = ViewInfo::extract(None);
        assert_eq!(info.view_matrix, Mat4::IDENTITY);
        assert_eq!(info.projection_matrix, Mat4::IDENTITY);
        assert_eq!(info.view_projection_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn bound_camera_is_copied() {
        let camera = Camera::default();
        let info = ViewInfo::extract(Some(&camera));
        assert_eq!(info.view_matrix, camera.orientation());
        assert_eq!(info.projection_matrix, camera.perspective());
        assert_eq!(info.camera_position, camera.position());
    }
}
