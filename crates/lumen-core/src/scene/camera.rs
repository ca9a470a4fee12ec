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

//! The camera: a position, a look-at target and perspective parameters, with
//! eagerly maintained view and projection matrices.

use crate::math::{degrees_to_radians, Mat4, Vec3, EPSILON};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

/// The capability of having a world-space position that can be read, set and moved.
pub trait Positioned {
    /// The current position.
    fn position(&self) -> Vec3;

    /// Places the object at `position`.
    fn set_position(&mut self, position: Vec3);

    /// Moves the object by `delta`, relative to its current position.
    fn move_by(&mut self, delta: Vec3) {
        let p = self.position();
        self.set_position(p + delta);
    }
}

impl Positioned for Position {
    fn position(&self) -> Vec3 {
        self.0
    }

    fn set_position(&mut self, position: Vec3) {
        self.0 = position;
    }
}

/// A perspective camera.
///
/// The camera owns its inputs (position, target, up vector, field of view,
/// aspect ratio and clip distances) and two derived matrices: the orientation
/// (view) matrix and the perspective (projection) matrix. Every setter
/// recomputes the affected matrix before returning, so the getters never
/// expose a stale value.
///
/// Degenerate inputs are not rejected. The matrices are computed from the raw
/// values, a warning is logged, and [`Camera::is_degenerate`] reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Position,
    target: Vec3,
    up: Vec3,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    orientation: Mat4,
    perspective: Mat4,
}

impl Default for Camera {
    /// A camera at `(0, 0, 5)` looking at the origin, 45° field of view,
    /// 4:3 aspect, clip planes at 0.1 and 100.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
    }
}

impl Camera {
    /// Default vertical field of view, in degrees.
    pub const DEFAULT_FOV: f32 = 45.0;
    /// Default aspect ratio.
    pub const DEFAULT_ASPECT: f32 = 4.0 / 3.0;
    /// Default near clip distance.
    pub const DEFAULT_NEAR: f32 = 0.1;
    /// Default far clip distance.
    pub const DEFAULT_FAR: f32 = 100.0;

    /// Creates a camera at `position` looking at `target`, with the default perspective.
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            position: Position(position),
            target,
            up,
            fov: Self::DEFAULT_FOV,
            aspect: Self::DEFAULT_ASPECT,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            orientation: Mat4::IDENTITY,
            perspective: Mat4::IDENTITY,
        };
        camera.update_orientation();
        camera.update_perspective();
        camera
    }

    /// Sets the point to look at and the world up direction.
    pub fn set_orientation(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        self.update_orientation();
    }

    /// Sets the vertical field of view, in degrees.
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov = degrees;
        self.update_perspective();
    }

    /// Sets the aspect ratio (width / height).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_perspective();
    }

    /// Sets the near and far clip distances.
    pub fn set_z(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_perspective();
    }

    /// The orientation (view) matrix.
    pub fn orientation(&self) -> Mat4 {
        self.orientation
    }

    /// The perspective (projection) matrix.
    pub fn perspective(&self) -> Mat4 {
        self.perspective
    }

    /// The look-at target.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The world up direction, as given.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The vertical field of view, in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// The aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// The near clip distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// The far clip distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// The camera basis as `(right, up, forward)`.
    ///
    /// `forward = normalize(target - position)`,
    /// `right = normalize(forward x up)` and `up = right x forward`.
    pub fn axes(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position.0).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Returns `true` when the current inputs produce a degenerate matrix.
    pub fn is_degenerate(&self) -> bool {
        self.orientation_issue().is_some() || self.perspective_issue().is_some()
    }

    fn orientation_issue(&self) -> Option<&'static str> {
        let forward = self.target - self.position.0;
        if forward.length_squared() < EPSILON * EPSILON {
            return Some("target coincides with position");
        }
        if forward.normalize().cross(self.up).length_squared() < EPSILON * EPSILON {
            return Some("up vector is zero or parallel to the view direction");
        }
        None
    }

    fn perspective_issue(&self) -> Option<&'static str> {
        if self.aspect <= 0.0 {
            Some("aspect ratio is not positive")
        } else if self.fov <= 0.0 || self.fov >= 180.0 {
            Some("field of view is outside (0, 180) degrees")
        } else if self.near <= 0.0 {
            Some("near clip distance is not positive")
        } else if self.near >= self.far {
            Some("near clip distance is not below far")
        } else {
            None
        }
    }

    fn update_orientation(&mut self) {
        if let Some(issue) = self.orientation_issue() {
            log::warn!("Camera: degenerate orientation ({issue}); view matrix is not meaningful");
        }
        let (right, up, forward) = self.axes();
        self.orientation = Mat4::from_view_axes(self.position.0, right, up, forward);
    }

    fn update_perspective(&mut self) {
        if let Some(issue) = self.perspective_issue() {
            log::warn!(
                "Camera: degenerate perspective ({issue}): fov={}, aspect={}, near={}, far={}",
                self.fov,
                self.aspect,
                self.near,
                self.far
            );
        }
        self.perspective =
            Mat4::perspective_rh_gl(degrees_to_radians(self.fov), self.aspect, self.near, self.far);
    }
}

impl Positioned for Camera {
    fn position(&self) -> Vec3 {
        self.position.position()
    }

    fn set_position(&mut self, position: Vec3) {
        self.position.set_position(position);
        self.update_orientation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, Vec4};
    use approx::assert_relative_eq;

    #[test]
    fn test_axes_are_orthonormal() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y);
        let (right, up, forward) = camera.axes();

        assert_relative_eq!(right.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(forward.length(), 1.0, epsilon = 1e-6);
        assert!(approx_eq(right.dot(up), 0.0));
        assert!(approx_eq(right.dot(forward), 0.0));
        assert!(approx_eq(up.dot(forward), 0.0));
        assert_eq!(forward, Vec3::Z);
    }

    #[test]
    fn test_orientation_rows_and_translation() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let camera = Camera::new(eye, Vec3::new(1.0, 2.0, -10.0), Vec3::Y);
        let (right, up, forward) = camera.axes();
        let m = camera.orientation();

        assert_eq!(m.get_row(0), right.extend(-right.dot(eye)));
        assert_eq!(m.get_row(1), up.extend(-up.dot(eye)));
        assert_eq!(m.get_row(2), (-forward).extend(forward.dot(eye)));
        assert_eq!(m.get_row(3), Vec4::W);
    }

    #[test]
    fn test_perspective_matches_closed_form() {
        let mut camera = Camera::default();
        camera.set_fov(70.0);
        camera.set_aspect(2.0);
        camera.set_z(1.0, 50.0);

        let f = 1.0 / (70f32.to_radians() / 2.0).tan();
        let p = camera.perspective();
        assert_relative_eq!(p.get(0, 0), f / 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.get(1, 1), f, epsilon = 1e-6);
        assert_relative_eq!(p.get(2, 2), 51.0 / -49.0, epsilon = 1e-6);
        assert_relative_eq!(p.get(2, 3), 100.0 / -49.0, epsilon = 1e-6);
        assert_eq!(p.get(3, 2), -1.0);
        assert_eq!(p.get(3, 3), 0.0);
    }

    #[test]
    fn test_setters_recompute_eagerly() {
        let mut camera = Camera::default();
        let view_before = camera.orientation();
        camera.move_by(Vec3::new(1.0, 0.0, 0.0));
        assert_ne!(camera.orientation(), view_before);
        assert_eq!(camera.position(), Vec3::new(1.0, 0.0, 5.0));

        let expected = Mat4::look_at_rh(camera.position(), Vec3::ZERO, Vec3::Y);
        assert_eq!(camera.orientation(), expected);

        let proj_before = camera.perspective();
        camera.set_aspect(1.0);
        assert_ne!(camera.perspective(), proj_before);
    }

    #[test]
    fn test_set_orientation_updates_view() {
        let mut camera = Camera::default();
        camera.set_orientation(Vec3::new(0.0, 5.0, 0.0), Vec3::Z);
        assert_eq!(camera.target(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(camera.up(), Vec3::Z);
        let expected = Mat4::look_at_rh(camera.position(), camera.target(), camera.up());
        assert_eq!(camera.orientation(), expected);
    }

    #[test]
    fn test_degenerate_inputs_pass_through() {
        let mut camera = Camera::default();
        assert!(!camera.is_degenerate());

        camera.set_z(10.0, 1.0);
        assert!(camera.is_degenerate());
        assert_eq!(camera.near(), 10.0);

        camera.set_z(0.1, 100.0);
        camera.set_aspect(0.0);
        assert!(camera.is_degenerate());

        let mut looking_at_self = Camera::new(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(looking_at_self.is_degenerate());
        looking_at_self.set_position(Vec3::ZERO);
        assert!(!looking_at_self.is_degenerate());
    }

    #[test]
    fn test_position_component() {
        let mut p = Position::default();
        p.move_by(Vec3::new(1.0, 2.0, 3.0));
        p.move_by(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.position(), Vec3::new(2.0, 2.0, 3.0));
    }
}
