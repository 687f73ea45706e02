// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Model, camera and projection transforms
//!
//! [`Transform`] keeps every matrix twice: the forward matrix and its inverse.
//! Each operation updates both through paired calls on [`Matrix3D`] so the
//! pair never drifts apart and no general inversion is needed, except for
//! [`Transform::apply_matrix`] which inverts its argument once.
//!
//! # Camera Editing
//!
//! Between [`Transform::begin_camera`] and [`Transform::end_camera`] the
//! roles swap: forward operations go to the camera inverse and inverse
//! operations to the camera itself. Moving "the camera" to the right then
//! moves the scene to the left.
//!
//! # Coordinate Spaces
//!
//! | Space  | Produced by                               |
//! |--------|-------------------------------------------|
//! | model  | vertex input                              |
//! | camera | modelview (camera times model transforms) |
//! | clip   | projection                                |
//! | screen | divide by w, viewport mapping, z in 0..1  |

mod matrix;

pub use matrix::Matrix3D;

use super::error::{RasterError, Result};
use super::raster::NearPlane;

/// Depth of the modelview stack
pub const MATRIX_STACK_DEPTH: usize = 32;

/// Camera-space z beyond which geometry is clipped
///
/// The camera looks down negative z; vertices with `z > NEAR_CLIP_Z` are
/// behind or too close to the eye.
pub const NEAR_CLIP_Z: f32 = -8.0;

/// Default vertical field of view (60 degrees)
pub const DEFAULT_FOV: f32 = std::f32::consts::FRAC_PI_3;

/// Active projection kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Built by `frustum`/`perspective`; carries the near-plane rectangle
    Perspective(NearPlane),
    Orthographic,
}

/// Camera parameters derived from the framebuffer size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDefaults {
    pub fov: f32,
    pub eye: [f32; 3],
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl CameraDefaults {
    pub fn for_size(width: f32, height: f32) -> Self {
        let fov = DEFAULT_FOV;
        let eye_z = (height / 2.0) / (fov / 2.0).tan();
        Self {
            fov,
            eye: [width / 2.0, height / 2.0, eye_z],
            near: eye_z / 10.0,
            far: eye_z * 10.0,
            aspect: width / height,
        }
    }
}

/// The 3D transform state of a renderer
#[derive(Debug, Clone)]
pub struct Transform {
    width: f32,
    height: f32,

    modelview: Matrix3D,
    modelview_inv: Matrix3D,
    camera: Matrix3D,
    camera_inv: Matrix3D,
    projection: Matrix3D,
    mode: Projection,

    /// Saved (modelview, modelview_inv) pairs
    stack: Vec<(Matrix3D, Matrix3D)>,
    editing_camera: bool,

    defaults: CameraDefaults,
}

impl Transform {
    /// Default camera and perspective for a `width` x `height` viewport
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width as f32, height as f32);
        let mut transform = Self {
            width,
            height,
            modelview: Matrix3D::IDENTITY,
            modelview_inv: Matrix3D::IDENTITY,
            camera: Matrix3D::IDENTITY,
            camera_inv: Matrix3D::IDENTITY,
            projection: Matrix3D::IDENTITY,
            mode: Projection::Orthographic,
            stack: Vec::with_capacity(MATRIX_STACK_DEPTH),
            editing_camera: false,
            defaults: CameraDefaults::for_size(width, height),
        };
        transform.camera_default();
        transform.perspective_default();
        transform
    }

    /// Start-of-frame reset: the modelview returns to the camera
    pub fn begin_frame(&mut self) {
        self.modelview = self.camera;
        self.modelview_inv = self.camera_inv;
    }

    pub fn defaults(&self) -> CameraDefaults {
        self.defaults
    }

    /// Current modelview
    pub fn matrix(&self) -> Matrix3D {
        self.modelview
    }

    pub fn modelview(&self) -> &Matrix3D {
        &self.modelview
    }

    pub fn modelview_inv(&self) -> &Matrix3D {
        &self.modelview_inv
    }

    pub fn camera_matrix(&self) -> &Matrix3D {
        &self.camera
    }

    pub fn camera_inv(&self) -> &Matrix3D {
        &self.camera_inv
    }

    pub fn projection(&self) -> &Matrix3D {
        &self.projection
    }

    pub fn projection_mode(&self) -> Projection {
        self.mode
    }

    /// Near-plane rectangle when a perspective projection is active
    pub fn near_plane(&self) -> Option<NearPlane> {
        match self.mode {
            Projection::Perspective(plane) => Some(plane),
            Projection::Orthographic => None,
        }
    }

    pub fn is_editing_camera(&self) -> bool {
        self.editing_camera
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // Matrix stack

    /// Save the current modelview pair
    ///
    /// # Errors
    ///
    /// [`RasterError::MatrixStackOverflow`] when the stack already holds
    /// [`MATRIX_STACK_DEPTH`] entries.
    pub fn push_matrix(&mut self) -> Result<()> {
        if self.stack.len() == MATRIX_STACK_DEPTH {
            return Err(RasterError::MatrixStackOverflow {
                depth: MATRIX_STACK_DEPTH,
            });
        }
        self.stack.push((self.modelview, self.modelview_inv));
        Ok(())
    }

    /// Restore the last saved modelview pair
    ///
    /// # Errors
    ///
    /// [`RasterError::MatrixStackUnderflow`] on an empty stack.
    pub fn pop_matrix(&mut self) -> Result<()> {
        let (modelview, modelview_inv) = self.stack.pop().ok_or(RasterError::MatrixStackUnderflow)?;
        self.modelview = modelview;
        self.modelview_inv = modelview_inv;
        Ok(())
    }

    pub fn reset_matrix(&mut self) {
        let (forward, reverse) = self.targets();
        forward.reset();
        reverse.reset();
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) {
        let (forward, reverse) = self.targets();
        forward.translate(tx, ty, tz);
        reverse.inv_translate(tx, ty, tz);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        let (forward, reverse) = self.targets();
        forward.rotate_x(angle);
        reverse.inv_rotate_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        let (forward, reverse) = self.targets();
        forward.rotate_y(angle);
        reverse.inv_rotate_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        let (forward, reverse) = self.targets();
        forward.rotate_z(angle);
        reverse.inv_rotate_z(angle);
    }

    /// Rotate around an arbitrary axis; a zero axis is ignored
    pub fn rotate(&mut self, angle: f32, axis: [f32; 3]) {
        let Some(axis) = normalize(axis) else {
            log::debug!("rotate around a zero-length axis ignored");
            return;
        };
        let (forward, reverse) = self.targets();
        forward.rotate(angle, axis);
        reverse.inv_rotate(angle, axis);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let (forward, reverse) = self.targets();
        forward.scale(x, y, z);
        reverse.inv_scale(x, y, z);
    }

    /// Multiply the current transform by an arbitrary matrix
    ///
    /// # Errors
    ///
    /// [`RasterError::SingularMatrix`] when `m` has no inverse. Both
    /// matrices are left unchanged in that case.
    pub fn apply_matrix(&mut self, m: &Matrix3D) -> Result<()> {
        let (forward, reverse) = self.targets();
        if !reverse.inv_apply(m) {
            return Err(RasterError::SingularMatrix);
        }
        forward.apply(m);
        Ok(())
    }

    /// Forward and inverse matrices that transform calls modify
    fn targets(&mut self) -> (&mut Matrix3D, &mut Matrix3D) {
        if self.editing_camera {
            (&mut self.camera_inv, &mut self.camera)
        } else {
            (&mut self.modelview, &mut self.modelview_inv)
        }
    }

    // Camera

    /// Start editing the camera; transforms now move the viewer
    pub fn begin_camera(&mut self) -> Result<()> {
        if self.editing_camera {
            return Err(RasterError::CameraAlreadyBegun);
        }
        self.editing_camera = true;
        Ok(())
    }

    /// Finish editing the camera and make it the current modelview
    pub fn end_camera(&mut self) -> Result<()> {
        if !self.editing_camera {
            return Err(RasterError::CameraNotBegun);
        }
        self.modelview = self.camera;
        self.modelview_inv = self.camera_inv;
        self.editing_camera = false;
        Ok(())
    }

    /// Look from `eye` at `center` with `up` as the vertical direction
    ///
    /// The basis is built Gram-Schmidt style: z points from the center to
    /// the eye, x is `up × z` and y is `z × x`. Degenerate input (eye at the
    /// center, or `up` parallel to the view direction) leaves zero axes and
    /// draws nothing useful, but never fails.
    pub fn camera(&mut self, eye: [f32; 3], center: [f32; 3], up: [f32; 3]) {
        let z = normalize(sub(eye, center)).unwrap_or([0.0; 3]);
        let x = cross(up, z);
        let y = cross(z, x);
        let x = normalize(x).unwrap_or([0.0; 3]);
        let y = normalize(y).unwrap_or([0.0; 3]);

        let basis = Matrix3D::from_rows([
            [x[0], x[1], x[2], 0.0],
            [y[0], y[1], y[2], 0.0],
            [z[0], z[1], z[2], 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        self.camera = basis;
        self.camera.translate(-eye[0], -eye[1], -eye[2]);

        // inverse of B * T(-eye) is T(eye) * B^-1
        let mut basis_inv = basis;
        if !basis_inv.invert() {
            log::debug!("degenerate camera basis, inverse rotation left at identity");
            basis_inv = Matrix3D::IDENTITY;
        }
        self.camera_inv = Matrix3D::IDENTITY;
        self.camera_inv.translate(eye[0], eye[1], eye[2]);
        self.camera_inv.apply(&basis_inv);

        self.modelview = self.camera;
        self.modelview_inv = self.camera_inv;
    }

    /// Camera looking at the middle of the viewport from the default eye
    pub fn camera_default(&mut self) {
        let eye = self.defaults.eye;
        self.camera(eye, [eye[0], eye[1], 0.0], [0.0, 1.0, 0.0]);
    }

    // Projection

    /// Symmetric perspective projection
    pub fn perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        let ymax = near * (fov / 2.0).tan();
        let ymin = -ymax;
        let xmin = ymin * aspect;
        let xmax = ymax * aspect;
        self.frustum(xmin, xmax, ymin, ymax, near, far);
    }

    pub fn perspective_default(&mut self) {
        let d = self.defaults;
        self.perspective(d.fov, d.aspect, d.near, d.far);
    }

    /// Perspective projection from the near-plane rectangle
    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let (w, h, d) = (right - left, top - bottom, far - near);
        self.projection = Matrix3D::from_rows([
            [2.0 * near / w, 0.0, (right + left) / w, 0.0],
            [0.0, 2.0 * near / h, (top + bottom) / h, 0.0],
            [0.0, 0.0, -(far + near) / d, -(2.0 * far * near) / d],
            [0.0, 0.0, -1.0, 0.0],
        ]);
        self.mode = Projection::Perspective(NearPlane {
            left,
            right,
            bottom,
            top,
            near,
        });
    }

    /// Parallel projection of the given box
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let (w, h, d) = (right - left, top - bottom, far - near);
        self.projection = Matrix3D::from_rows([
            [2.0 / w, 0.0, 0.0, -(right + left) / w],
            [0.0, 2.0 / h, 0.0, -(top + bottom) / h],
            [0.0, 0.0, -2.0 / d, -(far + near) / d],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        self.mode = Projection::Orthographic;
    }

    pub fn ortho_default(&mut self) {
        self.ortho(0.0, self.width, 0.0, self.height, -10.0, 10.0);
    }

    // Coordinate conversion

    /// Model space to camera space
    ///
    /// The w divide is skipped when w is 0 or 1.
    #[inline]
    pub fn to_camera(&self, p: [f32; 3]) -> [f32; 3] {
        let [x, y, z, w] = self.modelview.mult4([p[0], p[1], p[2], 1.0]);
        if w != 0.0 && w != 1.0 {
            [x / w, y / w, z / w]
        } else {
            [x, y, z]
        }
    }

    /// Camera space to pixel coordinates, z mapped to 0..1
    #[inline]
    pub fn to_screen(&self, v: [f32; 3]) -> [f32; 3] {
        let [mut ox, mut oy, mut oz, ow] = self.projection.mult4([v[0], v[1], v[2], 1.0]);
        if ow != 0.0 && ow != 1.0 {
            ox /= ow;
            oy /= ow;
            oz /= ow;
        }
        [
            self.width * (1.0 + ox) / 2.0,
            self.height * (1.0 + oy) / 2.0,
            (oz + 1.0) / 2.0,
        ]
    }

    /// Clip-space position of a model-space point
    fn clip(&self, p: [f32; 3]) -> [f32; 4] {
        let c = self.to_camera_raw(p);
        self.projection.mult4(c)
    }

    fn to_camera_raw(&self, p: [f32; 3]) -> [f32; 4] {
        self.modelview.mult4([p[0], p[1], p[2], 1.0])
    }

    pub fn screen_x(&self, x: f32, y: f32, z: f32) -> f32 {
        let [ox, _, _, ow] = self.clip([x, y, z]);
        let ox = if ow != 0.0 { ox / ow } else { ox };
        self.width * (1.0 + ox) / 2.0
    }

    pub fn screen_y(&self, x: f32, y: f32, z: f32) -> f32 {
        let [_, oy, _, ow] = self.clip([x, y, z]);
        let oy = if ow != 0.0 { oy / ow } else { oy };
        self.height * (1.0 + oy) / 2.0
    }

    pub fn screen_z(&self, x: f32, y: f32, z: f32) -> f32 {
        let [_, _, oz, ow] = self.clip([x, y, z]);
        let oz = if ow != 0.0 { oz / ow } else { oz };
        (oz + 1.0) / 2.0
    }

    /// World-space position of a model-space point
    fn world(&self, p: [f32; 3]) -> [f32; 3] {
        let [ax, ay, az, aw] = self.to_camera_raw(p);
        let [ox, oy, oz, ow] = self.camera_inv.mult4([ax, ay, az, aw]);
        if ow != 0.0 {
            [ox / ow, oy / ow, oz / ow]
        } else {
            [ox, oy, oz]
        }
    }

    pub fn model_x(&self, x: f32, y: f32, z: f32) -> f32 {
        self.world([x, y, z])[0]
    }

    pub fn model_y(&self, x: f32, y: f32, z: f32) -> f32 {
        self.world([x, y, z])[1]
    }

    pub fn model_z(&self, x: f32, y: f32, z: f32) -> f32 {
        self.world([x, y, z])[2]
    }

    /// Transform a direction by the inverse-transpose of the modelview
    ///
    /// Used for normals and light directions. The result is normalized;
    /// a zero vector stays zero.
    pub fn to_camera_direction(&self, d: [f32; 3]) -> [f32; 3] {
        let out = self.modelview_inv.mult_transposed(d);
        normalize(out).unwrap_or(out)
    }

    /// Transform a light position into camera space
    pub fn to_camera_position(&self, p: [f32; 3]) -> [f32; 3] {
        self.modelview.mult(p)
    }
}

// Small vector helpers shared with lighting and the renderer

#[inline]
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Unit vector in the direction of `v`, `None` for a zero vector
#[inline]
pub fn normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    let len = dot(v, v).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

#[cfg(test)]
mod tests;
