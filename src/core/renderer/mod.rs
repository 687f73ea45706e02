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

//! Immediate-mode renderer
//!
//! [`Renderer`] owns the framebuffer and ties the pipeline together:
//!
//! 1. `vertex` calls record model-space vertices with the current style
//! 2. `end_shape` moves them to camera space, decomposes the shape into
//!    lines and triangles (clipping at the near plane), lights the
//!    triangles and projects everything to the screen
//! 3. The primitives are rasterized right away, or in depth-sort mode
//!    buffered until the frame is flushed and drawn back to front
//!
//! # Frame Lifecycle
//!
//! ```text
//! begin_frame ─► [begin_shape ─► vertex* ─► end_shape]* ─► end_frame
//! ```
//!
//! `begin_frame` resets the modelview to the camera, removes all lights and
//! clears the statistics. It does not clear pixels; call `background` for
//! that.

mod render;
mod shape;
mod stats;
mod vertex;

#[cfg(test)]
mod tests;

pub use shape::{EndMode, ShapeKind};
pub use stats::FrameStats;
pub use vertex::NormalMode;

use std::rc::Rc;

use self::shape::Geometry;
use self::vertex::Vertex;
use super::config::{Hint, RendererConfig};
use super::error::{RasterError, Result};
use super::lighting::{Falloff, Lights, Material};
use super::raster::{Framebuffer, LineRasterizer, Texture, TriangleRasterizer};
use super::transform::{Matrix3D, Transform};

/// Coincidence tolerance for consecutive polygon vertices
const VERTEX_EPSILON: f32 = 0.0001;

/// Line join style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// Line end style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    #[default]
    Round,
    Square,
    Project,
}

/// Current drawing style, copied into every new vertex
#[derive(Debug, Clone, Copy)]
struct Style {
    fill: [f32; 4],
    fill_enabled: bool,
    stroke: [f32; 4],
    stroke_enabled: bool,
    stroke_weight: f32,
    /// Explicit ambient color; the fill is used until one is set
    ambient: Option<[f32; 3]>,
    specular: [f32; 3],
    emissive: [f32; 3],
    shininess: f32,
    normal: [f32; 3],
}

impl Default for Style {
    fn default() -> Self {
        let material = Material::default();
        Self {
            fill: [1.0; 4],
            fill_enabled: true,
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_enabled: true,
            stroke_weight: 1.0,
            ambient: None,
            specular: material.specular,
            emissive: material.emissive,
            shininess: material.shininess,
            normal: [0.0, 0.0, 1.0],
        }
    }
}

/// CPU renderer drawing into an in-memory framebuffer
///
/// # Example
///
/// ```
/// use softraster::core::config::RendererConfig;
/// use softraster::core::renderer::{EndMode, Renderer, ShapeKind};
///
/// let mut r = Renderer::new(RendererConfig::with_size(32, 32))?;
/// r.begin_frame();
/// r.background(0xFF000000);
/// r.stroke(0.0, 1.0, 0.0, 1.0);
/// r.begin_shape(ShapeKind::Lines)?;
/// r.vertex(2.5, 5.5, 0.0)?;
/// r.vertex(20.5, 5.5, 0.0)?;
/// r.end_shape(EndMode::Open)?;
/// r.end_frame();
///
/// assert_eq!(r.get(10, 5), Some(0xFF00FF00));
/// assert_eq!(r.stats().lines, 1);
/// # Ok::<(), softraster::RasterError>(())
/// ```
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    fb: Framebuffer,

    line: LineRasterizer,
    triangle: TriangleRasterizer,

    transform: Transform,
    lights: Lights,
    style: Style,

    /// Open shape, if any
    shape: Option<ShapeKind>,
    shape_first: usize,
    normal_mode: NormalMode,

    /// Texture bound to the open shape
    texture: Option<usize>,
    textures: Vec<Rc<Texture>>,

    geometry: Geometry,
    stats: FrameStats,
}

impl Renderer {
    /// Create a renderer and clear it to the configured background
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] or [`RasterError::Config`] when
    /// the configuration does not validate.
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;

        let mut fb = Framebuffer::new(config.width, config.height)?;
        fb.clear(config.background);

        let mut line = LineRasterizer::new();
        line.set_smooth(config.smooth);
        line.set_depth_test(config.depth_test);

        let mut triangle = TriangleRasterizer::new();
        triangle.set_culling(config.culling);
        triangle.set_depth_test(config.depth_test);
        triangle.set_bilinear(config.bilinear);
        triangle.set_interp_power(config.texture_interp_power);

        log::debug!(
            "renderer {}x{} (depth sort: {}, accurate textures: {})",
            config.width,
            config.height,
            config.depth_sort,
            config.accurate_textures
        );

        Ok(Self {
            transform: Transform::new(config.width, config.height),
            config,
            fb,
            line,
            triangle,
            lights: Lights::new(),
            style: Style::default(),
            shape: None,
            shape_first: 0,
            normal_mode: NormalMode::Auto,
            texture: None,
            textures: Vec::new(),
            geometry: Geometry::default(),
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    // Framebuffer access

    pub fn width(&self) -> usize {
        self.fb.width()
    }

    pub fn height(&self) -> usize {
        self.fb.height()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Row-major packed ARGB pixels
    pub fn pixels(&self) -> &[u32] {
        self.fb.pixels()
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        self.fb.pixels_mut()
    }

    pub fn zbuffer(&self) -> &[f32] {
        self.fb.zbuffer()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.fb.get(x, y)
    }

    /// Write one pixel; out of range is ignored
    pub fn set(&mut self, x: i32, y: i32, argb: u32) {
        self.fb.set(x, y, argb);
    }

    /// Replace every pixel
    ///
    /// # Errors
    ///
    /// [`RasterError::BufferSize`] when the length is not `width * height`.
    pub fn load_pixels(&mut self, pixels: &[u32]) -> Result<()> {
        self.fb.load_pixels(pixels)
    }

    /// Fill with a color and reset the depth buffer
    pub fn background(&mut self, argb: u32) {
        self.fb.clear(argb);
    }

    // Frame

    pub fn begin_frame(&mut self) {
        if self.shape.take().is_some() {
            log::warn!("begin_frame with an open shape; the shape is discarded");
        }
        self.transform.begin_frame();
        self.lights.reset();
        self.style.normal = [0.0, 0.0, 1.0];
        self.texture = None;
        self.textures.clear();
        self.geometry.clear();
        self.stats = FrameStats::default();
        log::trace!("frame begin");
    }

    pub fn end_frame(&mut self) {
        if self.config.depth_sort {
            self.flush();
        }
        log::debug!(
            "frame end: {} triangles, {} lines, {} points, {} clipped vertices",
            self.stats.triangles,
            self.stats.lines,
            self.stats.points,
            self.stats.clipped_vertices
        );
    }

    /// Draw everything still buffered
    ///
    /// In depth-sort mode the triangles are sorted back to front first.
    pub fn flush(&mut self) {
        if self.config.depth_sort && !self.geometry.triangles.is_empty() {
            self.sort_triangles();
        }
        self.render_points();
        self.render_lines();
        self.render_triangles();

        if self.shape.is_some() {
            self.geometry.clear_primitives();
        } else {
            self.geometry.clear();
            self.textures.clear();
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Change a rendering flag at runtime
    pub fn hint(&mut self, hint: Hint) {
        match hint {
            Hint::EnableDepthSort => self.config.depth_sort = true,
            Hint::DisableDepthSort => {
                self.flush();
                self.config.depth_sort = false;
            }
            Hint::EnableDepthTest => {
                self.config.depth_test = true;
                self.line.set_depth_test(true);
                self.triangle.set_depth_test(true);
            }
            Hint::DisableDepthTest => {
                self.fb.clear_depth();
                self.config.depth_test = false;
                self.line.set_depth_test(false);
                self.triangle.set_depth_test(false);
            }
            Hint::EnableAccurateTextures => self.config.accurate_textures = true,
            Hint::DisableAccurateTextures => self.config.accurate_textures = false,
        }
        log::debug!("hint {:?}", hint);
    }

    // Style

    /// Fill color, channels in 0..1
    pub fn fill(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.style.fill = [r, g, b, a];
        self.style.fill_enabled = true;
    }

    pub fn no_fill(&mut self) {
        self.style.fill_enabled = false;
    }

    pub fn stroke(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.style.stroke = [r, g, b, a];
        self.style.stroke_enabled = true;
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke_enabled = false;
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        self.style.stroke_weight = weight;
    }

    /// Only the miter join is supported
    pub fn stroke_join(&mut self, join: StrokeJoin) {
        if join != StrokeJoin::Miter {
            log::warn!("stroke_join({:?}) is not supported by this renderer", join);
        }
    }

    /// Only the round cap is supported
    pub fn stroke_cap(&mut self, cap: StrokeCap) {
        if cap != StrokeCap::Round {
            log::warn!("stroke_cap({:?}) is not supported by this renderer", cap);
        }
    }

    pub fn ambient(&mut self, r: f32, g: f32, b: f32) {
        self.style.ambient = Some([r, g, b]);
    }

    pub fn specular(&mut self, r: f32, g: f32, b: f32) {
        self.style.specular = [r, g, b];
    }

    pub fn emissive(&mut self, r: f32, g: f32, b: f32) {
        self.style.emissive = [r, g, b];
    }

    pub fn shininess(&mut self, shine: f32) {
        self.style.shininess = shine;
    }

    /// Set the normal for following vertices
    ///
    /// Inside a shape the first call gives the whole shape one normal, a
    /// second call switches to per-vertex normals.
    pub fn normal(&mut self, nx: f32, ny: f32, nz: f32) {
        self.style.normal = [nx, ny, nz];
        if self.shape.is_some() {
            self.normal_mode = match self.normal_mode {
                NormalMode::Auto => NormalMode::Shape,
                NormalMode::Shape | NormalMode::Vertex => NormalMode::Vertex,
            };
        }
    }

    pub fn normal_mode(&self) -> NormalMode {
        self.normal_mode
    }

    /// Bind a texture to the open shape
    pub fn texture(&mut self, texture: Rc<Texture>) {
        let reuse = self.textures.last().is_some_and(|last| Rc::ptr_eq(last, &texture));
        if !reuse {
            self.textures.push(texture);
        }
        self.texture = Some(self.textures.len() - 1);
    }

    // Shapes

    /// Open a shape
    ///
    /// # Errors
    ///
    /// [`RasterError::ShapeAlreadyBegun`] when a shape is still open.
    pub fn begin_shape(&mut self, kind: ShapeKind) -> Result<()> {
        if self.shape.is_some() {
            return Err(RasterError::ShapeAlreadyBegun);
        }

        if self.config.depth_sort {
            // keep buffering, everything is drawn at the end of the frame
            self.shape_first = self.geometry.vertices.len();
        } else {
            self.geometry.clear();
            self.textures.clear();
            self.shape_first = 0;
        }

        self.shape = Some(kind);
        self.texture = None;
        self.normal_mode = NormalMode::Auto;
        Ok(())
    }

    /// Add a vertex with the current style
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        let kind = self.shape.ok_or(RasterError::ShapeNotBegun)?;
        self.push_vertex(kind, [x, y, z], None);
        Ok(())
    }

    /// Add a textured vertex
    ///
    /// `u` and `v` are normalized and clamped to 0..1. Without a bound
    /// texture the coordinates are ignored with a warning.
    pub fn vertex_uv(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32) -> Result<()> {
        let kind = self.shape.ok_or(RasterError::ShapeNotBegun)?;
        let uv = if self.texture.is_some() {
            Some([u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)])
        } else {
            log::warn!("vertex_uv called before texture(); u and v are ignored");
            None
        };
        self.push_vertex(kind, [x, y, z], uv);
        Ok(())
    }

    fn push_vertex(&mut self, kind: ShapeKind, position: [f32; 3], uv: Option<[f32; 2]>) {
        let vertices = &self.geometry.vertices;
        if kind == ShapeKind::Polygon && vertices.len() > self.shape_first {
            if let Some(prev) = vertices.last() {
                let same = prev
                    .position
                    .iter()
                    .zip(position)
                    .all(|(p, q)| (p - q).abs() < VERTEX_EPSILON);
                if same {
                    // a repeated point confuses the triangulator
                    return;
                }
            }
        }

        let style = &self.style;
        let diffuse = if self.texture.is_some() {
            [1.0; 4]
        } else {
            style.fill
        };
        let ambient = style
            .ambient
            .unwrap_or([style.fill[0], style.fill[1], style.fill[2]]);

        self.geometry.vertices.push(Vertex {
            position,
            material: Material {
                diffuse,
                ambient,
                specular: style.specular,
                emissive: style.emissive,
                shininess: style.shininess,
            },
            stroke: style.stroke,
            stroke_weight: style.stroke_weight,
            uv: uv.unwrap_or([0.0; 2]),
            normal: style.normal,
            ..Vertex::default()
        });
    }

    /// Close the open shape and draw it (or queue it in depth-sort mode)
    ///
    /// # Errors
    ///
    /// [`RasterError::ShapeNotBegun`] without a matching `begin_shape`.
    pub fn end_shape(&mut self, mode: EndMode) -> Result<()> {
        let kind = self.shape.ok_or(RasterError::ShapeNotBegun)?;
        let first = self.shape_first;
        let last = self.geometry.vertices.len();

        if last == first {
            self.shape = None;
            return Ok(());
        }

        self.model_to_camera(first, last);

        let tri_start = self.geometry.triangles.len();
        let clipped_before = self.geometry.clipped;
        let stroked = self.style.stroke_enabled;
        let filled = self.style.fill_enabled || self.texture.is_some();

        if stroked {
            self.geometry.stroke_shape(kind, mode, first, last);
        }
        if filled && !self.geometry.fill_shape(kind, first, last, self.texture) {
            self.stats.triangulation_failures += 1;
        }
        self.stats.clipped_vertices += self.geometry.clipped - clipped_before;

        self.light_triangles(tri_start, first);
        self.camera_to_screen(first);

        // still open while rendering so a flush keeps the buffers intact
        if !self.config.depth_sort {
            if filled {
                self.render_triangles();
            }
            if stroked {
                self.render_points();
                self.render_lines();
            }
            self.geometry.clear_primitives();
        }

        self.shape = None;
        Ok(())
    }

    // Transforms

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn push_matrix(&mut self) -> Result<()> {
        self.transform.push_matrix()
    }

    pub fn pop_matrix(&mut self) -> Result<()> {
        self.transform.pop_matrix()
    }

    pub fn reset_matrix(&mut self) {
        self.transform.reset_matrix();
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) {
        self.transform.translate(tx, ty, tz);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.transform.rotate_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.transform.rotate_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.transform.rotate_z(angle);
    }

    pub fn rotate(&mut self, angle: f32, axis: [f32; 3]) {
        self.transform.rotate(angle, axis);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.transform.scale(x, y, z);
    }

    pub fn apply_matrix(&mut self, m: &Matrix3D) -> Result<()> {
        self.transform.apply_matrix(m)
    }

    /// Copy of the current modelview
    pub fn matrix(&self) -> Matrix3D {
        self.transform.matrix()
    }

    pub fn begin_camera(&mut self) -> Result<()> {
        self.transform.begin_camera()
    }

    pub fn end_camera(&mut self) -> Result<()> {
        self.transform.end_camera()
    }

    pub fn camera(&mut self, eye: [f32; 3], center: [f32; 3], up: [f32; 3]) {
        self.transform.camera(eye, center, up);
    }

    pub fn camera_default(&mut self) {
        self.transform.camera_default();
    }

    pub fn perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.transform.perspective(fov, aspect, near, far);
    }

    pub fn perspective_default(&mut self) {
        self.transform.perspective_default();
    }

    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.transform.frustum(left, right, bottom, top, near, far);
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.transform.ortho(left, right, bottom, top, near, far);
    }

    pub fn ortho_default(&mut self) {
        self.transform.ortho_default();
    }

    pub fn screen_x(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.screen_x(x, y, z)
    }

    pub fn screen_y(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.screen_y(x, y, z)
    }

    pub fn screen_z(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.screen_z(x, y, z)
    }

    pub fn model_x(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.model_x(x, y, z)
    }

    pub fn model_y(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.model_y(x, y, z)
    }

    pub fn model_z(&self, x: f32, y: f32, z: f32) -> f32 {
        self.transform.model_z(x, y, z)
    }

    // Lights

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Default lights: half-grey ambient and a half-grey light shining
    /// into the screen
    pub fn lights(&mut self) -> Result<()> {
        let direction = self.transform.to_camera_direction([0.0, 0.0, -1.0]);
        self.lights.install_defaults(direction)
    }

    /// Turn every light off, drawing queued geometry first
    pub fn no_lights(&mut self) {
        self.flush();
        self.lights.clear();
    }

    pub fn ambient_light(&mut self, rgb: [f32; 3], position: [f32; 3]) -> Result<()> {
        let position = self.transform.to_camera_position(position);
        self.lights.add_ambient(rgb, position)
    }

    pub fn directional_light(&mut self, rgb: [f32; 3], direction: [f32; 3]) -> Result<()> {
        let direction = self.transform.to_camera_direction(direction);
        self.lights.add_directional(rgb, direction)
    }

    pub fn point_light(&mut self, rgb: [f32; 3], position: [f32; 3]) -> Result<()> {
        let position = self.transform.to_camera_position(position);
        self.lights.add_point(rgb, position)
    }

    /// Spot light with cone half `angle` in radians
    pub fn spot_light(
        &mut self,
        rgb: [f32; 3],
        position: [f32; 3],
        direction: [f32; 3],
        angle: f32,
        concentration: f32,
    ) -> Result<()> {
        let position = self.transform.to_camera_position(position);
        let direction = self.transform.to_camera_direction(direction);
        self.lights.add_spot(rgb, position, direction, angle, concentration)
    }

    pub fn light_falloff(&mut self, constant: f32, linear: f32, quadratic: f32) {
        self.lights.set_falloff(Falloff::new(constant, linear, quadratic));
    }

    pub fn light_specular(&mut self, rgb: [f32; 3]) {
        self.lights.set_specular(rgb);
    }
}
