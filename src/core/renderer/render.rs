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

//! Lighting, projection and rasterization of buffered geometry

use super::shape::Geometry;
use super::vertex::{NormalMode, Vertex};
use super::Renderer;
use crate::core::lighting::Contribution;
use crate::core::raster::blend::pack_flat;
use crate::core::raster::{Framebuffer, LineRasterizer, LineVertex, RasterVertex, TriangleRasterizer};
use crate::core::transform::{cross, normalize, sub};

/// Stroke weights drawn by the one-pixel line rasterizer
const THIN_STROKE: std::ops::RangeInclusive<f32> = 0.75..=1.25;

/// Offset that keeps a thick line's direction defined
const STROKE_EPSILON: f32 = 0.0001;

impl Renderer {
    /// Camera-space positions for the vertices in `first..last`
    pub(super) fn model_to_camera(&mut self, first: usize, last: usize) {
        for v in &mut self.geometry.vertices[first..last] {
            v.camera = self.transform.to_camera(v.position);
        }
    }

    /// Screen positions for every vertex from `first` on, clipped ones included
    pub(super) fn camera_to_screen(&mut self, first: usize) {
        for v in &mut self.geometry.vertices[first..] {
            v.screen = self.transform.to_screen(v.camera);
        }
    }

    /// Resolve the corner colors of triangles `tri_start..`
    ///
    /// `first` is the shape's first vertex; its normal is the shape normal.
    pub(super) fn light_triangles(&mut self, tri_start: usize, first: usize) {
        let Self {
            geometry,
            lights,
            transform,
            normal_mode,
            style,
            ..
        } = self;
        let Geometry {
            vertices, triangles, ..
        } = geometry;
        let triangles = &mut triangles[tri_start..];

        if lights.is_empty() || !style.fill_enabled {
            for tri in triangles.iter_mut() {
                for (color, &i) in tri.colors.iter_mut().zip(&tri.vertices) {
                    *color = vertices[i].material.unlit();
                }
            }
            return;
        }

        let to_world = |n: [f32; 3]| transform.to_camera_direction(n);

        if !lights.depends_on_position() && *normal_mode == NormalMode::Shape {
            // one contribution for the whole shape
            let v = &vertices[first];
            let shared = lights.contribution(v.camera, to_world(v.normal), &v.material);
            for tri in triangles.iter_mut() {
                for (color, &i) in tri.colors.iter_mut().zip(&tri.vertices) {
                    *color = vertices[i].material.shade(&shared);
                }
            }
            return;
        }

        let shape_normal = to_world(vertices[first].normal);
        for tri in triangles.iter_mut() {
            let [a, b, c] = tri.vertices;
            match *normal_mode {
                NormalMode::Vertex => {
                    for (color, &i) in tri.colors.iter_mut().zip(&tri.vertices) {
                        let v = &mut vertices[i];
                        if !v.been_lit {
                            let contribution = lights.contribution(v.camera, to_world(v.normal), &v.material);
                            v.lit = v.material.shade(&contribution);
                            v.been_lit = true;
                        }
                        *color = v.lit;
                    }
                }
                NormalMode::Auto if !lights.depends_on_position() => {
                    // flat surface, so one evaluation serves all three corners
                    let n = face_normal(&vertices[a], &vertices[b], &vertices[c]);
                    let shared = lights.contribution(vertices[a].camera, n, &vertices[a].material);
                    for (color, &i) in tri.colors.iter_mut().zip(&tri.vertices) {
                        *color = vertices[i].material.shade(&shared);
                    }
                }
                NormalMode::Shape | NormalMode::Auto => {
                    let n = if *normal_mode == NormalMode::Shape {
                        shape_normal
                    } else {
                        face_normal(&vertices[a], &vertices[b], &vertices[c])
                    };
                    for (color, &i) in tri.colors.iter_mut().zip(&tri.vertices) {
                        let v = &vertices[i];
                        let contribution: Contribution = lights.contribution(v.camera, n, &v.material);
                        *color = v.material.shade(&contribution);
                    }
                }
            }
        }
    }

    /// Order buffered triangles back to front by summed screen depth
    pub(super) fn sort_triangles(&mut self) {
        let Geometry {
            vertices, triangles, ..
        } = &mut self.geometry;
        let depth = |t: &[usize; 3]| t.iter().map(|&i| vertices[i].screen[2]).sum::<f32>();
        triangles.sort_by(|p, q| depth(&q.vertices).total_cmp(&depth(&p.vertices)));
        log::debug!("depth sorted {} triangles", triangles.len());
    }

    pub(super) fn render_triangles(&mut self) {
        let perspective = if self.config.accurate_textures {
            self.transform.near_plane()
        } else {
            None
        };
        self.triangle.set_perspective(perspective);

        let vertices = &self.geometry.vertices;
        for tri in &self.geometry.triangles {
            let corners: [RasterVertex; 3] = std::array::from_fn(|k| {
                let v = &vertices[tri.vertices[k]];
                let [r, g, b, a] = tri.colors[k].combined();
                RasterVertex {
                    x: v.screen[0],
                    y: v.screen[1],
                    z: v.screen[2],
                    r,
                    g,
                    b,
                    a,
                    u: v.uv[0],
                    v: v.uv[1],
                    cam: v.camera,
                }
            });
            let texture = tri.texture.and_then(|t| self.textures.get(t)).map(|t| t.as_ref());
            self.triangle.draw(&mut self.fb, &corners, texture);
        }
        self.stats.triangles += self.geometry.triangles.len();
        log::trace!("rendered {} triangles", self.geometry.triangles.len());
    }

    pub(super) fn render_lines(&mut self) {
        let thick = self.thick_rasterizer();
        let vertices = &self.geometry.vertices;
        for &[a, b] in &self.geometry.lines {
            Self::draw_segment(&self.line, &thick, &mut self.fb, &vertices[a], &vertices[b]);
        }
        self.stats.lines += self.geometry.lines.len();
        log::trace!(
            "rendered {} lines in {} paths",
            self.geometry.lines.len(),
            self.geometry.paths.len()
        );
    }

    pub(super) fn render_points(&mut self) {
        let thick = self.thick_rasterizer();
        let vertices = &self.geometry.vertices;
        for &i in &self.geometry.points {
            let v = &vertices[i];
            if v.stroke_weight != 1.0 {
                Self::draw_segment(&self.line, &thick, &mut self.fb, v, v);
                continue;
            }

            let sx = (v.screen[0] + 0.4999) as i32;
            let sy = (v.screen[1] + 0.4999) as i32;
            if let Some(index) = self.fb.index(sx, sy) {
                let [r, g, b, a] = v.stroke;
                let alpha = ((255.0 * a) as u32 & 0xFF) << 24;
                self.fb.pixels_mut()[index] = (pack_flat(r, g, b) & 0x00FF_FFFF) | alpha;
                self.fb.zbuffer_mut()[index] = v.screen[2];
            }
        }
        self.stats.points += self.geometry.points.len();
    }

    /// Triangle rasterizer setup for stroke quads
    fn thick_rasterizer(&self) -> TriangleRasterizer {
        let mut thick = self.triangle.clone();
        thick.set_culling(false);
        thick.set_perspective(None);
        thick
    }

    /// Draw one stroke segment, as a line or as a quad for heavy weights
    fn draw_segment(
        line: &LineRasterizer,
        thick: &TriangleRasterizer,
        fb: &mut Framebuffer,
        a: &Vertex,
        b: &Vertex,
    ) {
        let weight = a.stroke_weight;
        if THIN_STROKE.contains(&weight) {
            let end = |v: &Vertex| {
                let [r, g, bl, al] = v.stroke;
                LineVertex::new(v.screen[0], v.screen[1], v.screen[2]).with_color(r, g, bl, al)
            };
            line.draw(fb, &end(a), &end(b));
            return;
        }

        let [ox1, mut oy1, _] = a.screen;
        let [ox2, mut oy2, _] = b.screen;
        let half = weight / 2.0;

        // a point with weight becomes a short vertical segment
        if ox1 == ox2 && oy1 == oy2 {
            oy1 -= half;
            oy2 += half;
        }

        let dx = ox2 - ox1 + STROKE_EPSILON;
        let dy = oy2 - oy1 + STROKE_EPSILON;
        let len = (dx * dx + dy * dy).sqrt();
        let rh = half / len;
        let (nx, ny) = (rh * dy, rh * dx);

        let corner = |x: f32, y: f32, v: &Vertex| {
            let [r, g, bl, al] = v.stroke;
            RasterVertex::new(x, y, v.screen[2]).with_color(r, g, bl, al)
        };
        let a1 = corner(ox1 + nx, oy1 - ny, a);
        let a2 = corner(ox1 - nx, oy1 + ny, a);
        let b1 = corner(ox2 + nx, oy2 - ny, b);
        let b2 = corner(ox2 - nx, oy2 + ny, b);

        thick.draw(fb, &[a1, b2, a2], None);
        thick.draw(fb, &[a1, b2, b1], None);
    }
}

/// Unit normal of a camera-space triangle, zero when degenerate
fn face_normal(a: &Vertex, b: &Vertex, c: &Vertex) -> [f32; 3] {
    let n = cross(sub(b.camera, a.camera), sub(c.camera, a.camera));
    normalize(n).unwrap_or([0.0; 3])
}
