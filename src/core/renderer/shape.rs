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

//! Shape decomposition and near-plane clipping
//!
//! `end_shape` turns the vertex run of a shape into index records: points,
//! line segments grouped into paths, and triangles. Every line and triangle
//! passes through the near-plane clipper on the way in, which may append
//! interpolated vertices to the buffer.

use super::vertex::Vertex;
use crate::core::lighting::LitColor;
use crate::core::transform::NEAR_CLIP_Z;
use crate::core::triangulate::triangulate;

/// Primitive kind given to `begin_shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Points,
    Lines,
    /// Connected outline, never filled
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    /// Filled through ear clipping
    Polygon,
}

impl ShapeKind {
    /// Whether the shape produces triangles
    pub fn has_fill(self) -> bool {
        !matches!(self, Self::Points | Self::Lines | Self::LineStrip)
    }
}

/// Whether `end_shape` joins the last vertex back to the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndMode {
    #[default]
    Open,
    Close,
}

/// Triangle referencing three buffered vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleRecord {
    pub vertices: [usize; 3],
    /// Index into the frame's texture list
    pub texture: Option<usize>,
    /// Resolved corner colors, filled by the lighting pass
    pub colors: [LitColor; 3],
}

/// A run of line segments drawn as one stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path {
    pub offset: usize,
    pub length: usize,
}

/// Vertex and primitive buffers
///
/// Outside depth-sort mode the buffers are emptied after every shape;
/// in depth-sort mode they grow until the frame is flushed.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub points: Vec<usize>,
    pub lines: Vec<[usize; 2]>,
    pub triangles: Vec<TriangleRecord>,
    pub paths: Vec<Path>,
    /// Vertices created by near-plane clipping since the last reset
    pub clipped: usize,
}

impl Geometry {
    /// Drop every vertex and primitive
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.clear_primitives();
    }

    pub fn clear_primitives(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.triangles.clear();
        self.paths.clear();
    }

    pub fn add_point(&mut self, a: usize) {
        self.points.push(a);
    }

    /// Start a new stroke path
    pub fn add_break(&mut self) {
        self.paths.push(Path {
            offset: self.lines.len(),
            length: 0,
        });
    }

    /// Add a segment, clipped against the near plane
    pub fn add_line(&mut self, a: usize, b: usize) {
        let a_out = self.vertices[a].camera[2] > NEAR_CLIP_Z;
        let b_out = self.vertices[b].camera[2] > NEAR_CLIP_Z;
        match (a_out, b_out) {
            (true, true) => {}
            (true, false) => {
                let ca = self.clip_vertex(a, b);
                self.push_line(ca, b);
            }
            (false, true) => {
                let cb = self.clip_vertex(a, b);
                self.push_line(a, cb);
            }
            (false, false) => self.push_line(a, b),
        }
    }

    fn push_line(&mut self, a: usize, b: usize) {
        if self.paths.is_empty() {
            self.add_break();
        }
        self.lines.push([a, b]);
        if let Some(path) = self.paths.last_mut() {
            path.length += 1;
        }
    }

    /// Add a triangle, clipped against the near plane
    ///
    /// One vertex behind the plane turns the triangle into a quad (two
    /// triangles), two behind shrink it, three behind drop it.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize, texture: Option<usize>) {
        let outside = |i: usize| self.vertices[i].camera[2] > NEAR_CLIP_Z;
        let (a_out, b_out, c_out) = (outside(a), outside(b), outside(c));

        match [a_out, b_out, c_out].iter().filter(|&&o| o).count() {
            0 => self.push_triangle([a, b, c], texture),
            1 => {
                let (ca, cb, cc) = if a_out {
                    (c, b, a)
                } else if b_out {
                    (a, c, b)
                } else {
                    (a, b, c)
                };
                let cd = self.clip_vertex(ca, cc);
                let ce = self.clip_vertex(cb, cc);
                self.push_triangle([ca, cd, cb], texture);
                self.push_triangle([cb, cd, ce], texture);
            }
            2 => {
                let (ca, cb, cc) = if !a_out {
                    (a, b, c)
                } else if !b_out {
                    (b, a, c)
                } else {
                    (c, b, a)
                };
                let cd = self.clip_vertex(ca, cb);
                let ce = self.clip_vertex(ca, cc);
                self.push_triangle([ca, cd, ce], texture);
            }
            _ => log::trace!("triangle entirely behind the near plane"),
        }
    }

    fn push_triangle(&mut self, vertices: [usize; 3], texture: Option<usize>) {
        self.triangles.push(TriangleRecord {
            vertices,
            texture,
            colors: [LitColor::default(); 3],
        });
    }

    /// Append the point where segment a-b crosses the near plane
    fn clip_vertex(&mut self, a: usize, b: usize) -> usize {
        let (va, vb) = if self.vertices[a].camera[2] < self.vertices[b].camera[2] {
            (&self.vertices[b], &self.vertices[a])
        } else {
            (&self.vertices[a], &self.vertices[b])
        };
        let dz = va.camera[2] - vb.camera[2];
        if dz == 0.0 {
            return a;
        }
        let pa = (NEAR_CLIP_Z - vb.camera[2]) / dz;
        let mut clipped = Vertex::mix(va, vb, pa);
        // exact, not lerped, so the new vertex is not clipped again
        clipped.camera[2] = NEAR_CLIP_Z;

        self.vertices.push(clipped);
        self.clipped += 1;
        self.vertices.len() - 1
    }

    /// Emit the outline segments of the shape in `first..last`
    pub fn stroke_shape(&mut self, kind: ShapeKind, mode: EndMode, first: usize, last: usize) {
        match kind {
            ShapeKind::Points => {
                for i in first..last {
                    self.add_point(i);
                }
            }
            ShapeKind::Lines => {
                let first_line = self.lines.len();
                let mut i = first;
                while i + 1 < last {
                    self.add_break();
                    self.add_line(i, i + 1);
                    i += 2;
                }
                if mode == EndMode::Close && last > first {
                    if let Some(&[start, _]) = self.lines.get(first_line) {
                        self.add_line(last - 1, start);
                    }
                }
            }
            ShapeKind::Triangles => {
                let mut i = first;
                while i + 2 < last {
                    self.add_break();
                    self.add_line(i, i + 1);
                    self.add_line(i + 1, i + 2);
                    self.add_line(i + 2, i);
                    i += 3;
                }
            }
            ShapeKind::TriangleStrip => {
                self.add_break();
                for i in first..last.saturating_sub(1) {
                    self.add_line(i, i + 1);
                }
                for i in first..last.saturating_sub(2) {
                    self.add_break();
                    self.add_line(i, i + 2);
                }
            }
            ShapeKind::TriangleFan => {
                for i in first + 1..last {
                    self.add_break();
                    self.add_line(first, i);
                }
                if last >= first + 3 {
                    self.add_break();
                    for i in first + 1..last - 1 {
                        self.add_line(i, i + 1);
                    }
                    self.add_line(last - 1, first + 1);
                }
            }
            ShapeKind::Quads => {
                let mut i = first;
                while i + 3 < last {
                    self.add_break();
                    self.add_line(i, i + 1);
                    self.add_line(i + 1, i + 2);
                    self.add_line(i + 2, i + 3);
                    self.add_line(i + 3, i);
                    i += 4;
                }
            }
            ShapeKind::QuadStrip => {
                let mut i = first;
                while i + 3 < last {
                    self.add_break();
                    self.add_line(i, i + 2);
                    self.add_line(i + 2, i + 3);
                    self.add_line(i + 3, i + 1);
                    self.add_line(i + 1, i);
                    i += 2;
                }
            }
            ShapeKind::LineStrip | ShapeKind::Polygon => {
                if last <= first {
                    return;
                }
                self.add_break();
                for i in first..last - 1 {
                    self.add_line(i, i + 1);
                }
                if mode == EndMode::Close {
                    self.add_line(last - 1, first);
                }
            }
        }
    }

    /// Emit the triangles covering the shape in `first..last`
    ///
    /// Returns false when polygon triangulation gave up early.
    pub fn fill_shape(&mut self, kind: ShapeKind, first: usize, last: usize, texture: Option<usize>) -> bool {
        match kind {
            ShapeKind::Points | ShapeKind::Lines | ShapeKind::LineStrip => {}
            ShapeKind::TriangleFan => {
                for i in first + 1..last.saturating_sub(1) {
                    self.add_triangle(first, i, i + 1, texture);
                }
            }
            ShapeKind::Triangles | ShapeKind::TriangleStrip => {
                let step = if kind == ShapeKind::Triangles { 3 } else { 1 };
                let mut i = first;
                while i + 2 < last {
                    // alternate winding so strips keep facing one way
                    if i % 2 == 0 {
                        self.add_triangle(i, i + 2, i + 1, texture);
                    } else {
                        self.add_triangle(i, i + 1, i + 2, texture);
                    }
                    i += step;
                }
            }
            ShapeKind::Quads => {
                let mut i = first;
                while i + 3 < last {
                    self.add_triangle(i, i + 1, i + 2, texture);
                    self.add_triangle(i, i + 2, i + 3, texture);
                    i += 4;
                }
            }
            ShapeKind::QuadStrip => {
                let mut i = first;
                while i + 3 < last {
                    self.add_triangle(i, i + 2, i + 1, texture);
                    self.add_triangle(i + 2, i + 3, i + 1, texture);
                    i += 2;
                }
            }
            ShapeKind::Polygon => {
                let ring: Vec<[f32; 3]> = self.vertices[first..last].iter().map(|v| v.position).collect();
                let result = triangulate(&ring);
                for [a, b, c] in result.triangles {
                    self.add_triangle(first + a, first + b, first + c, texture);
                }
                // two or fewer vertices simply draw nothing
                return result.complete || ring.len() < 3;
            }
        }
        true
    }
}
