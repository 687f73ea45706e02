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

//! Unit tests for shape decomposition

use super::{canvas, quad, BLACK};
use crate::core::error::RasterError;
use crate::core::raster::{Texture, TextureFormat};
use crate::core::renderer::{EndMode, NormalMode, ShapeKind};
use std::rc::Rc;

fn draw(kind: ShapeKind, mode: EndMode, points: &[(f32, f32)], stroked: bool, filled: bool) -> crate::core::renderer::FrameStats {
    let mut r = canvas();
    if stroked {
        r.stroke(1.0, 1.0, 1.0, 1.0);
    }
    if !filled {
        r.no_fill();
    }
    r.begin_shape(kind).unwrap();
    for &(x, y) in points {
        r.vertex(x, y, 0.0).unwrap();
    }
    r.end_shape(mode).unwrap();
    r.stats()
}

const SIX: [(f32, f32); 6] = [
    (10.0, 10.0),
    (30.0, 10.0),
    (10.0, 30.0),
    (30.0, 30.0),
    (10.0, 50.0),
    (30.0, 50.0),
];

#[test]
fn test_triangle_counts_per_kind() {
    let fill = |kind| draw(kind, EndMode::Open, &SIX, false, true).triangles;
    assert_eq!(fill(ShapeKind::Triangles), 2);
    assert_eq!(fill(ShapeKind::TriangleStrip), 4);
    assert_eq!(fill(ShapeKind::TriangleFan), 4);
    assert_eq!(fill(ShapeKind::QuadStrip), 4);
    assert_eq!(fill(ShapeKind::Quads), 2);
    assert_eq!(fill(ShapeKind::Lines), 0);
    assert_eq!(fill(ShapeKind::Points), 0);
}

#[test]
fn test_line_counts_per_kind() {
    let stroke = |kind, mode| draw(kind, mode, &SIX, true, false).lines;
    assert_eq!(stroke(ShapeKind::Lines, EndMode::Open), 3);
    assert_eq!(stroke(ShapeKind::LineStrip, EndMode::Open), 5);
    assert_eq!(stroke(ShapeKind::LineStrip, EndMode::Close), 6);
    assert_eq!(stroke(ShapeKind::Polygon, EndMode::Close), 6);
    assert_eq!(stroke(ShapeKind::Triangles, EndMode::Open), 6);
    assert_eq!(stroke(ShapeKind::Quads, EndMode::Open), 4);
    assert_eq!(stroke(ShapeKind::QuadStrip, EndMode::Open), 8);
    // 5 spokes plus the 4 rim segments and the closing one
    assert_eq!(stroke(ShapeKind::TriangleFan, EndMode::Open), 10);
    // 5 edges along the strip plus 4 skipping ones
    assert_eq!(stroke(ShapeKind::TriangleStrip, EndMode::Open), 9);
}

#[test]
fn test_points_count() {
    let stats = draw(ShapeKind::Points, EndMode::Open, &SIX, true, true);
    assert_eq!(stats.points, 6);
    assert_eq!(stats.triangles, 0);
}

#[test]
fn test_incomplete_shapes_draw_nothing() {
    let two = [(10.0, 10.0), (20.0, 20.0)];
    assert_eq!(draw(ShapeKind::Triangles, EndMode::Open, &two, true, true).triangles, 0);
    assert_eq!(draw(ShapeKind::Quads, EndMode::Open, &SIX[..3], true, true).lines, 0);
    assert_eq!(draw(ShapeKind::TriangleFan, EndMode::Open, &two, false, true).triangles, 0);

    let stats = draw(ShapeKind::Polygon, EndMode::Close, &two, false, true);
    assert_eq!(stats.triangles, 0);
    assert_eq!(stats.triangulation_failures, 0);
}

#[test]
fn test_polygon_is_triangulated() {
    let pentagon = [(32.0, 5.0), (58.0, 25.0), (48.0, 58.0), (16.0, 58.0), (6.0, 25.0)];
    let stats = draw(ShapeKind::Polygon, EndMode::Close, &pentagon, false, true);
    assert_eq!(stats.triangles, 3);
    assert_eq!(stats.triangulation_failures, 0);
}

#[test]
fn test_polygon_skips_repeated_vertex() {
    let mut r = canvas();
    r.begin_shape(ShapeKind::Polygon).unwrap();
    r.vertex(10.0, 10.0, 0.0).unwrap();
    r.vertex(10.0, 10.0, 0.0).unwrap();
    r.vertex(40.0, 10.0, 0.0).unwrap();
    r.vertex(40.00001, 10.0, 0.0).unwrap();
    r.vertex(25.0, 40.0, 0.0).unwrap();
    r.end_shape(EndMode::Close).unwrap();

    assert_eq!(r.geometry.vertices.len(), 3);
    assert_eq!(r.stats().triangles, 1);
}

#[test]
fn test_filled_quad_covers_interior() {
    let mut r = canvas();
    r.fill(1.0, 0.0, 0.0, 1.0);
    quad(&mut r, 10.0, 10.0, 30.0, 30.0, 0.0);

    assert_eq!(r.get(20, 20), Some(0xFFFF0000));
    assert_eq!(r.get(12, 28), Some(0xFFFF0000));
    assert_eq!(r.get(40, 20), Some(BLACK));
    assert_eq!(r.get(20, 5), Some(BLACK));
}

#[test]
fn test_vertex_takes_current_style() {
    let mut r = canvas();
    r.fill(0.2, 0.4, 0.6, 1.0);
    r.stroke(1.0, 0.0, 0.0, 0.5);
    r.stroke_weight(3.0);
    r.shininess(4.0);
    r.begin_shape(ShapeKind::Points).unwrap();
    r.vertex(5.0, 5.0, 0.0).unwrap();

    let v = r.geometry.vertices[0];
    assert_eq!(v.material.diffuse, [0.2, 0.4, 0.6, 1.0]);
    // ambient follows the fill until set
    assert_eq!(v.material.ambient, [0.2, 0.4, 0.6]);
    assert_eq!(v.material.shininess, 4.0);
    assert_eq!(v.stroke, [1.0, 0.0, 0.0, 0.5]);
    assert_eq!(v.stroke_weight, 3.0);

    r.ambient(0.1, 0.1, 0.1);
    r.vertex(6.0, 6.0, 0.0).unwrap();
    assert_eq!(r.geometry.vertices[1].material.ambient, [0.1, 0.1, 0.1]);
}

#[test]
fn test_normal_mode_progression() {
    let mut r = canvas();
    r.normal(0.0, 1.0, 0.0);
    assert_eq!(r.normal_mode(), NormalMode::Auto);

    r.begin_shape(ShapeKind::Triangles).unwrap();
    assert_eq!(r.normal_mode(), NormalMode::Auto);
    r.normal(0.0, 0.0, 1.0);
    assert_eq!(r.normal_mode(), NormalMode::Shape);
    r.normal(1.0, 0.0, 0.0);
    assert_eq!(r.normal_mode(), NormalMode::Vertex);
    r.end_shape(EndMode::Open).unwrap();

    r.begin_shape(ShapeKind::Triangles).unwrap();
    assert_eq!(r.normal_mode(), NormalMode::Auto);
}

#[test]
fn test_textured_vertices() {
    let mut r = canvas();
    let tex = Rc::new(Texture::new(TextureFormat::Rgb, 4, 4, vec![0x00FF00; 16]).unwrap());

    r.fill(1.0, 0.0, 0.0, 1.0);
    r.begin_shape(ShapeKind::Quads).unwrap();
    r.texture(Rc::clone(&tex));
    r.texture(Rc::clone(&tex));
    assert_eq!(r.textures.len(), 1);

    r.vertex_uv(10.0, 10.0, 0.0, -0.5, 0.0).unwrap();
    r.vertex_uv(40.0, 10.0, 0.0, 1.0, 0.0).unwrap();
    r.vertex_uv(40.0, 40.0, 0.0, 1.0, 1.0).unwrap();
    r.vertex_uv(10.0, 40.0, 0.0, 0.0, 1.5).unwrap();

    // textured vertices are white so the texture shows untinted
    assert_eq!(r.geometry.vertices[0].material.diffuse, [1.0; 4]);
    assert_eq!(r.geometry.vertices[0].uv, [0.0, 0.0]);
    assert_eq!(r.geometry.vertices[3].uv, [0.0, 1.0]);
    r.end_shape(EndMode::Close).unwrap();

    let (red, green, blue) = super::channels(r.get(25, 25).unwrap());
    assert!(green > 0xF0, "green = {:#x}", green);
    assert!(red < 0x10 && blue < 0x10);
}

#[test]
fn test_uv_without_texture_is_ignored() {
    let mut r = canvas();
    r.begin_shape(ShapeKind::Triangles).unwrap();
    r.vertex_uv(1.0, 2.0, 0.0, 0.5, 0.5).unwrap();
    assert_eq!(r.geometry.vertices[0].uv, [0.0, 0.0]);
}

#[test]
fn test_shape_call_order_errors() {
    let mut r = canvas();
    assert!(matches!(r.vertex(0.0, 0.0, 0.0), Err(RasterError::ShapeNotBegun)));
    assert!(matches!(r.end_shape(EndMode::Open), Err(RasterError::ShapeNotBegun)));

    r.begin_shape(ShapeKind::Lines).unwrap();
    assert!(matches!(
        r.begin_shape(ShapeKind::Points),
        Err(RasterError::ShapeAlreadyBegun)
    ));
    r.end_shape(EndMode::Open).unwrap();
    assert!(r.begin_shape(ShapeKind::Points).is_ok());
}
