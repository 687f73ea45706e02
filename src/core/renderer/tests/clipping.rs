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

//! Unit tests for near-plane clipping
//!
//! The default eye sits about 55.4 units in front of the z = 0 plane, so a
//! model z of 50 lies between the eye and the near clip plane.

use super::canvas;
use crate::core::renderer::{EndMode, Renderer, ShapeKind};
use crate::core::transform::NEAR_CLIP_Z;

const BEHIND: f32 = 50.0;

fn triangle(r: &mut Renderer, z: [f32; 3]) {
    r.begin_shape(ShapeKind::Triangles).unwrap();
    r.vertex(28.0, 28.0, z[0]).unwrap();
    r.vertex(36.0, 28.0, z[1]).unwrap();
    r.vertex(32.0, 36.0, z[2]).unwrap();
    r.end_shape(EndMode::Open).unwrap();
}

#[test]
fn test_visible_triangle_is_untouched() {
    let mut r = canvas();
    triangle(&mut r, [0.0, 0.0, 0.0]);
    assert_eq!(r.stats().triangles, 1);
    assert_eq!(r.stats().clipped_vertices, 0);
}

#[test]
fn test_one_vertex_behind_splits_into_two() {
    for z in [[BEHIND, 0.0, 0.0], [0.0, BEHIND, 0.0], [0.0, 0.0, BEHIND]] {
        let mut r = canvas();
        triangle(&mut r, z);
        assert_eq!(r.stats().triangles, 2, "z = {:?}", z);
        assert_eq!(r.stats().clipped_vertices, 2);
    }
}

#[test]
fn test_two_vertices_behind_shrink_the_triangle() {
    let mut r = canvas();
    triangle(&mut r, [BEHIND, 0.0, BEHIND]);
    assert_eq!(r.stats().triangles, 1);
    assert_eq!(r.stats().clipped_vertices, 2);
}

#[test]
fn test_all_vertices_behind_draws_nothing() {
    let mut r = canvas();
    triangle(&mut r, [BEHIND; 3]);
    assert_eq!(r.stats().triangles, 0);
    assert_eq!(r.stats().clipped_vertices, 0);
}

#[test]
fn test_clipped_vertex_lies_on_near_plane() {
    let mut r = canvas();
    r.fill(1.0, 0.0, 0.0, 1.0);
    triangle(&mut r, [0.0, 0.0, BEHIND]);

    let clipped = &r.geometry.vertices[3..];
    assert_eq!(clipped.len(), 2);
    for v in clipped {
        assert_eq!(v.camera[2], NEAR_CLIP_Z);
        // attributes are interpolated along the edge
        assert_eq!(v.material.diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert!(v.position[2] > 0.0 && v.position[2] < BEHIND);
    }
}

#[test]
fn test_line_clipping() {
    let mut r = canvas();
    r.stroke(1.0, 1.0, 1.0, 1.0);
    r.begin_shape(ShapeKind::Lines).unwrap();
    r.vertex(20.0, 32.0, 0.0).unwrap();
    r.vertex(40.0, 32.0, BEHIND).unwrap();
    r.vertex(20.0, 40.0, BEHIND).unwrap();
    r.vertex(40.0, 40.0, BEHIND).unwrap();
    r.end_shape(EndMode::Open).unwrap();

    // the second segment is entirely behind the plane
    assert_eq!(r.stats().lines, 1);
    assert_eq!(r.stats().clipped_vertices, 1);
}
