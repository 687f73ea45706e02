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

//! Unit tests for ear-clipping triangulation

use super::*;
use proptest::prelude::*;

const ARROW: [[f32; 3]; 7] = [
    [0.0, 1.0, 0.0],
    [3.0, 1.0, 0.0],
    [3.0, 0.0, 0.0],
    [5.0, 2.0, 0.0],
    [3.0, 4.0, 0.0],
    [3.0, 3.0, 0.0],
    [0.0, 3.0, 0.0],
];

fn triangle_area(points: &[[f32; 3]], t: &[usize; 3], d1: usize, d2: usize) -> f64 {
    let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
    let cross = (f64::from(b[d1]) - f64::from(a[d1])) * (f64::from(c[d2]) - f64::from(a[d2]))
        - (f64::from(b[d2]) - f64::from(a[d2])) * (f64::from(c[d1]) - f64::from(a[d1]));
    cross.abs() / 2.0
}

fn polygon_area(points: &[[f32; 3]]) -> f64 {
    f64::from(signed_area(points, 0, 1)).abs() / 2.0
}

#[test]
fn test_arrow_gives_n_minus_two_triangles() {
    let result = triangulate(&ARROW);
    assert!(result.complete);
    assert_eq!(result.triangles.len(), 5);

    let covered: f64 = result.triangles.iter().map(|t| triangle_area(&ARROW, t, 0, 1)).sum();
    assert!((covered - polygon_area(&ARROW)).abs() < 1e-4);
}

#[test]
fn test_too_few_points() {
    assert_eq!(triangulate(&ARROW[..2]), Triangulation::default());
}

#[test]
fn test_closing_duplicate_is_dropped() {
    let closed = [
        [0.0, 0.0, 0.0],
        [4.0, 0.0, 0.0],
        [4.0, 4.0, 0.0],
        [0.0, 0.0, 0.00001],
    ];
    let result = triangulate(&closed);
    assert!(result.complete);
    assert_eq!(result.triangles.len(), 1);
    assert!(result.triangles[0].iter().all(|&i| i < 3));
}

#[test]
fn test_vertical_polygon_uses_other_plane() {
    // lies in the x = 2 plane, zero area in XY
    let wall = [
        [2.0, 0.0, 0.0],
        [2.0, 5.0, 0.0],
        [2.0, 5.0, 5.0],
        [2.0, 0.0, 5.0],
    ];
    let result = triangulate(&wall);
    assert!(result.complete);
    assert_eq!(result.triangles.len(), 2);
    let covered: f64 = result.triangles.iter().map(|t| triangle_area(&wall, t, 1, 2)).sum();
    assert!((covered - 25.0).abs() < 1e-4);
}

#[test]
fn test_collinear_points_are_skipped() {
    let line = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
    let result = triangulate(&line);
    assert!(result.triangles.is_empty());
    assert!(!result.complete);
}

#[test]
fn test_bowtie_terminates() {
    // self-intersecting; any outcome is fine as long as it stops
    let bowtie = [
        [0.0, 0.0, 0.0],
        [4.0, 4.0, 0.0],
        [4.0, 0.0, 0.0],
        [0.0, 4.0, 0.0],
        [2.0, 6.0, 0.0],
    ];
    let result = triangulate(&bowtie);
    assert!(result.triangles.len() <= 3);
}

/// Simple star-shaped polygon: one vertex per angular sector, random radius
fn star_polygon() -> impl Strategy<Value = Vec<[f32; 3]>> {
    (3usize..12).prop_flat_map(|n| {
        prop::collection::vec((0.05f32..0.95, 5.0f32..50.0), n).prop_map(move |spokes| {
            spokes
                .iter()
                .enumerate()
                .map(|(i, &(jitter, radius))| {
                    let angle = std::f32::consts::TAU * (i as f32 + jitter) / n as f32;
                    [radius * angle.cos(), radius * angle.sin(), 0.0]
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn test_area_is_preserved(points in star_polygon()) {
        let result = triangulate(&points);
        prop_assert!(result.complete);
        prop_assert_eq!(result.triangles.len(), points.len() - 2);
        let covered: f64 = result.triangles.iter().map(|t| triangle_area(&points, t, 0, 1)).sum();
        let expected = polygon_area(&points);
        prop_assert!((covered - expected).abs() <= 1e-3 * expected.max(1.0));
    }

    #[test]
    fn test_reversed_input_gives_same_triangles(points in star_polygon()) {
        let forward = triangulate(&points);
        let reversed: Vec<[f32; 3]> = points.iter().rev().copied().collect();
        let backward = triangulate(&reversed);

        let last = points.len() - 1;
        let mapped: Vec<[usize; 3]> = backward
            .triangles
            .iter()
            .map(|t| [last - t[0], last - t[1], last - t[2]])
            .collect();
        prop_assert_eq!(forward.triangles, mapped);
    }
}
