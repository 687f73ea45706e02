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

//! Ear-clipping polygon triangulation
//!
//! Splits a simple (possibly concave) polygon into triangles that reference
//! the input vertices by index. The polygon is projected onto the first
//! coordinate plane in which it has non-zero area (XY, then XZ, then YZ)
//! and its ring is walked counterclockwise, snipping one convex "ear" at a
//! time until only a triangle remains.
//!
//! # Failure Handling
//!
//! A self-intersecting ring can run out of ears. A countdown of twice the
//! remaining vertex count catches that; the triangles found so far are kept
//! and [`Triangulation::complete`] is false. Degenerate input (fewer than
//! three distinct points, or zero area in every plane) yields no triangles.

/// Coincidence tolerance for vertices and ear convexity
pub const EPSILON: f32 = 0.0001;

/// Output of [`triangulate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triangulation {
    /// Triangles as indices into the input slice
    pub triangles: Vec<[usize; 3]>,
    /// False when the polygon was degenerate or the ear search gave up
    pub complete: bool,
}

/// Triangulate a polygon given as an ordered ring of points
///
/// # Example
///
/// ```
/// use softraster::core::triangulate::triangulate;
///
/// let square = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
/// let result = triangulate(&square);
/// assert!(result.complete);
/// assert_eq!(result.triangles.len(), 2);
/// ```
pub fn triangulate(points: &[[f32; 3]]) -> Triangulation {
    let mut count = points.len();
    if count < 3 {
        return Triangulation::default();
    }

    // A closing point equal to the first one adds a zero-length edge
    if coincident(&points[0], &points[count - 1]) {
        count -= 1;
        if count < 3 {
            return Triangulation::default();
        }
    }
    let ring = &points[..count];

    let Some((d1, d2, area)) = projection_axes(ring) else {
        log::debug!("polygon with {} vertices has no area, skipped", count);
        return Triangulation::default();
    };

    let order: Vec<usize> = if area > 0.0 {
        (0..count).collect()
    } else {
        (0..count).rev().collect()
    };

    snip_ears(ring, order, d1, d2)
}

/// Pick the coordinate pair with non-zero signed area
///
/// Returns the two axes and the signed area in that plane.
fn projection_axes(ring: &[[f32; 3]]) -> Option<(usize, usize, f32)> {
    let area = signed_area(ring, 0, 1);
    if area != 0.0 {
        return Some((0, 1, area));
    }

    let varies = |axis: usize| ring.iter().any(|p| p[axis] != ring[0][axis]);
    let (d1, d2) = if varies(0) {
        (0, 2)
    } else if varies(1) {
        (1, 2)
    } else {
        return None;
    };

    let area = signed_area(ring, d1, d2);
    (area != 0.0).then_some((d1, d2, area))
}

/// Twice the signed shoelace area over axes `d1`, `d2`
fn signed_area(ring: &[[f32; 3]], d1: usize, d2: usize) -> f32 {
    let mut area = 0.0;
    let mut p = ring.len() - 1;
    for q in 0..ring.len() {
        area += ring[q][d1] * ring[p][d2] - ring[p][d1] * ring[q][d2];
        p = q;
    }
    area
}

fn coincident(a: &[f32; 3], b: &[f32; 3]) -> bool {
    (a[0] - b[0]).abs() < EPSILON && (a[1] - b[1]).abs() < EPSILON && (a[2] - b[2]).abs() < EPSILON
}

fn snip_ears(ring: &[[f32; 3]], mut order: Vec<usize>, d1: usize, d2: usize) -> Triangulation {
    // Scaled and promoted to reduce cancellation in the cross products
    let point = |i: usize| (-10.0 * f64::from(ring[i][d1]), 10.0 * f64::from(ring[i][d2]));

    let mut triangles = Vec::with_capacity(order.len() - 2);
    let mut vc = order.len();
    let mut countdown = 2 * vc;
    let mut v = vc - 1;

    while vc > 2 {
        if countdown == 0 {
            log::debug!(
                "ear clipping gave up with {} vertices left; polygon is probably self-intersecting",
                vc
            );
            return Triangulation {
                triangles,
                complete: false,
            };
        }
        countdown -= 1;

        let u = if v >= vc { 0 } else { v };
        v = if u + 1 >= vc { 0 } else { u + 1 };
        let w = if v + 1 >= vc { 0 } else { v + 1 };

        let a = point(order[u]);
        let b = point(order[v]);
        let c = point(order[w]);

        // Reflex or flat corner
        if f64::from(EPSILON) > (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0) {
            continue;
        }

        let blocked = (0..vc)
            .filter(|&p| p != u && p != v && p != w)
            .any(|p| inside(a, b, c, point(order[p])));
        if blocked {
            continue;
        }

        triangles.push([order[u], order[v], order[w]]);
        order.remove(v);
        vc -= 1;
        countdown = 2 * vc;
    }

    Triangulation {
        triangles,
        complete: true,
    }
}

/// Whether `p` lies inside (or on the edge of) triangle `abc`
fn inside(a: (f64, f64), b: (f64, f64), c: (f64, f64), p: (f64, f64)) -> bool {
    let cross = |o: (f64, f64), e: (f64, f64)| (e.0 - o.0) * (p.1 - o.1) - (e.1 - o.1) * (p.0 - o.0);
    cross(a, b) >= 0.0 && cross(b, c) >= 0.0 && cross(c, a) >= 0.0
}

#[cfg(test)]
mod tests;
