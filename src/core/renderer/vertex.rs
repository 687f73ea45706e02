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

//! Vertex record flowing through the 3D pipeline

use crate::core::lighting::{LitColor, Material};

/// How normals are assigned inside the current shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// No `normal` call: each triangle uses its own face normal
    #[default]
    Auto,
    /// One `normal` call: the whole shape shares it
    Shape,
    /// Several `normal` calls: every vertex carries its own
    Vertex,
}

/// One vertex of the current frame's geometry
///
/// Filled in stages: the model-space attributes at `vertex()` time, the
/// camera position at `end_shape`, the lit color during lighting and the
/// screen position last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Model-space position
    pub position: [f32; 3],
    /// Camera-space position (w already divided out)
    pub camera: [f32; 3],
    /// Pixel x, y and depth in 0..1
    pub screen: [f32; 3],

    /// Fill color and surface terms
    pub material: Material,
    pub stroke: [f32; 4],
    pub stroke_weight: f32,
    /// Normalized texture coordinates
    pub uv: [f32; 2],
    /// Model-space normal as given to `normal()`
    pub normal: [f32; 3],

    /// Lighting result in per-vertex normal mode
    pub lit: LitColor,
    pub been_lit: bool,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            camera: [0.0; 3],
            screen: [0.0; 3],
            material: Material::default(),
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_weight: 1.0,
            uv: [0.0; 2],
            normal: [0.0, 0.0, 1.0],
            lit: LitColor::default(),
            been_lit: false,
        }
    }
}

impl Vertex {
    /// Blend two vertices: `pa * a + (1 - pa) * b` on every attribute
    ///
    /// The result is marked unlit so it gets its own lighting pass.
    pub fn mix(a: &Vertex, b: &Vertex, pa: f32) -> Vertex {
        let pb = 1.0 - pa;
        let m = |x: f32, y: f32| pa * x + pb * y;
        let m3 = |x: [f32; 3], y: [f32; 3]| [m(x[0], y[0]), m(x[1], y[1]), m(x[2], y[2])];
        let m4 = |x: [f32; 4], y: [f32; 4]| [m(x[0], y[0]), m(x[1], y[1]), m(x[2], y[2]), m(x[3], y[3])];

        let (ma, mb) = (&a.material, &b.material);
        Vertex {
            position: m3(a.position, b.position),
            camera: m3(a.camera, b.camera),
            screen: m3(a.screen, b.screen),
            material: Material {
                diffuse: m4(ma.diffuse, mb.diffuse),
                ambient: m3(ma.ambient, mb.ambient),
                specular: m3(ma.specular, mb.specular),
                emissive: m3(ma.emissive, mb.emissive),
                shininess: m(ma.shininess, mb.shininess),
            },
            stroke: m4(a.stroke, b.stroke),
            stroke_weight: m(a.stroke_weight, b.stroke_weight),
            uv: [m(a.uv[0], b.uv[0]), m(a.uv[1], b.uv[1])],
            normal: m3(a.normal, b.normal),
            lit: LitColor::default(),
            been_lit: false,
        }
    }
}
