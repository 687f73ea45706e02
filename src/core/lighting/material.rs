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

//! Surface material and the application of light contributions

use super::Contribution;

/// Material terms carried by each vertex
///
/// `diffuse` is the fill color including alpha. The other terms are RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: [f32; 4],
    pub ambient: [f32; 3],
    pub specular: [f32; 3],
    pub emissive: [f32; 3],
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: [1.0; 4],
            ambient: [1.0; 3],
            specular: [0.5; 3],
            emissive: [0.0; 3],
            shininess: 1.0,
        }
    }
}

impl Material {
    pub fn has_specular(&self) -> bool {
        self.specular.iter().any(|&c| c > 0.0)
    }

    /// Combine a light contribution with this material
    ///
    /// `emissive + ambient * ambient_light + diffuse * diffuse_light`, each
    /// channel clamped to 0..1; the specular part is kept separate.
    pub fn shade(&self, c: &Contribution) -> LitColor {
        let channel = |i: usize| {
            clamp(self.emissive[i] + self.ambient[i] * c.ambient[i] + self.diffuse[i] * c.diffuse[i])
        };
        LitColor {
            diffuse: [channel(0), channel(1), channel(2), clamp(self.diffuse[3])],
            specular: [
                clamp(self.specular[0] * c.specular[0]),
                clamp(self.specular[1] * c.specular[1]),
                clamp(self.specular[2] * c.specular[2]),
            ],
        }
    }

    /// Colors used when lighting is off
    pub fn unlit(&self) -> LitColor {
        LitColor {
            diffuse: self.diffuse,
            specular: [0.0; 3],
        }
    }
}

/// Resolved vertex color after lighting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LitColor {
    pub diffuse: [f32; 4],
    pub specular: [f32; 3],
}

impl LitColor {
    /// Diffuse plus specular, clamped, with the diffuse alpha
    pub fn combined(&self) -> [f32; 4] {
        [
            clamp(self.diffuse[0] + self.specular[0]),
            clamp(self.diffuse[1] + self.specular[1]),
            clamp(self.diffuse[2] + self.specular[2]),
            self.diffuse[3],
        ]
    }
}

#[inline]
fn clamp(c: f32) -> f32 {
    c.clamp(0.0, 1.0)
}
