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

//! Lighting engine
//!
//! Up to [`MAX_LIGHTS`] lights are active per frame. All light data is kept
//! in camera space: positions are transformed by the modelview at the time
//! the light is created, directions by its inverse-transpose.
//!
//! # Light Model
//!
//! For a vertex at camera-space position `v` with unit normal `n`:
//!
//! - ambient: `color / falloff(d)`, no direction dependency
//! - directional: `color * (n·l)` with `l` the reversed light direction
//! - point: `color * (n·l) / falloff(d)` with `l` pointing at the light
//! - spot: as point, times `(-dir·l)^concentration` inside the cone
//!
//! where `falloff(d) = constant + linear * d + quadratic * d²`. A light
//! with `n·l <= 0` adds nothing. The normal is flipped once if it points
//! away from the eye. Specular highlights use the normalized half vector
//! between the light and the eye raised to the material shininess.
//!
//! # Position Dependence
//!
//! Ambient and directional lights with constant falloff give the same
//! result anywhere on a flat surface, so the renderer may light a whole
//! shape or triangle once. [`Lights::depends_on_position`] reports when
//! that shortcut is not allowed.

mod material;

pub use material::{LitColor, Material};

use super::error::{RasterError, Result};
use super::transform::{dot, normalize, sub};

/// Maximum number of lights in one frame
pub const MAX_LIGHTS: usize = 8;

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
}

/// Attenuation coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Falloff {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Falloff {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn depends_on_distance(&self) -> bool {
        self.linear != 0.0 || self.quadratic != 0.0
    }

    /// Attenuation divisor at `distance`; a zero divisor becomes 1
    fn denominator(&self, distance: f32) -> f32 {
        let mut denom = self.constant;
        if self.depends_on_distance() {
            denom += self.linear * distance + self.quadratic * distance * distance;
        }
        if denom == 0.0 {
            1.0
        } else {
            denom
        }
    }
}

/// One light source in camera space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub falloff: Falloff,
    pub position: [f32; 3],
    /// Unit direction the light shines in
    pub direction: [f32; 3],
    /// Cosine of the spot cone half angle, never negative
    pub spot_cos: f32,
    pub concentration: f32,
}

impl Light {
    fn new(kind: LightKind, diffuse: [f32; 3]) -> Self {
        Self {
            kind,
            diffuse,
            specular: [0.0; 3],
            falloff: Falloff::default(),
            position: [0.0; 3],
            direction: [0.0, 0.0, -1.0],
            spot_cos: 0.0,
            concentration: 1.0,
        }
    }

    fn has_specular(&self) -> bool {
        self.specular.iter().any(|&c| c > 0.0)
    }
}

/// Summed light arriving at one vertex, before the material is applied
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contribution {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

/// The active lights of a frame plus the settings new lights copy
#[derive(Debug, Clone)]
pub struct Lights {
    lights: Vec<Light>,
    falloff: Falloff,
    specular: [f32; 3],
    depends_on_position: bool,
}

impl Default for Lights {
    fn default() -> Self {
        Self::new()
    }
}

impl Lights {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            falloff: Falloff::default(),
            specular: [0.0; 3],
            depends_on_position: false,
        }
    }

    /// Start-of-frame state: no lights, constant falloff, no light specular
    pub fn reset(&mut self) {
        self.lights.clear();
        self.falloff = Falloff::default();
        self.specular = [0.0; 3];
        self.depends_on_position = false;
    }

    /// Remove every light, keeping the falloff and specular settings
    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Whether lighting varies across a flat surface
    pub fn depends_on_position(&self) -> bool {
        self.depends_on_position
    }

    pub fn falloff(&self) -> Falloff {
        self.falloff
    }

    /// Falloff copied into lights created from now on
    pub fn set_falloff(&mut self, falloff: Falloff) {
        self.falloff = falloff;
        self.depends_on_position = true;
    }

    /// Specular color copied into lights created from now on
    pub fn set_specular(&mut self, rgb: [f32; 3]) {
        self.specular = rgb;
        self.depends_on_position = true;
    }

    /// Default lighting: half-grey ambient plus half-grey directional
    ///
    /// `direction` is the camera-space direction of the directional light.
    pub fn install_defaults(&mut self, direction: [f32; 3]) -> Result<()> {
        self.set_falloff(Falloff::default());
        self.set_specular([0.0; 3]);
        self.add_ambient([0.5; 3], [0.0; 3])?;
        self.add_directional([0.5; 3], direction)?;
        self.depends_on_position = false;
        Ok(())
    }

    pub fn add_ambient(&mut self, rgb: [f32; 3], position: [f32; 3]) -> Result<()> {
        let mut light = Light::new(LightKind::Ambient, rgb);
        light.falloff = self.falloff;
        light.position = position;
        self.push(light)
    }

    pub fn add_directional(&mut self, rgb: [f32; 3], direction: [f32; 3]) -> Result<()> {
        let mut light = self.shaded(LightKind::Directional, rgb);
        light.direction = direction;
        self.push(light)
    }

    pub fn add_point(&mut self, rgb: [f32; 3], position: [f32; 3]) -> Result<()> {
        let mut light = self.shaded(LightKind::Point, rgb);
        light.position = position;
        self.push(light)?;
        self.depends_on_position = true;
        Ok(())
    }

    /// Add a spot light
    ///
    /// `angle` is the cone half angle in radians; `concentration` the
    /// exponent applied to the cosine from the spot axis.
    pub fn add_spot(
        &mut self,
        rgb: [f32; 3],
        position: [f32; 3],
        direction: [f32; 3],
        angle: f32,
        concentration: f32,
    ) -> Result<()> {
        let mut light = self.shaded(LightKind::Spot, rgb);
        light.position = position;
        light.direction = direction;
        light.spot_cos = angle.cos().max(0.0);
        light.concentration = concentration;
        self.push(light)?;
        self.depends_on_position = true;
        Ok(())
    }

    /// A light carrying the current falloff and specular settings
    fn shaded(&self, kind: LightKind, rgb: [f32; 3]) -> Light {
        let mut light = Light::new(kind, rgb);
        light.falloff = self.falloff;
        light.specular = self.specular;
        light
    }

    fn push(&mut self, light: Light) -> Result<()> {
        if self.lights.len() == MAX_LIGHTS {
            return Err(RasterError::LightLimit { max: MAX_LIGHTS });
        }
        log::trace!("light {} added: {:?}", self.lights.len(), light.kind);
        self.lights.push(light);
        Ok(())
    }

    /// Light arriving at a camera-space point
    ///
    /// # Arguments
    ///
    /// * `position` - Camera-space vertex position
    /// * `normal` - Camera-space unit normal
    /// * `material` - Only the specular color and shininess are read
    pub fn contribution(&self, position: [f32; 3], normal: [f32; 3], material: &Material) -> Contribution {
        let mut n = normal;
        if dot(n, [-position[0], -position[1], -position[2]]) < 0.0 {
            n = [-n[0], -n[1], -n[2]];
        }

        let wants_specular = material.has_specular();
        let eye_dir = normalize(position).unwrap_or(position);
        let mut total = Contribution::default();

        for light in &self.lights {
            if light.kind == LightKind::Ambient {
                let distance = dot(sub(light.position, position), sub(light.position, position)).sqrt();
                let denom = light.falloff.denominator(distance);
                for (acc, c) in total.ambient.iter_mut().zip(light.diffuse) {
                    *acc += c / denom;
                }
                continue;
            }

            // li points from the vertex to the light
            let (li, denom) = if light.kind == LightKind::Directional {
                let d = light.direction;
                ([-d[0], -d[1], -d[2]], 1.0)
            } else {
                let to_light = sub(light.position, position);
                let distance = dot(to_light, to_light).sqrt();
                (normalize(to_light).unwrap_or(to_light), light.falloff.denominator(distance))
            };

            let n_dot_li = dot(n, li);
            if n_dot_li <= 0.0 {
                continue;
            }

            let mut spot = 1.0;
            if light.kind == LightKind::Spot {
                let axis_cos = -dot(light.direction, li);
                if axis_cos <= light.spot_cos {
                    continue;
                }
                spot = axis_cos.powf(light.concentration);
            }

            let mul = n_dot_li * spot / denom;
            for (acc, c) in total.diffuse.iter_mut().zip(light.diffuse) {
                *acc += c * mul;
            }

            if wants_specular && light.has_specular() {
                let half = sub(li, eye_dir);
                let half = normalize(half).unwrap_or(half);
                let s_dot_n = dot(half, n);
                if s_dot_n > 0.0 {
                    let mul = s_dot_n.powf(material.shininess) * spot / denom;
                    for (acc, c) in total.specular.iter_mut().zip(light.specular) {
                        *acc += c * mul;
                    }
                }
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACING: [f32; 3] = [0.0, 0.0, 1.0];
    const AT: [f32; 3] = [0.0, 0.0, -100.0];

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_two_ambient_lights_double_contribution() {
        let mut one = Lights::new();
        one.add_ambient([0.2, 0.3, 0.4], [0.0; 3]).unwrap();
        let mut two = one.clone();
        two.add_ambient([0.2, 0.3, 0.4], [0.0; 3]).unwrap();

        let m = Material::default();
        let single = one.contribution(AT, FACING, &m);
        let double = two.contribution(AT, FACING, &m);
        assert!(approx(double.ambient, [0.4, 0.6, 0.8]));
        assert!(approx(single.ambient, [0.2, 0.3, 0.4]));
    }

    #[test]
    fn test_black_light_contributes_nothing() {
        let mut lights = Lights::new();
        lights.add_ambient([0.0; 3], [0.0; 3]).unwrap();
        lights.add_directional([0.0; 3], [0.0, 0.0, -1.0]).unwrap();
        lights.add_point([0.0; 3], [0.0; 3]).unwrap();
        let c = lights.contribution(AT, FACING, &Material::default());
        assert_eq!(c, Contribution::default());
    }

    #[test]
    fn test_directional_follows_cosine() {
        let mut lights = Lights::new();
        lights.add_directional([1.0; 3], [0.0, 0.0, -1.0]).unwrap();
        let m = Material::default();
        let head_on = lights.contribution(AT, FACING, &m);
        assert!(approx(head_on.diffuse, [1.0; 3]));

        let tilted = [0.0, 0.6, 0.8];
        let c = lights.contribution(AT, tilted, &m);
        assert!(approx(c.diffuse, [0.8; 3]));
    }

    #[test]
    fn test_back_facing_normal_is_flipped() {
        let mut lights = Lights::new();
        lights.add_directional([1.0; 3], [0.0, 0.0, -1.0]).unwrap();
        let m = Material::default();
        let back = lights.contribution(AT, [0.0, 0.0, -1.0], &m);
        let front = lights.contribution(AT, FACING, &m);
        assert_eq!(back, front);
    }

    #[test]
    fn test_light_behind_surface_is_ignored() {
        let mut lights = Lights::new();
        // shines toward the viewer, so it hits the back of a facing surface
        lights.add_directional([1.0; 3], [0.0, 0.0, 1.0]).unwrap();
        let c = lights.contribution(AT, FACING, &Material::default());
        assert_eq!(c.diffuse, [0.0; 3]);
    }

    #[test]
    fn test_spot_cone() {
        let mut lights = Lights::new();
        lights
            .add_spot([1.0; 3], [0.0, 0.0, 0.0], [0.0, 0.0, -1.0], 0.3, 2.0)
            .unwrap();
        let m = Material::default();

        let inside = lights.contribution(AT, FACING, &m);
        assert!(approx(inside.diffuse, [1.0; 3]));

        // 45 degrees off axis, outside a 0.3 rad cone
        let outside = lights.contribution([100.0, 0.0, -100.0], FACING, &m);
        assert_eq!(outside.diffuse, [0.0; 3]);
        assert_eq!(lights.iter().next().map(|l| l.spot_cos), Some(0.3f32.cos()));
    }

    #[test]
    fn test_point_falloff_uses_distance() {
        let mut lights = Lights::new();
        lights.set_falloff(Falloff::new(1.0, 0.01, 0.0));
        lights.add_point([1.0; 3], [0.0; 3]).unwrap();
        let c = lights.contribution(AT, FACING, &Material::default());
        // distance 100: 1 / (1 + 0.01 * 100)
        assert!(approx(c.diffuse, [0.5; 3]));
    }

    #[test]
    fn test_specular_needs_light_and_material() {
        let mut lights = Lights::new();
        lights.add_point([1.0; 3], [0.0; 3]).unwrap();
        let m = Material::default();
        assert_eq!(lights.contribution(AT, FACING, &m).specular, [0.0; 3]);

        lights.set_specular([1.0; 3]);
        lights.add_point([1.0; 3], [0.0; 3]).unwrap();
        let c = lights.contribution(AT, FACING, &m);
        assert!(approx(c.specular, [1.0; 3]));

        let dull = Material {
            specular: [0.0; 3],
            ..Material::default()
        };
        assert_eq!(lights.contribution(AT, FACING, &dull).specular, [0.0; 3]);
    }

    #[test]
    fn test_light_limit() {
        let mut lights = Lights::new();
        for _ in 0..MAX_LIGHTS {
            lights.add_ambient([0.1; 3], [0.0; 3]).unwrap();
        }
        assert!(matches!(
            lights.add_directional([1.0; 3], [0.0, 0.0, -1.0]),
            Err(RasterError::LightLimit { max: 8 })
        ));
        assert_eq!(lights.len(), MAX_LIGHTS);
    }

    #[test]
    fn test_defaults_are_position_independent() {
        let mut lights = Lights::new();
        lights.add_point([1.0; 3], [0.0; 3]).unwrap();
        assert!(lights.depends_on_position());
        lights.reset();
        lights.install_defaults([0.0, 0.0, -1.0]).unwrap();
        assert!(!lights.depends_on_position());
        assert_eq!(lights.len(), 2);

        let c = lights.contribution(AT, FACING, &Material::default());
        assert!(approx(c.ambient, [0.5; 3]));
        assert!(approx(c.diffuse, [0.5; 3]));
    }

    #[test]
    fn test_material_shading_clamps() {
        let m = Material {
            diffuse: [1.0, 0.5, 0.0, 0.75],
            ambient: [1.0; 3],
            specular: [0.5; 3],
            emissive: [0.1, 0.0, 0.0],
            shininess: 1.0,
        };
        let c = Contribution {
            ambient: [0.5; 3],
            diffuse: [1.0; 3],
            specular: [1.0; 3],
        };
        let lit = m.shade(&c);
        assert_eq!(lit.diffuse, [1.0, 1.0, 0.5, 0.75]);
        assert_eq!(lit.specular, [0.5; 3]);
        assert_eq!(lit.combined(), [1.0, 1.0, 1.0, 0.75]);
    }
}
