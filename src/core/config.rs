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

//! Renderer configuration
//!
//! Settings that a renderer is created with. They can be loaded from and saved
//! to TOML files; every field has a default so partial files are accepted.
//! Most of them can be changed later at runtime through [`Hint`].

use super::error::{RasterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted texture interpolation power (one exact sample every 256 pixels)
pub const MAX_TEXTURE_INTERP_POWER: u32 = 8;

/// Renderer configuration that can be saved/loaded
///
/// # Examples
///
/// ```
/// use softraster::core::config::RendererConfig;
///
/// let config: RendererConfig = toml::from_str("width = 320\nheight = 240").unwrap();
/// assert_eq!(config.width, 320);
/// assert_eq!(config.texture_interp_power, 3);
/// assert!(config.bilinear);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Framebuffer width in pixels
    pub width: usize,

    /// Framebuffer height in pixels
    pub height: usize,

    /// Draw antialiased (two pixel coverage) lines
    pub smooth: bool,

    /// Buffer triangles for the whole frame and draw them back to front
    pub depth_sort: bool,

    /// Compare against the depth buffer before writing
    ///
    /// When false every fragment passes ("no depth test" mode).
    pub depth_test: bool,

    /// Perspective-corrected texture coordinates under a perspective projection
    pub accurate_textures: bool,

    /// An exact texture coordinate is computed every `2^texture_interp_power` pixels
    pub texture_interp_power: u32,

    /// Bilinear texture filtering (nearest neighbour when false)
    pub bilinear: bool,

    /// Skip triangles with clockwise screen winding
    pub culling: bool,

    /// Color `Renderer::new` clears to, packed 0xAARRGGBB; later clears take an explicit color via `Renderer::background`
    pub background: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            smooth: false,
            depth_sort: false,
            depth_test: true,
            accurate_textures: false,
            texture_interp_power: 3,
            bilinear: true,
            culling: false,
            background: 0xFFCC_CCCC,
        }
    }
}

impl RendererConfig {
    /// Create a default configuration for the given framebuffer size
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| RasterError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = self.to_toml()?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Serialize to a pretty TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RasterError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check values that cannot be represented by the renderer
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.texture_interp_power > MAX_TEXTURE_INTERP_POWER {
            return Err(RasterError::Config(format!(
                "texture_interp_power must be at most {}, got {}",
                MAX_TEXTURE_INTERP_POWER, self.texture_interp_power
            )));
        }
        Ok(())
    }
}

/// Runtime rendering hints
///
/// Each hint toggles one of the [`RendererConfig`] flags on a live renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Start buffering triangles for a back-to-front flush at end of frame
    EnableDepthSort,
    /// Flush buffered geometry and go back to immediate drawing
    DisableDepthSort,
    /// Resume depth testing
    EnableDepthTest,
    /// Stop depth testing; the depth buffer is reset to "infinitely far"
    DisableDepthTest,
    /// Use perspective-corrected texture coordinates
    EnableAccurateTextures,
    /// Use affine texture coordinates
    DisableAccurateTextures,
}
