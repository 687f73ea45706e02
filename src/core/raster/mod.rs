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

//! Scanline rasterization
//!
//! This module holds the framebuffer and the two scanline rasterizers that
//! write into it. Both rasterizers consume fully resolved screen-space
//! vertices; no transform happens below this point.
//!
//! # Pixel Format
//!
//! Pixels are packed 32-bit ARGB (0xAARRGGBB), stored row-major. The depth
//! buffer holds one `f32` per pixel; `f32::MAX` means "no surface".
//!
//! # Depth Test
//!
//! A fragment passes when its depth is less than or equal to the stored
//! depth, so later primitives win ties.

pub mod blend;
mod line;
mod texture;
mod triangle;
#[cfg(test)]
mod tests;

pub use line::{LineRasterizer, LineVertex};
pub use texture::{PerspectivePlanes, Texel, Texture, TextureFormat};
pub use triangle::{NearPlane, RasterFlags, RasterVertex, TriangleRasterizer};

use super::error::{RasterError, Result};

/// Depth value of an empty depth buffer slot
pub const DEPTH_CLEAR: f32 = f32::MAX;

/// Color and depth buffers for one render target
///
/// # Examples
///
/// ```
/// use softraster::core::raster::Framebuffer;
///
/// let mut fb = Framebuffer::new(4, 4)?;
/// fb.set(1, 2, 0xFF00FF00);
/// assert_eq!(fb.get(1, 2), Some(0xFF00FF00));
/// assert_eq!(fb.get(4, 0), None);
/// # Ok::<(), softraster::RasterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    zbuffer: Vec<f32>,
}

impl Framebuffer {
    /// Create a black, depth-cleared framebuffer
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] for a zero width or height.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width * height],
            zbuffer: vec![DEPTH_CLEAR; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major packed ARGB pixels
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Row-major depth values
    pub fn zbuffer(&self) -> &[f32] {
        &self.zbuffer
    }

    pub fn zbuffer_mut(&mut self) -> &mut [f32] {
        &mut self.zbuffer
    }

    /// Pixel index of (x, y), `None` off screen
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Read one pixel
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel; off-screen writes are ignored
    pub fn set(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = argb;
        }
    }

    /// Depth at (x, y)
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.zbuffer[i])
    }

    /// Replace every pixel from a row-major array
    ///
    /// # Errors
    ///
    /// [`RasterError::BufferSize`] when `pixels` has the wrong length.
    pub fn load_pixels(&mut self, pixels: &[u32]) -> Result<()> {
        if pixels.len() != self.pixels.len() {
            return Err(RasterError::BufferSize {
                expected: self.pixels.len(),
                actual: pixels.len(),
            });
        }
        self.pixels.copy_from_slice(pixels);
        Ok(())
    }

    /// Fill with a color and reset depth
    pub fn clear(&mut self, argb: u32) {
        self.pixels.fill(argb);
        self.clear_depth();
    }

    /// Reset every depth slot to "no surface"
    pub fn clear_depth(&mut self) {
        self.zbuffer.fill(DEPTH_CLEAR);
    }
}

#[cfg(test)]
mod framebuffer_tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(RasterError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear_resets_depth() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.zbuffer_mut()[4] = 0.5;
        fb.clear(0xFFCCCCCC);
        assert!(fb.pixels().iter().all(|&p| p == 0xFFCCCCCC));
        assert!(fb.zbuffer().iter().all(|&z| z == DEPTH_CLEAR));
    }

    #[test]
    fn test_load_pixels_checks_length() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        assert!(matches!(
            fb.load_pixels(&[0; 3]),
            Err(RasterError::BufferSize {
                expected: 4,
                actual: 3
            })
        ));
        fb.load_pixels(&[1, 2, 3, 4]).unwrap();
        assert_eq!(fb.get(1, 1), Some(4));
    }

    #[test]
    fn test_set_off_screen_is_ignored() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.set(-1, 0, 0xFFFFFFFF);
        fb.set(0, 2, 0xFFFFFFFF);
        assert!(fb.pixels().iter().all(|&p| p == 0xFF000000));
    }
}
