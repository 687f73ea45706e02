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

//! Texture storage and sampling
//!
//! Textures are row-major arrays of packed pixels in one of three formats.
//! Sampling works on 16.16 fixed-point texel coordinates as produced by the
//! triangle rasterizer's edge walk.
//!
//! # Bilinear filtering
//!
//! A 2x2 texel block is fetched around the sample point and interpolated
//! with the fractional bits of `u` and `v`. Alpha-only textures use the full
//! 16 fractional bits; color textures use the top 7 bits, which keeps every
//! intermediate product inside 32 bits.
//!
//! The neighbour fetches are clamped to the last column and row, so sampling
//! at the texture corners returns the corner texels exactly and never reads
//! outside the texel array.

use super::super::error::{RasterError, Result};
use super::super::transform::Matrix3D;

/// Texel layout of a [`Texture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit coverage in the low byte, used as a mask tinted by the fill color
    Alpha,
    /// Opaque 24-bit RGB (the high byte is ignored)
    Rgb,
    /// 32-bit ARGB; texel alpha multiplies any interpolated vertex alpha
    Argb,
}

/// A texture image bound to the triangle rasterizer
///
/// # Examples
///
/// ```
/// use softraster::core::raster::{Texture, TextureFormat};
///
/// let tex = Texture::new(TextureFormat::Rgb, 2, 2, vec![0xFF0000, 0x00FF00, 0x0000FF, 0xFFFFFF])?;
/// assert_eq!(tex.width(), 2);
/// assert_eq!(tex.texel(1, 1), Some(0xFFFFFF));
/// # Ok::<(), softraster::RasterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    format: TextureFormat,
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

/// One sampled texel split into 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Texel {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Texel {
    #[inline(always)]
    fn from_pixel(pixel: u32) -> Self {
        Self {
            r: ((pixel >> 16) & 0xFF) as i32,
            g: ((pixel >> 8) & 0xFF) as i32,
            b: (pixel & 0xFF) as i32,
            a: (pixel >> 24) as i32,
        }
    }
}

impl Texture {
    /// Create a texture from a row-major pixel array
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] when either dimension is zero or the
    /// array length is not `width * height`.
    pub fn new(format: TextureFormat, width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            format,
            width,
            height,
            pixels,
        })
    }

    /// Texel layout
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Width in texels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw texel array
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Read one texel, `None` outside the image
    pub fn texel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Sample at 16.16 fixed-point texel coordinates
    ///
    /// Returns `None` when the integer part of the coordinate lies outside
    /// the texture; the caller skips the pixel.
    #[inline]
    pub fn sample(&self, iu: i32, iv: i32, bilinear: bool) -> Option<Texel> {
        let x0 = iu >> 16;
        let y0 = iv >> 16;
        if x0 < 0 || y0 < 0 || x0 as usize >= self.width || y0 as usize >= self.height {
            return None;
        }
        let (x0, y0) = (x0 as usize, y0 as usize);
        if !bilinear {
            let texel = self.texel(x0, y0)?;
            return Some(self.decode(texel));
        }

        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let p0 = self.texel(x0, y0)?;
        let p1 = self.texel(x1, y0)?;
        let p2 = self.texel(x0, y1)?;
        let p3 = self.texel(x1, y1)?;

        match self.format {
            TextureFormat::Alpha => {
                let fu = iu & 0xFFFF;
                let fv = iv & 0xFFFF;
                let lerp = |c0: i32, c1: i32, f: i32| c0 + (((c1 - c0) * f) >> 16);
                let a0 = (p0 & 0xFF) as i32;
                let a1 = (p1 & 0xFF) as i32;
                let a2 = (p2 & 0xFF) as i32;
                let a3 = (p3 & 0xFF) as i32;
                let up = lerp(a0, a1, fu);
                let dn = lerp(a2, a3, fu);
                Some(Texel {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: lerp(up, dn, fv),
                })
            }
            TextureFormat::Rgb | TextureFormat::Argb => {
                let fu = (iu & 0xFFFF) >> 9;
                let fv = (iv & 0xFFFF) >> 9;
                let t0 = Texel::from_pixel(p0);
                let t1 = Texel::from_pixel(p1);
                let t2 = Texel::from_pixel(p2);
                let t3 = Texel::from_pixel(p3);
                let bilerp = |c0: i32, c1: i32, c2: i32, c3: i32| {
                    let up = c0 + (((c1 - c0) * fu) >> 7);
                    let dn = c2 + (((c3 - c2) * fu) >> 7);
                    up + (((dn - up) * fv) >> 7)
                };
                let a = if self.format == TextureFormat::Argb {
                    bilerp(t0.a, t1.a, t2.a, t3.a)
                } else {
                    0xFF
                };
                Some(Texel {
                    r: bilerp(t0.r, t1.r, t2.r, t3.r),
                    g: bilerp(t0.g, t1.g, t2.g, t3.g),
                    b: bilerp(t0.b, t1.b, t2.b, t3.b),
                    a,
                })
            }
        }
    }

    #[inline(always)]
    fn decode(&self, pixel: u32) -> Texel {
        match self.format {
            TextureFormat::Alpha => Texel {
                a: (pixel & 0xFF) as i32,
                ..Texel::default()
            },
            TextureFormat::Rgb => Texel {
                a: 0xFF,
                ..Texel::from_pixel(pixel)
            },
            TextureFormat::Argb => Texel::from_pixel(pixel),
        }
    }

    /// Fixed-point scale applied to normalized texture coordinates
    ///
    /// Bilinear sampling maps `0..=1` onto the texel edges `0..=width-1` so
    /// the right-hand neighbour always exists; nearest sampling maps onto the
    /// full width. The 65500 factor keeps `u = 1.0` just below the next
    /// integer texel.
    pub(crate) fn uv_scale(&self, bilinear: bool) -> (f32, f32) {
        if bilinear {
            (
                (self.width - 1) as f32 * 65500.0,
                (self.height - 1) as f32 * 65500.0,
            )
        } else {
            (self.width as f32 * 65500.0, self.height as f32 * 65500.0)
        }
    }
}

/// Screen-to-texture plane vectors for perspective-corrected texturing
///
/// For a screen-plane point `S` the exact texture coordinates are
/// `(A·S)/(C·S)` and `(B·S)/(C·S)`. The vectors are derived once per
/// triangle from its three (u, v) to camera-space correspondences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectivePlanes {
    pub a: [f32; 3],
    pub b: [f32; 3],
    pub c: [f32; 3],
}

impl PerspectivePlanes {
    /// Solve the texture-space to camera-space mapping of a triangle
    ///
    /// # Arguments
    ///
    /// * `uv` - Fixed-point texture coordinates of the three vertices
    /// * `cam` - Camera-space positions of the three vertices
    /// * `tex_width` / `tex_height` - Texture size in texels
    ///
    /// # Returns
    ///
    /// `None` when the (u, v, 1) matrix is singular, i.e. the triangle's
    /// texture mapping is degenerate.
    pub fn new(
        uv: [(f32, f32); 3],
        cam: [[f32; 3]; 3],
        tex_width: f32,
        tex_height: f32,
    ) -> Option<Self> {
        const UV_SCALE: f32 = 65500.0;

        let mut m = Matrix3D::from_rows([
            [uv[0].0 / UV_SCALE, uv[0].1 / UV_SCALE, 1.0, 0.0],
            [uv[1].0 / UV_SCALE, uv[1].1 / UV_SCALE, 1.0, 0.0],
            [uv[2].0 / UV_SCALE, uv[2].1 / UV_SCALE, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        if !m.invert() {
            return None;
        }

        // Row r of the inverse dotted with one camera axis over the three vertices
        let solve = |row: usize, axis: usize| {
            m.get(row, 0) * cam[0][axis] + m.get(row, 1) * cam[1][axis] + m.get(row, 2) * cam[2][axis]
        };
        let (m00, m01, m02) = (solve(0, 0), solve(1, 0), solve(2, 0));
        let (m10, m11, m12) = (solve(0, 1), solve(1, 1), solve(2, 1));
        let (m20, m21, m22) = (-solve(0, 2), -solve(1, 2), -solve(2, 2));

        // p: camera point at (u, v) = (0, 0); m, n: steps to the far texture edges
        let (px, py, pz) = (m02, m12, m22);
        let (mx, my, mz) = (m00 * tex_width, m10 * tex_width, m20 * tex_width);
        let (nx, ny, nz) = (m01 * tex_height, m11 * tex_height, m21 * tex_height);

        Some(Self {
            a: [
                (py * nz - pz * ny) * tex_width,
                (pz * nx - px * nz) * tex_width,
                (px * ny - py * nx) * tex_width,
            ],
            b: [
                (my * pz - mz * py) * tex_height,
                (mz * px - mx * pz) * tex_height,
                (mx * py - my * px) * tex_height,
            ],
            c: [ny * mz - nz * my, nz * mx - nx * mz, nx * my - ny * mx],
        })
    }
}
