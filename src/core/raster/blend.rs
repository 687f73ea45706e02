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

//! Fixed-point color helpers
//!
//! Vertex intensities enter the rasterizers as 16.16 fixed-point values
//! scaled into `1..=254` instead of `0..=255`, which keeps accumulated
//! rounding error from overflowing a channel. Pixels are packed 0xAARRGGBB
//! and every write produces an opaque pixel.

/// Packed alpha bits of every pixel the rasterizers write
pub const OPAQUE: u32 = 0xFF00_0000;

/// Convert a normalized channel (0.0..=1.0) to a 16.16 intensity
///
/// # Examples
///
/// ```
/// use softraster::core::raster::blend::to_fixed;
///
/// assert_eq!(to_fixed(0.0), 65536.0);
/// assert_eq!(to_fixed(1.0), 254.0 * 65536.0);
/// ```
#[inline(always)]
pub fn to_fixed(c: f32) -> f32 {
    (c * 253.0 + 1.0) * 65536.0
}

/// Extract the 8-bit channel value of a 16.16 intensity
#[inline(always)]
pub fn fixed_to_byte(i: i32) -> i32 {
    (i >> 16) & 0xFF
}

/// Pack a normalized color into an opaque pixel, truncating each channel
///
/// This is the color used for flat (non-interpolated) primitives.
#[inline]
pub fn pack_flat(r: f32, g: f32, b: f32) -> u32 {
    OPAQUE
        | (((255.0 * r) as i32 as u32 & 0xFF) << 16)
        | (((255.0 * g) as i32 as u32 & 0xFF) << 8)
        | ((255.0 * b) as i32 as u32 & 0xFF)
}

/// Pack three 16.16 intensities into an opaque pixel
#[inline(always)]
pub fn pack_fixed(ir: i32, ig: i32, ib: i32) -> u32 {
    pack_rgb(fixed_to_byte(ir), fixed_to_byte(ig), fixed_to_byte(ib))
}

/// Pack three 8-bit channels into an opaque pixel
#[inline(always)]
pub fn pack_rgb(r: i32, g: i32, b: i32) -> u32 {
    OPAQUE | ((r as u32 & 0xFF) << 16) | ((g as u32 & 0xFF) << 8) | (b as u32 & 0xFF)
}

/// Split a packed pixel into its 8-bit red, green and blue channels
#[inline(always)]
pub fn unpack_rgb(pixel: u32) -> (i32, i32, i32) {
    (
        ((pixel >> 16) & 0xFF) as i32,
        ((pixel >> 8) & 0xFF) as i32,
        (pixel & 0xFF) as i32,
    )
}

/// Blend one 8-bit channel toward `src` by `alpha / 256`
#[inline(always)]
pub fn blend_channel(dst: i32, src: i32, alpha: i32) -> i32 {
    dst + (((src - dst) * alpha) >> 8)
}

/// Straight alpha-over of an 8-bit color onto an existing pixel
///
/// `alpha` is 0..=255 (the 8 high bits of a 16.16 alpha intensity). The
/// result is always opaque; the framebuffer carries no coverage.
///
/// # Examples
///
/// ```
/// use softraster::core::raster::blend::blend;
///
/// // Zero alpha leaves the destination untouched
/// assert_eq!(blend(0xFF102030, 255, 255, 255, 0), 0xFF102030);
/// // Half coverage of white over black
/// assert_eq!(blend(0xFF000000, 255, 255, 255, 128), 0xFF7F7F7F);
/// ```
#[inline(always)]
pub fn blend(dst: u32, r: i32, g: i32, b: i32, alpha: i32) -> u32 {
    let (dr, dg, db) = unpack_rgb(dst);
    pack_rgb(
        blend_channel(dr, r, alpha),
        blend_channel(dg, g, alpha),
        blend_channel(db, b, alpha),
    )
}

/// Multiply an 8-bit channel by a tint channel (0..=255)
#[inline(always)]
pub fn tint_channel(c: i32, tint: i32) -> i32 {
    ((c * tint) >> 8) & 0xFF
}

/// Multiply an 8-bit channel by a 16.16 intensity
#[inline(always)]
pub fn modulate_channel(c: i32, intensity: i32) -> i32 {
    ((c.max(0) as u32).wrapping_mul(intensity.max(0) as u32) >> 24) as i32
}
