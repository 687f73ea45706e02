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

//! Scanline line rasterizer
//!
//! Draws single line segments with optional depth, Gouraud color, alpha and
//! two-pixel antialiasing.
//!
//! # Algorithm
//!
//! 1. Order the endpoints left to right, swapping every attribute with them
//! 2. Set up the stepping for the whole segment from the truncated endpoints:
//!    one pixel per major-axis step while a 16.16 accumulator tracks the
//!    minor axis
//! 3. Clip in step space: only the steps whose pixel can land on the surface
//!    are walked. Start and slope stay those of the full segment, and color,
//!    alpha and depth at the first visible step are advanced along the
//!    segment's own deltas, so clipping never moves a pixel
//!
//! # References
//!
//! - [Extremely Fast Line Algorithm](http://www.edepot.com/linee.html)

use super::blend::{blend, fixed_to_byte, pack_flat, pack_rgb, to_fixed, unpack_rgb};
use super::Framebuffer;
use std::cmp::Ordering;

/// A screen-space line endpoint
///
/// Color channels are normalized `0.0..=1.0`. A depth of zero on both
/// endpoints marks a flat 2D line, which is drawn without a depth test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LineVertex {
    /// Opaque white endpoint
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }
    }

    /// Replace the endpoint color
    pub fn with_color(self, r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a, ..self }
    }
}

/// Endpoint in rasterizer units (16.16 intensities)
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    x: f32,
    y: f32,
    z: f32,
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Endpoint {
    fn from_vertex(v: &LineVertex) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            r: to_fixed(v.r),
            g: to_fixed(v.g),
            b: to_fixed(v.b),
            a: to_fixed(v.a),
        }
    }
}

/// Which attributes vary along the current line
#[derive(Debug, Clone, Copy)]
struct LineMode {
    flat: u32,
    gouraud: bool,
    alpha: bool,
    spatial: bool,
}

/// Per-pixel attribute accumulators
#[derive(Debug, Clone, Copy)]
struct Interp {
    r: i32,
    g: i32,
    b: i32,
    a: i32,
    z: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Deltas {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    z: f32,
}

impl Interp {
    #[inline(always)]
    fn step(&mut self, d: &Deltas) {
        // integer accumulators advance in float and truncate back
        self.r = (self.r as f32 + d.r) as i32;
        self.g = (self.g as f32 + d.g) as i32;
        self.b = (self.b as f32 + d.b) as i32;
        self.a = (self.a as f32 + d.a) as i32;
        self.z += d.z;
    }

    /// Jump ahead `steps` steps, as the first visible pixel of a clipped line
    fn advance(&mut self, d: &Deltas, steps: i64) {
        if steps == 0 {
            return;
        }
        let k = steps as f32;
        self.r = (self.r as f32 + d.r * k) as i32;
        self.g = (self.g as f32 + d.g * k) as i32;
        self.b = (self.b as f32 + d.b * k) as i32;
        self.a = (self.a as f32 + d.a * k) as i32;
        self.z += d.z * k;
    }

    #[inline(always)]
    fn rgb(&self) -> (i32, i32, i32) {
        (fixed_to_byte(self.r), fixed_to_byte(self.g), fixed_to_byte(self.b))
    }
}

/// Coordinates further out than this are pinned; the stepping stays in `i64`
const COORD_LIMIT: f32 = 1.0e9;

#[inline]
fn truncate(v: f32) -> i64 {
    v.clamp(-COORD_LIMIT, COORD_LIMIT) as i64
}

/// DDA of a whole segment: one pixel per major step, 16.16 minor position
///
/// Clipping never moves the endpoints. It only narrows the range of steps
/// that get walked, so a clipped line lights exactly the on-screen pixels
/// of the unclipped one.
#[derive(Debug, Clone, Copy)]
struct Walk {
    vertical: bool,
    /// Major coordinate of step 0
    major: i64,
    /// 16.16 minor coordinate of step 0
    minor: i64,
    /// 16.16 minor advance per step
    dt: i64,
}

impl Walk {
    #[inline(always)]
    fn minor_at(&self, k: i64) -> i64 {
        self.minor + k * self.dt
    }

    /// Pixel of step `k`, `offset` pixels further along the minor axis
    ///
    /// Only called for visible steps, whose coordinates fit in `i32`.
    #[inline(always)]
    fn pixel(&self, k: i64, offset: i64) -> (i32, i32) {
        let major = (self.major + k) as i32;
        let minor = ((self.minor_at(k) >> 16) + offset) as i32;
        if self.vertical {
            (minor, major)
        } else {
            (major, minor)
        }
    }

    /// Fractional minor position of step `k` in 1/256 pixels
    #[inline(always)]
    fn fraction(&self, k: i64) -> i32 {
        ((self.minor_at(k) >> 8) & 0xFF) as i32
    }

    /// Range of steps in `0..=last` that can touch the surface
    ///
    /// A step counts when its pixel or the next one along the minor axis
    /// (the second pixel of a smooth line) is inside. Returns `None` when
    /// no step is.
    fn visible(&self, last: i64, width: usize, height: usize) -> Option<(i64, i64)> {
        let (major_len, minor_len) = if self.vertical {
            (height as i64, width as i64)
        } else {
            (width as i64, height as i64)
        };

        let mut lo = (-self.major).max(0);
        let mut hi = (major_len - 1 - self.major).min(last);

        // 16.16 minor positions whose pixel is in -1..minor_len
        let min = -(1 << 16);
        let max = (minor_len << 16) - 1;
        match self.dt.cmp(&0) {
            Ordering::Equal => {
                if self.minor < min || self.minor > max {
                    return None;
                }
            }
            Ordering::Greater => {
                lo = lo.max(div_ceil(min - self.minor, self.dt));
                hi = hi.min(div_floor(max - self.minor, self.dt));
            }
            Ordering::Less => {
                let d = -self.dt;
                lo = lo.max(div_ceil(self.minor - max, d));
                hi = hi.min(div_floor(self.minor - min, d));
            }
        }

        (lo <= hi).then_some((lo, hi))
    }
}

/// Floor division by a positive divisor
#[inline]
fn div_floor(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

/// Ceiling division by a positive divisor
#[inline]
fn div_ceil(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

/// Line rasterizer
///
/// Holds only the rendering switches; per-line state lives on the stack so
/// drawing allocates nothing.
///
/// # Examples
///
/// ```
/// use softraster::core::raster::{Framebuffer, LineRasterizer, LineVertex};
///
/// let mut fb = Framebuffer::new(16, 16)?;
/// let lines = LineRasterizer::new();
/// let red = |x, y| LineVertex::new(x, y, 0.0).with_color(1.0, 0.0, 0.0, 1.0);
/// lines.draw(&mut fb, &red(2.0, 3.0), &red(12.0, 3.0));
///
/// assert_eq!(fb.get(2, 3), Some(0xFFFF0000));
/// assert_eq!(fb.get(12, 3), Some(0xFFFF0000));
/// assert_eq!(fb.get(13, 3), Some(0xFF000000));
/// # Ok::<(), softraster::RasterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LineRasterizer {
    /// Antialiased two-pixel coverage
    smooth: bool,

    /// Test and write the depth buffer
    depth_test: bool,
}

impl Default for LineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRasterizer {
    pub fn new() -> Self {
        Self {
            smooth: false,
            depth_test: true,
        }
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    pub fn smooth(&self) -> bool {
        self.smooth
    }

    /// Disable to draw without reading or writing depth
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    /// Draw one line segment
    ///
    /// # Arguments
    ///
    /// * `fb` - Target framebuffer
    /// * `v0` - First endpoint
    /// * `v1` - Second endpoint
    ///
    /// Colors are interpolated only when the endpoint colors differ, alpha
    /// only when either endpoint is translucent. Translucent lines blend
    /// and leave depth untouched. A segment whose endpoints truncate to the
    /// same pixel is drawn as a point.
    pub fn draw(&self, fb: &mut Framebuffer, v0: &LineVertex, v1: &LineVertex) {
        let mode = LineMode {
            flat: pack_flat(v0.r, v0.g, v0.b),
            gouraud: v0.r != v1.r || v0.g != v1.g || v0.b != v1.b,
            alpha: v0.a != 1.0 || v1.a != 1.0,
            spatial: v0.z != v1.z || v0.z != 0.0 || v1.z != 0.0,
        };

        let mut ends = [Endpoint::from_vertex(v0), Endpoint::from_vertex(v1)];
        if ends[1].x < ends[0].x {
            ends.swap(0, 1);
        }

        // Truncate before subtracting; the stepping depends on it
        let mut long_len = truncate(ends[1].x) - truncate(ends[0].x);
        let mut short_len = truncate(ends[1].y) - truncate(ends[0].y);
        let vertical = short_len.abs() > long_len.abs();
        if vertical {
            std::mem::swap(&mut long_len, &mut short_len);
        }

        // Walk in the positive major direction
        let (start, end, length) = if long_len < 0 {
            (ends[1], ends[0], -long_len)
        } else {
            (ends[0], ends[1], long_len)
        };
        let xi = truncate(start.x);
        let yi = truncate(start.y);

        let mut interp = Interp {
            r: start.r as i32,
            g: start.g as i32,
            b: start.b as i32,
            a: start.a as i32,
            z: start.z,
        };

        if length == 0 {
            if let (Ok(x), Ok(y)) = (i32::try_from(xi), i32::try_from(yi)) {
                self.draw_point(fb, x, y, &mode, interp.a, start.z);
            }
            return;
        }

        let (major, minor) = if vertical { (yi, xi) } else { (xi, yi) };
        let walk = Walk {
            vertical,
            major,
            // plain lines sample the middle of the minor pixel
            minor: (minor << 16) + if self.smooth { 0 } else { 0x8000 },
            dt: (short_len << 16) / long_len,
        };
        // smooth lines stop one step short of the far endpoint
        let last = if self.smooth { length - 1 } else { length };
        let Some((first, last)) = walk.visible(last, fb.width(), fb.height()) else {
            log::trace!(
                "line ({}, {})-({}, {}) rejected by clipping",
                v0.x,
                v0.y,
                v1.x,
                v1.y
            );
            return;
        };

        let len = length as f32;
        let mut deltas = Deltas::default();
        if mode.gouraud {
            deltas.r = (end.r - start.r) / len;
            deltas.g = (end.g - start.g) / len;
            deltas.b = (end.b - start.b) / len;
        }
        if mode.alpha {
            deltas.a = (end.a - start.a) / len;
        }
        if mode.spatial {
            deltas.z = (end.z - start.z) / len;
        }
        interp.advance(&deltas, first);

        if self.smooth {
            self.draw_smooth(fb, &walk, first, last, interp, &deltas);
        } else {
            self.draw_plain(fb, &walk, first, last, &mode, interp, &deltas);
        }
    }

    fn draw_point(&self, fb: &mut Framebuffer, x: i32, y: i32, mode: &LineMode, ia: i32, z: f32) {
        let Some(idx) = fb.index(x, y) else {
            return;
        };
        if self.depth_test && z > fb.zbuffer[idx] {
            return;
        }
        if mode.alpha {
            let (r, g, b) = unpack_rgb(mode.flat);
            fb.pixels[idx] = blend(fb.pixels[idx], r, g, b, ia >> 16);
        } else {
            fb.pixels[idx] = mode.flat;
            if self.depth_test {
                fb.zbuffer[idx] = z;
            }
        }
    }

    /// One pixel per major step
    #[allow(clippy::too_many_arguments)]
    fn draw_plain(
        &self,
        fb: &mut Framebuffer,
        walk: &Walk,
        first: i64,
        last: i64,
        mode: &LineMode,
        mut it: Interp,
        deltas: &Deltas,
    ) {
        let (sr, sg, sb) = unpack_rgb(mode.flat);

        for k in first..=last {
            let (x, y) = walk.pixel(k, 0);

            if let Some(idx) = fb.index(x, y) {
                // flat 2D lines skip the depth comparison
                let visible = !(self.depth_test && mode.spatial) || it.z <= fb.zbuffer[idx];
                if visible {
                    let (r, g, b) = if mode.gouraud { it.rgb() } else { (sr, sg, sb) };
                    if mode.alpha {
                        fb.pixels[idx] = blend(fb.pixels[idx], r, g, b, it.a >> 16);
                    } else {
                        fb.pixels[idx] = pack_rgb(r, g, b);
                        if self.depth_test {
                            fb.zbuffer[idx] = it.z;
                        }
                    }
                }
            }

            it.step(deltas);
        }
    }

    /// Antialiased stepping: two pixels per major step, weighted by the
    /// fractional minor position
    fn draw_smooth(
        &self,
        fb: &mut Framebuffer,
        walk: &Walk,
        first: i64,
        last: i64,
        mut it: Interp,
        deltas: &Deltas,
    ) {
        for k in first..=last {
            let (r, g, b) = it.rgb();
            let ia = it.a >> 16;
            let frac = walk.fraction(k);

            let (x, y) = walk.pixel(k, 0);
            self.plot_coverage(fb, x, y, (r, g, b), ((0xFF - frac) * ia) >> 8, it.z);
            let (x, y) = walk.pixel(k, 1);
            self.plot_coverage(fb, x, y, (r, g, b), (frac * ia) >> 8, it.z);

            it.step(deltas);
        }
    }

    #[inline(always)]
    fn plot_coverage(
        &self,
        fb: &mut Framebuffer,
        x: i32,
        y: i32,
        (r, g, b): (i32, i32, i32),
        alpha: i32,
        z: f32,
    ) {
        let Some(idx) = fb.index(x, y) else {
            return;
        };
        if self.depth_test && z > fb.zbuffer[idx] {
            return;
        }
        fb.pixels[idx] = blend(fb.pixels[idx], r, g, b, alpha);
        if self.depth_test {
            fb.zbuffer[idx] = z;
        }
    }
}
