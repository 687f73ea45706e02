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

//! Scanline triangle rasterizer
//!
//! Fills one screen-space triangle with any combination of flat or Gouraud
//! color, interpolated alpha, depth testing and 8/24/32-bit texturing.
//!
//! # Algorithm
//!
//! 1. Sort the vertices top to bottom
//! 2. Compare the slope of the long edge (top to bottom) with the short
//!    edge (top to middle) to find which side it is on
//! 3. Sweep the upper trapezoid (top to middle scanline) and then the lower
//!    one (middle to bottom), carrying the left edge's attributes down
//! 4. Per scanline, step every active attribute with a constant per-pixel
//!    delta computed once per triangle
//!
//! Scanlines and pixels are sampled at their centers (`+0.5`). Colors and
//! texture coordinates step as 16.16 integers, depth as `f32`.
//!
//! # Perspective-corrected textures
//!
//! Plain interpolation is affine in screen space. With a perspective
//! projection the rasterizer can instead evaluate the exact texture
//! coordinates every `2^k` pixels from three plane vectors (see
//! [`PerspectivePlanes`]) and interpolate linearly in between. A triangle
//! whose texture mapping is degenerate falls back to affine stepping.
//!
//! # References
//!
//! - [Chris Hecker: Perspective Texture Mapping](https://chrishecker.com/Miscellaneous_Technical_Articles)
//! - [Triangle Rasterization Tutorial](https://www.sunshine2k.de/coding/java/TriangleRasterization/TriangleRasterization.html)

use std::ops::{Add, Div, Mul, Sub};

use bitflags::bitflags;

use super::blend::{
    blend, fixed_to_byte, modulate_channel, pack_flat, pack_rgb, tint_channel, to_fixed,
    unpack_rgb,
};
use super::texture::{PerspectivePlanes, Texel, Texture, TextureFormat};
use super::Framebuffer;

/// Offset from a pixel's integer coordinate to its center
const PIXEL_CENTER: f32 = 0.5;

bitflags! {
    /// Per-pixel attributes a triangle needs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RasterFlags: u8 {
        /// Vertex colors differ and are interpolated
        const GOURAUD = 1 << 0;
        /// At least one vertex is translucent
        const ALPHA = 1 << 1;
        /// Alpha-only texture
        const TEXTURE8 = 1 << 2;
        /// Opaque RGB texture
        const TEXTURE24 = 1 << 3;
        /// ARGB texture
        const TEXTURE32 = 1 << 4;
    }
}

/// A fully resolved screen-space triangle vertex
///
/// `x`/`y` are pixel coordinates, `z` the depth compared against the depth
/// buffer. Colors and texture coordinates are normalized `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub u: f32,
    pub v: f32,
    /// Camera-space position, only read for perspective-corrected textures
    pub cam: [f32; 3],
}

impl Default for RasterVertex {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
            u: 0.0,
            v: 0.0,
            cam: [0.0; 3],
        }
    }
}

impl RasterVertex {
    /// Opaque white vertex at a screen position
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }

    pub fn with_color(self, r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a, ..self }
    }

    pub fn with_uv(self, u: f32, v: f32) -> Self {
        Self { u, v, ..self }
    }
}

/// Near-plane rectangle of the active perspective projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPlane {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
}

/// Interpolated vertex attributes in rasterizer units
#[derive(Debug, Clone, Copy, Default)]
struct Attrs {
    z: f32,
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    u: f32,
    v: f32,
}

impl Attrs {
    fn zip(self, o: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self {
            z: f(self.z, o.z),
            r: f(self.r, o.r),
            g: f(self.g, o.g),
            b: f(self.b, o.b),
            a: f(self.a, o.a),
            u: f(self.u, o.u),
            v: f(self.v, o.v),
        }
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        self.zip(self, |a, _| f(a))
    }
}

impl Add for Attrs {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        self.zip(o, |a, b| a + b)
    }
}

impl Sub for Attrs {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        self.zip(o, |a, b| a - b)
    }
}

impl Mul<f32> for Attrs {
    type Output = Self;
    fn mul(self, k: f32) -> Self {
        self.map(|a| a * k)
    }
}

impl Div<f32> for Attrs {
    type Output = Self;
    fn div(self, k: f32) -> Self {
        self.map(|a| a / k)
    }
}

/// Constant per-pixel steps along a scanline
#[derive(Debug, Clone, Copy, Default)]
struct PixelSteps {
    z: f32,
    r: i32,
    g: i32,
    b: i32,
    a: i32,
    u: i32,
    v: i32,
}

/// Attribute accumulators at the current pixel
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    z: f32,
    r: i32,
    g: i32,
    b: i32,
    a: i32,
    u: i32,
    v: i32,
}

impl Cursor {
    #[inline(always)]
    fn rgb(&self) -> (i32, i32, i32) {
        (fixed_to_byte(self.r), fixed_to_byte(self.g), fixed_to_byte(self.b))
    }
}

/// Edge walk state shared by the upper and lower trapezoids
#[derive(Debug, Clone, Copy, Default)]
struct Edges {
    xleft: f32,
    xrght: f32,
    left: Attrs,
    left_add: Attrs,
}

/// Per-triangle perspective texturing state
#[derive(Debug, Clone, Copy)]
struct Accurate {
    planes: PerspectivePlanes,
    xmult: f32,
    ymult: f32,
    near: f32,
    /// Plane increments across one interpolation span
    span: [f32; 3],
    len: i32,
    power: u32,
}

/// Everything the pixel loop reads for one triangle
struct Shading<'a> {
    flags: RasterFlags,
    fill: (i32, i32, i32),
    tint: Option<(i32, i32, i32)>,
    texture: Option<&'a Texture>,
    steps: PixelSteps,
    accurate: Option<Accurate>,
}

/// Triangle rasterizer
///
/// # Examples
///
/// ```
/// use softraster::core::raster::{Framebuffer, RasterVertex, TriangleRasterizer};
///
/// let mut fb = Framebuffer::new(64, 64)?;
/// let tri = TriangleRasterizer::new();
/// let red = |x, y| RasterVertex::new(x, y, 0.0).with_color(1.0, 0.0, 0.0, 1.0);
/// tri.draw(&mut fb, &[red(10.0, 10.0), red(50.0, 10.0), red(30.0, 40.0)], None);
///
/// assert_eq!(fb.get(30, 25), Some(0xFFFF0000));
/// assert_eq!(fb.get(5, 25), Some(0xFF000000));
/// # Ok::<(), softraster::RasterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TriangleRasterizer {
    /// Skip triangles with clockwise screen winding
    culling: bool,

    /// Compare fragments against the depth buffer
    depth_test: bool,

    /// Bilinear texture filtering
    bilinear: bool,

    /// Exact texture coordinates every `2^interp_power` pixels
    interp_power: u32,

    /// Set while a perspective projection is active and accurate textures
    /// are requested
    perspective: Option<NearPlane>,
}

impl Default for TriangleRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleRasterizer {
    pub fn new() -> Self {
        Self {
            culling: false,
            depth_test: true,
            bilinear: true,
            interp_power: 3,
            perspective: None,
        }
    }

    pub fn set_culling(&mut self, culling: bool) {
        self.culling = culling;
    }

    /// With the test disabled every fragment passes
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn set_bilinear(&mut self, bilinear: bool) {
        self.bilinear = bilinear;
    }

    pub fn set_interp_power(&mut self, power: u32) {
        self.interp_power = power.min(crate::core::config::MAX_TEXTURE_INTERP_POWER);
    }

    /// Enable perspective-corrected texturing for the given projection
    pub fn set_perspective(&mut self, plane: Option<NearPlane>) {
        self.perspective = plane;
    }

    /// Attributes the pixel loop will interpolate for these vertices
    pub fn flags_for(verts: &[RasterVertex; 3], texture: Option<&Texture>) -> RasterFlags {
        let [v0, v1, v2] = verts;
        let mut flags = RasterFlags::empty();
        if v0.a != 1.0 || v1.a != 1.0 || v2.a != 1.0 {
            flags |= RasterFlags::ALPHA;
        }
        if v0.r != v1.r
            || v1.r != v2.r
            || v0.g != v1.g
            || v1.g != v2.g
            || v0.b != v1.b
            || v1.b != v2.b
        {
            flags |= RasterFlags::GOURAUD;
        }
        if let Some(tex) = texture {
            flags |= match tex.format() {
                TextureFormat::Alpha => RasterFlags::TEXTURE8,
                TextureFormat::Rgb => RasterFlags::TEXTURE24,
                TextureFormat::Argb => RasterFlags::TEXTURE32,
            };
        }
        flags
    }

    /// Rasterize one triangle
    ///
    /// # Arguments
    ///
    /// * `fb` - Target framebuffer
    /// * `verts` - The three vertices, in any order
    /// * `texture` - Optional texture sampled with the vertices' (u, v)
    ///
    /// The flat color of an untextured, non-Gouraud triangle is taken from
    /// the first vertex. Only fully opaque fragments write depth.
    pub fn draw(&self, fb: &mut Framebuffer, verts: &[RasterVertex; 3], texture: Option<&Texture>) {
        let (x0, y0) = (verts[0].x, verts[0].y);
        if self.culling
            && (verts[2].x - x0) * (verts[1].y - y0) < (verts[1].x - x0) * (verts[2].y - y0)
        {
            return;
        }

        let [o0, o1, o2] = Self::order_by_y(verts[0].y, verts[1].y, verts[2].y);
        let (top, mid, bot) = (&verts[o0], &verts[o1], &verts[o2]);
        let height = fb.height() as i32;

        let y0 = top.y;
        let mut yi0 = (y0 + PIXEL_CENTER) as i32;
        if yi0 > height {
            return;
        } else if yi0 < 0 {
            yi0 = 0;
        }

        let y2 = bot.y;
        let mut yi2 = (y2 + PIXEL_CENTER) as i32;
        if yi2 < 0 {
            return;
        } else if yi2 > height {
            yi2 = height;
        }

        // Does the triangle cross a scanline center at all?
        if yi2 <= yi0 {
            return;
        }

        let y1 = mid.y;
        let yi1 = ((y1 + PIXEL_CENTER) as i32).clamp(0, height);
        let (x0, x1, x2) = (top.x, mid.x, bot.x);

        let flags = Self::flags_for(verts, texture);
        let (uscale, vscale) = texture.map_or((0.0, 0.0), |t| t.uv_scale(self.bilinear));
        let attrs = |v: &RasterVertex| Attrs {
            z: v.z,
            r: to_fixed(v.r),
            g: to_fixed(v.g),
            b: to_fixed(v.b),
            a: to_fixed(v.a),
            u: v.u * uscale,
            v: v.v * vscale,
        };
        let (a0, a1, a2) = (attrs(top), attrs(mid), attrs(bot));

        let dx2 = x2 - x0;
        let dy0 = y1 - y0;
        let dy2 = y2 - y0;
        let xadd2 = dx2 / dy2;
        let temp = dy0 / dy2;
        let width = temp * dx2 + x0 - x1;

        // Horizontal gradient: the long edge at the middle vertex's height
        // against the middle vertex itself
        let d0 = a1 - a0;
        let d2 = a2 - a0;
        let grad = |d0: f32, d2: f32| (temp * d2 - d0) / width;
        let steps = PixelSteps {
            z: grad(d0.z, d2.z),
            r: grad(d0.r, d2.r) as i32,
            g: grad(d0.g, d2.g) as i32,
            b: grad(d0.b, d2.b) as i32,
            a: grad(d0.a, d2.a) as i32,
            u: grad(d0.u, d2.u) as i32,
            v: grad(d0.v, d2.v) as i32,
        };

        let fill = pack_flat(verts[0].r, verts[0].g, verts[0].b);
        let shading = Shading {
            flags,
            fill: unpack_rgb(fill),
            tint: (fill & 0xFF_FFFF != 0xFF_FFFF).then(|| unpack_rgb(fill)),
            texture,
            steps,
            accurate: texture.and_then(|tex| self.prepare_accurate(fb, [top, mid, bot], (a0, a1, a2), tex)),
        };

        let mut edges = Edges::default();
        let mut xadd1;
        let single_right;

        if yi1 > yi0 {
            let dta = (yi0 as f32 + PIXEL_CENTER) - y0;
            xadd1 = (x1 - x0) / dy0;

            if xadd2 > xadd1 {
                // Short edge on the left
                edges.xleft = x0 + dta * xadd1;
                edges.xrght = x0 + dta * xadd2;
                edges.left_add = d0 / dy0;
                edges.left = edges.left_add * dta + a0;
                self.draw_segment(fb, &shading, &mut edges, xadd1, xadd2, yi0, yi1);
                single_right = true;
            } else {
                edges.xleft = x0 + dta * xadd2;
                edges.xrght = x0 + dta * xadd1;
                edges.left_add = d2 / dy2;
                edges.left = edges.left_add * dta + a0;
                self.draw_segment(fb, &shading, &mut edges, xadd2, xadd1, yi0, yi1);
                single_right = false;
            }

            if yi2 == yi1 {
                return;
            }
            xadd1 = (x2 - x1) / (y2 - y1);
        } else {
            // Upper part covers no scanline; start at the middle vertex
            xadd1 = (x2 - x1) / (y2 - y1);
            if xadd2 < xadd1 {
                edges.xrght = ((yi1 as f32 + PIXEL_CENTER) - y0) * xadd2 + x0;
                single_right = true;
            } else {
                let dta = (yi1 as f32 + PIXEL_CENTER) - y0;
                edges.xleft = dta * xadd2 + x0;
                edges.left_add = d2 / dy2;
                edges.left = edges.left_add * dta + a0;
                single_right = false;
            }
        }

        let dy1 = y2 - y1;
        if single_right {
            let dta = (yi1 as f32 + PIXEL_CENTER) - y1;
            edges.xleft = dta * xadd1 + x1;
            edges.left_add = (a2 - a1) / dy1;
            edges.left = edges.left_add * dta + a1;
            self.draw_segment(fb, &shading, &mut edges, xadd1, xadd2, yi1, yi2);
        } else {
            edges.xrght = ((yi1 as f32 + PIXEL_CENTER) - y1) * xadd1 + x1;
            self.draw_segment(fb, &shading, &mut edges, xadd2, xadd1, yi1, yi2);
        }
    }

    /// Vertex indices ordered top, middle, bottom
    fn order_by_y(y0: f32, y1: f32, y2: f32) -> [usize; 3] {
        if y0 < y1 {
            if y2 < y1 {
                if y2 < y0 {
                    [2, 0, 1]
                } else {
                    [0, 2, 1]
                }
            } else {
                [0, 1, 2]
            }
        } else if y2 > y1 {
            if y2 < y0 {
                [1, 2, 0]
            } else {
                [1, 0, 2]
            }
        } else {
            [2, 1, 0]
        }
    }

    /// Per-triangle setup for perspective-corrected texturing
    fn prepare_accurate(
        &self,
        fb: &Framebuffer,
        verts: [&RasterVertex; 3],
        (a0, a1, a2): (Attrs, Attrs, Attrs),
        tex: &Texture,
    ) -> Option<Accurate> {
        let plane = self.perspective?;
        let uv = [(a0.u, a0.v), (a1.u, a1.v), (a2.u, a2.v)];
        let cam = [verts[0].cam, verts[1].cam, verts[2].cam];
        let Some(planes) =
            PerspectivePlanes::new(uv, cam, tex.width() as f32, tex.height() as f32)
        else {
            log::debug!("degenerate texture mapping, falling back to affine texturing");
            return None;
        };

        // One pixel in near-plane units
        let xmult = (plane.right - plane.left) / fb.width() as f32;
        let ymult = (plane.top - plane.bottom) / fb.height() as f32;
        let len = 1i32 << self.interp_power;
        let lenf = len as f32;
        Some(Accurate {
            planes,
            xmult,
            ymult,
            near: plane.near,
            span: [
                planes.a[0] * xmult * lenf,
                planes.b[0] * xmult * lenf,
                planes.c[0] * xmult * lenf,
            ],
            len,
            power: self.interp_power,
        })
    }

    /// Sweep scanlines `ytop..ybottom` between the current edges
    #[allow(clippy::too_many_arguments)]
    fn draw_segment(
        &self,
        fb: &mut Framebuffer,
        sh: &Shading,
        edges: &mut Edges,
        leftadd: f32,
        rghtadd: f32,
        ytop: i32,
        ybottom: i32,
    ) {
        let width = fb.width() as i32;
        let steps = sh.steps;

        for ypixel in ytop..ybottom {
            let xstart = ((edges.xleft + PIXEL_CENTER) as i32).max(0);
            let xend = ((edges.xrght + PIXEL_CENTER) as i32).min(width);
            let xdiff = (xstart as f32 + PIXEL_CENTER) - edges.xleft;

            let left = edges.left;
            let mut cur = Cursor {
                z: steps.z * xdiff + left.z,
                r: (steps.r as f32 * xdiff + left.r) as i32,
                g: (steps.g as f32 * xdiff + left.g) as i32,
                b: (steps.b as f32 * xdiff + left.b) as i32,
                a: (steps.a as f32 * xdiff + left.a) as i32,
                u: (steps.u as f32 * xdiff + left.u) as i32,
                v: (steps.v as f32 * xdiff + left.v) as i32,
            };

            let mut span = match sh.accurate {
                Some(acc) if xstart < xend => {
                    Some(SpanWalker::new(&acc, fb, xstart, xend, ypixel, &mut cur))
                }
                _ => None,
            };

            for x in xstart..xend {
                if let Some(walker) = span.as_mut() {
                    walker.advance(&mut cur);
                }

                if let Some(idx) = fb.index(x, ypixel) {
                    self.shade(fb, idx, sh, &cur);
                }

                if span.is_none() {
                    cur.u = cur.u.wrapping_add(steps.u);
                    cur.v = cur.v.wrapping_add(steps.v);
                }
                cur.z += steps.z;
                cur.r = cur.r.wrapping_add(steps.r);
                cur.g = cur.g.wrapping_add(steps.g);
                cur.b = cur.b.wrapping_add(steps.b);
                cur.a = cur.a.wrapping_add(steps.a);
            }

            edges.xleft += leftadd;
            edges.xrght += rghtadd;
            edges.left = edges.left + edges.left_add;
        }
    }

    /// Resolve and write one fragment
    #[inline(always)]
    fn shade(&self, fb: &mut Framebuffer, idx: usize, sh: &Shading, cur: &Cursor) {
        if self.depth_test && cur.z > fb.zbuffer[idx] {
            return;
        }

        let gouraud = sh.flags.contains(RasterFlags::GOURAUD);
        let base = if gouraud { cur.rgb() } else { sh.fill };

        let texel = match sh.texture.map(|tex| tex.sample(cur.u, cur.v, self.bilinear)) {
            // coordinate drifted off the texture
            Some(None) => return,
            sampled => sampled.flatten(),
        };

        let ((r, g, b), coverage) = match texel {
            None => (base, None),
            Some(t) if sh.flags.contains(RasterFlags::TEXTURE8) => (base, Some(t.a)),
            Some(t) => {
                let rgb = Self::texel_color(&t, gouraud, sh.tint, cur);
                let coverage = sh.flags.contains(RasterFlags::TEXTURE32).then_some(t.a);
                (rgb, coverage)
            }
        };

        let alpha = cur.a >> 16;
        let coverage = match (coverage, sh.flags.contains(RasterFlags::ALPHA)) {
            (None, false) => None,
            (None, true) => Some(alpha),
            (Some(c), false) => Some(c),
            (Some(c), true) => Some((c * alpha) >> 8),
        };

        match coverage {
            None => {
                fb.pixels[idx] = pack_rgb(r, g, b);
                fb.zbuffer[idx] = cur.z;
            }
            // translucent fragments leave depth alone
            Some(al) => fb.pixels[idx] = blend(fb.pixels[idx], r, g, b, al),
        }
    }

    /// Color texel modulated by Gouraud color or tinted by the fill
    #[inline(always)]
    fn texel_color(
        t: &Texel,
        gouraud: bool,
        tint: Option<(i32, i32, i32)>,
        cur: &Cursor,
    ) -> (i32, i32, i32) {
        if gouraud {
            (
                modulate_channel(t.r, cur.r),
                modulate_channel(t.g, cur.g),
                modulate_channel(t.b, cur.b),
            )
        } else if let Some((tr, tg, tb)) = tint {
            (
                tint_channel(t.r, tr),
                tint_channel(t.g, tg),
                tint_channel(t.b, tb),
            )
        } else {
            (t.r, t.g, t.b)
        }
    }
}

/// Perspective-corrected texture coordinates along one scanline
///
/// Exact coordinates are computed at span boundaries; pixels in between
/// step linearly. The first span is shortened so the last pixel of the
/// scanline lands on an exact sample when the view ray is moving toward
/// the plane.
struct SpanWalker {
    a: f32,
    b: f32,
    c: f32,
    span: [f32; 3],
    fu: f32,
    fv: f32,
    delta_u: i32,
    delta_v: i32,
    counter: i32,
    len: i32,
    power: u32,
}

impl SpanWalker {
    fn new(acc: &Accurate, fb: &Framebuffer, xstart: i32, xend: i32, ypixel: i32, cur: &mut Cursor) -> Self {
        let screenx = acc.xmult * (xstart as f32 + PIXEL_CENTER - fb.width() as f32 / 2.0);
        let screeny = acc.ymult * (ypixel as f32 + PIXEL_CENTER - fb.height() as f32 / 2.0);
        let screenz = acc.near;
        let dot = |p: [f32; 3]| screenx * p[0] + screeny * p[1] + screenz * p[2];

        let mut walker = Self {
            a: dot(acc.planes.a),
            b: dot(acc.planes.b),
            c: dot(acc.planes.c),
            span: acc.span,
            fu: 0.0,
            fv: 0.0,
            delta_u: 0,
            delta_v: 0,
            counter: 0,
            len: acc.len,
            power: acc.power,
        };

        let going_in = (walker.span[2] > 0.0) != (walker.c > 0.0);
        if going_in {
            let right_offset = (xend - xstart - 1) % walker.len;
            let left_offset = walker.len - right_offset;
            let right_frac = right_offset as f32 / walker.len as f32;
            let left_frac = left_offset as f32 / walker.len as f32;
            walker.counter = left_offset;

            let ao = walker.a - left_frac * walker.span[0];
            let bo = walker.b - left_frac * walker.span[1];
            let co = walker.c - left_frac * walker.span[2];
            let inv = 65536.0 / co;
            let (oldfu, oldfv) = (ao * inv, bo * inv);

            walker.a += right_frac * walker.span[0];
            walker.b += right_frac * walker.span[1];
            walker.c += right_frac * walker.span[2];
            let inv = 65536.0 / walker.c;
            walker.fu = walker.a * inv;
            walker.fv = walker.b * inv;
            walker.delta_u = ((walker.fu - oldfu) as i32) >> walker.power;
            walker.delta_v = ((walker.fv - oldfv) as i32) >> walker.power;
            cur.u = (oldfu as i32).wrapping_add((left_offset - 1).wrapping_mul(walker.delta_u));
            cur.v = (oldfv as i32).wrapping_add((left_offset - 1).wrapping_mul(walker.delta_v));
        } else {
            let inv = 65536.0 / walker.c;
            walker.fu = walker.a * inv;
            walker.fv = walker.b * inv;
        }
        walker
    }

    #[inline(always)]
    fn advance(&mut self, cur: &mut Cursor) {
        if self.counter == self.len {
            self.counter = 0;
        }
        if self.counter == 0 {
            self.a += self.span[0];
            self.b += self.span[1];
            self.c += self.span[2];
            let inv = 65536.0 / self.c;
            let (oldfu, oldfv) = (self.fu, self.fv);
            self.fu = self.a * inv;
            self.fv = self.b * inv;
            cur.u = oldfu as i32;
            cur.v = oldfv as i32;
            self.delta_u = ((self.fu - oldfu) as i32) >> self.power;
            self.delta_v = ((self.fv - oldfv) as i32) >> self.power;
        } else {
            cur.u = cur.u.wrapping_add(self.delta_u);
            cur.v = cur.v.wrapping_add(self.delta_v);
        }
        self.counter += 1;
    }
}
