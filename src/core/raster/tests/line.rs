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

//! Unit tests for LineRasterizer

use crate::core::raster::{Framebuffer, LineRasterizer, LineVertex};
use proptest::prelude::*;

const BLACK: u32 = 0xFF00_0000;

fn red(x: f32, y: f32) -> LineVertex {
    LineVertex::new(x, y, 0.0).with_color(1.0, 0.0, 0.0, 1.0)
}

fn lit(fb: &Framebuffer) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..fb.height() as i32 {
        for x in 0..fb.width() as i32 {
            if fb.get(x, y) != Some(BLACK) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn test_horizontal_line_covers_both_endpoints() {
    let mut fb = Framebuffer::new(32, 32).unwrap();
    LineRasterizer::new().draw(&mut fb, &red(5.0, 5.0), &red(20.0, 5.0));

    for x in 5..=20 {
        assert_eq!(fb.get(x, 5), Some(0xFFFF0000), "x = {}", x);
    }
    assert_eq!(lit(&fb).len(), 16);
}

#[test]
fn test_endpoint_order_does_not_matter() {
    let mut a = Framebuffer::new(32, 32).unwrap();
    let mut b = Framebuffer::new(32, 32).unwrap();
    let lines = LineRasterizer::new();
    lines.draw(&mut a, &red(3.0, 4.0), &red(27.0, 19.0));
    lines.draw(&mut b, &red(27.0, 19.0), &red(3.0, 4.0));
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn test_steep_line_has_one_pixel_per_row() {
    let mut fb = Framebuffer::new(32, 32).unwrap();
    LineRasterizer::new().draw(&mut fb, &red(10.0, 2.0), &red(14.0, 28.0));

    for y in 2..=28 {
        let row = (0..32).filter(|&x| fb.get(x, y) != Some(BLACK)).count();
        assert_eq!(row, 1, "row {}", y);
    }
}

#[test]
fn test_zero_length_line_is_a_point() {
    let mut fb = Framebuffer::new(8, 8).unwrap();
    LineRasterizer::new().draw(&mut fb, &red(3.2, 4.7), &red(3.9, 4.1));
    assert_eq!(lit(&fb), vec![(3, 4)]);
}

#[test]
fn test_fully_offscreen_line_draws_nothing() {
    let mut fb = Framebuffer::new(16, 16).unwrap();
    let lines = LineRasterizer::new();
    lines.draw(&mut fb, &red(-10.0, -5.0), &red(-2.0, 40.0));
    lines.draw(&mut fb, &red(20.0, 3.0), &red(100.0, 9.0));
    assert!(lit(&fb).is_empty());
}

#[test]
fn test_clipped_line_stays_on_screen() {
    let mut fb = Framebuffer::new(16, 16).unwrap();
    LineRasterizer::new().draw(&mut fb, &red(-20.0, 8.0), &red(40.0, 8.0));

    for x in 0..16 {
        assert_eq!(fb.get(x, 8), Some(0xFFFF0000));
    }
}

/// The top-left 32x32 pixels after drawing one line on a `size` square
fn top_left(size: usize, v0: &LineVertex, v1: &LineVertex, smooth: bool) -> Vec<u32> {
    let mut fb = Framebuffer::new(size, size).unwrap();
    let mut lines = LineRasterizer::new();
    lines.set_smooth(smooth);
    lines.draw(&mut fb, v0, v1);

    let mut out = Vec::with_capacity(32 * 32);
    for y in 0..32 {
        for x in 0..32 {
            out.push(fb.get(x, y).unwrap());
        }
    }
    out
}

#[test]
fn test_clipping_does_not_move_pixels() {
    for (x1, y1) in [(100.0, 20.0), (40.0, 13.0), (33.0, 31.0), (-60.0, 45.0), (12.0, -70.0)] {
        for smooth in [false, true] {
            let clipped = top_left(32, &red(5.0, 5.0), &red(x1, y1), smooth);
            let whole = top_left(128, &red(5.0, 5.0), &red(x1, y1), smooth);
            assert_eq!(clipped, whole, "(5, 5)-({}, {}), smooth {}", x1, y1, smooth);
        }
    }
}

#[test]
fn test_clipped_gouraud_line_keeps_colors() {
    let v0 = LineVertex::new(2.0, 3.0, 0.0).with_color(1.0, 0.0, 0.0, 1.0);
    let v1 = LineVertex::new(90.0, 20.0, 0.0).with_color(0.0, 0.0, 1.0, 1.0);
    let clipped = top_left(32, &v0, &v1, false);
    let whole = top_left(128, &v0, &v1, false);
    assert_eq!(clipped, whole);
}

#[test]
fn test_gouraud_line_fades_between_endpoints() {
    let mut fb = Framebuffer::new(64, 4).unwrap();
    let v0 = LineVertex::new(0.0, 1.0, 0.0).with_color(1.0, 0.0, 0.0, 1.0);
    let v1 = LineVertex::new(63.0, 1.0, 0.0).with_color(0.0, 0.0, 1.0, 1.0);
    LineRasterizer::new().draw(&mut fb, &v0, &v1);

    let first = fb.get(0, 1).unwrap();
    let last = fb.get(63, 1).unwrap();
    let mid = fb.get(32, 1).unwrap();
    assert!((first >> 16) & 0xFF > 0xF0);
    assert!(last & 0xFF > 0xF0);
    assert!((mid >> 16) & 0xFF > 0x60 && (mid >> 16) & 0xFF < 0xA0);
    assert!(mid & 0xFF > 0x60 && mid & 0xFF < 0xA0);
}

#[test]
fn test_translucent_line_blends_and_keeps_depth() {
    let mut fb = Framebuffer::new(16, 4).unwrap();
    let v0 = LineVertex::new(0.0, 1.0, 1.0).with_color(1.0, 1.0, 1.0, 0.5);
    let v1 = LineVertex::new(15.0, 1.0, 1.0).with_color(1.0, 1.0, 1.0, 0.5);
    LineRasterizer::new().draw(&mut fb, &v0, &v1);

    let px = fb.get(7, 1).unwrap();
    let r = (px >> 16) & 0xFF;
    assert!((0x78..=0x84).contains(&r), "r = {:#x}", r);
    assert_eq!(fb.depth(7, 1), Some(f32::MAX));
}

#[test]
fn test_spatial_line_respects_depth() {
    let mut fb = Framebuffer::new(16, 4).unwrap();
    let lines = LineRasterizer::new();
    let near = |x| LineVertex::new(x, 1.0, 1.0).with_color(0.0, 1.0, 0.0, 1.0);
    let far = |x| LineVertex::new(x, 1.0, 5.0).with_color(1.0, 0.0, 0.0, 1.0);

    lines.draw(&mut fb, &near(0.0), &near(15.0));
    lines.draw(&mut fb, &far(0.0), &far(15.0));
    assert_eq!(fb.get(8, 1), Some(0xFF00FF00));
    assert_eq!(fb.depth(8, 1), Some(1.0));
}

#[test]
fn test_smooth_line_splits_coverage() {
    let mut fb = Framebuffer::new(32, 32).unwrap();
    let mut lines = LineRasterizer::new();
    lines.set_smooth(true);
    let white = |x, y| LineVertex::new(x, y, 0.0);
    lines.draw(&mut fb, &white(2.0, 2.0), &white(30.0, 16.0));

    let mut partial = 0;
    for (x, y) in lit(&fb) {
        let g = (fb.get(x, y).unwrap() >> 8) & 0xFF;
        if g > 0 && g < 0xF0 {
            partial += 1;
        }
    }
    assert!(partial > 10, "only {} partially covered pixels", partial);
}

proptest! {
    #[test]
    fn prop_line_never_leaves_framebuffer(
        x0 in -200.0f32..200.0, y0 in -200.0f32..200.0,
        x1 in -200.0f32..200.0, y1 in -200.0f32..200.0,
        smooth in any::<bool>(),
    ) {
        let mut fb = Framebuffer::new(24, 17).unwrap();
        let mut lines = LineRasterizer::new();
        lines.set_smooth(smooth);
        lines.draw(&mut fb, &red(x0, y0), &red(x1, y1));
        prop_assert_eq!(fb.pixels().len(), 24 * 17);
    }

    #[test]
    fn prop_line_pixels_stay_near_segment(
        x0 in 0.0f32..31.0, y0 in 0.0f32..31.0,
        x1 in 0.0f32..31.0, y1 in 0.0f32..31.0,
    ) {
        let mut fb = Framebuffer::new(32, 32).unwrap();
        LineRasterizer::new().draw(&mut fb, &red(x0, y0), &red(x1, y1));

        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        for (x, y) in lit(&fb) {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if len2 > 0.0 {
                (((px - x0) * dx + (py - y0) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (x0 + t * dx, y0 + t * dy);
            let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            prop_assert!(dist < 2.0, "pixel ({}, {}) is {} away", x, y, dist);
        }
    }

    #[test]
    fn prop_line_ignores_framebuffer_size(
        x0 in 0.0f32..31.0, y0 in 0.0f32..31.0,
        x1 in -100.0f32..150.0, y1 in -100.0f32..150.0,
        smooth in any::<bool>(),
    ) {
        // the small surface clips, the large one only clips negative coordinates
        let small = top_left(32, &red(x0, y0), &red(x1, y1), smooth);
        let large = top_left(256, &red(x0, y0), &red(x1, y1), smooth);
        prop_assert_eq!(small, large);
    }
}
