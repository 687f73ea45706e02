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

//! Renderer behaviour tests
//!
//! All tests draw on a 64x64 canvas with the default camera, which maps the
//! z = 0 plane one to one onto pixels.

mod clipping;
mod shapes;

use crate::core::config::RendererConfig;
use crate::core::renderer::{EndMode, Renderer, ShapeKind};

const SIZE: usize = 64;
const BLACK: u32 = 0xFF00_0000;

/// Black canvas, white fill, no stroke
fn canvas_with(config: RendererConfig) -> Renderer {
    let mut r = Renderer::new(config).unwrap();
    r.begin_frame();
    r.background(BLACK);
    r.no_stroke();
    r
}

fn canvas() -> Renderer {
    canvas_with(RendererConfig::with_size(SIZE, SIZE))
}

/// Axis-aligned quad at depth `z`
fn quad(r: &mut Renderer, x0: f32, y0: f32, x1: f32, y1: f32, z: f32) {
    r.begin_shape(ShapeKind::Quads).unwrap();
    r.vertex(x0, y0, z).unwrap();
    r.vertex(x1, y0, z).unwrap();
    r.vertex(x1, y1, z).unwrap();
    r.vertex(x0, y1, z).unwrap();
    r.end_shape(EndMode::Close).unwrap();
}

fn channels(pixel: u32) -> (u32, u32, u32) {
    ((pixel >> 16) & 0xFF, (pixel >> 8) & 0xFF, pixel & 0xFF)
}
