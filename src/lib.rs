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

//! softraster: a CPU software rasterizer
//!
//! This crate renders immediate-mode 2D/3D drawing commands into an in-memory
//! ARGB framebuffer with an optional depth buffer.
//!
//! # Architecture
//!
//! The renderer is organized into the following modules, leaves first:
//!
//! - [`core::raster`]: Fixed-point blending, the scanline line rasterizer and
//!   the scanline triangle rasterizer (flat, Gouraud, textured, alpha,
//!   perspective-corrected textures)
//! - [`core::triangulate`]: Ear-clipping triangulation of simple polygons
//! - [`core::transform`]: 4x4 matrices, the paired forward/inverse matrix
//!   stack, camera and projection setup
//! - [`core::lighting`]: Ambient, directional, point and spot lights
//! - [`core::renderer`]: The immediate-mode front end (shapes, near-plane
//!   clipping, depth sorting, frame bookkeeping)
//!
//! # Example
//!
//! ```
//! use softraster::core::config::RendererConfig;
//! use softraster::core::renderer::{EndMode, Renderer, ShapeKind};
//!
//! let mut renderer = Renderer::new(RendererConfig::with_size(64, 64))?;
//! renderer.begin_frame();
//! renderer.background(0xFF000000);
//! renderer.no_stroke();
//! renderer.fill(1.0, 0.0, 0.0, 1.0);
//! renderer.begin_shape(ShapeKind::Triangles)?;
//! renderer.vertex(10.0, 10.0, 0.0)?;
//! renderer.vertex(50.0, 10.0, 0.0)?;
//! renderer.vertex(30.0, 40.0, 0.0)?;
//! renderer.end_shape(EndMode::Open)?;
//! renderer.end_frame();
//!
//! assert_eq!(renderer.get(30, 25), Some(0xFFFF0000));
//! # Ok::<(), softraster::RasterError>(())
//! ```
//!
//! # Getting Started
//!
//! 1. Create a [`core::renderer::Renderer`] from a [`core::config::RendererConfig`]
//! 2. Bracket each frame with `begin_frame` / `end_frame`
//! 3. Submit shapes, transforms and lights in between
//! 4. Read the result back through `pixels()` or `get(x, y)`
//!
//! # Error Handling
//!
//! Configuration mistakes (too many lights, unbalanced matrix stack, a shape
//! call outside `begin_shape`) return [`core::error::Result<T>`], an alias for
//! `Result<T, RasterError>`. Degenerate geometry never fails; it simply draws
//! less.

pub mod core;

// Re-export commonly used types
pub use core::error::{RasterError, Result};
