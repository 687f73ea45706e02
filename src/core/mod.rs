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

//! Core rendering components
//!
//! Everything that touches pixels lives here. The modules are listed in
//! dependency order: the rasterizers know nothing about matrices or lights,
//! and the renderer ties all of them together.

pub mod config;
pub mod error;
pub mod lighting;
pub mod raster;
pub mod renderer;
pub mod transform;
pub mod triangulate;

// Re-export commonly used types
pub use config::{Hint, RendererConfig};
pub use error::{RasterError, Result};
pub use raster::{Framebuffer, Texture, TextureFormat};
pub use renderer::Renderer;
