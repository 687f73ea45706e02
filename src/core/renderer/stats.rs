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

//! Per-frame counters

use serde::Serialize;

/// What the last frame put on screen
///
/// Reset by `begin_frame`. Primitives are counted when they are
/// rasterized, so in depth-sort mode the numbers only settle after the
/// end-of-frame flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub triangles: usize,
    pub lines: usize,
    pub points: usize,
    /// Vertices created by near-plane clipping
    pub clipped_vertices: usize,
    /// Polygons the ear clipper could not fully triangulate
    pub triangulation_failures: usize,
}
