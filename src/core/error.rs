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

//! Error types for the renderer
//!
//! Only configuration mistakes are reported as errors. Degenerate geometry
//! (zero-area polygons, singular texture mappings, pixels that drift off
//! screen) is handled where it occurs and never reaches the caller.

use thiserror::Error;

/// Errors reported by the renderer
#[derive(Debug, Error)]
pub enum RasterError {
    /// A light was added after the fixed light budget was used up
    #[error("can only create {max} lights")]
    LightLimit { max: usize },

    /// `push_matrix` was called with a full matrix stack
    #[error("too many calls to push_matrix (stack depth {depth})")]
    MatrixStackOverflow { depth: usize },

    /// `pop_matrix` was called with an empty matrix stack
    #[error("too many calls to pop_matrix, and not enough to push_matrix")]
    MatrixStackUnderflow,

    /// `begin_camera` was called twice without `end_camera`
    #[error("begin_camera cannot be called again before end_camera")]
    CameraAlreadyBegun,

    /// `end_camera` was called without `begin_camera`
    #[error("cannot call end_camera without first calling begin_camera")]
    CameraNotBegun,

    /// `apply_matrix` received a matrix that has no inverse
    #[error("matrix is singular and cannot be applied")]
    SingularMatrix,

    /// A vertex or end_shape call arrived outside of begin_shape/end_shape
    #[error("vertex data submitted outside of begin_shape/end_shape")]
    ShapeNotBegun,

    /// begin_shape was called while a shape was still open
    #[error("begin_shape called before the previous end_shape")]
    ShapeAlreadyBegun,

    /// Zero-sized surface or mismatched pixel array
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Bulk pixel transfer with the wrong number of pixels
    #[error("pixel buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Configuration file could not be parsed or serialized
    #[error("config error: {0}")]
    Config(String),

    /// I/O failure while reading or writing configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, RasterError>;
