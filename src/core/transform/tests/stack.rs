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

//! Unit tests for the modelview stack and paired matrix updates

use crate::core::error::RasterError;
use crate::core::transform::{Matrix3D, Transform, MATRIX_STACK_DEPTH};

fn assert_pair_inverse(t: &Transform) {
    let mut product = *t.modelview();
    product.apply(t.modelview_inv());
    for row in 0..4 {
        for col in 0..4 {
            let expected = if row == col { 1.0 } else { 0.0 };
            assert!(
                (product.get(row, col) - expected).abs() < 1e-3,
                "product[{}][{}] = {}",
                row,
                col,
                product.get(row, col)
            );
        }
    }
}

#[test]
fn test_operations_keep_inverse_in_lockstep() {
    let mut t = Transform::new(200, 100);
    t.translate(30.0, -12.0, 4.0);
    t.rotate_x(0.4);
    t.rotate_y(1.2);
    t.rotate_z(-0.8);
    t.rotate(0.5, [1.0, 1.0, 0.0]);
    t.scale(2.0, 3.0, 0.5);
    assert_pair_inverse(&t);
}

#[test]
fn test_push_pop_restores_modelview() {
    let mut t = Transform::new(64, 64);
    let before = t.matrix();
    t.push_matrix().unwrap();
    t.translate(10.0, 0.0, 0.0);
    assert_ne!(t.matrix(), before);
    t.pop_matrix().unwrap();
    assert_eq!(t.matrix(), before);
    assert_eq!(t.stack_depth(), 0);
}

#[test]
fn test_push_overflow() {
    let mut t = Transform::new(64, 64);
    for _ in 0..MATRIX_STACK_DEPTH {
        t.push_matrix().unwrap();
    }
    assert!(matches!(
        t.push_matrix(),
        Err(RasterError::MatrixStackOverflow { depth: 32 })
    ));
    assert_eq!(t.stack_depth(), MATRIX_STACK_DEPTH);
}

#[test]
fn test_pop_underflow() {
    let mut t = Transform::new(64, 64);
    assert!(matches!(t.pop_matrix(), Err(RasterError::MatrixStackUnderflow)));
}

#[test]
fn test_apply_singular_matrix_is_noop() {
    let mut t = Transform::new(64, 64);
    t.translate(3.0, 4.0, 5.0);
    let (mv, inv) = (*t.modelview(), *t.modelview_inv());

    let mut singular = Matrix3D::IDENTITY;
    singular.scale(1.0, 0.0, 1.0);
    assert!(matches!(t.apply_matrix(&singular), Err(RasterError::SingularMatrix)));
    assert_eq!(*t.modelview(), mv);
    assert_eq!(*t.modelview_inv(), inv);
}

#[test]
fn test_apply_matrix_updates_both() {
    let mut t = Transform::new(64, 64);
    let m = Matrix3D::from_rows([
        [1.0, 0.5, 0.0, 2.0],
        [0.0, 1.0, 0.0, -1.0],
        [0.3, 0.0, 2.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    t.apply_matrix(&m).unwrap();
    assert_pair_inverse(&t);
}

#[test]
fn test_reset_matrix_is_identity() {
    let mut t = Transform::new(64, 64);
    t.rotate_z(1.0);
    t.reset_matrix();
    assert_eq!(t.matrix(), Matrix3D::IDENTITY);
    assert_eq!(*t.modelview_inv(), Matrix3D::IDENTITY);
}

#[test]
fn test_model_coordinates_follow_translation() {
    let mut t = Transform::new(64, 64);
    t.translate(5.0, 6.0, 7.0);
    assert!((t.model_x(1.0, 1.0, 1.0) - 6.0).abs() < 1e-3);
    assert!((t.model_y(1.0, 1.0, 1.0) - 7.0).abs() < 1e-3);
    assert!((t.model_z(1.0, 1.0, 1.0) - 8.0).abs() < 1e-3);
}

#[test]
fn test_direction_uses_inverse_transpose() {
    let mut t = Transform::new(64, 64);
    t.rotate_y(std::f32::consts::FRAC_PI_2);
    let d = t.to_camera_direction([0.0, 0.0, 1.0]);
    assert!((d[0] - 1.0).abs() < 1e-5);
    assert!(d[1].abs() < 1e-5);
    assert!(d[2].abs() < 1e-5);

    // non-uniform scale: normals are scaled by the inverse and renormalized
    let mut t = Transform::new(64, 64);
    t.scale(4.0, 1.0, 1.0);
    let n = t.to_camera_direction([1.0, 1.0, 0.0]);
    assert!(n[1] > n[0]);
    assert!(((n[0] * n[0] + n[1] * n[1] + n[2] * n[2]) - 1.0).abs() < 1e-5);
}
