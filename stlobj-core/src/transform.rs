/// Affine vertex transform in homogeneous coordinates
use std::ops::Mul;

use crate::geometry::{Facet, Vector3};

/// A 4x4 row-major matrix applied to points as `M · [x, y, z, 1]ᵗ`.
///
/// Building the matrix (scale, rotation, translation) is the caller's job;
/// this type only applies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    rows: [[f64; 4]; 4],
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Create a scale matrix
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        let mut rows = Self::IDENTITY.rows;
        rows[0][0] = sx;
        rows[1][1] = sy;
        rows[2][2] = sz;
        Self { rows }
    }

    /// Create a translation matrix
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut rows = Self::IDENTITY.rows;
        rows[0][3] = x;
        rows[1][3] = y;
        rows[2][3] = z;
        Self { rows }
    }

    /// First three components of `M · [x, y, z, 1]ᵗ`.
    pub fn apply(&self, v: Vector3) -> Vector3 {
        let h = [v.x, v.y, v.z, 1.0];
        let dot = |row: &[f64; 4]| row.iter().zip(h.iter()).map(|(a, b)| a * b).sum::<f64>();
        Vector3::new(dot(&self.rows[0]), dot(&self.rows[1]), dot(&self.rows[2]))
    }

    /// Transform the three vertices of a facet.
    ///
    /// The normal is copied through untouched. That is only geometrically
    /// right for rigid transforms; under non-uniform scale or shear the
    /// emitted normal no longer matches the triangle.
    pub fn apply_facet(&self, facet: &Facet) -> Facet {
        let [v1, v2, v3] = facet.vertices;
        Facet::new(facet.normal, self.apply(v1), self.apply(v2), self.apply(v3))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f64; 4]; 4]> for Transform {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

/// Matrix product: `(a * b).apply(v) == a.apply(b.apply(v))`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Transform { rows }
    }
}
