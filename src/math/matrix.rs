use nalgebra as na;
use crate::math::Vector3;
use std::fmt;
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A row-major 3x3 matrix, used for rotation bases and inertia tensors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    pub data: [[f32; 3]; 3],
}

impl Matrix3 {
    /// Creates a new 3x3 matrix from rows
    #[inline]
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_diagonal(Vector3::new(1.0, 1.0, 1.0))
    }

    #[inline]
    pub fn zero() -> Self {
        Self { data: [[0.0; 3]; 3] }
    }

    /// Creates a diagonal matrix, e.g. the principal inertia of a body
    #[inline]
    pub fn from_diagonal(diagonal: Vector3) -> Self {
        Self {
            data: [
                [diagonal.x, 0.0, 0.0],
                [0.0, diagonal.y, 0.0],
                [0.0, 0.0, diagonal.z],
            ],
        }
    }

    /// Creates a matrix whose columns are the given vectors
    #[inline]
    pub fn from_columns(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self {
            data: [
                [x.x, y.x, z.x],
                [x.y, y.y, z.y],
                [x.z, y.z, z.z],
            ],
        }
    }

    /// Returns column `index` as a vector
    #[inline]
    pub fn column(&self, index: usize) -> Vector3 {
        Vector3::new(self.data[0][index], self.data[1][index], self.data[2][index])
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.to_nalgebra().determinant()
    }

    /// Returns the inverse of the matrix, or None if it is not invertible
    pub fn inverse(&self) -> Option<Self> {
        if self.determinant().abs() < crate::math::EPSILON {
            return None;
        }

        self.to_nalgebra()
            .try_inverse()
            .map(|inv| Self::from_nalgebra(&inv))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        Self {
            data: [
                [a, d, g],
                [b, e, h],
                [c, f, i],
            ],
        }
    }

    #[inline]
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        Vector3::new(
            a * v.x + b * v.y + c * v.z,
            d * v.x + e * v.y + f * v.z,
            g * v.x + h * v.y + i * v.z,
        )
    }

    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = Self::zero();

        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] = (0..3).map(|k| self.data[i][k] * other.data[k][j]).sum();
            }
        }

        result
    }

    /// Quadratic form `v · (M v)`, the scalar inertia "seen" along a direction
    #[inline]
    pub fn quadratic_form(&self, v: Vector3) -> f32 {
        v.dot(&self.multiply_vector(v))
    }

    /// Convert to nalgebra Matrix3
    #[inline]
    pub fn to_nalgebra(&self) -> na::Matrix3<f32> {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        na::Matrix3::new(
            a, b, c,
            d, e, f,
            g, h, i,
        )
    }

    /// Convert from nalgebra Matrix3
    #[inline]
    pub fn from_nalgebra(m: &na::Matrix3<f32>) -> Self {
        Self {
            data: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
        }
    }
}

impl Mul<f32> for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        let mut data = self.data;
        for row in data.iter_mut() {
            for value in row.iter_mut() {
                *value *= rhs;
            }
        }
        Self { data }
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[ {}, {}, {} ]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}
