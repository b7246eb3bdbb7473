//! Numeric kernel: small linear algebra, rotations and polynomials.
use crate::prelude::Vector3;

mod matrix;
mod polynomial;
mod quaternion;

pub use matrix::{invert3x3, matrix_to_rpy, qr_factorize, rpy_to_matrix, MatrixLayout};
pub use polynomial::{horner, lagrange, legendre};
pub use quaternion::{matrix_to_quaternion, quaternion_to_matrix};

/// Cross product `a x b`
pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

/// Dot product `a . b`
pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

#[cfg(test)]
mod test {
    use super::{cross, dot};
    use crate::prelude::Vector3;

    #[test]
    fn cross_dot_products() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(cross(&x, &y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(cross(&y, &x), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(dot(&x, &y), 0.0);
        assert_eq!(dot(&Vector3::new(1.0, 2.0, 3.0), &Vector3::new(4.0, 5.0, 6.0)), 32.0);
    }
}
