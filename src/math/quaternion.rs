use log::error;

use crate::{
    error::Error,
    prelude::{Matrix3, Quaternion},
};

/// Rotation matrix of a normalized [Quaternion]
pub fn quaternion_to_matrix(q: &Quaternion<f64>) -> Matrix3<f64> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    Matrix3::new(
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - w * z),
        2.0 * (x * z + w * y),
        2.0 * (x * y + w * z),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z - w * x),
        2.0 * (x * z - w * y),
        2.0 * (y * z + w * x),
        1.0 - 2.0 * (x * x + y * y),
    )
}

/// Converts a rotation matrix to a [Quaternion].
///
/// The largest of the four diagonal-derived components is used as
/// divisor for the remaining three, which are then compared against
/// their own diagonal-derived magnitudes: any difference larger
/// than `tolerance` rejects the matrix.
pub fn matrix_to_quaternion(m: &Matrix3<f64>, tolerance: f64) -> Result<Quaternion<f64>, Error> {
    let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);

    let squares = [
        0.25 * (1.0 + m00 + m11 + m22),
        0.25 * (1.0 + m00 - m11 - m22),
        0.25 * (1.0 - m00 + m11 - m22),
        0.25 * (1.0 - m00 - m11 + m22),
    ];

    let (largest, _) = squares
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |(best, max), (i, sq)| {
            if *sq > max {
                (i, *sq)
            } else {
                (best, max)
            }
        });

    let pivot = squares[largest].max(0.0).sqrt();
    let denom = 4.0 * pivot;

    if denom <= f64::EPSILON {
        error!("matrix to quaternion: degenerate matrix");
        return Err(Error::QuaternionMismatch);
    }

    let (w, x, y, z) = match largest {
        0 => (
            pivot,
            (m[(2, 1)] - m[(1, 2)]) / denom,
            (m[(0, 2)] - m[(2, 0)]) / denom,
            (m[(1, 0)] - m[(0, 1)]) / denom,
        ),
        1 => (
            (m[(2, 1)] - m[(1, 2)]) / denom,
            pivot,
            (m[(0, 1)] + m[(1, 0)]) / denom,
            (m[(0, 2)] + m[(2, 0)]) / denom,
        ),
        2 => (
            (m[(0, 2)] - m[(2, 0)]) / denom,
            (m[(0, 1)] + m[(1, 0)]) / denom,
            pivot,
            (m[(1, 2)] + m[(2, 1)]) / denom,
        ),
        _ => (
            (m[(1, 0)] - m[(0, 1)]) / denom,
            (m[(0, 2)] + m[(2, 0)]) / denom,
            (m[(1, 2)] + m[(2, 1)]) / denom,
            pivot,
        ),
    };

    for (derived, square) in [w, x, y, z].iter().zip(squares.iter()) {
        if (derived.abs() - square.max(0.0).sqrt()).abs() > tolerance {
            error!(
                "matrix to quaternion: component {} disagrees with diagonal {}",
                derived, square
            );
            return Err(Error::QuaternionMismatch);
        }
    }

    Ok(Quaternion::new(w, x, y, z))
}

#[cfg(test)]
mod test {
    use super::{matrix_to_quaternion, quaternion_to_matrix};
    use crate::prelude::{Error, Matrix3, Quaternion, UnitQuaternion};

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn same_rotation(a: &Quaternion<f64>, b: &Quaternion<f64>, tol: f64) -> bool {
        let direct = (a.coords - b.coords).abs().max();
        let flipped = (a.coords + b.coords).abs().max();
        direct < tol || flipped < tol
    }

    #[test]
    fn matches_nalgebra() {
        let q = UnitQuaternion::from_euler_angles(0.1, -0.4, 1.2);
        let m = quaternion_to_matrix(q.quaternion());
        let reference = q.to_rotation_matrix();
        assert!((m - reference.matrix()).abs().max() < 1e-14);
    }

    #[test]
    fn randomized_round_trip() {
        let mut rng = SmallRng::seed_from_u64(0x105);

        for _ in 0..1000 {
            let q = Quaternion::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            if q.norm() < 1e-3 {
                continue;
            }
            let q = q.normalize();

            let m = quaternion_to_matrix(&q);
            let back = matrix_to_quaternion(&m, 1e-6).unwrap();

            assert!(
                same_rotation(&q, &back, 1e-9),
                "round trip failed: {:?} -> {:?}",
                q,
                back
            );
        }
    }

    #[test]
    fn each_branch() {
        // identity, and half turns around each axis
        for q in [
            Quaternion::new(1.0, 0.0, 0.0, 0.0),
            Quaternion::new(0.0, 1.0, 0.0, 0.0),
            Quaternion::new(0.0, 0.0, 1.0, 0.0),
            Quaternion::new(0.0, 0.0, 0.0, 1.0),
        ] {
            let back = matrix_to_quaternion(&quaternion_to_matrix(&q), 1e-9).unwrap();
            assert!(same_rotation(&q, &back, 1e-12));
        }
    }

    #[test]
    fn non_orthogonal_rejected() {
        let m = Matrix3::new(1.0, 0.3, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            matrix_to_quaternion(&m, 1e-6),
            Err(Error::QuaternionMismatch)
        );
    }
}
