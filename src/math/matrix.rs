use log::error;

use crate::{
    constants::SINGULAR_DETERMINANT,
    error::Error,
    prelude::{Matrix3, Vector3},
};

/// Storage order of a dense matrix handed to [qr_factorize]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixLayout {
    /// Element (i, j) stored at `j * m + i`
    ColumnMajor,
    /// Element (i, j) stored at `i * n + j`
    RowMajor,
}

/// Inverts a 3x3 matrix by cofactor expansion.
/// Fails when |det| <= 1E-9.
pub fn invert3x3(m: &Matrix3<f64>) -> Result<Matrix3<f64>, Error> {
    let c00 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let c01 = m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)];
    let c02 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];

    let det = m[(0, 0)] * c00 + m[(0, 1)] * c01 + m[(0, 2)] * c02;

    if det.abs() <= SINGULAR_DETERMINANT {
        error!("3x3 inversion: determinant {:e} is too small", det);
        return Err(Error::SingularMatrix);
    }

    // transposed cofactors
    let adj = Matrix3::new(
        c00,
        m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)],
        m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
        c01,
        m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
        m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)],
        c02,
        m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)],
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
    );

    Ok(adj / det)
}

/// Transposes a dense `rows x cols` row-major buffer in place,
/// by following the permutation cycles.
fn transpose_in_place(a: &mut [f64], rows: usize, cols: usize) {
    let size = rows * cols;
    if size < 2 {
        return;
    }

    let mut visited = vec![false; size];

    for start in 0..size {
        if visited[start] {
            continue;
        }

        let mut current = start;
        let mut carried = a[start];

        loop {
            // (i, j) at i * cols + j moves to j * rows + i
            let (i, j) = (current / cols, current % cols);
            let target = j * rows + i;

            std::mem::swap(&mut a[target], &mut carried);
            visited[current] = true;

            current = target;
            if current == start {
                break;
            }
        }
    }
}

/// Householder QR factorization (Golub & Van Loan, no pivoting),
/// performed in place.
///
/// On return, R is stored on and above the diagonal of `a` and the
/// essential part of each Householder vector `v_j` (whose first
/// component is 1) is stored below the diagonal, in the same
/// [MatrixLayout] as the input.
///
/// Returns the Householder scalars `beta_j = 2 / v_j^T v_j`, so that
/// `Q = H_0 H_1 .. H_{n-1}` with `H_j = I - beta_j v_j v_j^T`.
/// This only factors the system, solving is up to the caller.
pub fn qr_factorize(
    a: &mut [f64],
    m: usize,
    n: usize,
    layout: MatrixLayout,
) -> Result<Vec<f64>, Error> {
    if m == 0 || n == 0 || m < n || a.len() != m * n {
        error!("qr factorization: invalid {}x{} system", m, n);
        return Err(Error::MatrixDimension(m, n));
    }

    if layout == MatrixLayout::RowMajor {
        transpose_in_place(a, m, n);
    }

    let mut betas = Vec::with_capacity(n);
    let mut v = vec![0.0_f64; m];

    for j in 0..n {
        let col = j * m;
        let len = m - j;

        let norm = (0..len).map(|i| a[col + j + i].powi(2)).sum::<f64>().sqrt();

        v[0] = 1.0;

        // vanishing column: v = e_0, vtv = 1
        let vtv = if norm > f64::EPSILON {
            let pivot = a[col + j];
            let b = pivot + pivot.signum() * norm;
            for (vi, aij) in v[1..len].iter_mut().zip(&a[col + j + 1..col + m]) {
                *vi = aij / b;
            }
            v[..len].iter().map(|vi| vi * vi).sum::<f64>()
        } else {
            v[1..len].fill(0.0);
            1.0
        };

        let beta = 2.0 / vtv;

        // A(j:m, j:n) = (I - beta v v^T) A(j:m, j:n)
        for k in j..n {
            let colk = k * m;
            let w = (0..len).map(|i| v[i] * a[colk + j + i]).sum::<f64>();
            for i in 0..len {
                a[colk + j + i] -= beta * w * v[i];
            }
        }

        for i in 1..len {
            a[col + j + i] = v[i];
        }

        betas.push(beta);
    }

    if layout == MatrixLayout::RowMajor {
        transpose_in_place(a, n, m);
    }

    Ok(betas)
}

/// Attitude matrix `Rz(yaw) Ry(pitch) Rx(roll)`
pub fn rpy_to_matrix(rpy: &Vector3<f64>) -> Matrix3<f64> {
    let (sr, cr) = rpy[0].sin_cos();
    let (sp, cp) = rpy[1].sin_cos();
    let (sy, cy) = rpy[2].sin_cos();

    Matrix3::new(
        cp * cy,
        sr * sp * cy - cr * sy,
        cr * sp * cy + sr * sy,
        cp * sy,
        sr * sp * sy + cr * cy,
        cr * sp * sy - sr * cy,
        -sp,
        sr * cp,
        cr * cp,
    )
}

/// Extracts (roll, pitch, yaw) from an attitude matrix built like [rpy_to_matrix].
pub fn matrix_to_rpy(m: &Matrix3<f64>) -> Vector3<f64> {
    let yaw = m[(1, 0)].atan2(m[(0, 0)]);
    let pitch = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();
    let roll = m[(2, 1)].atan2(m[(2, 2)]);
    Vector3::new(roll, pitch, yaw)
}
