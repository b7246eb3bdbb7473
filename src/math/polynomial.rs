use num_traits::Float;

use crate::prelude::Vector3;

/// Evaluates `c[0] + c[1] x + .. + c[n] x^n` using Horner's method.
/// An empty coefficient set evaluates to zero.
pub fn horner<T: Float>(coefficients: &[T], x: T) -> T {
    coefficients
        .iter()
        .rev()
        .fold(T::zero(), |acc, c| acc * x + *c)
}

/// Evaluates `sum c[k] P_k(x)` where `P_k` is the Legendre polynomial
/// of degree k, using the Bonnet recurrence.
pub fn legendre(coefficients: &[f64], x: f64) -> f64 {
    let (mut p_prev, mut p) = (1.0, x);
    let mut sum = 0.0;

    for (k, c) in coefficients.iter().enumerate() {
        match k {
            0 => sum += c,
            1 => sum += c * x,
            _ => {
                let kf = k as f64;
                let next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
                p_prev = p;
                p = next;
                sum += c * p;
            },
        }
    }

    sum
}

/// Lagrange interpolation of `values` sampled at `times`, evaluated at `t`.
/// Both slices must have the same length.
pub fn lagrange(times: &[f64], values: &[Vector3<f64>], t: f64) -> Vector3<f64> {
    debug_assert_eq!(times.len(), values.len());

    let mut out = Vector3::zeros();

    for (i, (t_i, v_i)) in times.iter().zip(values.iter()).enumerate() {
        let weight = times
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold(1.0, |w, (_, t_j)| w * (t - t_j) / (t_i - t_j));

        out += v_i * weight;
    }

    out
}
