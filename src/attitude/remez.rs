//! Parks-McClellan (Remez exchange) design of odd length,
//! linear phase, multi band FIR filters.
use itertools::Itertools;
use log::{debug, error, warn};
use std::f64::consts::TAU;

use crate::error::Error;

/// Dense frequency grid the error function is evaluated on
struct DenseGrid {
    /// Normalized frequency (cycles per sample)
    freq: Vec<f64>,
    /// Desired response
    desired: Vec<f64>,
    /// Error weight
    weight: Vec<f64>,
}

impl DenseGrid {
    fn new(r: usize, bands: &[f64], desired: &[f64], weights: &[f64], density: usize) -> Self {
        let delf = 0.5 / (density * r) as f64;

        let mut grid = Self {
            freq: Vec::new(),
            desired: Vec::new(),
            weight: Vec::new(),
        };

        for (band, edges) in bands.chunks_exact(2).enumerate() {
            let (lowf, highf) = (edges[0], edges[1]);
            let points = (((highf - lowf) / delf + 0.5) as usize).max(1);

            for i in 0..points {
                grid.freq.push(lowf + i as f64 * delf);
                grid.desired.push(desired[band]);
                grid.weight.push(weights[band]);
            }

            // always terminate the band on its upper edge
            if let Some(last) = grid.freq.last_mut() {
                *last = highf;
            }
        }

        grid
    }

    fn len(&self) -> usize {
        self.freq.len()
    }
}

/// Barycentric Lagrange form of the current best approximation
struct Approximation {
    /// cos(2 pi f) at the extremal frequencies
    x: Vec<f64>,
    /// Approximation values at the extremal frequencies
    y: Vec<f64>,
    /// Barycentric weights
    ad: Vec<f64>,
}

impl Approximation {
    fn new(extremals: &[usize], grid: &DenseGrid) -> Self {
        let r = extremals.len() - 1;

        let x = extremals
            .iter()
            .map(|e| (TAU * grid.freq[*e]).cos())
            .collect::<Vec<_>>();

        let ld = (r - 1) / 15 + 1;

        let ad = (0..=r)
            .map(|i| {
                let mut denom = 1.0_f64;
                for j in 0..ld {
                    for k in (j..=r).step_by(ld) {
                        if k != i {
                            denom *= 2.0 * (x[i] - x[k]);
                        }
                    }
                }
                if denom.abs() < 1.0E-5 {
                    denom = 1.0E-5;
                }
                1.0 / denom
            })
            .collect::<Vec<_>>();

        let (mut numer, mut denom, mut sign) = (0.0, 0.0, 1.0);
        for (i, e) in extremals.iter().enumerate() {
            numer += ad[i] * grid.desired[*e];
            denom += sign * ad[i] / grid.weight[*e];
            sign = -sign;
        }

        let delta = numer / denom;

        let mut sign = 1.0;
        let y = extremals
            .iter()
            .map(|e| {
                let y = grid.desired[*e] - sign * delta / grid.weight[*e];
                sign = -sign;
                y
            })
            .collect();

        Self { x, y, ad }
    }

    /// Amplitude response at normalized frequency `freq`
    fn response(&self, freq: f64) -> f64 {
        let xc = (TAU * freq).cos();
        let (mut numer, mut denom) = (0.0, 0.0);

        for ((x, y), ad) in self.x.iter().zip(self.y.iter()).zip(self.ad.iter()) {
            let c = xc - x;
            if c.abs() < 1.0E-7 {
                return *y;
            }
            let c = ad / c;
            denom += c;
            numer += c * y;
        }

        numer / denom
    }
}

/// Locates the `r + 1` alternating extrema of the weighted error.
fn search(r: usize, err: &[f64]) -> Result<Vec<usize>, Error> {
    let n = err.len();
    let mut found = Vec::with_capacity(2 * r);

    if (err[0] > 0.0 && err[0] > err[1]) || (err[0] < 0.0 && err[0] < err[1]) {
        found.push(0);
    }

    for i in 1..n - 1 {
        if (err[i] >= err[i - 1] && err[i] > err[i + 1] && err[i] > 0.0)
            || (err[i] <= err[i - 1] && err[i] < err[i + 1] && err[i] < 0.0)
        {
            found.push(i);
        }
    }

    let j = n - 1;
    if (err[j] > 0.0 && err[j] > err[j - 1]) || (err[j] < 0.0 && err[j] < err[j - 1]) {
        found.push(j);
    }

    // drop superfluous extrema: smallest of the first non alternating pair,
    // or smallest of both ends when a single one is in excess
    while found.len() > r + 1 {
        let mut up = err[found[0]] > 0.0;
        let mut smallest = 0;
        let mut alternating = true;

        for j in 1..found.len() {
            if err[found[j]].abs() < err[found[smallest]].abs() {
                smallest = j;
            }
            if up && err[found[j]] < 0.0 {
                up = false;
            } else if !up && err[found[j]] > 0.0 {
                up = true;
            } else {
                alternating = false;
                break;
            }
        }

        if alternating && found.len() == r + 2 {
            let last = found.len() - 1;
            smallest = if err[found[last]].abs() < err[found[0]].abs() {
                last
            } else {
                0
            };
        }

        found.remove(smallest);
    }

    if found.len() < r + 1 {
        error!(
            "remez: {} extremal frequencies found, {} required",
            found.len(),
            r + 1
        );
        return Err(Error::FilterDesign);
    }

    Ok(found)
}

fn converged(extremals: &[usize], err: &[f64]) -> bool {
    let (min, max) = extremals
        .iter()
        .map(|e| err[*e].abs())
        .fold((f64::MAX, 0.0_f64), |(min, max), e| (min.min(e), max.max(e)));

    max == 0.0 || (max - min) / max < 1.0E-4
}

/// Impulse response of an odd length symmetric filter
/// from its amplitude response sampled at `k / numtaps`.
fn frequency_sample(numtaps: usize, amplitudes: &[f64]) -> Vec<f64> {
    let m = (numtaps - 1) / 2;
    let center = m as f64;
    let n = numtaps as f64;

    (0..numtaps)
        .map(|i| {
            let x = TAU * (i as f64 - center) / n;
            let val = amplitudes[0]
                + (1..=m)
                    .map(|k| 2.0 * amplitudes[k] * (x * k as f64).cos())
                    .sum::<f64>();
            val / n
        })
        .collect()
}

/// Designs an odd length, linear phase FIR filter with the Remez exchange algorithm.
///
/// - `bands`: band edges pairs, as normalized frequencies in [0, 0.5]
/// - `desired`: desired gain, per band
/// - `weights`: error weight, per band
pub(crate) fn remez(
    numtaps: usize,
    bands: &[f64],
    desired: &[f64],
    weights: &[f64],
    grid_density: usize,
    max_iterations: usize,
) -> Result<Vec<f64>, Error> {
    if numtaps < 3
        || numtaps % 2 == 0
        || grid_density == 0
        || bands.len() != 2 * desired.len()
        || desired.len() != weights.len()
        || bands.iter().tuple_windows().any(|(lhs, rhs)| rhs < lhs)
        || bands.iter().any(|f| !(0.0..=0.5).contains(f))
    {
        error!(
            "remez: invalid design request ({} taps, bands={:?})",
            numtaps, bands
        );
        return Err(Error::FilterDesign);
    }

    let r = numtaps / 2 + 1;

    let grid = DenseGrid::new(r, bands, desired, weights, grid_density);
    let gridsize = grid.len();

    if gridsize < r + 1 {
        error!("remez: grid is too coarse ({} points)", gridsize);
        return Err(Error::FilterDesign);
    }

    let mut extremals = (0..=r).map(|i| i * (gridsize - 1) / r).collect::<Vec<_>>();
    let mut err = vec![0.0_f64; gridsize];

    let mut iterations = 0;
    let mut done = false;

    while iterations < max_iterations && !done {
        let approx = Approximation::new(&extremals, &grid);

        for (i, e) in err.iter_mut().enumerate() {
            *e = grid.weight[i] * (grid.desired[i] - approx.response(grid.freq[i]));
        }

        extremals = search(r, &err)?;
        done = converged(&extremals, &err);
        iterations += 1;
    }

    if done {
        debug!("remez: {} taps converged in {} iterations", numtaps, iterations);
    } else {
        warn!(
            "remez: {} taps did not converge within {} iterations",
            numtaps, max_iterations
        );
    }

    let approx = Approximation::new(&extremals, &grid);

    let amplitudes = (0..=numtaps / 2)
        .map(|i| approx.response(i as f64 / numtaps as f64))
        .collect::<Vec<_>>();

    Ok(frequency_sample(numtaps, &amplitudes))
}

#[cfg(test)]
mod test {
    use super::{frequency_sample, remez};
    use crate::prelude::Error;
    use std::f64::consts::TAU;

    /// Amplitude response of a symmetric filter
    fn amplitude(taps: &[f64], freq: f64) -> f64 {
        let center = (taps.len() - 1) as f64 / 2.0;
        taps.iter()
            .enumerate()
            .map(|(n, h)| h * (TAU * freq * (n as f64 - center)).cos())
            .sum()
    }

    #[test]
    fn frequency_sampling_impulse() {
        // flat amplitude response is a unit impulse
        let taps = frequency_sample(5, &[1.0, 1.0, 1.0]);
        for (i, h) in taps.iter().enumerate() {
            let expected = if i == 2 { 1.0 } else { 0.0 };
            assert!((h - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn low_pass_design() {
        let taps = remez(31, &[0.0, 0.1, 0.15, 0.5], &[1.0, 0.0], &[1.0, 10.0], 16, 40).unwrap();
        assert_eq!(taps.len(), 31);

        // linear phase
        for i in 0..15 {
            assert!((taps[i] - taps[30 - i]).abs() < 1e-12);
        }

        // pass band close to 1, stop band close to 0
        for f in [0.0, 0.02, 0.05, 0.08] {
            assert!((amplitude(&taps, f) - 1.0).abs() < 0.15, "pass band f={}", f);
        }
        for f in [0.2, 0.3, 0.45] {
            assert!(amplitude(&taps, f).abs() < 0.03, "stop band f={}", f);
        }
    }

    #[test]
    fn invalid_designs() {
        let bands = [0.0, 0.1, 0.15, 0.5];
        assert_eq!(
            remez(30, &bands, &[1.0, 0.0], &[1.0, 10.0], 16, 40),
            Err(Error::FilterDesign)
        );
        assert_eq!(
            remez(31, &[0.0, 0.1, 0.15, 0.6], &[1.0, 0.0], &[1.0, 10.0], 16, 40),
            Err(Error::FilterDesign)
        );
        assert_eq!(
            remez(31, &bands, &[1.0], &[1.0], 16, 40),
            Err(Error::FilterDesign)
        );
    }
}
