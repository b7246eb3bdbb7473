use log::{debug, error};

use super::{remez::remez, AttitudeChannel, AttitudeModel};

use crate::{
    cfg::FilterConfig,
    prelude::{Error, Vector3},
    utils::try_with_capacity,
};

/// Reflects index `j` into [0, n): mirrored on the first sample at the start
/// (`-j`), across the edge at the end (`2n - j - 1`), repeatedly for kernels
/// longer than the signal.
fn reflect(j: isize, n: usize) -> usize {
    let n = n as isize;
    let mut j = j;
    loop {
        if j < 0 {
            j = -j;
        } else if j >= n {
            j = 2 * n - j - 1;
        } else {
            return j as usize;
        }
    }
}

/// Symmetric convolution of `input` with odd length `kernel`,
/// using reflective boundary extension.
fn convolve(input: &[Vector3<f64>], kernel: &[f64]) -> Result<Vec<Vector3<f64>>, Error> {
    let n = input.len();
    let half = (kernel.len() / 2) as isize;

    let mut output = try_with_capacity(n)?;

    for i in 0..n as isize {
        let value = kernel
            .iter()
            .enumerate()
            .fold(Vector3::zeros(), |acc, (k, h)| {
                acc + input[reflect(i + k as isize - half, n)] * *h
            });
        output.push(value);
    }

    Ok(output)
}

impl AttitudeModel {
    /// Designs the jitter separation (low pass) kernel for this sampling rate.
    /// Taps are normalized to unit sum (unit DC gain).
    pub fn low_pass_kernel(&self, cutoff_hz: f64, cfg: &FilterConfig) -> Result<Vec<f64>, Error> {
        let dt = self.checked_sample_time()?;

        let nyquist_hz = 0.5 / dt;
        let stop_hz = cfg.stop_band_ratio * cutoff_hz;

        if !(cutoff_hz > 0.0 && stop_hz < nyquist_hz) {
            error!(
                "low pass filter: cut-off {} Hz incompatible with {} Hz nyquist frequency",
                cutoff_hz, nyquist_hz
            );
            return Err(Error::InvalidCutoffFrequency(cutoff_hz));
        }

        let length = cfg.kernel_length(cutoff_hz, dt);

        let bands = [0.0, cutoff_hz * dt, stop_hz * dt, 0.5];
        let gains = [1.0, 0.0];
        let weights = [cfg.pass_band_weight, cfg.stop_band_weight];

        let mut taps = remez(
            length,
            &bands,
            &gains,
            &weights,
            cfg.grid_density,
            cfg.max_iterations,
        )?;

        let sum = taps.iter().sum::<f64>();
        if sum.abs() < f64::EPSILON {
            error!("low pass filter: null DC gain");
            return Err(Error::FilterDesign);
        }

        taps.iter_mut().for_each(|h| *h /= sum);

        debug!(
            "low pass filter: fc={} Hz, dt={} s, {} taps",
            cutoff_hz, dt, length
        );

        Ok(taps)
    }

    /// Low pass filters both attitude channels with a Remez FIR designed for
    /// `cutoff_hz`, returning the low frequency [AttitudeModel].
    /// Boundaries are handled by reflection, which makes the smoothing
    /// zero phase and edge aware.
    pub fn low_pass_filter(&self, cutoff_hz: f64, cfg: &FilterConfig) -> Result<Self, Error> {
        if self.records.is_empty() {
            error!("low pass filter: empty attitude sequence");
            return Err(Error::EmptySequence);
        }

        let kernel = self.low_pass_kernel(cutoff_hz, cfg)?;

        let mut low = self.copy()?;

        for channel in AttitudeChannel::ALL {
            let mut input = try_with_capacity(self.records.len())?;
            input.extend(self.records.iter().map(|r| *r.channel(channel)));

            let filtered = convolve(&input, &kernel)?;

            for (record, value) in low.records.iter_mut().zip(filtered) {
                *record.channel_mut(channel) = value;
            }
        }

        Ok(low)
    }

    /// Separates this [AttitudeModel] into its low frequency content and
    /// its high frequency (jitter) content: `self = low + high`.
    pub fn split_jitter(&self, cutoff_hz: f64, cfg: &FilterConfig) -> Result<(Self, Self), Error> {
        let low = self.low_pass_filter(cutoff_hz, cfg)?;
        let high = self.subtract(&low)?;
        Ok((low, high))
    }
}
