#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_pass_band_weight() -> f64 {
    1.0
}

fn default_stop_band_weight() -> f64 {
    10.0
}

fn default_stop_band_ratio() -> f64 {
    1.5
}

fn default_length_factor() -> usize {
    3
}

fn default_grid_density() -> usize {
    16
}

fn default_max_iterations() -> usize {
    40
}

/// Jitter (low pass) filter design parameters.
///
/// The default weighting and length factor give adequate stop band
/// rejection for attitude jitter separation. They are exposed here
/// rather than hard coded so that other sensors can be tuned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterConfig {
    /// Pass band error weight
    #[cfg_attr(feature = "serde", serde(default = "default_pass_band_weight"))]
    pub pass_band_weight: f64,
    /// Stop band error weight
    #[cfg_attr(feature = "serde", serde(default = "default_stop_band_weight"))]
    pub stop_band_weight: f64,
    /// Stop band starts at this multiple of the cut-off frequency
    #[cfg_attr(feature = "serde", serde(default = "default_stop_band_ratio"))]
    pub stop_band_ratio: f64,
    /// Kernel length is `length_factor * floor(1 / (fc * dt)) + 1`, forced odd
    #[cfg_attr(feature = "serde", serde(default = "default_length_factor"))]
    pub length_factor: usize,
    /// Remez dense grid density
    #[cfg_attr(feature = "serde", serde(default = "default_grid_density"))]
    pub grid_density: usize,
    /// Maximal number of Remez exchange iterations
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            pass_band_weight: default_pass_band_weight(),
            stop_band_weight: default_stop_band_weight(),
            stop_band_ratio: default_stop_band_ratio(),
            length_factor: default_length_factor(),
            grid_density: default_grid_density(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl FilterConfig {
    /// Kernel length for given cut-off frequency [Hz] and sampling period [s].
    pub(crate) fn kernel_length(&self, cutoff_hz: f64, sample_time_s: f64) -> usize {
        let cycles = (1.0 / (cutoff_hz * sample_time_s)).floor() as usize;
        let length = self.length_factor * cycles + 1;
        if length % 2 == 0 {
            length + 1
        } else {
            length
        }
    }
}
