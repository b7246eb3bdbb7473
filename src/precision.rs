//! Precision (ground control derived) attitude and ephemeris corrections.
use crate::{
    attitude::AttitudeModel,
    math::{horner, matrix_to_rpy, rpy_to_matrix},
    prelude::{ModelEpoch, Vector3},
    time::seconds_between,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [PrecisionModel] describes time varying corrections
/// as power series in time elapsed since a reference time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionModel {
    /// Reference time, in seconds from the image epoch
    pub seconds_from_image_epoch: f64,
    /// Ephemeris polynomial order
    pub ephemeris_order: usize,
    /// Ephemeris X correction coefficients [m, m/s, ..]
    pub x_corr: Vec<f64>,
    /// Ephemeris Y correction coefficients [m, m/s, ..]
    pub y_corr: Vec<f64>,
    /// Ephemeris Z correction coefficients [m, m/s, ..]
    pub z_corr: Vec<f64>,
    /// Attitude polynomial order
    pub attitude_order: usize,
    /// Roll correction coefficients [rad, rad/s, ..]
    pub roll_corr: Vec<f64>,
    /// Pitch correction coefficients [rad, rad/s, ..]
    pub pitch_corr: Vec<f64>,
    /// Yaw correction coefficients [rad, rad/s, ..]
    pub yaw_corr: Vec<f64>,
}

/// Coefficients up to (and including) requested order
fn up_to_order(coefficients: &[f64], order: usize) -> &[f64] {
    &coefficients[..coefficients.len().min(order + 1)]
}

impl PrecisionModel {
    /// Seconds elapsed between the reference time and a sample time
    /// expressed as `seconds` from `epoch`.
    pub fn seconds_from_reference(
        &self,
        image_epoch: &ModelEpoch,
        epoch: &ModelEpoch,
        seconds: f64,
    ) -> f64 {
        seconds_between(epoch, image_epoch) + seconds - self.seconds_from_image_epoch
    }

    /// Attitude correction (roll, pitch, yaw) [rad], `dt` seconds after the reference time
    pub fn attitude_correction(&self, dt: f64) -> Vector3<f64> {
        Vector3::new(
            horner(up_to_order(&self.roll_corr, self.attitude_order), dt),
            horner(up_to_order(&self.pitch_corr, self.attitude_order), dt),
            horner(up_to_order(&self.yaw_corr, self.attitude_order), dt),
        )
    }

    /// Ephemeris correction (x, y, z) [m], `dt` seconds after the reference time
    pub fn ephemeris_correction(&self, dt: f64) -> Vector3<f64> {
        Vector3::new(
            horner(up_to_order(&self.x_corr, self.ephemeris_order), dt),
            horner(up_to_order(&self.y_corr, self.ephemeris_order), dt),
            horner(up_to_order(&self.z_corr, self.ephemeris_order), dt),
        )
    }
}

/// Updates (in place) the precision attitude of every sample:
/// the precision correction rotation is composed after the raw attitude
/// rotation, then converted back to roll, pitch and yaw.
///
/// The precision reference time is expressed in seconds from `image_epoch`.
pub fn apply_precision_correction(
    image_epoch: &ModelEpoch,
    precision: &PrecisionModel,
    attitude: &mut AttitudeModel,
) {
    let offset_s = precision.seconds_from_reference(image_epoch, &attitude.epoch, 0.0);

    for record in attitude.records.iter_mut() {
        let dt = offset_s + record.seconds_from_epoch;

        let correction = rpy_to_matrix(&precision.attitude_correction(dt));
        let raw = rpy_to_matrix(&record.satellite_attitude);

        record.precision_attitude = matrix_to_rpy(&(correction * raw));
    }
}
