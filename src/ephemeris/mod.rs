//! Spacecraft ephemeris sequences.
use log::error;

use crate::{
    math::lagrange,
    prelude::{Error, ModelEpoch, Vector3},
    utils::try_copy,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ephemeris sample
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EphemerisRecord {
    /// Sampling time, in seconds from the model epoch
    pub seconds_from_epoch: f64,
    /// Inertial (ECI) position [m]
    pub eci_position: Vector3<f64>,
    /// Inertial (ECI) velocity [m/s]
    pub eci_velocity: Vector3<f64>,
    /// Earth fixed (ECEF) position [m]
    pub ecef_position: Vector3<f64>,
    /// Earth fixed (ECEF) velocity [m/s]
    pub ecef_velocity: Vector3<f64>,
}

/// Reference frame of an ephemeris state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EphemerisFrame {
    /// Earth Centered Inertial
    Eci,
    /// Earth Centered Earth Fixed
    Ecef,
}

/// Interpolated spacecraft state
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct EphemerisState {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
}

/// [EphemerisModel] is a time ordered, uniformly sampled, spacecraft trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EphemerisModel {
    /// Reference epoch of all samples
    pub epoch: ModelEpoch,
    /// Nominal sampling period [s]
    pub nominal_sample_time: f64,
    /// Samples
    pub records: Vec<EphemerisRecord>,
}

/// Points used by the Lagrange interpolation
const INTERPOLATION_POINTS: usize = 4;

impl EphemerisModel {
    /// Builds [EphemerisModel] from existing samples
    pub fn from_records(
        epoch: ModelEpoch,
        nominal_sample_time: f64,
        records: Vec<EphemerisRecord>,
    ) -> Self {
        Self {
            epoch,
            nominal_sample_time,
            records,
        }
    }

    /// Number of samples
    pub fn sample_count(&self) -> usize {
        self.records.len()
    }

    /// Deep copy, reporting allocation failure.
    pub fn copy(&self) -> Result<Self, Error> {
        Ok(Self {
            epoch: self.epoch,
            nominal_sample_time: self.nominal_sample_time,
            records: try_copy(&self.records)?,
        })
    }

    /// Interpolates the spacecraft state at `t` seconds from epoch, in requested frame.
    /// Uses up to 4 samples surrounding `t` (Lagrange), which degrades to
    /// linear interpolation on 2 sample sequences.
    pub fn state_at(&self, t: f64, frame: EphemerisFrame) -> Result<EphemerisState, Error> {
        if self.nominal_sample_time <= 0.0 {
            error!(
                "ephemeris model: invalid nominal sample time {}",
                self.nominal_sample_time
            );
            return Err(Error::InvalidSampleTime(self.nominal_sample_time));
        }

        let n = self.sample_count();
        let t0 = match self.records.first() {
            Some(first) if n > 1 => first.seconds_from_epoch,
            _ => {
                error!("ephemeris interpolation: {} samples", n);
                return Err(Error::NotEnoughSamples(t));
            },
        };

        let offset = (t - t0) / self.nominal_sample_time;

        if offset < 0.0 || offset > (n - 1) as f64 {
            error!("ephemeris interpolation: t={} out of sampled span", t);
            return Err(Error::TimeOutOfRange(t));
        }

        let points = INTERPOLATION_POINTS.min(n);
        let start = (offset.floor() as usize)
            .saturating_sub(points / 2 - 1)
            .min(n - points);

        let window = &self.records[start..start + points];

        let times = window
            .iter()
            .map(|r| r.seconds_from_epoch)
            .collect::<Vec<_>>();

        let (positions, velocities): (Vec<_>, Vec<_>) = window
            .iter()
            .map(|r| match frame {
                EphemerisFrame::Eci => (r.eci_position, r.eci_velocity),
                EphemerisFrame::Ecef => (r.ecef_position, r.ecef_velocity),
            })
            .unzip();

        Ok(EphemerisState {
            position: lagrange(&times, &positions, t),
            velocity: lagrange(&times, &velocities, t),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{EphemerisFrame, EphemerisModel, EphemerisRecord};
    use crate::prelude::{Error, ModelEpoch, Vector3};

    /// Constant acceleration trajectory: exactly interpolated with 3+ points
    fn trajectory(n: usize) -> EphemerisModel {
        let records = (0..n)
            .map(|i| {
                let t = 10.0 + i as f64 * 2.0;
                EphemerisRecord {
                    seconds_from_epoch: t,
                    eci_position: Vector3::new(7.0E6 + 10.0 * t + 0.5 * t * t, -t, 1.0),
                    eci_velocity: Vector3::new(10.0 + t, -1.0, 0.0),
                    ecef_position: Vector3::new(1.0, 2.0 * t, 3.0),
                    ecef_velocity: Vector3::new(0.0, 2.0, 0.0),
                }
            })
            .collect();
        EphemerisModel::from_records(ModelEpoch::default(), 2.0, records)
    }

    #[test]
    fn interpolation() {
        let model = trajectory(8);
        for t in [10.0, 11.0, 13.5, 20.0, 23.9, 24.0] {
            let state = model.state_at(t, EphemerisFrame::Eci).unwrap();
            let expected = Vector3::new(7.0E6 + 10.0 * t + 0.5 * t * t, -t, 1.0);
            assert!((state.position - expected).norm() < 1e-6, "t={}", t);
            assert!((state.velocity[0] - (10.0 + t)).abs() < 1e-9);

            let state = model.state_at(t, EphemerisFrame::Ecef).unwrap();
            assert!((state.position[1] - 2.0 * t).abs() < 1e-9);
        }
    }

    #[test]
    fn linear_interpolation() {
        let model = trajectory(2);
        let state = model.state_at(11.0, EphemerisFrame::Ecef).unwrap();
        assert!((state.position - Vector3::new(1.0, 22.0, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn out_of_span() {
        let model = trajectory(4);
        assert_eq!(
            model.state_at(9.0, EphemerisFrame::Eci),
            Err(Error::TimeOutOfRange(9.0))
        );
        assert_eq!(
            model.state_at(16.5, EphemerisFrame::Eci),
            Err(Error::TimeOutOfRange(16.5))
        );
        assert_eq!(
            trajectory(1).state_at(10.0, EphemerisFrame::Eci),
            Err(Error::NotEnoughSamples(10.0))
        );
    }

    #[test]
    fn deep_copy() {
        let model = trajectory(3);
        let mut copy = model.copy().unwrap();
        assert_eq!(copy, model);
        copy.records[0].eci_position[0] = 0.0;
        assert_ne!(copy, model);
    }
}
