//! Spacecraft attitude sequences: interpolation, jitter separation
//! and bias transfer.
use log::error;

use crate::{
    averager::Averager,
    math::lagrange,
    prelude::{Error, ModelEpoch, Vector3},
    utils::try_copy,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod filter;
mod remez;

/// Attitude sample
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttitudeRecord {
    /// Sampling time, in seconds from the model epoch
    pub seconds_from_epoch: f64,
    /// Raw (telemetry) roll, pitch, yaw [rad]
    pub satellite_attitude: Vector3<f64>,
    /// Precision corrected roll, pitch, yaw [rad]
    pub precision_attitude: Vector3<f64>,
}

impl AttitudeRecord {
    /// Builds a new [AttitudeRecord] where both channels share the same attitude
    pub fn new(seconds_from_epoch: f64, rpy: Vector3<f64>) -> Self {
        Self {
            seconds_from_epoch,
            satellite_attitude: rpy,
            precision_attitude: rpy,
        }
    }

    /// Returns attitude of given [AttitudeChannel]
    pub fn channel(&self, channel: AttitudeChannel) -> &Vector3<f64> {
        match channel {
            AttitudeChannel::Satellite => &self.satellite_attitude,
            AttitudeChannel::Precision => &self.precision_attitude,
        }
    }

    fn channel_mut(&mut self, channel: AttitudeChannel) -> &mut Vector3<f64> {
        match channel {
            AttitudeChannel::Satellite => &mut self.satellite_attitude,
            AttitudeChannel::Precision => &mut self.precision_attitude,
        }
    }
}

/// Each [AttitudeRecord] carries two attitude channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttitudeChannel {
    /// Raw satellite attitude
    Satellite,
    /// Precision corrected attitude
    Precision,
}

impl AttitudeChannel {
    pub const ALL: [Self; 2] = [Self::Satellite, Self::Precision];
}

/// [AttitudeModel] is a time ordered, uniformly sampled, attitude sequence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttitudeModel {
    /// Reference epoch of all samples
    pub epoch: ModelEpoch,
    /// Nominal sampling period [s]. Must be > 0 to interpolate.
    pub nominal_sample_time: f64,
    /// Samples, uniformly spaced by [Self::nominal_sample_time]
    /// starting at the first sample time
    pub records: Vec<AttitudeRecord>,
}

impl AttitudeModel {
    /// Builds an empty [AttitudeModel]
    pub fn new(epoch: ModelEpoch, nominal_sample_time: f64) -> Self {
        Self {
            epoch,
            nominal_sample_time,
            records: Vec::new(),
        }
    }

    /// Builds [AttitudeModel] from existing samples
    pub fn from_records(
        epoch: ModelEpoch,
        nominal_sample_time: f64,
        records: Vec<AttitudeRecord>,
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

    /// Time of first sample, in seconds from epoch
    fn first_sample_time(&self) -> Result<f64, Error> {
        self.records
            .first()
            .map(|r| r.seconds_from_epoch)
            .ok_or(Error::EmptySequence)
    }

    fn checked_sample_time(&self) -> Result<f64, Error> {
        if self.nominal_sample_time > 0.0 {
            Ok(self.nominal_sample_time)
        } else {
            error!(
                "attitude model: invalid nominal sample time {}",
                self.nominal_sample_time
            );
            Err(Error::InvalidSampleTime(self.nominal_sample_time))
        }
    }

    /// Deep copy, reporting allocation failure.
    pub fn copy(&self) -> Result<Self, Error> {
        Ok(Self {
            epoch: self.epoch,
            nominal_sample_time: self.nominal_sample_time,
            records: try_copy(&self.records)?,
        })
    }

    /// Returns `self - rhs`, sample per sample, on both channels.
    /// `rhs` must have at least as many samples as `self`.
    pub fn subtract(&self, rhs: &Self) -> Result<Self, Error> {
        if rhs.sample_count() < self.sample_count() {
            error!(
                "attitude subtraction: {} samples cannot be subtracted from {} samples",
                rhs.sample_count(),
                self.sample_count()
            );
            return Err(Error::SequenceLength(self.sample_count(), rhs.sample_count()));
        }

        let mut out = self.copy()?;

        for (out, rhs) in out.records.iter_mut().zip(rhs.records.iter()) {
            out.satellite_attitude -= rhs.satellite_attitude;
            out.precision_attitude -= rhs.precision_attitude;
        }

        Ok(out)
    }

    /// Linear interpolation of requested [AttitudeChannel] at `t` seconds from epoch.
    /// Time outside the sampled span is an error, it is never clamped.
    pub fn interpolate_attitude_at_time(
        &self,
        t: f64,
        channel: AttitudeChannel,
    ) -> Result<Vector3<f64>, Error> {
        let dt = self.checked_sample_time()?;
        let t0 = self.first_sample_time()?;

        let offset = (t - t0) / dt;
        let lower = offset.floor();

        if lower < 0.0 || lower + 1.0 > (self.sample_count() - 1) as f64 {
            error!(
                "attitude interpolation: t={} out of [{}, {}[",
                t,
                t0,
                t0 + (self.sample_count() - 1) as f64 * dt
            );
            return Err(Error::TimeOutOfRange(t));
        }

        let index = lower as usize;
        let w = offset - lower;

        let lhs = self.records[index].channel(channel);
        let rhs = self.records[index + 1].channel(channel);

        Ok(lhs * (1.0 - w) + rhs * w)
    }

    /// Cubic (4 point Lagrange) interpolation of the precision attitude at `t`
    /// seconds from epoch, using the two samples on each side of `t`.
    pub fn jitter_interpolate(&self, t: f64) -> Result<Vector3<f64>, Error> {
        let dt = self.checked_sample_time()?;
        let t0 = self.first_sample_time()?;

        let start = ((t - t0) / dt).floor() as isize - 1;

        if start < 0 || start as usize + 3 >= self.sample_count() {
            error!(
                "jitter interpolation: not enough samples around t={} ({} samples)",
                t,
                self.sample_count()
            );
            return Err(Error::NotEnoughSamples(t));
        }

        let window = &self.records[start as usize..start as usize + 4];

        let times = [
            window[0].seconds_from_epoch,
            window[1].seconds_from_epoch,
            window[2].seconds_from_epoch,
            window[3].seconds_from_epoch,
        ];

        let values = [
            window[0].precision_attitude,
            window[1].precision_attitude,
            window[2].precision_attitude,
            window[3].precision_attitude,
        ];

        Ok(lagrange(&times, &values, t))
    }

    /// Moves the mean attitude of `self` over [t_start, t_stop] (seconds from epoch)
    /// into `to`: the mean is removed from every sample of `self` and added
    /// to every sample of `to`, on both channels.
    ///
    /// This restores into the low frequency sequence any DC component
    /// that the jitter separation left in the high frequency sequence.
    pub fn transfer_bias(&mut self, to: &mut Self, t_start: f64, t_stop: f64) -> Result<(), Error> {
        if self.records.is_empty() || to.records.is_empty() {
            error!("bias transfer: empty attitude sequence");
            return Err(Error::EmptySequence);
        }

        let dt = self.checked_sample_time()?;
        let t0 = self.first_sample_time()?;

        let last = (self.sample_count() - 1) as f64;
        let start = ((t_start - t0) / dt).ceil().max(0.0);
        let stop = ((t_stop - t0) / dt).floor().min(last);

        if start > stop {
            error!(
                "bias transfer: empty window [{}, {}] (indices {}..={})",
                t_start, t_stop, start, stop
            );
            return Err(Error::InvalidBiasWindow(t_start, t_stop));
        }

        let window = &self.records[start as usize..=stop as usize];

        let mut satellite = Averager::new();
        let mut precision = Averager::new();

        for record in window {
            satellite.add(&record.satellite_attitude);
            precision.add(&record.precision_attitude);
        }

        for record in self.records.iter_mut() {
            record.satellite_attitude -= satellite.mean;
            record.precision_attitude -= precision.mean;
        }

        for record in to.records.iter_mut() {
            record.satellite_attitude += satellite.mean;
            record.precision_attitude += precision.mean;
        }

        Ok(())
    }
}
