use log::error;

use crate::{
    attitude::AttitudeModel,
    prelude::{Error, Matrix3, ModelEpoch, SensorId, Vector3},
    utils::try_with_capacity,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// High frequency attitude (jitter) resampled at sub frame resolution
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JitterTable {
    /// Entries per sensor frame
    pub entries_per_frame: usize,
    /// Roll, pitch, yaw jitter [rad], frame major
    pub entries: Vec<Vector3<f64>>,
}

impl JitterTable {
    /// Resamples the `jitter` sequence `entries_per_frame` times per frame,
    /// starting at each of the `frame_times` and spaced by
    /// `frame_period / entries_per_frame`.
    /// Frame times and jitter samples share the same time reference.
    pub fn build(
        jitter: &AttitudeModel,
        frame_times: &[f64],
        entries_per_frame: usize,
        frame_period: f64,
    ) -> Result<Self, Error> {
        if entries_per_frame == 0 {
            error!("jitter table: null entries per frame");
            return Err(Error::EmptySequence);
        }

        let total = frame_times
            .len()
            .checked_mul(entries_per_frame)
            .ok_or(Error::Allocation)?;

        let mut entries = try_with_capacity(total)?;
        let step = frame_period / entries_per_frame as f64;

        for t_frame in frame_times {
            for k in 0..entries_per_frame {
                entries.push(jitter.jitter_interpolate(t_frame + k as f64 * step)?);
            }
        }

        Ok(Self {
            entries_per_frame,
            entries,
        })
    }

    /// Jitter at `entry` within given `frame`
    pub fn entry(&self, frame: usize, entry: usize) -> Option<&Vector3<f64>> {
        if entry < self.entries_per_frame {
            self.entries.get(frame * self.entries_per_frame + entry)
        } else {
            None
        }
    }
}

/// Scan mirror sample
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SsmRecord {
    /// Sampling time, in seconds from the [SsmModel] epoch
    pub seconds_from_epoch: f64,
    /// Mirror angle [rad]
    pub mirror_angle: f64,
}

/// Scene select mirror model of the thermal sensor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SsmModel {
    /// Reference epoch of all samples
    pub epoch: ModelEpoch,
    /// Mirror to sensor alignment
    pub alignment: Matrix3<f64>,
    /// Time ordered mirror samples
    pub records: Vec<SsmRecord>,
}

impl Default for SsmModel {
    fn default() -> Self {
        Self {
            epoch: ModelEpoch::default(),
            alignment: Matrix3::identity(),
            records: Vec::new(),
        }
    }
}

impl SsmModel {
    /// Mirror angle at `t` seconds from epoch, linearly interpolated.
    pub fn mirror_angle_at(&self, t: f64) -> Result<f64, Error> {
        let (first, last) = match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                error!("ssm model: no mirror sample");
                return Err(Error::EmptySequence);
            },
        };

        if t < first.seconds_from_epoch || t > last.seconds_from_epoch {
            error!("ssm model: t={} out of sampled span", t);
            return Err(Error::TimeOutOfRange(t));
        }

        let upper = self
            .records
            .partition_point(|r| r.seconds_from_epoch < t)
            .max(1)
            .min(self.records.len() - 1);

        if upper == 0 {
            // single sample
            return Ok(first.mirror_angle);
        }

        let (lhs, rhs) = (&self.records[upper - 1], &self.records[upper]);
        let span = rhs.seconds_from_epoch - lhs.seconds_from_epoch;

        if span <= 0.0 {
            return Ok(lhs.mirror_angle);
        }

        let w = (t - lhs.seconds_from_epoch) / span;
        Ok(lhs.mirror_angle * (1.0 - w) + rhs.mirror_angle * w)
    }
}

/// Per sensor timing and dynamic models
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorLocation {
    /// Sensor
    pub sensor_id: SensorId,
    /// True when this sensor is on board
    pub sensor_present: bool,
    /// Reference epoch of frame times
    pub frame_epoch: ModelEpoch,
    /// Frame start times, in seconds from [Self::frame_epoch]
    pub frame_seconds_from_epoch: Vec<f64>,
    /// Resampled jitter, if any
    pub jitter_table: Option<JitterTable>,
    /// Scan mirror model, if any
    pub ssm_model: Option<SsmModel>,
}

impl SensorLocation {
    pub(crate) fn new(sensor_id: SensorId, sensor_present: bool) -> Self {
        Self {
            sensor_id,
            sensor_present,
            ..Default::default()
        }
    }

    /// Time of a fractional frame position, in seconds from [Self::frame_epoch].
    /// Positions within the last frame extrapolate the last frame period.
    pub fn frame_time(&self, frame: f64) -> Option<f64> {
        let times = &self.frame_seconds_from_epoch;
        let n = times.len();

        if !frame.is_finite() || frame < 0.0 || frame >= n as f64 {
            return None;
        }

        let index = frame.floor() as usize;
        let w = frame - index as f64;
        let next = index.checked_add(1)?;

        if next < n {
            Some(times[index] + w * (times[next] - times[index]))
        } else if next == n {
            if w == 0.0 {
                Some(times[index])
            } else if n > 1 {
                Some(times[index] + w * (times[index] - times[index - 1]))
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Releases all sequences. Calling it twice is harmless.
    pub(crate) fn release(&mut self) {
        self.frame_seconds_from_epoch = Vec::new();
        self.jitter_table = None;
        self.ssm_model = None;
    }
}
