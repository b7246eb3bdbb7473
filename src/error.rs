use thiserror::Error;

use anise::errors::AlmanacError;

use crate::prelude::SensorId;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// Satellite attributes did not provide the satellite identity.
    #[error("unknown satellite: missing satellite attributes")]
    UnknownSatellite,

    /// The attributes report more sensors than a [LosModel](crate::prelude::LosModel) can hold.
    #[error("invalid sensor count {0}")]
    InvalidSensorCount(usize),

    /// Normal band list could not be resolved for this sensor.
    #[error("missing normal band list for {0}")]
    MissingBandList(SensorId),

    /// Per band attributes could not be resolved.
    #[error("missing attributes for band {0}")]
    MissingBandAttributes(u32),

    /// Any storage reservation failed. Whatever was built in the
    /// same call has been dropped.
    #[error("memory allocation failure")]
    Allocation,

    /// Band index is not part of this model.
    #[error("invalid band index {0}")]
    InvalidBandIndex(usize),

    /// SCA index is not part of this band.
    #[error("invalid sca index {0}")]
    InvalidScaIndex(usize),

    /// Detector is not part of this SCA.
    #[error("invalid detector {0}")]
    InvalidDetector(f64),

    /// No band of the model is flagged as present.
    #[error("no band present in the model")]
    NoBandPresent,

    /// 3x3 inversion attempted on a (nearly) singular matrix.
    #[error("singular matrix: cannot invert")]
    SingularMatrix,

    /// Matrix storage does not match requested dimensions.
    #[error("invalid matrix dimensions: {0}x{1}")]
    MatrixDimension(usize, usize),

    /// Redundant quaternion components did not agree
    /// within requested tolerance.
    #[error("matrix to quaternion conversion mismatch")]
    QuaternionMismatch,

    /// Nominal sample time must be strictly positive.
    #[error("invalid nominal sample time {0}")]
    InvalidSampleTime(f64),

    /// Time does not fall within the sampled span.
    #[error("time {0} is outside of sampled span")]
    TimeOutOfRange(f64),

    /// Not enough samples surround requested time.
    #[error("not enough samples to interpolate at {0}")]
    NotEnoughSamples(f64),

    /// Models to combine have incompatible lengths.
    #[error("sequence length mismatch: {0} samples vs {1} samples")]
    SequenceLength(usize, usize),

    /// Attitude or ephemeris sequence is empty.
    #[error("empty sample sequence")]
    EmptySequence,

    /// Bias transfer window does not contain any sample.
    #[error("invalid bias window [{0}, {1}]")]
    InvalidBiasWindow(f64, f64),

    /// Cut-off frequency is not compatible with sampling rate.
    #[error("invalid cut-off frequency {0} Hz")]
    InvalidCutoffFrequency(f64),

    /// Remez exchange did not find enough extremal frequencies.
    #[error("filter design error: too few extremals")]
    FilterDesign,

    /// Frame time table of a sensor is missing or too short.
    #[error("no frame time for line {0}")]
    MissingFrameTime(f64),

    /// Moon position could not be determined.
    #[error("moon ephemeris error at line {0}")]
    MoonEphemeris(f64),

    /// Epoch description is not valid.
    #[error("invalid epoch: year={0} doy={1} sod={2}")]
    InvalidEpoch(i32, u32, f64),

    /// Almanac failure while evaluating the Moon position.
    #[error("issue with Almanac: {0}")]
    Almanac(AlmanacError),
}
