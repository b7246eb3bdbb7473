#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod averager;
mod cfg;
mod error;
mod precision;
mod satellite;
mod time;
mod utils;

// public modules
pub mod attitude;
pub mod constants;
pub mod ephemeris;
pub mod lunar;
pub mod math;
pub mod model;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::attitude::{AttitudeChannel, AttitudeModel, AttitudeRecord};
    pub use crate::cfg::FilterConfig;
    pub use crate::ephemeris::{EphemerisFrame, EphemerisModel, EphemerisRecord, EphemerisState};
    pub use crate::error::Error;
    pub use crate::lunar::{
        AlmanacMoonSource, FocalPlaneLocation, LunarProjection, MoonPosition, MoonSource,
    };
    pub use crate::model::{
        BandModel, DetectorType, EarthConstants, JitterTable, LosModel, SamplingCharacteristics,
        ScaModel, SensorLocation, SsmModel,
    };
    pub use crate::precision::{apply_precision_correction, PrecisionModel};
    pub use crate::satellite::{
        BandAttributes, SatelliteAttributes, SatelliteConfig, SatelliteId, SensorId,
    };
    pub use crate::time::{seconds_between, ModelEpoch};
    // re-export
    pub use anise::prelude::Almanac;
    pub use hifitime::{Duration, Epoch, Unit};
    pub use nalgebra::{DMatrix, Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
}

// pub export
pub use error::Error;
