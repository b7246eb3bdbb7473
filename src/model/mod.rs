//! Line-Of-Sight model: the aggregate describing how every detector of every
//! band looks at the Earth, through time.
use itertools::Itertools;
use log::{debug, error};

use crate::{
    attitude::AttitudeModel,
    constants::{
        EARTH_ANGULAR_VEL_RAD, EARTH_ECCENTRICITY_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84,
        EARTH_SEMI_MINOR_AXIS_WGS84, MAX_SENSORS, SPEED_OF_LIGHT_M_S,
    },
    ephemeris::EphemerisModel,
    prelude::{BandAttributes, Error, SatelliteAttributes, SatelliteId, SensorId},
    utils::try_with_capacity,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod band;
mod sensor;

pub use band::{BandModel, DetectorType, SamplingCharacteristics, ScaModel};
pub use sensor::{JitterTable, SensorLocation, SsmModel, SsmRecord};

/// Earth model
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EarthConstants {
    /// Ellipsoid semi-major axis [m]
    pub semi_major_axis: f64,
    /// Ellipsoid semi-minor axis [m]
    pub semi_minor_axis: f64,
    /// Ellipsoid eccentricity
    pub eccentricity: f64,
    /// Earth rotation rate [rad/s]
    pub angular_velocity: f64,
    /// Speed of light [m/s]
    pub speed_of_light: f64,
    /// UT1 - UTC [s]
    pub ut1_utc: f64,
    /// Pole wander (x, y) [rad]
    pub pole_wander: (f64, f64),
}

impl Default for EarthConstants {
    fn default() -> Self {
        Self {
            semi_major_axis: EARTH_SEMI_MAJOR_AXIS_WGS84,
            semi_minor_axis: EARTH_SEMI_MINOR_AXIS_WGS84,
            eccentricity: EARTH_ECCENTRICITY_WGS84,
            angular_velocity: EARTH_ANGULAR_VEL_RAD,
            speed_of_light: SPEED_OF_LIGHT_M_S,
            ut1_utc: 0.0,
            pole_wander: (0.0, 0.0),
        }
    }
}

/// Focal plane and timing description
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorModel {
    /// One entry per [SensorId], indexed by [SensorId::index]
    pub sensors: [SensorLocation; MAX_SENSORS],
    /// Bands, indexed by band index
    pub bands: Vec<BandModel>,
}

/// Spacecraft dynamics
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spacecraft {
    /// Attitude sequence
    pub attitude: AttitudeModel,
    /// Ephemeris sequence
    pub ephemeris: EphemerisModel,
}

/// [LosModel] aggregates the Earth, sensor and spacecraft models.
/// Per detector storage is sized from [SatelliteAttributes] at allocation time,
/// and released when the model is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LosModel {
    /// Satellite identity
    pub satellite_id: SatelliteId,
    /// Satellite number
    pub satellite_number: u32,
    /// Earth model
    pub earth: EarthConstants,
    /// Sensor model
    pub sensor: SensorModel,
    /// Spacecraft model
    pub spacecraft: Spacecraft,
}

impl LosModel {
    /// Allocates a new [LosModel] sized after `attributes`:
    /// every band, SCA and detector table is reserved up front.
    /// All attribute lookups happen before the first allocation,
    /// and any failure returns without a partially built model.
    pub fn allocate<A: SatelliteAttributes>(attributes: &A) -> Result<Self, Error> {
        let satellite_id = attributes.satellite_id().ok_or_else(|| {
            error!("los model: unknown satellite");
            Error::UnknownSatellite
        })?;

        let satellite_number = attributes.satellite_number().ok_or_else(|| {
            error!("los model: unknown satellite number");
            Error::UnknownSatellite
        })?;

        let sensor_count = attributes.sensor_count();
        if sensor_count == 0 || sensor_count > MAX_SENSORS {
            error!("los model: invalid sensor count {}", sensor_count);
            return Err(Error::InvalidSensorCount(sensor_count));
        }

        let mut layout = Vec::<BandAttributes>::new();

        for sensor in SensorId::ALL.iter().take(sensor_count) {
            let bands = attributes.normal_bands(*sensor).ok_or_else(|| {
                error!("los model: no normal band list for {}", sensor);
                Error::MissingBandList(*sensor)
            })?;

            for band_number in bands {
                let band = attributes.band_attributes(band_number).ok_or_else(|| {
                    error!("los model: no attributes for band {}", band_number);
                    Error::MissingBandAttributes(band_number)
                })?;
                layout.push(band);
            }
        }

        let layout = layout
            .into_iter()
            .sorted_by_key(|band| band.band_index)
            .collect::<Vec<_>>();

        for (index, band) in layout.iter().enumerate() {
            if band.band_index != index {
                error!(
                    "los model: band {} index {} is not contiguous",
                    band.band_number, band.band_index
                );
                return Err(Error::InvalidBandIndex(band.band_index));
            }
        }

        let mut bands = try_with_capacity(layout.len())?;
        for band in layout.iter() {
            bands.push(BandModel::allocate(band)?);
        }

        let sensors = SensorId::ALL.map(|id| SensorLocation::new(id, id.index() < sensor_count));

        debug!(
            "{} los model: {} sensors, {} bands",
            satellite_id,
            sensor_count,
            bands.len()
        );

        Ok(Self {
            satellite_id,
            satellite_number,
            earth: EarthConstants::default(),
            sensor: SensorModel { sensors, bands },
            spacecraft: Spacecraft::default(),
        })
    }

    /// Releases every owned sequence, leaving an empty shell.
    /// Calling it more than once is harmless.
    pub fn release(&mut self) {
        for band in self.sensor.bands.iter_mut() {
            band.release();
        }
        self.sensor.bands = Vec::new();

        for sensor in self.sensor.sensors.iter_mut() {
            sensor.release();
        }

        self.spacecraft.attitude.records = Vec::new();
        self.spacecraft.ephemeris.records = Vec::new();
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.sensor.bands.len()
    }

    /// Returns [BandModel] at given band index
    pub fn band(&self, band_index: usize) -> Result<&BandModel, Error> {
        self.sensor
            .bands
            .get(band_index)
            .ok_or(Error::InvalidBandIndex(band_index))
    }

    /// Returns mutable [BandModel] at given band index
    pub fn band_mut(&mut self, band_index: usize) -> Result<&mut BandModel, Error> {
        self.sensor
            .bands
            .get_mut(band_index)
            .ok_or(Error::InvalidBandIndex(band_index))
    }

    /// Returns [BandModel] of given user band number
    pub fn band_by_number(&self, band_number: u32) -> Option<&BandModel> {
        self.sensor
            .bands
            .iter()
            .find(|band| band.band_number == band_number)
    }

    /// First band flagged as present
    pub fn first_present_band(&self) -> Option<&BandModel> {
        self.sensor.bands.iter().find(|band| band.band_present)
    }

    /// Returns [SensorLocation] of given [SensorId]
    pub fn sensor(&self, sensor_id: SensorId) -> &SensorLocation {
        &self.sensor.sensors[sensor_id.index()]
    }

    /// Returns mutable [SensorLocation] of given [SensorId]
    pub fn sensor_mut(&mut self, sensor_id: SensorId) -> &mut SensorLocation {
        &mut self.sensor.sensors[sensor_id.index()]
    }

    /// Returns [SensorLocation] acquiring given band
    pub fn sensor_for_band(&self, band_index: usize) -> Result<&SensorLocation, Error> {
        let band = self.band(band_index)?;
        Ok(self.sensor(band.sensor_id))
    }

    /// Number of image lines of given band
    pub fn line_count(&self, band_index: usize) -> Result<usize, Error> {
        Ok(self.band(band_index)?.line_count())
    }

    /// Acquisition time of a (fractional) image `line` of given band,
    /// in seconds from the frame epoch of its sensor.
    pub fn line_to_time(&self, band_index: usize, line: f64) -> Result<f64, Error> {
        let band = self.band(band_index)?;
        let sensor = self.sensor(band.sensor_id);

        let lines_per_frame = band.sampling_char.lines_per_frame.max(1) as f64;

        sensor.frame_time(line / lines_per_frame).ok_or_else(|| {
            error!(
                "band {}: no frame time for line {} ({} frames)",
                band.band_number,
                line,
                sensor.frame_seconds_from_epoch.len()
            );
            Error::MissingFrameTime(line)
        })
    }
}
