use anise::{
    constants::frames::{EARTH_J2000, MOON_J2000},
    prelude::Almanac,
};

use log::error;

use super::{FocalPlaneLocation, MoonPosition, MoonSource};

use crate::{
    ephemeris::EphemerisFrame,
    model::LosModel,
    prelude::{Epoch, Error, Unit, Vector3},
    time::seconds_between,
};

/// [MoonSource] backed by an [Almanac]: the Moon position is obtained
/// from the planetary ephemerides, then made topocentric using the
/// spacecraft inertial position.
pub struct AlmanacMoonSource {
    almanac: Almanac,
}

impl AlmanacMoonSource {
    /// Builds [AlmanacMoonSource] from an [Almanac]
    /// loaded with planetary ephemerides.
    pub fn new(almanac: Almanac) -> Self {
        Self { almanac }
    }

    /// Earth centered Moon position [m] in J2000 at `epoch`
    fn moon_eci_m(&self, epoch: Epoch) -> Result<Vector3<f64>, Error> {
        let earth_moon = self
            .almanac
            .transform(MOON_J2000, EARTH_J2000, epoch, None)
            .map_err(Error::Almanac)?;

        Ok(Vector3::new(
            earth_moon.radius_km.x * 1.0E3,
            earth_moon.radius_km.y * 1.0E3,
            earth_moon.radius_km.z * 1.0E3,
        ))
    }
}

impl MoonSource for AlmanacMoonSource {
    fn moon_position(
        &self,
        model: &LosModel,
        location: &FocalPlaneLocation,
    ) -> Result<MoonPosition, Error> {
        let frame_epoch = model.sensor_for_band(location.band_index)?.frame_epoch;
        let t = model.line_to_time(location.band_index, location.line)?;

        let epoch = frame_epoch.to_epoch() + Unit::Second * t;

        let ephemeris = &model.spacecraft.ephemeris;
        let t_ephemeris = seconds_between(&frame_epoch, &ephemeris.epoch) + t;
        let spacecraft = ephemeris.state_at(t_ephemeris, EphemerisFrame::Eci)?;

        let moon = self.moon_eci_m(epoch)?;

        MoonPosition::from_vector(&(moon - spacecraft.position)).ok_or_else(|| {
            error!("{}: degenerate spacecraft to moon vector", epoch);
            Error::MoonEphemeris(location.line)
        })
    }
}

#[cfg(test)]
mod test {
    use super::AlmanacMoonSource;
    use crate::{
        ephemeris::{EphemerisModel, EphemerisRecord},
        lunar::{FocalPlaneLocation, MoonSource},
        model::{DetectorType, LosModel},
        prelude::{Error, ModelEpoch, SatelliteConfig, SensorId, Vector3},
    };
    use anise::prelude::Almanac;

    fn location(line: f64) -> FocalPlaneLocation {
        FocalPlaneLocation {
            band_index: 0,
            sca_index: 7,
            line,
            detector: 247.0,
            detector_type: DetectorType::Nominal,
        }
    }

    fn model() -> LosModel {
        let epoch = ModelEpoch::new(2020, 100, 3600.0).unwrap();
        let mut model = LosModel::allocate(&SatelliteConfig::landsat8()).unwrap();

        let oli = model.sensor_mut(SensorId::Oli);
        oli.frame_epoch = epoch;
        oli.frame_seconds_from_epoch = vec![10.0, 10.004, 10.008];

        model.spacecraft.ephemeris = EphemerisModel::from_records(
            epoch,
            1.0,
            (0..30)
                .map(|i| EphemerisRecord {
                    seconds_from_epoch: i as f64,
                    eci_position: Vector3::new(7.0E6, 7.5E3 * i as f64, 0.0),
                    ..Default::default()
                })
                .collect(),
        );

        model
    }

    #[test]
    fn timing_failures() {
        let source = AlmanacMoonSource::new(Almanac::default());
        let mut model = model();

        assert_eq!(
            source.moon_position(&model, &location(3.0)),
            Err(Error::MissingFrameTime(3.0))
        );

        model.spacecraft.ephemeris.records.truncate(5);
        assert_eq!(
            source.moon_position(&model, &location(1.0)),
            Err(Error::TimeOutOfRange(10.004))
        );
    }

    #[test]
    fn missing_planetary_data() {
        let source = AlmanacMoonSource::new(Almanac::default());
        let model = model();

        assert!(matches!(
            source.moon_position(&model, &location(1.0)),
            Err(Error::Almanac(_))
        ));
    }
}
