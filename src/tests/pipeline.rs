use crate::{
    prelude::{
        apply_precision_correction, AttitudeChannel, AttitudeModel, AttitudeRecord, DetectorType,
        Error, FilterConfig, FocalPlaneLocation, JitterTable, LosModel, LunarProjection,
        ModelEpoch, MoonPosition, MoonSource, PrecisionModel, SatelliteConfig, SensorId, Vector3,
    },
    tests::init_logger,
};

use rstest::*;

/// Moon whose position follows the acquisition time of the requested line
struct TimedMoon;

impl MoonSource for TimedMoon {
    fn moon_position(
        &self,
        model: &LosModel,
        location: &FocalPlaneLocation,
    ) -> Result<MoonPosition, Error> {
        let t = model.line_to_time(location.band_index, location.line)?;
        Ok(MoonPosition {
            ra: 0.5 + 1.0E-4 * t,
            dec: -0.2 + 2.0E-5 * t,
            distance: 3.84E8 - 10.0 * t,
        })
    }
}

#[fixture]
fn model() -> LosModel {
    let image_epoch = ModelEpoch::new(2021, 250, 43200.0).unwrap();

    let mut model = LosModel::allocate(&SatelliteConfig::landsat8()).unwrap();

    // 64 Hz attitude over 20 s, slow pitch drift
    let dt = 1.0 / 64.0;
    let records = (0..1280)
        .map(|i| {
            let t = i as f64 * dt;
            AttitudeRecord::new(t, Vector3::new(1.0E-5, 1.0E-5 * t, -2.0E-5))
        })
        .collect();

    model.spacecraft.attitude = AttitudeModel::from_records(image_epoch, dt, records);

    // 250 Hz frames over 10 s, starting 5 s after the image epoch
    let oli = model.sensor_mut(SensorId::Oli);
    oli.frame_epoch = image_epoch;
    oli.frame_seconds_from_epoch = (0..2500).map(|i| 5.0 + i as f64 * 0.004).collect();

    for band in model.sensor.bands.iter_mut() {
        if band.sensor_id == SensorId::Oli {
            band.band_present = true;
            band.frame_count = 2500;
            if band.band_number == 8 {
                band.sampling_char.lines_per_frame = 2;
            }
        }
    }

    model
}

#[rstest]
fn attitude_processing(mut model: LosModel) {
    init_logger();

    let image_epoch = model.spacecraft.attitude.epoch;

    let precision = PrecisionModel {
        seconds_from_image_epoch: 10.0,
        attitude_order: 1,
        roll_corr: vec![2.0E-6, 0.0],
        pitch_corr: vec![0.0, 1.0E-8],
        yaw_corr: vec![0.0],
        ..Default::default()
    };

    apply_precision_correction(&image_epoch, &precision, &mut model.spacecraft.attitude);

    let attitude = &model.spacecraft.attitude;

    // the raw channel is untouched
    let raw = attitude
        .interpolate_attitude_at_time(10.0, AttitudeChannel::Satellite)
        .unwrap();
    assert!((raw - Vector3::new(1.0E-5, 1.0E-4, -2.0E-5)).norm() < 1e-15);

    // small angles: corrections add up
    let corrected = attitude
        .interpolate_attitude_at_time(10.0, AttitudeChannel::Precision)
        .unwrap();
    assert!((corrected - Vector3::new(1.2E-5, 1.0E-4, -2.0E-5)).norm() < 1e-9);

    let (low, high) = attitude.split_jitter(2.0, &FilterConfig::default()).unwrap();
    assert_eq!(low.sample_count(), attitude.sample_count());

    // no jitter in this attitude profile, away from the edges
    for record in high.records[200..1080].iter() {
        assert!(record.precision_attitude.norm() < 1e-11);
        assert!(record.satellite_attitude.norm() < 1e-11);
    }

    let oli = model.sensor(SensorId::Oli);
    let table = JitterTable::build(&high, &oli.frame_seconds_from_epoch[..100], 4, 0.004).unwrap();
    assert_eq!(table.entries.len(), 400);

    model.sensor_mut(SensorId::Oli).jitter_table = Some(table);
    assert!(model.sensor(SensorId::Oli).jitter_table.is_some());

    model.release();
    assert!(model.sensor(SensorId::Oli).jitter_table.is_none());
    assert!(model.spacecraft.attitude.records.is_empty());
}

#[rstest]
fn los_vectors(mut model: LosModel) {
    init_logger();

    let band = model.band_mut(0).unwrap();
    band.sampling_char.along_ifov = 42.6E-6;
    band.sampling_char.across_ifov = 42.6E-6;

    let sca = band.sca_mut(6).unwrap();
    sca.sca_coef_x = [1.0E-3, 0.0, 0.0, 0.0];
    sca.sca_coef_y = [0.0, 2.0E-2, 0.0, 0.0];
    sca.along_track_offsets[0] = 0.5;

    let band = model.band(0).unwrap();

    let nominal = band.los_vector(6, 0.0, DetectorType::Nominal).unwrap();
    let actual = band.los_vector(6, 0.0, DetectorType::Actual).unwrap();

    assert!((nominal - Vector3::new(1.0E-3, -2.0E-2, 1.0).normalize()).norm() < 1e-15);
    assert!(actual[0] > nominal[0]);
    assert_eq!(
        band.los_vector(14, 0.0, DetectorType::Nominal),
        Err(Error::InvalidScaIndex(14))
    );
}

#[rstest]
fn lunar_registration(model: LosModel) {
    init_logger();

    let moon = TimedMoon;

    // target: panchromatic band, 5000 lines
    let proj =
        LunarProjection::create(&model, &moon, 7, 7, DetectorType::Nominal, 1.0, true).unwrap();

    assert_eq!(proj.cache().map(|cache| cache.len()), Some(5000));

    // reference: band 1, line 1250 => 5 s + 1250 x 4 ms
    let (dec, ra) = proj.center();
    assert!((ra - (0.5 + 1.0E-4 * 10.0)).abs() < 1e-12);
    assert!((dec - (-0.2 + 2.0E-5 * 10.0)).abs() < 1e-12);

    // line 2500 of the pan band is acquired at the reference time
    let (lat, long, scale) = proj.transform(2500.0, 100.0, dec, ra).unwrap();
    assert!((lat - dec).abs() < 1e-12);
    assert!((long - ra).abs() < 1e-12);
    assert!((scale - 1.0).abs() < 1e-12);

    // beyond the last frame: computed on demand, which fails
    assert_eq!(
        proj.transform(5002.0, 100.0, dec, ra),
        Err(Error::MissingFrameTime(5002.0))
    );

    assert_eq!(
        proj.transform(1.0E20, 100.0, dec, ra),
        Err(Error::MissingFrameTime(1.0E20))
    );
}
