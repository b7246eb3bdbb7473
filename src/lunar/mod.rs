//! Lunar projection: a moving frame centered on the Moon apparent position,
//! used to register lunar calibration acquisitions.
use log::{debug, error};

use crate::{
    constants::{RA_WRAP_THRESHOLD_RAD, TWO_PI},
    model::{DetectorType, LosModel},
    prelude::{Error, Vector3},
    utils::try_with_capacity,
};

mod almanac;

pub use almanac::AlmanacMoonSource;

/// Apparent Moon position
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MoonPosition {
    /// Right ascension [rad]
    pub ra: f64,
    /// Declination [rad]
    pub dec: f64,
    /// Distance [m]
    pub distance: f64,
}

impl MoonPosition {
    /// Builds [MoonPosition] from an observer to Moon vector [m],
    /// expressed in an equatorial frame. None on null vector.
    pub fn from_vector(vector: &Vector3<f64>) -> Option<Self> {
        let distance = vector.norm();
        if distance > 0.0 {
            Some(Self {
                ra: vector[1].atan2(vector[0]),
                dec: (vector[2] / distance).asin(),
                distance,
            })
        } else {
            None
        }
    }
}

/// Location on the focal plane, at a given image line
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FocalPlaneLocation {
    /// Band index
    pub band_index: usize,
    /// SCA index
    pub sca_index: usize,
    /// Image line
    pub line: f64,
    /// Detector (sample) within the SCA
    pub detector: f64,
    /// Detector type
    pub detector_type: DetectorType,
}

/// Moon ephemeris provider
pub trait MoonSource {
    /// Apparent [MoonPosition] seen from the focal plane [FocalPlaneLocation]
    /// described by the [LosModel].
    fn moon_position(
        &self,
        model: &LosModel,
        location: &FocalPlaneLocation,
    ) -> Result<MoonPosition, Error>;
}

/// Shifts `angle` by whole turns when it is more than [RA_WRAP_THRESHOLD_RAD]
/// away from `reference`, so it ends within half a turn of it.
pub fn unwrap_angle(angle: f64, reference: f64) -> f64 {
    let delta = angle - reference;
    if delta.abs() > RA_WRAP_THRESHOLD_RAD {
        angle - TWO_PI * (delta / TWO_PI).round()
    } else {
        angle
    }
}

/// Per line Moon positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LunarCache {
    /// Continuous (unwrapped) right ascension [rad]
    pub ra: Vec<f64>,
    /// Declination [rad]
    pub dec: Vec<f64>,
    /// Distance [m]
    pub distance: Vec<f64>,
}

impl LunarCache {
    fn with_capacity(lines: usize) -> Result<Self, Error> {
        Ok(Self {
            ra: try_with_capacity(lines)?,
            dec: try_with_capacity(lines)?,
            distance: try_with_capacity(lines)?,
        })
    }

    /// Number of cached lines
    pub fn len(&self) -> usize {
        self.ra.len()
    }

    /// True when no line is cached
    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    fn get(&self, line: f64) -> Option<MoonPosition> {
        let index = line.round();
        if !index.is_finite() || index < 0.0 || index >= self.len() as f64 {
            return None;
        }
        let index = index as usize;
        Some(MoonPosition {
            ra: self.ra[index],
            dec: self.dec[index],
            distance: self.distance[index],
        })
    }
}

/// [LunarProjection] transforms coordinates into a frame that follows
/// the Moon apparent motion, anchored at the Moon position observed
/// at the center of the acquisition. Valid while the [LosModel] lives.
pub struct LunarProjection<'a, S: MoonSource> {
    model: &'a LosModel,
    source: &'a S,
    band_index: usize,
    sca_index: usize,
    /// Center detector of the target SCA, used for every line
    detector: f64,
    detector_type: DetectorType,
    reference: MoonPosition,
    unit_scale: f64,
    cache: Option<LunarCache>,
}

impl<'a, S: MoonSource> LunarProjection<'a, S> {
    /// Creates a new [LunarProjection] for given band, SCA and [DetectorType].
    ///
    /// The reference position is the Moon observed by the middle detector of the
    /// middle SCA of the first present band, at the middle line of that band.
    /// Moon positions of the target band are evaluated at the center detector
    /// of the target SCA. When `use_cache` is set, the Moon position of every
    /// line of the target band is computed up front.
    pub fn create(
        model: &'a LosModel,
        source: &'a S,
        band_index: usize,
        sca_index: usize,
        detector_type: DetectorType,
        unit_scale: f64,
        use_cache: bool,
    ) -> Result<Self, Error> {
        let target = model.band(band_index)?;
        let target_sca = target.sca(sca_index)?;

        let reference_band = model.first_present_band().ok_or_else(|| {
            error!("lunar projection: no band present in the model");
            Error::NoBandPresent
        })?;

        let reference_sca = reference_band.sca_count() / 2;

        let location = FocalPlaneLocation {
            band_index: reference_band.band_index,
            sca_index: reference_sca,
            line: (reference_band.line_count() / 2) as f64,
            detector: (reference_band.sca(reference_sca)?.detector_count() / 2) as f64,
            detector_type,
        };

        let reference = source.moon_position(model, &location)?;

        debug!(
            "lunar projection: reference band {} line {}: ra={} dec={} dist={}",
            reference_band.band_number,
            location.line,
            reference.ra,
            reference.dec,
            reference.distance
        );

        let mut proj = Self {
            model,
            source,
            band_index,
            sca_index,
            detector: (target_sca.detector_count() / 2) as f64,
            detector_type,
            reference,
            unit_scale,
            cache: None,
        };

        if use_cache {
            let lines = target.line_count();

            let mut cache = LunarCache::with_capacity(lines)?;
            let mut previous_ra = reference.ra;

            for line in 0..lines {
                let position = proj.lookup(line as f64)?;
                let ra = unwrap_angle(position.ra, previous_ra);

                cache.ra.push(ra);
                cache.dec.push(position.dec);
                cache.distance.push(position.distance);

                previous_ra = ra;
            }

            proj.cache = Some(cache);
        }

        Ok(proj)
    }

    /// Moon position at `line`
    fn lookup(&self, line: f64) -> Result<MoonPosition, Error> {
        let location = FocalPlaneLocation {
            band_index: self.band_index,
            sca_index: self.sca_index,
            line,
            detector: self.detector,
            detector_type: self.detector_type,
        };

        self.source
            .moon_position(self.model, &location)
            .inspect_err(|e| {
                error!(
                    "lunar projection: band {} sca {} line {}: {}",
                    self.band_index, self.sca_index, line, e
                );
            })
    }

    /// Converts (`lat`, `long`) [rad] observed at (`line`, `sample`) into
    /// the Moon centered frame. Returns the converted (latitude, longitude)
    /// expressed in output units, and the distance scale applied.
    /// The Moon position only depends on `line`: cached or not, it is the one
    /// seen by the center detector of the target SCA, whatever `_sample`.
    pub fn transform(
        &self,
        line: f64,
        _sample: f64,
        lat: f64,
        long: f64,
    ) -> Result<(f64, f64, f64), Error> {
        let position = match self.cache.as_ref().and_then(|cache| cache.get(line)) {
            Some(position) => position,
            None => self.lookup(line)?,
        };

        let ra = unwrap_angle(position.ra, self.reference.ra);
        let long = unwrap_angle(long, self.reference.ra);

        let scale = position.distance / self.reference.distance;

        let lat = (self.reference.dec + (lat - position.dec) * scale) / self.unit_scale;
        let long = (self.reference.ra + (long - ra) * scale) / self.unit_scale;

        Ok((lat, long, scale))
    }

    /// Reference (declination, right ascension) [rad]
    pub fn center(&self) -> (f64, f64) {
        (self.reference.dec, self.reference.ra)
    }

    /// Reference Earth to Moon distance [m]
    pub fn reference_distance(&self) -> f64 {
        self.reference.distance
    }

    /// Per line cache, when requested at creation
    pub fn cache(&self) -> Option<&LunarCache> {
        self.cache.as_ref()
    }
}
