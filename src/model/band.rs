use log::error;

use crate::{
    constants::NUM_LEGENDRE_COEFFICIENTS,
    math::legendre,
    prelude::{BandAttributes, Error, SensorId, Vector3},
    utils::{try_filled, try_with_capacity},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a detector position is turned into a line of sight.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectorType {
    /// Legendre model only, detector offsets ignored
    #[default]
    Nominal,
    /// Legendre model plus the offsets of the nearest detector
    Actual,
    /// Legendre model plus offsets linearly interpolated at
    /// the fractional detector position
    Exact,
}

/// Per band sampling characteristics
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingCharacteristics {
    /// Image lines acquired per sensor frame
    pub lines_per_frame: usize,
    /// Integration time [s]
    pub integration_time: f64,
    /// Settling time [s]
    pub settling_time: f64,
    /// Along track instantaneous field of view [rad]
    pub along_ifov: f64,
    /// Across track instantaneous field of view [rad]
    pub across_ifov: f64,
}

impl Default for SamplingCharacteristics {
    fn default() -> Self {
        Self {
            lines_per_frame: 1,
            integration_time: 0.0,
            settling_time: 0.0,
            along_ifov: 0.0,
            across_ifov: 0.0,
        }
    }
}

/// Sensor Chip Assembly
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaModel {
    /// Raw (L0R) detector offsets [pixels]
    pub l0r_detector_offsets: Vec<i32>,
    /// Along track detector offsets [IFOV]
    pub along_track_offsets: Vec<f64>,
    /// Across track detector offsets [IFOV]
    pub across_track_offsets: Vec<f64>,
    /// Along track Legendre coefficients [tan(rad)]
    pub sca_coef_x: [f64; NUM_LEGENDRE_COEFFICIENTS],
    /// Across track Legendre coefficients [tan(rad)]
    pub sca_coef_y: [f64; NUM_LEGENDRE_COEFFICIENTS],
}

impl ScaModel {
    /// Allocates the detector offset tables of a [ScaModel]
    pub(crate) fn allocate(detectors: usize) -> Result<Self, Error> {
        Ok(Self {
            l0r_detector_offsets: try_filled(detectors, 0)?,
            along_track_offsets: try_filled(detectors, 0.0)?,
            across_track_offsets: try_filled(detectors, 0.0)?,
            sca_coef_x: [0.0; NUM_LEGENDRE_COEFFICIENTS],
            sca_coef_y: [0.0; NUM_LEGENDRE_COEFFICIENTS],
        })
    }

    /// Number of detectors on this SCA
    pub fn detector_count(&self) -> usize {
        self.along_track_offsets.len()
    }

    /// Detector offsets (along, across) [IFOV] of given [DetectorType] at `detector`
    fn detector_offsets(
        &self,
        detector: f64,
        detector_type: DetectorType,
    ) -> Result<(f64, f64), Error> {
        let offsets = |d: usize| {
            self.along_track_offsets
                .get(d)
                .zip(self.across_track_offsets.get(d))
                .map(|(along, across)| (*along, *across))
                .ok_or_else(|| {
                    error!(
                        "detector {}: {} along track / {} across track offsets",
                        d,
                        self.along_track_offsets.len(),
                        self.across_track_offsets.len()
                    );
                    Error::InvalidDetector(detector)
                })
        };

        match detector_type {
            DetectorType::Nominal => Ok((0.0, 0.0)),
            DetectorType::Actual => offsets(detector.round() as usize),
            DetectorType::Exact => {
                let lower = detector.floor() as usize;
                let upper = (lower + 1).min(self.detector_count() - 1);
                let w = detector - lower as f64;
                let (along_lo, across_lo) = offsets(lower)?;
                let (along_hi, across_hi) = offsets(upper)?;
                Ok((
                    along_lo * (1.0 - w) + along_hi * w,
                    across_lo * (1.0 - w) + across_hi * w,
                ))
            },
        }
    }

    /// Unit line of sight vector in the sensor frame,
    /// for a (possibly fractional) `detector` of this SCA.
    pub fn los_vector(
        &self,
        detector: f64,
        detector_type: DetectorType,
        sampling: &SamplingCharacteristics,
    ) -> Result<Vector3<f64>, Error> {
        let count = self.detector_count();

        if count < 2 || !(0.0..=(count - 1) as f64).contains(&detector) {
            error!("los vector: detector {} out of [0, {}[", detector, count);
            return Err(Error::InvalidDetector(detector));
        }

        // Legendre domain is [-1, 1] across the SCA
        let last = (count - 1) as f64;
        let normalized = (2.0 * detector - last) / last;

        let (along, across) = self.detector_offsets(detector, detector_type)?;

        let x = legendre(&self.sca_coef_x, normalized) + along * sampling.along_ifov;
        let y = legendre(&self.sca_coef_y, normalized) + across * sampling.across_ifov;

        Ok(Vector3::new(x, y, 1.0).normalize())
    }
}

/// Band model
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BandModel {
    /// User band number
    pub band_number: u32,
    /// Position in the model band table
    pub band_index: usize,
    /// Sensor acquiring this band
    pub sensor_id: SensorId,
    /// True when this band was acquired
    pub band_present: bool,
    /// Number of frames acquired
    pub frame_count: usize,
    /// Sampling characteristics
    pub sampling_char: SamplingCharacteristics,
    /// SCAs, ordered by SCA index
    pub scas: Vec<ScaModel>,
}

impl BandModel {
    /// Allocates a [BandModel] and all its [ScaModel]s
    pub(crate) fn allocate(attributes: &BandAttributes) -> Result<Self, Error> {
        let mut scas = try_with_capacity(attributes.sca_count)?;

        for _ in 0..attributes.sca_count {
            scas.push(ScaModel::allocate(attributes.detectors_per_sca)?);
        }

        Ok(Self {
            band_number: attributes.band_number,
            band_index: attributes.band_index,
            sensor_id: attributes.sensor_id,
            band_present: false,
            frame_count: 0,
            sampling_char: SamplingCharacteristics::default(),
            scas,
        })
    }

    /// Number of SCAs
    pub fn sca_count(&self) -> usize {
        self.scas.len()
    }

    /// Returns [ScaModel] at given index
    pub fn sca(&self, sca_index: usize) -> Result<&ScaModel, Error> {
        self.scas
            .get(sca_index)
            .ok_or(Error::InvalidScaIndex(sca_index))
    }

    /// Returns mutable [ScaModel] at given index
    pub fn sca_mut(&mut self, sca_index: usize) -> Result<&mut ScaModel, Error> {
        self.scas
            .get_mut(sca_index)
            .ok_or(Error::InvalidScaIndex(sca_index))
    }

    /// Number of image lines: frames times lines per frame
    pub fn line_count(&self) -> usize {
        self.frame_count * self.sampling_char.lines_per_frame
    }

    /// Unit line of sight vector in the sensor frame
    pub fn los_vector(
        &self,
        sca_index: usize,
        detector: f64,
        detector_type: DetectorType,
    ) -> Result<Vector3<f64>, Error> {
        self.sca(sca_index)?
            .los_vector(detector, detector_type, &self.sampling_char)
    }

    /// Releases all per detector storage. Calling it twice is harmless.
    pub(crate) fn release(&mut self) {
        self.scas = Vec::new();
    }
}

#[cfg(test)]
mod test {
    use super::{BandModel, DetectorType, SamplingCharacteristics, ScaModel};
    use crate::prelude::{BandAttributes, Error, SensorId, Vector3};

    fn sca() -> ScaModel {
        let mut sca = ScaModel::allocate(5).unwrap();
        sca.sca_coef_x = [0.01, 0.0, 0.0, 0.0];
        sca.sca_coef_y = [0.0, 0.02, 0.0, 0.0];
        sca.along_track_offsets = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        sca.across_track_offsets = vec![0.0, -1.0, -2.0, -3.0, -4.0];
        sca
    }

    fn sampling() -> SamplingCharacteristics {
        SamplingCharacteristics {
            along_ifov: 1.0E-3,
            across_ifov: 1.0E-3,
            ..Default::default()
        }
    }

    #[test]
    fn nominal_los() {
        let sca = sca();

        let center = sca
            .los_vector(2.0, DetectorType::Nominal, &sampling())
            .unwrap();
        let expected = Vector3::new(0.01, 0.0, 1.0).normalize();
        assert!((center - expected).norm() < 1e-15);

        let edge = sca
            .los_vector(4.0, DetectorType::Nominal, &sampling())
            .unwrap();
        let expected = Vector3::new(0.01, 0.02, 1.0).normalize();
        assert!((edge - expected).norm() < 1e-15);
        assert!((edge.norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn detector_offsets() {
        let sca = sca();

        // 1.4 rounds to detector 1
        let actual = sca
            .los_vector(1.4, DetectorType::Actual, &sampling())
            .unwrap();
        let n = (2.0 * 1.4 - 4.0) / 4.0;
        let expected = Vector3::new(0.01 + 1.0E-3, 0.02 * n - 1.0E-3, 1.0).normalize();
        assert!((actual - expected).norm() < 1e-15);

        let exact = sca
            .los_vector(1.5, DetectorType::Exact, &sampling())
            .unwrap();
        let n = (2.0 * 1.5 - 4.0) / 4.0;
        let expected = Vector3::new(0.01 + 1.5E-3, 0.02 * n - 1.5E-3, 1.0).normalize();
        assert!((exact - expected).norm() < 1e-15);

        // last detector has no upper neighbour
        assert!(sca.los_vector(4.0, DetectorType::Exact, &sampling()).is_ok());
    }

    #[test]
    fn invalid_detector() {
        let sca = sca();
        assert_eq!(
            sca.los_vector(-0.5, DetectorType::Nominal, &sampling()),
            Err(Error::InvalidDetector(-0.5))
        );
        assert_eq!(
            sca.los_vector(4.5, DetectorType::Exact, &sampling()),
            Err(Error::InvalidDetector(4.5))
        );
    }

    #[test]
    fn mismatched_offsets() {
        let mut sca = sca();
        sca.across_track_offsets.truncate(3);

        assert!(sca.los_vector(3.0, DetectorType::Nominal, &sampling()).is_ok());
        assert!(sca.los_vector(2.0, DetectorType::Actual, &sampling()).is_ok());
        assert_eq!(
            sca.los_vector(3.0, DetectorType::Actual, &sampling()),
            Err(Error::InvalidDetector(3.0))
        );
        assert_eq!(
            sca.los_vector(2.5, DetectorType::Exact, &sampling()),
            Err(Error::InvalidDetector(2.5))
        );
    }

    #[test]
    fn band_allocation() {
        let attributes = BandAttributes {
            band_number: 10,
            band_index: 9,
            sensor_id: SensorId::Tirs,
            sca_count: 3,
            detectors_per_sca: 640,
        };

        let mut band = BandModel::allocate(&attributes).unwrap();
        assert_eq!(band.sca_count(), 3);
        assert_eq!(band.sca(2).unwrap().detector_count(), 640);
        assert_eq!(band.sca(3), Err(Error::InvalidScaIndex(3)));
        assert!(!band.band_present);

        band.frame_count = 100;
        band.sampling_char.lines_per_frame = 2;
        assert_eq!(band.line_count(), 200);

        band.release();
        band.release();
        assert_eq!(band.sca_count(), 0);
    }
}
