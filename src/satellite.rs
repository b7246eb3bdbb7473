//! Satellite attributes: the static description
//! (sensors, bands, SCAs, detectors) a [LosModel](crate::prelude::LosModel) is sized from.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Satellite identity
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SatelliteId {
    #[default]
    Landsat8,
    Landsat9,
}

impl fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Landsat8 => write!(f, "L8"),
            Self::Landsat9 => write!(f, "L9"),
        }
    }
}

/// Imaging sensors. A model always holds exactly one entry per [SensorId].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorId {
    /// Operational Land Imager (primary)
    #[default]
    Oli,
    /// Thermal InfraRed Sensor (secondary)
    Tirs,
}

impl SensorId {
    pub const ALL: [Self; 2] = [Self::Oli, Self::Tirs];

    /// Position of this sensor in the model sensor table
    pub fn index(&self) -> usize {
        match self {
            Self::Oli => 0,
            Self::Tirs => 1,
        }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Oli => write!(f, "OLI"),
            Self::Tirs => write!(f, "TIRS"),
        }
    }
}

/// Static attributes of one band
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BandAttributes {
    /// User band number (1 based)
    pub band_number: u32,
    /// Position of this band in the model band table
    pub band_index: usize,
    /// Sensor acquiring this band
    pub sensor_id: SensorId,
    /// Number of SCAs
    pub sca_count: usize,
    /// Number of detectors per SCA
    pub detectors_per_sca: usize,
}

/// Satellite attributes provider a [LosModel](crate::prelude::LosModel)
/// is allocated from. Each lookup returns None when the attribute is unknown.
pub trait SatelliteAttributes {
    /// Satellite identity
    fn satellite_id(&self) -> Option<SatelliteId>;

    /// Satellite number (8 for Landsat-8)
    fn satellite_number(&self) -> Option<u32>;

    /// Number of sensors on board
    fn sensor_count(&self) -> usize;

    /// Normal (non-blind, non-VRP) band numbers of given [SensorId]
    fn normal_bands(&self, sensor: SensorId) -> Option<Vec<u32>>;

    /// [BandAttributes] of given band number
    fn band_attributes(&self, band_number: u32) -> Option<BandAttributes>;
}

fn default_sensor_count() -> usize {
    2
}

/// Static [SatelliteAttributes] table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteConfig {
    /// Satellite identity
    pub satellite_id: SatelliteId,
    /// Satellite number
    pub satellite_number: u32,
    /// Sensors on board
    #[cfg_attr(feature = "serde", serde(default = "default_sensor_count"))]
    pub sensor_count: usize,
    /// Normal bands
    pub bands: Vec<BandAttributes>,
}

impl SatelliteConfig {
    /// Landsat-8: 9 OLI bands over 14 SCAs, 2 TIRS bands over 3 SCAs.
    pub fn landsat8() -> Self {
        Self::landsat(SatelliteId::Landsat8, 8)
    }

    /// Landsat-9 shares the Landsat-8 focal plane layout.
    pub fn landsat9() -> Self {
        Self::landsat(SatelliteId::Landsat9, 9)
    }

    fn landsat(satellite_id: SatelliteId, satellite_number: u32) -> Self {
        let mut bands = (1..=9)
            .map(|band_number| BandAttributes {
                band_number,
                band_index: band_number as usize - 1,
                sensor_id: SensorId::Oli,
                sca_count: 14,
                detectors_per_sca: if band_number == 8 { 988 } else { 494 },
            })
            .collect::<Vec<_>>();

        bands.extend((10..=11).map(|band_number| BandAttributes {
            band_number,
            band_index: band_number as usize - 1,
            sensor_id: SensorId::Tirs,
            sca_count: 3,
            detectors_per_sca: 640,
        }));

        Self {
            satellite_id,
            satellite_number,
            sensor_count: default_sensor_count(),
            bands,
        }
    }
}

impl SatelliteAttributes for SatelliteConfig {
    fn satellite_id(&self) -> Option<SatelliteId> {
        Some(self.satellite_id)
    }

    fn satellite_number(&self) -> Option<u32> {
        Some(self.satellite_number)
    }

    fn sensor_count(&self) -> usize {
        self.sensor_count
    }

    fn normal_bands(&self, sensor: SensorId) -> Option<Vec<u32>> {
        let bands = self
            .bands
            .iter()
            .filter(|b| b.sensor_id == sensor)
            .map(|b| b.band_number)
            .collect::<Vec<_>>();

        if bands.is_empty() {
            None
        } else {
            Some(bands)
        }
    }

    fn band_attributes(&self, band_number: u32) -> Option<BandAttributes> {
        self.bands
            .iter()
            .find(|b| b.band_number == band_number)
            .copied()
    }
}

#[cfg(test)]
mod test {
    use super::{SatelliteAttributes, SatelliteConfig, SensorId};

    #[test]
    fn landsat8_layout() {
        let cfg = SatelliteConfig::landsat8();
        assert_eq!(cfg.satellite_number(), Some(8));
        assert_eq!(cfg.sensor_count(), 2);
        assert_eq!(
            cfg.normal_bands(SensorId::Oli),
            Some((1..=9).collect::<Vec<_>>())
        );
        assert_eq!(cfg.normal_bands(SensorId::Tirs), Some(vec![10, 11]));

        let pan = cfg.band_attributes(8).unwrap();
        assert_eq!(pan.detectors_per_sca, 988);
        assert_eq!(pan.sca_count, 14);

        let tirs = cfg.band_attributes(11).unwrap();
        assert_eq!(tirs.band_index, 10);
        assert_eq!(tirs.sensor_id, SensorId::Tirs);

        assert!(cfg.band_attributes(12).is_none());
    }

    #[test]
    fn sensor_display() {
        assert_eq!(SensorId::Oli.to_string(), "OLI");
        assert_eq!(SensorId::Tirs.index(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserialization() {
        let content = r#"{
            "satellite_id": "Landsat9",
            "satellite_number": 9,
            "bands": [
                { "band_number": 1, "band_index": 0, "sensor_id": "Oli", "sca_count": 2, "detectors_per_sca": 4 }
            ]
        }"#;

        let cfg: SatelliteConfig = serde_json::from_str(content).unwrap();
        assert_eq!(cfg.sensor_count, 2);
        assert_eq!(cfg.bands.len(), 1);
        assert!(cfg.normal_bands(SensorId::Tirs).is_none());
    }
}
