use crate::{
    constants::SECONDS_PER_DAY,
    error::Error,
    prelude::{Epoch, Unit},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ModelEpoch] is the (year, day of year, seconds of day) triplet
/// used to reference every sampled sequence of the model.
/// Two [ModelEpoch]s are never compared directly: use [seconds_between].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelEpoch {
    /// Year
    pub year: i32,
    /// Day of year (1..=366)
    pub day_of_year: u32,
    /// Seconds of day
    pub seconds_of_day: f64,
}

impl Default for ModelEpoch {
    fn default() -> Self {
        Self {
            year: 2000,
            day_of_year: 1,
            seconds_of_day: 0.0,
        }
    }
}

impl ModelEpoch {
    /// Builds a new [ModelEpoch], verifying the day of year
    /// and seconds of day ranges (leap second tolerated).
    pub fn new(year: i32, day_of_year: u32, seconds_of_day: f64) -> Result<Self, Error> {
        if !(1..=366).contains(&day_of_year)
            || !(0.0..SECONDS_PER_DAY + 1.0).contains(&seconds_of_day)
        {
            return Err(Error::InvalidEpoch(year, day_of_year, seconds_of_day));
        }
        Ok(Self {
            year,
            day_of_year,
            seconds_of_day,
        })
    }

    /// Converts to UTC [Epoch]
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.year, 1, 1)
            + Unit::Day * (self.day_of_year as f64 - 1.0)
            + Unit::Second * self.seconds_of_day
    }

    /// Builds [ModelEpoch] from UTC [Epoch]
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (year, _, _, _, _, _, _) = epoch.to_gregorian_utc();
        let start = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
        let elapsed_s = (epoch - start).to_seconds();
        let days = (elapsed_s / SECONDS_PER_DAY).floor();
        Self {
            year,
            day_of_year: days as u32 + 1,
            seconds_of_day: elapsed_s - days * SECONDS_PER_DAY,
        }
    }

    /// Returns [ModelEpoch] shifted by given amount of seconds
    pub fn offset_seconds(&self, seconds: f64) -> Self {
        Self::from_epoch(self.to_epoch() + Unit::Second * seconds)
    }
}

/// Signed time difference `lhs - rhs` in seconds.
pub fn seconds_between(lhs: &ModelEpoch, rhs: &ModelEpoch) -> f64 {
    (lhs.to_epoch() - rhs.to_epoch()).to_seconds()
}
