use std::f64::consts::{FRAC_PI_2, TAU};

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921158553E-5;

/// WGS84 Earth Frame Ellipsoid semi-major axis (meters)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid semi-minor axis (meters)
pub const EARTH_SEMI_MINOR_AXIS_WGS84: f64 = 6356752.314245_f64;

/// WGS84 first eccentricity
pub const EARTH_ECCENTRICITY_WGS84: f64 = 0.0818191908426;

/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Right ascension offsets larger than this are unwrapped by whole turns.
pub const RA_WRAP_THRESHOLD_RAD: f64 = FRAC_PI_2;

/// Full turn
pub const TWO_PI: f64 = TAU;

/// |det| at or below which a 3x3 matrix is considered singular
pub const SINGULAR_DETERMINANT: f64 = 1.0E-9;

/// Legendre coefficients per SCA axis
pub const NUM_LEGENDRE_COEFFICIENTS: usize = 4;

/// Sensors per model (primary + secondary)
pub const MAX_SENSORS: usize = 2;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;
