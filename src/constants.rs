//! # Constants and type definitions for viewplan
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate: observer geometry, solar-system ephemerides, and the
//! selection / ordering engines all read from here.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Core type aliases (angles, distances, magnitudes, dates)
//! - Built-in defaults of a planning run (fallback site, magnitude ceilings, altitude band)

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Radians → arcseconds
pub const RAD2ARC: f64 = 648000.0 / std::f64::consts::PI;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.0;

/// Mean lunar radius in kilometers
pub const MOON_RADIUS_KM: f64 = 1737.4;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Apparent visual magnitude (lower is brighter, may be negative)
pub type Magnitude = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Run defaults
// -------------------------------------------------------------------------------------------------

/// Fallback site latitude (sexagesimal degrees, north positive)
pub const DEFAULT_LATITUDE: &str = "37:50:15.3";

/// Fallback site longitude (sexagesimal degrees, east positive)
pub const DEFAULT_LONGITUDE: &str = "-122:16:51.6";

/// Fallback site elevation above sea level
pub const DEFAULT_ELEVATION: Meter = 14.0;

/// Faintest star kept in a plan
pub const DEFAULT_STAR_LIMIT: Magnitude = 2.5;

/// Faintest deep-sky object kept in a plan
pub const DEFAULT_DSO_LIMIT: Magnitude = 5.0;

/// Lowest usable altitude (trees, walls, haze)
pub const DEFAULT_MIN_ALTITUDE: Degree = 20.0;

/// Highest usable altitude (mount limits near the zenith)
pub const DEFAULT_MAX_ALTITUDE: Degree = 70.0;
