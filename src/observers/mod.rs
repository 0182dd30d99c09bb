//! # Observer context
//!
//! This module builds the **single, immutable frame** every position of a planning run is
//! computed in. An [`ObserverContext`](crate::observers::ObserverContext) snapshots the site
//! (geodetic latitude / longitude / elevation) and one UTC instant, then precomputes everything
//! that depends only on those:
//!
//! - MJD on the UTC (UT1 proxy) and TT scales,
//! - local apparent sidereal time,
//! - precession matrix J2000 → mean equator of date and true obliquity of date,
//! - geocentric parallax constants (ρ·cosφ′, ρ·sinφ′) for topocentric corrections.
//!
//! Nothing moves during a run: the Moon, the planets and every catalogue object are evaluated
//! against exactly this snapshot.
//!
//! ## Frames & conventions
//!
//! ```text
//! J2000 mean equator --(precession)--> mean equator of date --(LAST, latitude)--> horizontal
//! ```
//!
//! - Longitudes: **degrees**, east positive.
//! - Azimuth: **degrees** in `[0, 360)`, clockwise from north (east = 90°).
//! - Altitude: **degrees** in `[-90, 90]`, optionally corrected for atmospheric refraction.
//! - Elevation: **meters** above the reference ellipsoid.
//!
//! ## Resolution
//!
//! Sites are given either as coordinates or as a place name resolved through a
//! [`PlaceResolver`](crate::observers::places::PlaceResolver); see [`resolve_observer`].
//! Resolution failures are fatal and surface before any target is computed.
//!
//! ## See also
//! ------------
//! * [`gmst`](crate::time::gmst), [`equequ`](crate::earth_orientation::equequ) – sidereal time.
//! * [`prec`](crate::earth_orientation::prec) – precession matrix.
//! * [`Gazetteer`](crate::observers::places::Gazetteer) – built-in place names.

pub mod places;

use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};
use ordered_float::NotNan;

use crate::constants::{
    Degree, Meter, Radian, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, EARTH_RADIUS_KM, MJD, RADEG,
};
use crate::earth_orientation::{equequ, prec, spherical_angles, true_obliquity, unit_vector};
use crate::observers::places::{LocationSpec, PlaceResolver};
use crate::time::{gmst, mjd_tt, mjd_utc};
use crate::viewplan_errors::ViewPlanError;

/// Standard atmosphere used for refraction (hPa, °C), as in PyEphem's defaults.
const REFRACTION_PRESSURE: f64 = 1010.0;
const REFRACTION_TEMPERATURE: f64 = 15.0;

/// Fixed location + time frame of one planning run.
///
/// Built once by [`ObserverContext::new`] (or [`resolve_observer`]) and then only read.
/// All fields are private so the snapshot cannot drift mid-run.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverContext {
    latitude: NotNan<f64>,
    longitude: NotNan<f64>,
    elevation: NotNan<f64>,
    name: Option<String>,
    instant: Epoch,
    refraction: bool,

    mjd_utc: MJD,
    mjd_tt: MJD,
    local_sidereal_time: Radian,
    precession: Matrix3<f64>,
    obliquity: Radian,
    rho_cos_phi: f64,
    rho_sin_phi: f64,
}

impl ObserverContext {
    /// Create the observer frame for a site and an instant.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: geodetic latitude in **degrees** (north positive), within `[-90, 90]`.
    /// * `longitude`: longitude in **degrees** (east positive), within `[-180, 360)`.
    /// * `elevation`: height above the ellipsoid in **meters**.
    /// * `instant`: the observation instant.
    /// * `name`: optional site label (the resolved place name).
    ///
    /// Return
    /// ------
    /// * The frozen [`ObserverContext`], refraction enabled.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::NonFiniteInput`] if any coordinate is NaN.
    /// * [`ViewPlanError::InvalidCoordinate`] if a coordinate is out of range or infinite.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
        instant: Epoch,
        name: Option<String>,
    ) -> Result<Self, ViewPlanError> {
        let latitude = NotNan::new(latitude)?;
        let longitude = NotNan::new(longitude)?;
        let elevation = NotNan::new(elevation)?;

        if !(-90.0..=90.0).contains(&latitude.into_inner()) {
            return Err(ViewPlanError::InvalidCoordinate {
                name: "latitude",
                value: latitude.into_inner(),
            });
        }
        if !(-180.0..360.0).contains(&longitude.into_inner()) {
            return Err(ViewPlanError::InvalidCoordinate {
                name: "longitude",
                value: longitude.into_inner(),
            });
        }
        if !elevation.is_finite() {
            return Err(ViewPlanError::InvalidCoordinate {
                name: "elevation",
                value: elevation.into_inner(),
            });
        }

        let mjd_utc = mjd_utc(&instant);
        let mjd_tt = mjd_tt(&instant);

        let last = (gmst(mjd_utc) + equequ(mjd_tt) + longitude.into_inner() * RADEG).rem_euclid(DPI);
        let (rho_cos_phi, rho_sin_phi) =
            geodetic_to_parallax(latitude.into_inner(), elevation.into_inner());

        Ok(ObserverContext {
            latitude,
            longitude,
            elevation,
            name,
            instant,
            refraction: true,
            mjd_utc,
            mjd_tt,
            local_sidereal_time: last,
            precession: prec(mjd_tt),
            obliquity: true_obliquity(mjd_tt),
            rho_cos_phi,
            rho_sin_phi,
        })
    }

    /// Same frame with atmospheric refraction switched on or off.
    pub fn with_refraction(mut self, refraction: bool) -> Self {
        self.refraction = refraction;
        self
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.into_inner()
    }

    pub fn elevation(&self) -> Meter {
        self.elevation.into_inner()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn instant(&self) -> Epoch {
        self.instant
    }

    pub fn refraction(&self) -> bool {
        self.refraction
    }

    pub fn mjd_utc(&self) -> MJD {
        self.mjd_utc
    }

    pub fn mjd_tt(&self) -> MJD {
        self.mjd_tt
    }

    /// Local apparent sidereal time, radians in `[0, 2π)`.
    pub fn local_sidereal_time(&self) -> Radian {
        self.local_sidereal_time
    }

    /// Precession matrix J2000 → mean equator of date.
    pub fn precession(&self) -> &Matrix3<f64> {
        &self.precession
    }

    /// True obliquity of the ecliptic of date, radians.
    pub fn obliquity(&self) -> Radian {
        self.obliquity
    }

    /// Geocentric parallax constants (ρ·cosφ′, ρ·sinφ′) in Earth radii.
    pub fn parallax(&self) -> (f64, f64) {
        (self.rho_cos_phi, self.rho_sin_phi)
    }

    /// Geocentric position of the observer on the equator of date, in kilometers.
    pub fn geocentric_position_km(&self) -> Vector3<f64> {
        let theta = self.local_sidereal_time;
        Vector3::new(
            EARTH_RADIUS_KM * self.rho_cos_phi * theta.cos(),
            EARTH_RADIUS_KM * self.rho_cos_phi * theta.sin(),
            EARTH_RADIUS_KM * self.rho_sin_phi,
        )
    }

    /// Shift a geocentric equator-of-date position (km) to the observer's site.
    ///
    /// Only matters for the Moon: for anything farther away the shift is below an arcsecond.
    pub fn topocentric_correction(&self, geocentric_km: &Vector3<f64>) -> Vector3<f64> {
        geocentric_km - self.geocentric_position_km()
    }

    /// Horizontal coordinates of a direction given on the equator of date.
    ///
    /// Arguments
    /// ---------
    /// * `ra`: right ascension of date, radians.
    /// * `dec`: declination of date, radians.
    ///
    /// Return
    /// ------
    /// * `(azimuth, altitude)` in degrees; azimuth in `[0, 360)` clockwise from north,
    ///   altitude in `[-90, 90]`, refracted when the context has refraction enabled.
    pub fn horizontal_from_equatorial(&self, ra: Radian, dec: Radian) -> (Degree, Degree) {
        let phi = self.latitude() * RADEG;
        let hour_angle = self.local_sidereal_time - ra;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_dec, cos_dec) = dec.sin_cos();
        let (sin_h, cos_h) = hour_angle.sin_cos();

        let sin_alt = (sin_phi * sin_dec + cos_phi * cos_dec * cos_h).clamp(-1.0, 1.0);
        let mut altitude = sin_alt.asin() / RADEG;

        let y = -cos_dec * sin_h;
        let x = sin_dec * cos_phi - cos_dec * sin_phi * cos_h;
        let mut azimuth = y.atan2(x).rem_euclid(DPI) / RADEG;
        if azimuth >= 360.0 {
            azimuth = 0.0;
        }

        if self.refraction {
            altitude = (altitude + refraction(altitude)).min(90.0);
        }

        (azimuth, altitude)
    }

    /// Horizontal coordinates of a direction on the J2000 mean equator (catalogue coordinates).
    pub fn horizontal_from_j2000(&self, ra: Radian, dec: Radian) -> (Degree, Degree) {
        self.horizontal_from_vector(&(self.precession * unit_vector(ra, dec)))
    }

    /// Horizontal coordinates of any non-zero vector expressed on the equator of date.
    pub fn horizontal_from_vector(&self, v: &Vector3<f64>) -> (Degree, Degree) {
        let (ra, dec) = spherical_angles(v);
        self.horizontal_from_equatorial(ra, dec)
    }
}

/// Atmospheric refraction in degrees for a true (airless) altitude in degrees.
///
/// Saemundsson's formula scaled to [`REFRACTION_PRESSURE`] / [`REFRACTION_TEMPERATURE`];
/// zero below −1° where the formula diverges.
pub fn refraction(altitude: Degree) -> Degree {
    if altitude < -1.0 {
        return 0.0;
    }
    let arcmin = 1.02 / ((altitude + 10.3 / (altitude + 5.11)) * RADEG).tan();
    let scale = (REFRACTION_PRESSURE / 1010.0) * (283.0 / (273.0 + REFRACTION_TEMPERATURE));
    (arcmin * scale / 60.0).max(0.0)
}

/// Convert geodetic latitude (degrees) and height (meters) into normalized parallax
/// coordinates `(ρ·cosφ′, ρ·sinφ′)`, in units of the Earth's equatorial radius.
///
/// ```text
/// u = atan( (sin φ · (b/a)) / cos φ )
/// ρ·sinφ′ = (b/a)·sin u + (h/a)·sin φ
/// ρ·cosφ′ = cos u + (h/a)·cos φ
/// ```
///
/// where `a`, `b` are [`EARTH_MAJOR_AXIS`] and [`EARTH_MINOR_AXIS`].
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    let lat = lat * RADEG;
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Build the run's [`ObserverContext`] from a location specification.
///
/// Named places go through `resolver`; explicit coordinates are used as given.
///
/// Errors
/// ------
/// * [`ViewPlanError::UnknownPlace`] when the resolver does not know the name.
/// * Any validation error of [`ObserverContext::new`].
pub fn resolve_observer(
    location: &LocationSpec,
    resolver: &dyn PlaceResolver,
    instant: Epoch,
) -> Result<ObserverContext, ViewPlanError> {
    match location {
        LocationSpec::Named(name) => {
            let place = resolver.resolve(name)?;
            ObserverContext::new(
                place.latitude,
                place.longitude,
                place.elevation,
                instant,
                Some(place.name),
            )
        }
        LocationSpec::Coordinates {
            latitude,
            longitude,
            elevation,
        } => ObserverContext::new(*latitude, *longitude, *elevation, instant, None),
    }
}
