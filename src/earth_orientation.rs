//! # Earth orientation
//!
//! The handful of rotations needed to turn J2000 catalogue coordinates into the equator of
//! date at a single instant: mean obliquity (IAU 1976), the dominant nutation terms, the
//! equation of the equinoxes and the IAU 1976 precession matrix.
//!
//! Planning tolerances are measured in arcminutes, so nutation keeps only its four largest
//! periodic terms (accuracy ≈ 0.5″).
//!
//! Conventions
//! -----------
//! [`rotmt`] is a **frame** rotation: `rotmt(α, k) · x` expresses the fixed vector `x` in axes
//! rotated by `+α` about axis `k`. All matrices here follow that convention.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{ArcSec, Radian, DAYS_PER_CENTURY, MJD, RADEG, RADSEC, T2000};

/// Julian centuries elapsed since J2000.0.
pub fn centuries_since_j2000(tjm: MJD) -> f64 {
    (tjm - T2000) / DAYS_PER_CENTURY
}

/// Frame rotation matrix of angle `alpha` (radians) around axis `k` (0 = X, 1 = Y, 2 = Z).
///
/// # Panics
///
/// Panics if `k > 2`.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0, 1 or 2)"),
    };

    Rotation3::from_axis_angle(&axis, -alpha).into()
}

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = centuries_since_j2000(tjm);

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity `(Δψ, Δε)` in arcseconds.
///
/// Only the four dominant terms of the IAU 1980 series are kept: the 18.6-year lunar node
/// term and the semi-annual / semi-monthly solar and lunar terms.
pub fn nutation(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = centuries_since_j2000(tjm);

    // longitude of the Moon's ascending node, mean longitudes of Sun and Moon
    let node = (125.04452 - 1934.136261 * t) * RADEG;
    let sun = (280.4665 + 36000.7698 * t) * RADEG;
    let moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * node.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * node).sin();
    let deps = 9.20 * node.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * node).cos();

    (dpsi, deps)
}

/// True obliquity of the ecliptic (mean obliquity + nutation in obliquity), in radians.
pub fn true_obliquity(tjm: MJD) -> Radian {
    let (_, deps) = nutation(tjm);
    obleq(tjm) + deps * RADSEC
}

/// Equation of the equinoxes `Δψ·cos ε` in radians (apparent minus mean sidereal time).
pub fn equequ(tjm: MJD) -> Radian {
    let (dpsi, _) = nutation(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix from the J2000 mean equator to the mean equator of date (IAU 1976).
///
/// `x_date = prec(tjm) · x_j2000`, built as `R3(−z) · R2(θ) · R3(−ζ)` with the
/// Lieske (1977) angles:
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let t = centuries_since_j2000(tjm);

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(-z, 2) * rotmt(theta, 1) * rotmt(-zeta, 2)
}

/// Rotation from ecliptic to equatorial axes for a given obliquity.
pub fn ecliptic_to_equatorial(obliquity: Radian) -> Matrix3<f64> {
    rotmt(-obliquity, 0)
}

/// Unit vector of spherical angles `(longitude, latitude)` in radians.
pub fn unit_vector(lon: Radian, lat: Radian) -> Vector3<f64> {
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Spherical angles `(longitude ∈ [0, 2π), latitude)` in radians of a (non-zero) vector.
pub fn spherical_angles(v: &Vector3<f64>) -> (Radian, Radian) {
    let lon = v.y.atan2(v.x).rem_euclid(crate::constants::DPI);
    let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt());
    (lon, lat)
}
