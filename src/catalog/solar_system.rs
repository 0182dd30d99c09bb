//! # Solar-system bodies
//!
//! Planets from the JPL *approximate positions of the major planets* Keplerian elements
//! (E. M. Standish, valid 1800–2050) and the Moon from the Astronomical Almanac low-precision
//! lunar series. Both are good to a few arcminutes, far below what matters for choosing what
//! to look at and in which order.
//!
//! ## Pipeline (planets)
//!
//! ```text
//! elements(T) -> Kepler's equation -> heliocentric ecliptic J2000 (AU)
//!   minus Earth (EM barycenter), one light-time iteration
//!   -> geocentric equatorial J2000 -> precession -> horizontal
//! ```
//!
//! Apparent magnitudes use the classical `V(1,0) + 5·log10(r·Δ) + phase` expressions, angular
//! diameters the equatorial radius seen from Δ.
use nalgebra::Vector3;

use crate::constants::{
    ArcSec, Degree, Kilometer, Magnitude, Radian, AU, EARTH_RADIUS_KM, MJD, MOON_RADIUS_KM,
    RAD2ARC, RADEG, T2000,
};
use crate::earth_orientation::{centuries_since_j2000, ecliptic_to_equatorial, obleq, unit_vector};
use crate::observers::ObserverContext;
use crate::viewplan_errors::PositionError;

use super::{ComputedPosition, Ephemeris};

/// Light travel time for one astronomical unit, in days.
const LIGHT_TIME_PER_AU: f64 = 0.005_775_518_3;

const KEPLER_MAX_ITERATIONS: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Keplerian elements at J2000 and their rates per Julian century.
///
/// Order: `a` (AU), `e`, `I` (deg), mean longitude `L` (deg), longitude of perihelion `ϖ` (deg),
/// longitude of the ascending node `Ω` (deg).
struct OrbitalElements {
    at_j2000: [f64; 6],
    per_century: [f64; 6],
}

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};

const VENUS: OrbitalElements = OrbitalElements {
    at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};

const MARS: OrbitalElements = OrbitalElements {
    at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};

const JUPITER: OrbitalElements = OrbitalElements {
    at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};

const SATURN: OrbitalElements = OrbitalElements {
    at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};

const URANUS: OrbitalElements = OrbitalElements {
    at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};

/// Planets a plan can contain, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Jupiter,
    Mars,
    Saturn,
    Venus,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 6] = [
        Planet::Jupiter,
        Planet::Mars,
        Planet::Saturn,
        Planet::Venus,
        Planet::Uranus,
        Planet::Neptune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Jupiter => "Jupiter",
            Planet::Mars => "Mars",
            Planet::Saturn => "Saturn",
            Planet::Venus => "Venus",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    fn elements(&self) -> &'static OrbitalElements {
        match self {
            Planet::Jupiter => &JUPITER,
            Planet::Mars => &MARS,
            Planet::Saturn => &SATURN,
            Planet::Venus => &VENUS,
            Planet::Uranus => &URANUS,
            Planet::Neptune => &NEPTUNE,
        }
    }

    /// Equatorial radius, km.
    fn radius(&self) -> Kilometer {
        match self {
            Planet::Jupiter => 71_492.0,
            Planet::Mars => 3_396.2,
            Planet::Saturn => 60_268.0,
            Planet::Venus => 6_051.8,
            Planet::Uranus => 25_559.0,
            Planet::Neptune => 24_764.0,
        }
    }

    /// Apparent visual magnitude.
    ///
    /// Arguments
    /// ---------
    /// * `r`: Sun distance (AU).
    /// * `delta`: Earth distance (AU).
    /// * `phase`: phase angle (degrees).
    pub fn apparent_magnitude(&self, r: f64, delta: f64, phase: Degree) -> Magnitude {
        let distance_term = 5.0 * (r * delta).log10();
        let i = phase;
        match self {
            Planet::Venus => {
                -4.40 + distance_term + 0.0009 * i + 0.000239 * i.powi(2) - 0.00000065 * i.powi(3)
            }
            Planet::Mars => -1.52 + distance_term + 0.016 * i,
            Planet::Jupiter => -9.40 + distance_term + 0.005 * i,
            Planet::Saturn => -8.88 + distance_term + 0.044 * i,
            Planet::Uranus => -7.19 + distance_term,
            Planet::Neptune => -6.87 + distance_term,
        }
    }
}

/// Solve Kepler's equation `E − e·sin E = M` by Newton iteration.
fn eccentric_anomaly(mean_anomaly: Radian, e: f64) -> Option<Radian> {
    let m = (mean_anomaly + std::f64::consts::PI).rem_euclid(crate::constants::DPI)
        - std::f64::consts::PI;
    let mut ecc = m + e * m.sin();
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Some(ecc);
        }
    }
    None
}

/// Heliocentric position on the J2000 ecliptic, AU.
fn heliocentric_ecliptic(
    elements: &OrbitalElements,
    tjm: MJD,
    name: &str,
) -> Result<Vector3<f64>, PositionError> {
    let t = centuries_since_j2000(tjm);
    let [a, e, incl, mean_longitude, long_peri, long_node]: [f64; 6] =
        std::array::from_fn(|k| elements.at_j2000[k] + elements.per_century[k] * t);

    let arg_peri = (long_peri - long_node) * RADEG;
    let mean_anomaly = (mean_longitude - long_peri) * RADEG;
    let (incl, node) = (incl * RADEG, long_node * RADEG);

    let ecc = eccentric_anomaly(mean_anomaly, e)
        .ok_or_else(|| PositionError::KeplerNoConvergence(name.to_string()))?;

    let x_orb = a * (ecc.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ecc.sin();

    let (sw, cw) = arg_peri.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    Ok(Vector3::new(
        (cw * cn - sw * sn * ci) * x_orb + (-sw * cn - cw * sn * ci) * y_orb,
        (cw * sn + sw * cn * ci) * x_orb + (-sw * sn + cw * cn * ci) * y_orb,
        (sw * si) * x_orb + (cw * si) * y_orb,
    ))
}

/// Heliocentric position of the Earth (EM barycenter) on the J2000 ecliptic, AU.
pub fn earth_heliocentric(tjm: MJD) -> Result<Vector3<f64>, PositionError> {
    heliocentric_ecliptic(&EARTH_MOON_BARYCENTER, tjm, "Earth")
}

/// Geometry of a planet seen from the Earth at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetGeometry {
    /// Light-time corrected geocentric position, J2000 mean equator, AU.
    pub geocentric: Vector3<f64>,
    /// Sun distance, AU.
    pub sun_distance: f64,
    /// Earth distance, AU.
    pub earth_distance: f64,
    /// Sun–planet–Earth angle, degrees.
    pub phase_angle: Degree,
}

impl Planet {
    /// Geocentric geometry at a TT instant.
    pub fn geometry(&self, tjm: MJD) -> Result<PlanetGeometry, PositionError> {
        let earth = earth_heliocentric(tjm)?;
        let mut helio = heliocentric_ecliptic(self.elements(), tjm, self.name())?;

        // one light-time iteration is enough at this precision
        let delta = (helio - earth).norm();
        helio = heliocentric_ecliptic(
            self.elements(),
            tjm - delta * LIGHT_TIME_PER_AU,
            self.name(),
        )?;

        let geo_ecliptic = helio - earth;
        let r = helio.norm();
        let delta = geo_ecliptic.norm();
        let earth_sun = earth.norm();
        if delta <= f64::EPSILON {
            return Err(PositionError::DegenerateGeometry(self.name().to_string()));
        }

        let cos_phase = ((r * r + delta * delta - earth_sun * earth_sun) / (2.0 * r * delta))
            .clamp(-1.0, 1.0);

        Ok(PlanetGeometry {
            geocentric: ecliptic_to_equatorial(obleq(T2000)) * geo_ecliptic,
            sun_distance: r,
            earth_distance: delta,
            phase_angle: cos_phase.acos() / RADEG,
        })
    }
}

impl Ephemeris for Planet {
    fn compute_position(&self, ctx: &ObserverContext) -> Result<ComputedPosition, PositionError> {
        let geometry = self.geometry(ctx.mjd_tt())?;
        let (azimuth, altitude) =
            ctx.horizontal_from_vector(&(ctx.precession() * geometry.geocentric));

        let diameter: ArcSec =
            2.0 * (self.radius() / (geometry.earth_distance * AU)).atan() * RAD2ARC;

        Ok(ComputedPosition {
            azimuth,
            altitude,
            magnitude: self.apparent_magnitude(
                geometry.sun_distance,
                geometry.earth_distance,
                geometry.phase_angle,
            ),
            angular_size_arcsec: diameter,
        })
    }
}

fn sin_deg(x: Degree) -> f64 {
    (x * RADEG).sin()
}

fn cos_deg(x: Degree) -> f64 {
    (x * RADEG).cos()
}

/// Geocentric ecliptic longitude, latitude (of date, degrees) and horizontal parallax (degrees)
/// of the Moon.
pub fn moon_ecliptic(tjm: MJD) -> (Degree, Degree, Degree) {
    let t = centuries_since_j2000(tjm);

    let longitude = 218.32 + 481_267.881 * t + 6.29 * sin_deg(135.0 + 477_198.87 * t)
        - 1.27 * sin_deg(259.3 - 413_335.36 * t)
        + 0.66 * sin_deg(235.7 + 890_534.22 * t)
        + 0.21 * sin_deg(269.9 + 954_397.74 * t)
        - 0.19 * sin_deg(357.5 + 35_999.05 * t)
        - 0.11 * sin_deg(186.5 + 966_404.03 * t);

    let latitude = 5.13 * sin_deg(93.3 + 483_202.02 * t) + 0.28 * sin_deg(228.2 + 960_400.89 * t)
        - 0.28 * sin_deg(318.3 + 6_003.15 * t)
        - 0.17 * sin_deg(217.6 - 407_332.21 * t);

    let parallax = 0.9508
        + 0.0518 * cos_deg(135.0 + 477_198.87 * t)
        + 0.0095 * cos_deg(259.3 - 413_335.36 * t)
        + 0.0078 * cos_deg(235.7 + 890_534.22 * t)
        + 0.0028 * cos_deg(269.9 + 954_397.74 * t);

    (longitude.rem_euclid(360.0), latitude, parallax)
}

/// Geocentric position of the Moon on the true equator of date, km.
pub fn moon_geocentric(ctx: &ObserverContext) -> Vector3<f64> {
    let (longitude, latitude, parallax) = moon_ecliptic(ctx.mjd_tt());
    let distance = EARTH_RADIUS_KM / sin_deg(parallax);
    ecliptic_to_equatorial(ctx.obliquity()) * unit_vector(longitude * RADEG, latitude * RADEG) * distance
}

/// Horizontal position, magnitude and apparent diameter of the Moon for the observer.
pub fn moon_position(ctx: &ObserverContext) -> Result<ComputedPosition, PositionError> {
    let geocentric = moon_geocentric(ctx);
    let topocentric = ctx.topocentric_correction(&geocentric);
    let topo_distance = topocentric.norm();
    if !topo_distance.is_finite() || topo_distance <= MOON_RADIUS_KM {
        return Err(PositionError::DegenerateGeometry("Moon".to_string()));
    }

    // Sun seen from the Earth, same frame as the Moon
    let sun = ctx.precession()
        * ecliptic_to_equatorial(obleq(T2000))
        * (-earth_heliocentric(ctx.mjd_tt())?)
        * AU;

    let moon_distance = geocentric.norm();
    let sun_distance = sun.norm();
    let elongation = geocentric.angle(&sun);
    let phase = (sun_distance * elongation.sin())
        .atan2(moon_distance - sun_distance * elongation.cos())
        / RADEG;

    let (azimuth, altitude) = ctx.horizontal_from_vector(&topocentric);
    Ok(ComputedPosition {
        azimuth,
        altitude,
        magnitude: -12.73 + 0.026 * phase.abs() + 4e-9 * phase.powi(4),
        angular_size_arcsec: 2.0 * (MOON_RADIUS_KM / topo_distance).asin() * RAD2ARC,
    })
}
