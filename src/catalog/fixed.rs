//! Stars and deep-sky objects: catalogue coordinates brought to the observer's sky.
use nalgebra::Matrix3;

use crate::constants::{ArcSec, Magnitude, Radian, MJD, RADSEC};
use crate::earth_orientation::{prec, unit_vector};
use crate::observers::ObserverContext;
use crate::viewplan_errors::PositionError;

use super::{ComputedPosition, Ephemeris};

/// Object with fixed catalogue coordinates (plus proper motion).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBody {
    ra: Radian,
    dec: Radian,
    /// mas/yr, RA component measured on the sky.
    proper_motion: (f64, f64),
    epoch: MJD,
    /// Rotation from the catalogue equinox to J2000.
    to_j2000: Matrix3<f64>,
    magnitude: Magnitude,
    size: ArcSec,
}

impl FixedBody {
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: catalogue coordinates, radians, on the mean equator of `epoch`.
    /// * `proper_motion`: `(μα·cosδ, μδ)` in mas/yr.
    /// * `epoch`: equinox and epoch of the coordinates (MJD, TT).
    /// * `magnitude`: catalogue visual magnitude.
    /// * `size`: major axis, arcseconds.
    pub fn new(
        ra: Radian,
        dec: Radian,
        proper_motion: (f64, f64),
        epoch: MJD,
        magnitude: Magnitude,
        size: ArcSec,
    ) -> Self {
        FixedBody {
            ra,
            dec,
            proper_motion,
            epoch,
            to_j2000: prec(epoch).transpose(),
            magnitude,
            size,
        }
    }

    /// Object on the J2000 frame without proper motion.
    pub fn j2000(ra: Radian, dec: Radian, magnitude: Magnitude, size: ArcSec) -> Self {
        FixedBody::new(ra, dec, (0.0, 0.0), crate::constants::T2000, magnitude, size)
    }

    pub fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    pub fn size(&self) -> ArcSec {
        self.size
    }

    /// Catalogue coordinates moved along the proper motion to the observation date.
    fn coordinates_at(&self, tjm: MJD) -> (Radian, Radian) {
        let years = (tjm - self.epoch) / 365.25;
        let (pm_ra, pm_dec) = self.proper_motion;
        let dec = self.dec + pm_dec * 1e-3 * RADSEC * years;
        let ra = self.ra + pm_ra * 1e-3 * RADSEC * years / self.dec.cos();
        (ra, dec)
    }
}

impl Ephemeris for FixedBody {
    fn compute_position(&self, ctx: &ObserverContext) -> Result<ComputedPosition, PositionError> {
        if !self.ra.is_finite() || !self.dec.is_finite() {
            return Err(PositionError::NonFinite("catalogue coordinates"));
        }

        let (ra, dec) = self.coordinates_at(ctx.mjd_tt());
        let of_date = ctx.precession() * self.to_j2000 * unit_vector(ra, dec);
        if of_date.iter().any(|c| !c.is_finite()) {
            return Err(PositionError::NonFinite("direction of date"));
        }

        let (azimuth, altitude) = ctx.horizontal_from_vector(&of_date);
        Ok(ComputedPosition {
            azimuth,
            altitude,
            magnitude: self.magnitude,
            angular_size_arcsec: self.size,
        })
    }
}
