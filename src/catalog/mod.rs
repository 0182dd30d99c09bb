//! # Catalog
//!
//! Everything a plan can point a telescope at, grouped in three [`TargetClass`]es, and the
//! capability to compute where each of them is for a given [`ObserverContext`].
//!
//! ## Overview
//!
//! - [`CatalogEntry`] carries the identifying metadata (name, descriptive tag, reference
//!   magnitude) and a [`Body`] that knows how to compute itself.
//! - [`Ephemeris`] is the position capability: `ObserverContext -> ComputedPosition`, fallible
//!   per object with a [`PositionError`].
//! - [`CatalogProvider`] enumerates entries per class. [`BuiltinCatalog`](crate::catalog::builtin::BuiltinCatalog)
//!   is the default implementation (planets, Moon, Messier objects, notable stars).
//!
//! ## Sub-modules
//!
//! - [`edb`] – XEphem database line parser for fixed objects.
//! - [`fixed`] – stars and deep-sky objects on the J2000 catalogue frame.
//! - [`solar_system`] – planets from Keplerian elements and the Moon from a short lunar series.
//! - [`builtin`] – embedded catalogues.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{ArcSec, Degree, Magnitude};
use crate::observers::ObserverContext;
use crate::viewplan_errors::{PositionError, ViewPlanError};

pub mod builtin;
pub mod edb;
pub mod fixed;
pub mod solar_system;

use fixed::FixedBody;
use solar_system::Planet;

/// Class of a catalogued object, driving which filters apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetClass {
    Planet,
    Star,
    Dso,
}

impl TargetClass {
    pub const ALL: [TargetClass; 3] = [TargetClass::Planet, TargetClass::Star, TargetClass::Dso];
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetClass::Planet => "Planet",
            TargetClass::Star => "Star",
            TargetClass::Dso => "DSO",
        };
        write!(f, "{label}")
    }
}

impl FromStr for TargetClass {
    type Err = ViewPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planet" | "planets" => Ok(TargetClass::Planet),
            "star" | "stars" => Ok(TargetClass::Star),
            "dso" | "dsos" | "deep-sky" | "deepsky" => Ok(TargetClass::Dso),
            _ => Err(ViewPlanError::InvalidTargetClass(s.to_string())),
        }
    }
}

/// Where an object is, and how bright and large it looks, for one observer frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPosition {
    /// Degrees in `[0, 360)`, clockwise from north.
    pub azimuth: Degree,
    /// Degrees in `[-90, 90]`.
    pub altitude: Degree,
    pub magnitude: Magnitude,
    /// Apparent major axis; `0.0` for point sources.
    pub angular_size_arcsec: ArcSec,
}

impl ComputedPosition {
    /// Reject non-finite results so a bad computation never reaches the filters.
    pub fn checked(self) -> Result<Self, PositionError> {
        if !self.azimuth.is_finite() {
            return Err(PositionError::NonFinite("azimuth"));
        }
        if !self.altitude.is_finite() {
            return Err(PositionError::NonFinite("altitude"));
        }
        if !self.magnitude.is_finite() {
            return Err(PositionError::NonFinite("magnitude"));
        }
        Ok(self)
    }
}

/// Position capability of a catalogued object.
pub trait Ephemeris {
    /// Compute azimuth, altitude and magnitude for the given observer frame.
    ///
    /// Errors
    /// ------
    /// * [`PositionError`] when this object cannot be computed. Being below the horizon is not
    ///   an error.
    fn compute_position(&self, ctx: &ObserverContext) -> Result<ComputedPosition, PositionError>;
}

/// How an entry computes its position.
#[derive(Clone)]
pub enum Body {
    /// Star or deep-sky object with catalogue coordinates.
    Fixed(FixedBody),
    /// Major planet.
    Planet(Planet),
    /// Earth's Moon.
    Moon,
    /// Positions supplied by another ephemeris engine.
    External(Arc<dyn Ephemeris + Send + Sync>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Fixed(body) => f.debug_tuple("Fixed").field(body).finish(),
            Body::Planet(planet) => f.debug_tuple("Planet").field(planet).finish(),
            Body::Moon => write!(f, "Moon"),
            Body::External(_) => write!(f, "External"),
        }
    }
}

/// A named object of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub class: TargetClass,
    /// Short descriptive tag, e.g. `"spiral galaxy"`, `"double star"`, `"planet"`.
    pub description: String,
    /// Catalogue magnitude; `None` when it varies (planets, Moon).
    pub reference_magnitude: Option<Magnitude>,
    pub body: Body,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        class: TargetClass,
        description: impl Into<String>,
        reference_magnitude: Option<Magnitude>,
        body: Body,
    ) -> Self {
        CatalogEntry {
            name: name.into(),
            class,
            description: description.into(),
            reference_magnitude,
            body,
        }
    }

    /// Catalog entry of the Moon.
    pub fn moon() -> Self {
        CatalogEntry::new("Moon", TargetClass::Planet, "moon", None, Body::Moon)
    }

    /// Catalog entry of a major planet.
    pub fn planet(planet: Planet) -> Self {
        CatalogEntry::new(
            planet.name(),
            TargetClass::Planet,
            "planet",
            None,
            Body::Planet(planet),
        )
    }
}

impl Ephemeris for CatalogEntry {
    fn compute_position(&self, ctx: &ObserverContext) -> Result<ComputedPosition, PositionError> {
        let position = match &self.body {
            Body::Fixed(body) => body.compute_position(ctx),
            Body::Planet(planet) => planet.compute_position(ctx),
            Body::Moon => solar_system::moon_position(ctx),
            Body::External(ephemeris) => ephemeris.compute_position(ctx),
        }?;
        position.checked()
    }
}

/// Source of catalog entries, enumerated per class.
pub trait CatalogProvider {
    /// Entries of one class, in catalogue order.
    fn entries(&self, class: TargetClass) -> Vec<CatalogEntry>;

    /// The Moon, when this provider knows it.
    fn moon(&self) -> Option<CatalogEntry>;
}
