#![allow(dead_code)]

use std::sync::Arc;

use hifitime::Epoch;
use viewplan::catalog::{
    Body, CatalogEntry, CatalogProvider, ComputedPosition, Ephemeris, TargetClass,
};
use viewplan::observers::ObserverContext;
use viewplan::selection::CelestialTarget;
use viewplan::viewplan_errors::PositionError;

/// Ephemeris answering with a canned position or failure.
pub struct CannedEphemeris(pub Result<ComputedPosition, PositionError>);

impl Ephemeris for CannedEphemeris {
    fn compute_position(&self, _ctx: &ObserverContext) -> Result<ComputedPosition, PositionError> {
        self.0.clone()
    }
}

pub fn entry(name: &str, class: TargetClass, azimuth: f64, altitude: f64, magnitude: f64) -> CatalogEntry {
    let position = ComputedPosition {
        azimuth,
        altitude,
        magnitude,
        angular_size_arcsec: 0.0,
    };
    CatalogEntry::new(
        name,
        class,
        "test object",
        Some(magnitude),
        Body::External(Arc::new(CannedEphemeris(Ok(position)))),
    )
}

pub fn failing(name: &str, class: TargetClass) -> CatalogEntry {
    CatalogEntry::new(
        name,
        class,
        "test object",
        None,
        Body::External(Arc::new(CannedEphemeris(Err(
            PositionError::KeplerNoConvergence(name.to_string()),
        )))),
    )
}

/// In-memory catalog.
#[derive(Default)]
pub struct FakeCatalog {
    pub planets: Vec<CatalogEntry>,
    pub stars: Vec<CatalogEntry>,
    pub dsos: Vec<CatalogEntry>,
    pub moon: Option<CatalogEntry>,
}

impl FakeCatalog {
    pub fn with(mut self, entry: CatalogEntry) -> Self {
        match entry.class {
            TargetClass::Planet => self.planets.push(entry),
            TargetClass::Star => self.stars.push(entry),
            TargetClass::Dso => self.dsos.push(entry),
        }
        self
    }

    pub fn with_moon(mut self, azimuth: f64, altitude: f64) -> Self {
        let mut moon = entry("Moon", TargetClass::Planet, azimuth, altitude, -10.0);
        moon.description = "moon".to_string();
        self.moon = Some(moon);
        self
    }
}

impl CatalogProvider for FakeCatalog {
    fn entries(&self, class: TargetClass) -> Vec<CatalogEntry> {
        match class {
            TargetClass::Planet => self.planets.clone(),
            TargetClass::Star => self.stars.clone(),
            TargetClass::Dso => self.dsos.clone(),
        }
    }

    fn moon(&self) -> Option<CatalogEntry> {
        self.moon.clone()
    }
}

pub fn instant() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 9, 2, 4, 0, 0)
}

pub fn context() -> ObserverContext {
    ObserverContext::new(37.8376, -122.281, 14.0, instant(), None).unwrap()
}

pub fn names(targets: &[CelestialTarget]) -> Vec<&str> {
    targets.iter().map(CelestialTarget::name).collect()
}

pub fn sorted_names(targets: &[CelestialTarget]) -> Vec<String> {
    let mut names: Vec<String> = targets.iter().map(|t| t.name().to_string()).collect();
    names.sort_unstable();
    names
}
