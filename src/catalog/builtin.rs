//! The catalogue shipped with the crate.
//!
//! * Planets: Jupiter, Mars, Saturn, Venus, Uranus, Neptune, plus the Moon.
//! * Stars: an embedded bright-star list reduced to its *notable* members (doubles, multiples,
//!   variables...). Entries described as a plain `"star"` are dropped.
//! * Deep-sky objects: the 110 Messier objects.
//!
//! The star and deep-sky lists can be replaced by user EDB files.
use camino::Utf8Path;

use crate::viewplan_errors::ViewPlanError;

use super::edb::{parse_edb, read_edb_file, EdbRecord};
use super::solar_system::Planet;
use super::{CatalogEntry, CatalogProvider, TargetClass};

static MESSIER_EDB: &str = include_str!("data/messier.edb");
static BRIGHT_STARS_EDB: &str = include_str!("data/bright_stars.edb");

/// Keep only stars with something to say for themselves.
fn notable_stars(records: Vec<EdbRecord>) -> Vec<CatalogEntry> {
    records
        .into_iter()
        .filter(|record| record.description() != "star")
        .map(|record| record.into_entry(TargetClass::Star))
        .collect()
}

fn deep_sky_objects(records: Vec<EdbRecord>) -> Vec<CatalogEntry> {
    records
        .into_iter()
        .map(|record| record.into_entry(TargetClass::Dso))
        .collect()
}

/// Embedded planets, notable stars and Messier objects.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    planets: Vec<CatalogEntry>,
    stars: Vec<CatalogEntry>,
    dsos: Vec<CatalogEntry>,
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        BuiltinCatalog::new()
    }
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        BuiltinCatalog {
            planets: Planet::ALL.into_iter().map(CatalogEntry::planet).collect(),
            stars: notable_stars(parse_edb(BRIGHT_STARS_EDB)),
            dsos: deep_sky_objects(parse_edb(MESSIER_EDB)),
        }
    }

    /// Replace the star list with the notable stars of an EDB file.
    pub fn with_star_file(mut self, path: &Utf8Path) -> Result<Self, ViewPlanError> {
        self.stars = notable_stars(read_edb_file(path)?);
        Ok(self)
    }

    /// Replace the deep-sky list with the objects of an EDB file.
    pub fn with_dso_file(mut self, path: &Utf8Path) -> Result<Self, ViewPlanError> {
        self.dsos = deep_sky_objects(read_edb_file(path)?);
        Ok(self)
    }
}

impl CatalogProvider for BuiltinCatalog {
    fn entries(&self, class: TargetClass) -> Vec<CatalogEntry> {
        match class {
            TargetClass::Planet => self.planets.clone(),
            TargetClass::Star => self.stars.clone(),
            TargetClass::Dso => self.dsos.clone(),
        }
    }

    fn moon(&self) -> Option<CatalogEntry> {
        Some(CatalogEntry::moon())
    }
}
