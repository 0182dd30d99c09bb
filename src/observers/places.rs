//! Place names and site specifications.
//!
//! A run's site is either a named place or explicit coordinates ([`LocationSpec`]). Names are
//! resolved through the [`PlaceResolver`] capability; [`Gazetteer`] is the built-in
//! implementation, an embedded CSV table of major cities that can be extended from files.
use std::collections::HashMap;
use std::io::Read;

use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;

use crate::constants::{Degree, Meter};
use crate::conversion::parse_sexagesimal;
use crate::viewplan_errors::ViewPlanError;

const BUILTIN_CITIES: &str = include_str!("data/cities.csv");

/// A named site with geodetic coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    /// Degrees, north positive.
    pub latitude: Degree,
    /// Degrees, east positive.
    pub longitude: Degree,
    /// Meters above sea level.
    #[serde(default)]
    pub elevation: Meter,
}

/// Where the observer stands, as given by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    Named(String),
    Coordinates {
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
    },
}

impl LocationSpec {
    /// Build a coordinate spec from sexagesimal strings (`"37:50:15.3"`, `"-122 16 51.6"`, `"12.5"`).
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::InvalidAngle`] naming the offending string.
    pub fn from_sexagesimal(
        latitude: &str,
        longitude: &str,
        elevation: Meter,
    ) -> Result<Self, ViewPlanError> {
        let parse = |raw: &str| {
            parse_sexagesimal(raw).ok_or_else(|| ViewPlanError::InvalidAngle(raw.to_string()))
        };
        Ok(LocationSpec::Coordinates {
            latitude: parse(latitude)?,
            longitude: parse(longitude)?,
            elevation,
        })
    }
}

/// Capability turning a place name into coordinates.
pub trait PlaceResolver {
    /// Errors
    /// ------
    /// * [`ViewPlanError::UnknownPlace`] when the name is not known.
    fn resolve(&self, name: &str) -> Result<Place, ViewPlanError>;
}

/// Case-insensitive table of named places.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: HashMap<String, Place>,
}

fn lookup_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Gazetteer {
    /// The embedded city table.
    pub fn builtin() -> Result<Self, ViewPlanError> {
        Self::from_reader(BUILTIN_CITIES.as_bytes())
    }

    /// Read a `name,latitude,longitude,elevation` CSV table (header required, elevation optional).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ViewPlanError> {
        let mut gazetteer = Gazetteer::default();
        gazetteer.extend_from_reader(reader)?;
        Ok(gazetteer)
    }

    /// Add every place of a CSV table; later entries replace earlier ones with the same name.
    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, ViewPlanError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut count = 0;
        for record in csv_reader.deserialize::<Place>() {
            self.insert(record?);
            count += 1;
        }
        Ok(count)
    }

    /// Add the places of a CSV file.
    pub fn extend_from_path(&mut self, path: &Utf8Path) -> Result<usize, ViewPlanError> {
        let file = std::fs::File::open(path)?;
        let count = self.extend_from_reader(file)?;
        debug!(%path, count, "loaded extra places");
        Ok(count)
    }

    pub fn insert(&mut self, place: Place) {
        self.places.insert(lookup_key(&place.name), place);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Known names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.places.values().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl PlaceResolver for Gazetteer {
    fn resolve(&self, name: &str) -> Result<Place, ViewPlanError> {
        self.places
            .get(&lookup_key(name))
            .cloned()
            .ok_or_else(|| ViewPlanError::UnknownPlace(name.to_string()))
    }
}
