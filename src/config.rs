//! # Run configuration
//!
//! A TOML file mirroring the command line. Every section and every key is optional; missing
//! values fall back to the defaults of an evening in Oakland, CA.
//!
//! ```toml
//! [location]
//! city = "Paris"                # wins over latitude/longitude when set
//! latitude = "37:50:15.3"
//! longitude = "-122:16:51.6"
//! elevation = 14.0
//! gazetteer = "my_sites.csv"    # extra name,latitude,longitude,elevation rows
//!
//! [filter]
//! include_planets = true
//! star_magnitude_limit = 2.5
//! dso_magnitude_limit = 5.0
//! min_altitude = 20.0
//! max_altitude = 70.0
//! always_include_moon = true
//!
//! [ordering]
//! policy = "azimuth"            # or "path"
//! bucket_width = 1.0
//!
//! [catalogs]
//! stars = "stars.edb"           # replaces the embedded notable stars
//! dsos = "ngc.edb"              # replaces the embedded Messier list
//!
//! [observer]
//! start = "in 2 hours"
//! refraction = true
//! ```
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{
    Degree, Meter, DEFAULT_ELEVATION, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use crate::observers::places::LocationSpec;
use crate::ordering::{OrderingPolicy, DEFAULT_BUCKET_WIDTH};
use crate::selection::FilterCriteria;
use crate::viewplan_errors::ViewPlanError;

/// `[location]`: where the observer stands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub city: Option<String>,
    /// Sexagesimal or decimal degrees, north positive.
    pub latitude: String,
    /// Sexagesimal or decimal degrees, east positive.
    pub longitude: String,
    pub elevation: Meter,
    /// Extra gazetteer CSV loaded on top of the embedded cities.
    pub gazetteer: Option<Utf8PathBuf>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            city: None,
            latitude: DEFAULT_LATITUDE.to_string(),
            longitude: DEFAULT_LONGITUDE.to_string(),
            elevation: DEFAULT_ELEVATION,
            gazetteer: None,
        }
    }
}

impl LocationConfig {
    /// The site as a [`LocationSpec`]: the city when one is named, the coordinates otherwise.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::InvalidAngle`] on an unreadable latitude or longitude.
    pub fn spec(&self) -> Result<LocationSpec, ViewPlanError> {
        match &self.city {
            Some(city) => Ok(LocationSpec::Named(city.clone())),
            None => LocationSpec::from_sexagesimal(&self.latitude, &self.longitude, self.elevation),
        }
    }
}

/// `[ordering]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    pub policy: String,
    pub bucket_width: Degree,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        OrderingConfig {
            policy: "azimuth".to_string(),
            bucket_width: DEFAULT_BUCKET_WIDTH,
        }
    }
}

impl OrderingConfig {
    pub fn policy(&self) -> Result<OrderingPolicy, ViewPlanError> {
        self.policy
            .parse::<OrderingPolicy>()?
            .with_bucket_width(self.bucket_width)
    }
}

/// `[catalogs]`: user EDB files replacing the embedded lists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub stars: Option<Utf8PathBuf>,
    pub dsos: Option<Utf8PathBuf>,
}

/// `[observer]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Start-time description; `None` means now.
    pub start: Option<String>,
    pub refraction: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        ObserverConfig {
            start: None,
            refraction: true,
        }
    }
}

/// Everything a planning run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub location: LocationConfig,
    pub filter: FilterCriteria,
    pub ordering: OrderingConfig,
    pub catalogs: CatalogConfig,
    pub observer: ObserverConfig,
}

impl PlanConfig {
    /// Read a configuration from a TOML file.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::IoError`] if the file cannot be read.
    /// * [`ViewPlanError::ConfigError`] if it is not a valid configuration.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ViewPlanError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(%path, "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ViewPlanError> {
        Ok(toml::from_str(content)?)
    }
}
