//! # Target selection
//!
//! Turns catalog entries into the [`CelestialTarget`]s worth pointing a telescope at.
//!
//! For every requested [`TargetClass`] each entry is computed against the run's
//! [`ObserverContext`] and kept when
//!
//! 1. its altitude lies in `[min_altitude, max_altitude]` (both ends inclusive),
//! 2. its magnitude is at or below the ceiling of its class (inclusive): the star ceiling for
//!    stars, the DSO ceiling for deep-sky objects, no ceiling at all for planets.
//!
//! When no class is requested the plan defaults to planets and deep-sky objects; stars are
//! opt-in only. The Moon is governed by [`FilterCriteria::always_include_moon`].
//!
//! A [`PositionError`](crate::viewplan_errors::PositionError) on one entry drops that entry
//! and nothing else.
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogEntry, CatalogProvider, ComputedPosition, Ephemeris, TargetClass};
use crate::constants::{
    ArcSec, Degree, Magnitude, DEFAULT_DSO_LIMIT, DEFAULT_MAX_ALTITUDE, DEFAULT_MIN_ALTITUDE,
    DEFAULT_STAR_LIMIT,
};
use crate::observers::ObserverContext;
use crate::viewplan_errors::ViewPlanError;

/// What a plan may contain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub include_planets: bool,
    pub include_stars: bool,
    pub include_dsos: bool,
    /// Faintest star kept.
    pub star_magnitude_limit: Magnitude,
    /// Faintest deep-sky object kept.
    pub dso_magnitude_limit: Magnitude,
    pub min_altitude: Degree,
    pub max_altitude: Degree,
    /// Add the Moon whatever classes are requested; when `false` the Moon comes with the
    /// planets only.
    pub always_include_moon: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            include_planets: false,
            include_stars: false,
            include_dsos: false,
            star_magnitude_limit: DEFAULT_STAR_LIMIT,
            dso_magnitude_limit: DEFAULT_DSO_LIMIT,
            min_altitude: DEFAULT_MIN_ALTITUDE,
            max_altitude: DEFAULT_MAX_ALTITUDE,
            always_include_moon: true,
        }
    }
}

impl FilterCriteria {
    /// Classes the plan is built from: the requested ones, or planets + DSOs when none is.
    pub fn effective_classes(&self) -> Vec<TargetClass> {
        if !(self.include_planets || self.include_stars || self.include_dsos) {
            return vec![TargetClass::Planet, TargetClass::Dso];
        }
        let requested = [
            (TargetClass::Planet, self.include_planets),
            (TargetClass::Star, self.include_stars),
            (TargetClass::Dso, self.include_dsos),
        ];
        requested
            .into_iter()
            .filter_map(|(class, wanted)| wanted.then_some(class))
            .collect()
    }

    /// Magnitude ceiling of a class, `None` for planets.
    pub fn magnitude_limit(&self, class: TargetClass) -> Option<Magnitude> {
        match class {
            TargetClass::Planet => None,
            TargetClass::Star => Some(self.star_magnitude_limit),
            TargetClass::Dso => Some(self.dso_magnitude_limit),
        }
    }

    /// Whether the Moon belongs in the plan.
    pub fn wants_moon(&self) -> bool {
        self.always_include_moon || self.effective_classes().contains(&TargetClass::Planet)
    }

    /// Check the criteria before any target is computed.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::InvalidAltitudeBand`] when a bound is not finite or `min > max`.
    /// * [`ViewPlanError::InvalidMagnitudeLimit`] when a ceiling is not finite.
    pub fn validate(&self) -> Result<(), ViewPlanError> {
        let (min, max) = (self.min_altitude, self.max_altitude);
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ViewPlanError::InvalidAltitudeBand { min, max });
        }
        for (class, value) in [
            ("stars", self.star_magnitude_limit),
            ("DSOs", self.dso_magnitude_limit),
        ] {
            if !value.is_finite() {
                return Err(ViewPlanError::InvalidMagnitudeLimit { class, value });
            }
        }
        Ok(())
    }

    /// Inclusive altitude band and class ceiling.
    pub fn accepts(&self, class: TargetClass, position: &ComputedPosition) -> bool {
        let in_band = (self.min_altitude..=self.max_altitude).contains(&position.altitude);
        let bright_enough = self
            .magnitude_limit(class)
            .map_or(true, |limit| position.magnitude <= limit);
        in_band && bright_enough
    }
}

/// Suggested eyepiece focal length for an object.
///
/// Point sources (stars, double and variable stars catalogued as DSOs, anything under an
/// arcsecond) get no suggestion; extended objects get `max(3, ⌊size · 0.004⌋)` millimetres,
/// sized so the object fills a typical field.
pub fn eyepiece_hint(class: TargetClass, description: &str, angular_size: ArcSec) -> Option<String> {
    let stellar = class == TargetClass::Star || description.contains("star");
    if stellar || angular_size.is_nan() || angular_size < 1.0 {
        return None;
    }
    let mm = ((angular_size * 0.004).floor() as u32).max(3);
    Some(format!("{mm}mm"))
}

/// One entry of a viewing plan, with everything computed for the run's observer.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialTarget {
    name: String,
    class: TargetClass,
    description: String,
    magnitude: Magnitude,
    azimuth: Degree,
    altitude: Degree,
    angular_size: ArcSec,
    eyepiece: Option<String>,
}

impl CelestialTarget {
    pub fn new(entry: &CatalogEntry, position: ComputedPosition) -> Self {
        CelestialTarget {
            name: entry.name.clone(),
            class: entry.class,
            description: entry.description.clone(),
            magnitude: position.magnitude,
            azimuth: position.azimuth,
            altitude: position.altitude,
            angular_size: position.angular_size_arcsec,
            eyepiece: eyepiece_hint(entry.class, &entry.description, position.angular_size_arcsec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> TargetClass {
        self.class
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    /// Degrees clockwise from north, `[0, 360)`.
    pub fn azimuth(&self) -> Degree {
        self.azimuth
    }

    /// Degrees above the horizon.
    pub fn altitude(&self) -> Degree {
        self.altitude
    }

    pub fn angular_size(&self) -> ArcSec {
        self.angular_size
    }

    pub fn eyepiece(&self) -> Option<&str> {
        self.eyepiece.as_deref()
    }
}

/// Compute one entry and apply the criteria to it.
fn evaluate(
    ctx: &ObserverContext,
    entry: &CatalogEntry,
    criteria: &FilterCriteria,
) -> Option<CelestialTarget> {
    let position = match entry.compute_position(ctx) {
        Ok(position) => position,
        Err(err) => {
            debug!(name = %entry.name, error = %err, "dropped: position unavailable");
            return None;
        }
    };

    if !criteria.accepts(entry.class, &position) {
        debug!(
            name = %entry.name,
            altitude = position.altitude,
            magnitude = position.magnitude,
            "filtered out"
        );
        return None;
    }

    Some(CelestialTarget::new(entry, position))
}

/// Build the (unordered) target set of a run.
///
/// Arguments
/// ---------
/// * `ctx`: the run's observer frame.
/// * `provider`: where the entries come from.
/// * `criteria`: validated filter criteria (see [`FilterCriteria::validate`]).
///
/// Return
/// ------
/// * The surviving targets, class by class in catalogue order (planets, stars, DSOs), the
///   Moon following the planets. Empty when nothing passes.
pub fn select_targets(
    ctx: &ObserverContext,
    provider: &dyn CatalogProvider,
    criteria: &FilterCriteria,
) -> Vec<CelestialTarget> {
    let classes = criteria.effective_classes();
    let moon = if criteria.wants_moon() {
        provider.moon()
    } else {
        None
    };

    let mut candidates: Vec<CatalogEntry> = Vec::new();
    if !classes.contains(&TargetClass::Planet) {
        candidates.extend(moon.clone());
    }
    for class in &classes {
        candidates.extend(provider.entries(*class));
        if *class == TargetClass::Planet {
            candidates.extend(moon.clone());
        }
    }

    let targets: Vec<CelestialTarget> = candidates
        .iter()
        .filter_map(|entry| evaluate(ctx, entry, criteria))
        .collect();

    debug!(
        candidates = candidates.len(),
        selected = targets.len(),
        "target selection done"
    );
    targets
}

#[cfg(test)]
mod selection_test {
    use super::*;

    fn position(altitude: f64, magnitude: f64) -> ComputedPosition {
        ComputedPosition {
            azimuth: 180.0,
            altitude,
            magnitude,
            angular_size_arcsec: 0.0,
        }
    }

    #[test]
    fn test_default_classes() {
        let criteria = FilterCriteria::default();
        assert_eq!(
            criteria.effective_classes(),
            [TargetClass::Planet, TargetClass::Dso]
        );

        let stars_only = FilterCriteria {
            include_stars: true,
            ..Default::default()
        };
        assert_eq!(stars_only.effective_classes(), [TargetClass::Star]);
    }

    #[test]
    fn test_moon_flag() {
        let stars_only = FilterCriteria {
            include_stars: true,
            ..Default::default()
        };
        assert!(stars_only.wants_moon());

        let no_moon = FilterCriteria {
            always_include_moon: false,
            ..stars_only.clone()
        };
        assert!(!no_moon.wants_moon());

        // defaulted planets still bring the Moon
        let defaulted = FilterCriteria {
            always_include_moon: false,
            ..Default::default()
        };
        assert!(defaulted.wants_moon());
    }

    #[test]
    fn test_inclusive_bounds() {
        let criteria = FilterCriteria::default();
        assert!(criteria.accepts(TargetClass::Dso, &position(20.0, 5.0)));
        assert!(criteria.accepts(TargetClass::Dso, &position(70.0, 5.0)));
        assert!(!criteria.accepts(TargetClass::Dso, &position(19.999, 1.0)));
        assert!(!criteria.accepts(TargetClass::Dso, &position(70.001, 1.0)));
        assert!(!criteria.accepts(TargetClass::Dso, &position(45.0, 5.01)));

        assert!(criteria.accepts(TargetClass::Star, &position(45.0, 2.5)));
        assert!(!criteria.accepts(TargetClass::Star, &position(45.0, 2.6)));

        // no ceiling for planets
        assert!(criteria.accepts(TargetClass::Planet, &position(45.0, 30.0)));
    }

    #[test]
    fn test_validate() {
        assert_eq!(FilterCriteria::default().validate(), Ok(()));

        let inverted = FilterCriteria {
            min_altitude: 60.0,
            max_altitude: 30.0,
            ..Default::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ViewPlanError::InvalidAltitudeBand {
                min: 60.0,
                max: 30.0
            })
        );

        let nan_limit = FilterCriteria {
            dso_magnitude_limit: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_limit.validate(),
            Err(ViewPlanError::InvalidMagnitudeLimit { class: "DSOs", .. })
        ));

        let degenerate_band = FilterCriteria {
            min_altitude: 45.0,
            max_altitude: 45.0,
            ..Default::default()
        };
        assert_eq!(degenerate_band.validate(), Ok(()));
    }

    #[test]
    fn test_eyepiece_hint() {
        assert_eq!(eyepiece_hint(TargetClass::Star, "star", 5000.0), None);
        assert_eq!(eyepiece_hint(TargetClass::Dso, "spiral galaxy", 0.5), None);
        assert_eq!(eyepiece_hint(TargetClass::Planet, "planet", 0.0), None);
        assert_eq!(eyepiece_hint(TargetClass::Planet, "planet", 48.0).as_deref(), Some("3mm"));
        assert_eq!(eyepiece_hint(TargetClass::Dso, "open cluster", 1800.0).as_deref(), Some("7mm"));
        assert_eq!(eyepiece_hint(TargetClass::Dso, "spiral galaxy", 10680.0).as_deref(), Some("42mm"));
        assert_eq!(eyepiece_hint(TargetClass::Dso, "spiral galaxy", f64::NAN), None);
    }

    #[test]
    fn test_no_eyepiece_for_double_stars() {
        // M40 is catalogued as a DSO but is a 49" double star
        assert_eq!(eyepiece_hint(TargetClass::Dso, "visual double star", 49.0), None);
        assert_eq!(eyepiece_hint(TargetClass::Dso, "multiple star", 300.0), None);
        assert_eq!(eyepiece_hint(TargetClass::Dso, "globular cluster", 49.0).as_deref(), Some("3mm"));
    }
}
