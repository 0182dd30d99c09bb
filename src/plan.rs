//! # Viewing plan
//!
//! [`ViewPlanner`] is the entry point of the library. One call to [`ViewPlanner::plan`] runs
//! the whole pipeline:
//!
//! 1. resolve the start time and the site into a frozen [`ObserverContext`],
//! 2. check the [`FilterCriteria`],
//! 3. select the targets from the [`CatalogProvider`],
//! 4. order them with the [`OrderingPolicy`].
//!
//! Any failure in steps 1–2 aborts the run with a [`ViewPlanError`]; per-object failures in
//! step 3 only drop the object concerned.
//!
//! ## Example
//!
//! ```no_run
//! use viewplan::config::PlanConfig;
//! use viewplan::plan::ViewPlanner;
//!
//! let planner = ViewPlanner::from_config(&PlanConfig::default())?;
//! let plan = planner.plan()?;
//! for target in &plan.targets {
//!     println!("{} at {:.1}°", target.name(), target.altitude());
//! }
//! # Ok::<(), viewplan::viewplan_errors::ViewPlanError>(())
//! ```
use hifitime::Epoch;
use tracing::{debug, info};

use crate::catalog::builtin::BuiltinCatalog;
use crate::catalog::CatalogProvider;
use crate::config::PlanConfig;
use crate::observers::places::{Gazetteer, LocationSpec, PlaceResolver};
use crate::observers::{resolve_observer, ObserverContext};
use crate::ordering::{order_targets, OrderingPolicy};
use crate::selection::{select_targets, CelestialTarget, FilterCriteria};
use crate::time::resolve_instant;
use crate::viewplan_errors::ViewPlanError;

/// The outcome of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingPlan {
    /// Site and instant the plan was computed for.
    pub context: ObserverContext,
    pub criteria: FilterCriteria,
    pub ordering: OrderingPolicy,
    /// Targets in observing order.
    pub targets: Vec<CelestialTarget>,
}

impl ViewingPlan {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

/// Everything needed to build viewing plans, resolved once from the configuration.
pub struct ViewPlanner {
    location: LocationSpec,
    start: Option<String>,
    refraction: bool,
    criteria: FilterCriteria,
    ordering: OrderingPolicy,
    resolver: Box<dyn PlaceResolver>,
    provider: Box<dyn CatalogProvider>,
}

impl ViewPlanner {
    /// Build a planner from explicit parts, with the embedded gazetteer and catalogue.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::GazetteerError`] if the embedded city table cannot be read.
    pub fn new(
        location: LocationSpec,
        criteria: FilterCriteria,
        ordering: OrderingPolicy,
    ) -> Result<Self, ViewPlanError> {
        Ok(ViewPlanner {
            location,
            start: None,
            refraction: true,
            criteria,
            ordering,
            resolver: Box::new(Gazetteer::builtin()?),
            provider: Box::new(BuiltinCatalog::new()),
        })
    }

    /// Build a planner from a [`PlanConfig`].
    ///
    /// Loads the extra gazetteer and the replacement EDB files named in the configuration.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::InvalidAngle`] for unreadable coordinates.
    /// * [`ViewPlanError::InvalidOrderingPolicy`] for an unknown policy or bucket width.
    /// * [`ViewPlanError::IoError`] / [`ViewPlanError::GazetteerError`] when an extra file
    ///   cannot be loaded.
    pub fn from_config(config: &PlanConfig) -> Result<Self, ViewPlanError> {
        let mut gazetteer = Gazetteer::builtin()?;
        if let Some(path) = &config.location.gazetteer {
            gazetteer.extend_from_path(path)?;
        }

        let mut catalog = BuiltinCatalog::new();
        if let Some(path) = &config.catalogs.stars {
            catalog = catalog.with_star_file(path)?;
        }
        if let Some(path) = &config.catalogs.dsos {
            catalog = catalog.with_dso_file(path)?;
        }

        Ok(ViewPlanner {
            location: config.location.spec()?,
            start: config.observer.start.clone(),
            refraction: config.observer.refraction,
            criteria: config.filter.clone(),
            ordering: config.ordering.policy()?,
            resolver: Box::new(gazetteer),
            provider: Box::new(catalog),
        })
    }

    /// Start-time description (`None`: now).
    pub fn with_start(mut self, start: Option<String>) -> Self {
        self.start = start;
        self
    }

    pub fn with_refraction(mut self, refraction: bool) -> Self {
        self.refraction = refraction;
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn PlaceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_provider(mut self, provider: Box<dyn CatalogProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Build the plan, relative times counted from the system clock.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::ClockError`] when the clock cannot be read.
    /// * Anything [`ViewPlanner::plan_at`] returns.
    pub fn plan(&self) -> Result<ViewingPlan, ViewPlanError> {
        let now = Epoch::now().map_err(|e| ViewPlanError::ClockError(e.to_string()))?;
        self.plan_at(now)
    }

    /// Build the plan, relative times counted from `now`.
    ///
    /// Deterministic: the same planner and the same `now` give the same plan.
    ///
    /// Errors
    /// ------
    /// * [`ViewPlanError::UnparseableTime`] for an unknown start-time description.
    /// * [`ViewPlanError::UnknownPlace`] for a place the resolver does not know.
    /// * [`ViewPlanError::InvalidCoordinate`] / [`ViewPlanError::NonFiniteInput`] for a bad site.
    /// * [`ViewPlanError::InvalidAltitudeBand`] / [`ViewPlanError::InvalidMagnitudeLimit`] for
    ///   unusable criteria.
    pub fn plan_at(&self, now: Epoch) -> Result<ViewingPlan, ViewPlanError> {
        let instant = resolve_instant(self.start.as_deref(), now)?;
        let context = resolve_observer(&self.location, self.resolver.as_ref(), instant)?
            .with_refraction(self.refraction);
        self.criteria.validate()?;

        debug!(
            latitude = context.latitude(),
            longitude = context.longitude(),
            instant = %context.instant(),
            "observer resolved"
        );

        let selected = select_targets(&context, self.provider.as_ref(), &self.criteria);
        let targets = order_targets(selected, &self.ordering);

        info!(
            site = context.name().unwrap_or("coordinates"),
            instant = %context.instant(),
            targets = targets.len(),
            ordering = %self.ordering,
            "viewing plan ready"
        );

        Ok(ViewingPlan {
            context,
            criteria: self.criteria.clone(),
            ordering: self.ordering,
            targets,
        })
    }
}

#[cfg(test)]
mod plan_test {
    use super::*;
    use crate::catalog::TargetClass;

    fn oakland() -> LocationSpec {
        LocationSpec::Coordinates {
            latitude: 37.8376,
            longitude: -122.281,
            elevation: 14.0,
        }
    }

    fn evening() -> Epoch {
        // 2024-09-01 21:00 PDT
        Epoch::from_gregorian_utc_hms(2024, 9, 2, 4, 0, 0)
    }

    #[test]
    fn test_default_plan() {
        let planner =
            ViewPlanner::new(oakland(), FilterCriteria::default(), OrderingPolicy::default())
                .unwrap();
        let plan = planner.plan_at(evening()).unwrap();

        assert!(!plan.is_empty());
        assert_eq!(plan.len(), plan.targets.len());
        assert!(plan
            .targets
            .iter()
            .all(|t| t.class() != TargetClass::Star));
        assert!(plan
            .targets
            .iter()
            .all(|t| (20.0..=70.0).contains(&t.altitude())));
        assert!(plan
            .targets
            .windows(2)
            .all(|w| w[0].azimuth().floor() >= w[1].azimuth().floor()));
    }

    #[test]
    fn test_start_description_is_used() {
        let planner =
            ViewPlanner::new(oakland(), FilterCriteria::default(), OrderingPolicy::default())
                .unwrap()
                .with_start(Some("in 2 hours".into()));
        let plan = planner.plan_at(evening()).unwrap();
        assert_eq!(plan.context.instant(), evening() + hifitime::Unit::Hour * 2_i64);
    }

    #[test]
    fn test_fatal_errors() {
        let planner =
            ViewPlanner::new(oakland(), FilterCriteria::default(), OrderingPolicy::default())
                .unwrap()
                .with_start(Some("when the cows come home".into()));
        assert!(matches!(
            planner.plan_at(evening()),
            Err(ViewPlanError::UnparseableTime(_))
        ));

        let planner = ViewPlanner::new(
            LocationSpec::Named("Atlantis".into()),
            FilterCriteria::default(),
            OrderingPolicy::default(),
        )
        .unwrap();
        assert_eq!(
            planner.plan_at(evening()).unwrap_err(),
            ViewPlanError::UnknownPlace("Atlantis".into())
        );

        let inverted = FilterCriteria {
            min_altitude: 60.0,
            max_altitude: 30.0,
            ..Default::default()
        };
        let planner = ViewPlanner::new(oakland(), inverted, OrderingPolicy::default()).unwrap();
        assert_eq!(
            planner.plan_at(evening()).unwrap_err(),
            ViewPlanError::InvalidAltitudeBand {
                min: 60.0,
                max: 30.0
            }
        );
    }

    #[test]
    fn test_from_config() {
        let config = PlanConfig::from_toml(
            "[location]\ncity = \"Oakland\"\n[ordering]\npolicy = \"path\"\n[observer]\nrefraction = false",
        )
        .unwrap();
        let planner = ViewPlanner::from_config(&config).unwrap();
        assert_eq!(planner.ordering(), OrderingPolicy::ShortestPath);

        let plan = planner.plan_at(evening()).unwrap();
        assert_eq!(plan.context.name(), Some("Oakland"));
        assert!(!plan.context.refraction());
    }
}
