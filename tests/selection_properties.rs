mod common;

use common::{context, entry, failing, names, sorted_names, FakeCatalog};
use viewplan::catalog::TargetClass;
use viewplan::ordering::{order_targets, OrderingPolicy};
use viewplan::selection::{select_targets, FilterCriteria};

fn mixed_catalog() -> FakeCatalog {
    FakeCatalog::default()
        .with(entry("Jupiter", TargetClass::Planet, 120.0, 45.0, -2.5))
        .with(entry("Neptune", TargetClass::Planet, 140.0, 30.0, 7.8))
        .with(entry("Mars", TargetClass::Planet, 80.0, 10.0, 0.5))
        .with(entry("Sirius", TargetClass::Star, 200.0, 25.0, -1.46))
        .with(entry("Castor", TargetClass::Star, 210.0, 40.0, 1.8))
        .with(entry("Mizar", TargetClass::Star, 320.0, 50.0, 2.2))
        .with(entry("M31", TargetClass::Dso, 60.0, 35.0, 3.4))
        .with(entry("M13", TargetClass::Dso, 270.0, 70.0, 5.8))
        .with(entry("M45", TargetClass::Dso, 75.0, 20.0, 1.6))
        .with(entry("M57", TargetClass::Dso, 280.0, 71.0, 4.0))
        .with(entry("M27", TargetClass::Dso, 190.0, 55.0, 4.0))
}

#[test]
fn default_classes_are_planets_and_dsos() {
    let ctx = context();
    let targets = select_targets(&ctx, &mixed_catalog(), &FilterCriteria::default());

    assert!(targets.iter().all(|t| t.class() != TargetClass::Star));
    assert!(targets.iter().any(|t| t.class() == TargetClass::Planet));
    assert!(targets.iter().any(|t| t.class() == TargetClass::Dso));
}

#[test]
fn band_and_ceilings_hold_for_every_target() {
    let ctx = context();
    let criteria = FilterCriteria {
        include_planets: true,
        include_stars: true,
        include_dsos: true,
        ..Default::default()
    };
    let targets = select_targets(&ctx, &mixed_catalog(), &criteria);

    for target in &targets {
        assert!((criteria.min_altitude..=criteria.max_altitude).contains(&target.altitude()));
        match target.class() {
            TargetClass::Star => assert!(target.magnitude() <= criteria.star_magnitude_limit),
            TargetClass::Dso => assert!(target.magnitude() <= criteria.dso_magnitude_limit),
            TargetClass::Planet => {}
        }
    }

    // faint planets are never cut by magnitude
    assert!(names(&targets).contains(&"Neptune"));
    // 20° exactly passes
    assert!(names(&targets).contains(&"M45"));
    assert!(!names(&targets).contains(&"M13"));
}

#[test]
fn scenario_tight_star_and_dso_ceilings() {
    let ctx = context();
    let criteria = FilterCriteria {
        include_stars: true,
        star_magnitude_limit: 1.8,
        include_dsos: true,
        dso_magnitude_limit: 4.0,
        min_altitude: 20.0,
        max_altitude: 70.0,
        ..Default::default()
    };
    let targets = select_targets(&ctx, &mixed_catalog(), &criteria);

    assert_eq!(
        sorted_names(&targets),
        ["Castor", "M27", "M31", "M45", "Sirius"]
    );
    // Castor sits exactly on the star ceiling, M27 on the DSO ceiling
    assert!(targets.iter().all(|t| match t.class() {
        TargetClass::Star => t.magnitude() <= 1.8,
        TargetClass::Dso => t.magnitude() <= 4.0,
        TargetClass::Planet => false,
    }));
}

#[test]
fn altitude_boundaries_are_inclusive() {
    let ctx = context();
    let catalog = FakeCatalog::default()
        .with(entry("low edge", TargetClass::Dso, 100.0, 20.0, 3.0))
        .with(entry("high edge", TargetClass::Dso, 100.0, 70.0, 3.0))
        .with(entry("just low", TargetClass::Dso, 100.0, 19.9999, 3.0))
        .with(entry("just high", TargetClass::Dso, 100.0, 70.0001, 3.0));
    let criteria = FilterCriteria {
        include_dsos: true,
        ..Default::default()
    };

    let targets = select_targets(&ctx, &catalog, &criteria);
    assert_eq!(names(&targets), ["low edge", "high edge"]);
}

#[test]
fn empty_catalog_gives_empty_plan() {
    let ctx = context();
    let criteria = FilterCriteria::default();
    let targets = select_targets(&ctx, &FakeCatalog::default(), &criteria);
    assert!(targets.is_empty());
    assert!(order_targets(targets, &OrderingPolicy::default()).is_empty());
}

#[test]
fn everything_below_the_band() {
    let ctx = context();
    let catalog = FakeCatalog::default()
        .with(entry("Saturn", TargetClass::Planet, 150.0, 5.0, 0.6))
        .with(entry("M42", TargetClass::Dso, 90.0, -30.0, 4.0))
        .with_moon(200.0, -12.0);
    let targets = select_targets(&ctx, &catalog, &FilterCriteria::default());
    assert!(targets.is_empty());
}

#[test]
fn one_failing_entry_is_dropped_alone() {
    let ctx = context();
    let catalog = mixed_catalog().with(failing("Broken", TargetClass::Planet));
    let healthy = select_targets(&ctx, &mixed_catalog(), &FilterCriteria::default());
    let with_failure = select_targets(&ctx, &catalog, &FilterCriteria::default());

    assert_eq!(with_failure, healthy);
    assert!(!names(&with_failure).contains(&"Broken"));
}

#[test]
fn non_finite_positions_count_as_failures() {
    let ctx = context();
    let catalog = FakeCatalog::default()
        .with(entry("nan", TargetClass::Dso, 100.0, f64::NAN, 3.0))
        .with(entry("ok", TargetClass::Dso, 100.0, 40.0, 3.0));
    let targets = select_targets(&ctx, &catalog, &FilterCriteria::default());
    assert_eq!(names(&targets), ["ok"]);
}

#[test]
fn selection_is_idempotent() {
    let ctx = context();
    let catalog = mixed_catalog().with_moon(150.0, 33.0);
    let criteria = FilterCriteria {
        include_stars: true,
        include_dsos: true,
        ..Default::default()
    };
    let first = select_targets(&ctx, &catalog, &criteria);
    let second = select_targets(&ctx, &catalog, &criteria);
    assert_eq!(first, second);
}

#[test]
fn moon_follows_the_flag() {
    let ctx = context();
    let catalog = mixed_catalog().with_moon(150.0, 33.0);

    let stars_only = FilterCriteria {
        include_stars: true,
        ..Default::default()
    };
    let targets = select_targets(&ctx, &catalog, &stars_only);
    assert_eq!(names(&targets).first(), Some(&"Moon"));
    assert!(targets
        .iter()
        .filter(|t| t.name() != "Moon")
        .all(|t| t.class() == TargetClass::Star));

    let no_moon = FilterCriteria {
        always_include_moon: false,
        ..stars_only
    };
    let targets = select_targets(&ctx, &catalog, &no_moon);
    assert!(!names(&targets).contains(&"Moon"));

    // with planets the Moon comes along whatever the flag
    let planets = FilterCriteria {
        include_planets: true,
        always_include_moon: false,
        ..Default::default()
    };
    let targets = select_targets(&ctx, &catalog, &planets);
    let moon = targets.iter().find(|t| t.name() == "Moon").unwrap();
    assert_eq!(moon.class(), TargetClass::Planet);
    assert_eq!(moon.description(), "moon");
}

#[test]
fn ordering_after_selection() {
    let ctx = context();
    let criteria = FilterCriteria {
        include_planets: true,
        include_stars: true,
        include_dsos: true,
        ..Default::default()
    };
    let targets = select_targets(&ctx, &mixed_catalog(), &criteria);
    let ordered = order_targets(targets.clone(), &OrderingPolicy::default());

    assert_eq!(sorted_names(&ordered), sorted_names(&targets));
    assert_eq!(
        names(&ordered),
        ["Mizar", "Castor", "Sirius", "M27", "Neptune", "Jupiter", "M45", "M31"]
    );

    // already in order: nothing moves
    let again = order_targets(ordered.clone(), &OrderingPolicy::default());
    assert_eq!(again, ordered);
}
