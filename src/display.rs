//! # Plan presentation
//!
//! Two [`Display`](std::fmt::Display) adapters over a [`ViewingPlan`]:
//!
//! * [`PlanSummary`] – the "Your viewing plan:" header: instant, site, classes with their
//!   magnitude ceilings, altitude band and ordering.
//! * [`PlanTable`] – one row per target, rendered with
//!   [`comfy-table`](https://docs.rs/comfy-table/latest/comfy_table/) (`UTF8_FULL` preset).
//!
//! ```text
//! Your viewing plan:
//!   time:      2024-09-02T04:00:00 UTC
//!   location:  Oakland (37°48'15.8", -122°16'16.3")
//!   including: planets, DSOs brighter than 5.0
//!   altitude:  20° to 70°
//!   ordering:  descending azimuth (1° buckets)
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::catalog::TargetClass;
use crate::conversion::format_dms;
use crate::plan::ViewingPlan;

/// Line printed in place of the table when nothing is worth looking at.
pub const NO_TARGETS: &str = "No targets match the criteria at this time and place.";

/// Header of a viewing plan.
pub struct PlanSummary<'a>(pub &'a ViewingPlan);

fn class_label(plan: &ViewingPlan, class: TargetClass) -> String {
    match (class, plan.criteria.magnitude_limit(class)) {
        (TargetClass::Planet, _) => "planets".to_string(),
        (TargetClass::Star, Some(limit)) => format!("stars brighter than {limit:.1}"),
        (TargetClass::Dso, Some(limit)) => format!("DSOs brighter than {limit:.1}"),
        (other, None) => other.to_string(),
    }
}

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        let ctx = &plan.context;

        let coordinates = format!(
            "{}, {}",
            format_dms(ctx.latitude()),
            format_dms(ctx.longitude())
        );
        let location = match ctx.name() {
            Some(name) => format!("{name} ({coordinates})"),
            None => coordinates,
        };

        let effective = plan.criteria.effective_classes();
        let mut classes: Vec<String> = effective
            .iter()
            .map(|class| class_label(plan, *class))
            .collect();
        if plan.criteria.wants_moon() && !effective.contains(&TargetClass::Planet) {
            classes.insert(0, "the Moon".to_string());
        }

        writeln!(f, "Your viewing plan:")?;
        writeln!(f, "  time:      {}", ctx.instant())?;
        writeln!(f, "  location:  {location}")?;
        writeln!(f, "  including: {}", classes.join(", "))?;
        writeln!(
            f,
            "  altitude:  {}° to {}°",
            plan.criteria.min_altitude, plan.criteria.max_altitude
        )?;
        write!(f, "  ordering:  {}", plan.ordering)
    }
}

/// Target table of a viewing plan.
pub struct PlanTable<'a>(pub &'a ViewingPlan);

impl PlanTable<'_> {
    fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Name"),
            Cell::new("Azimuth"),
            Cell::new("Altitude"),
            Cell::new("Mag"),
            Cell::new("Eyepc"),
            Cell::new("Description"),
        ]);

        for target in &self.0.targets {
            table.add_row(Row::from(vec![
                Cell::new(target.name()),
                Cell::new(format_dms(target.azimuth())).set_alignment(CellAlignment::Right),
                Cell::new(format_dms(target.altitude())).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}", target.magnitude())).set_alignment(CellAlignment::Right),
                Cell::new(target.eyepiece().unwrap_or("")).set_alignment(CellAlignment::Right),
                Cell::new(target.description()),
            ]));
        }

        table.to_string()
    }
}

impl fmt::Display for PlanTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{NO_TARGETS}");
        }
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod display_test {
    use hifitime::Epoch;

    use super::*;
    use crate::catalog::{Body, CatalogEntry, ComputedPosition};
    use crate::observers::ObserverContext;
    use crate::ordering::OrderingPolicy;
    use crate::selection::{CelestialTarget, FilterCriteria};

    fn plan(targets: Vec<CelestialTarget>, name: Option<&str>) -> ViewingPlan {
        let context = ObserverContext::new(
            37.8376,
            -122.281,
            14.0,
            Epoch::from_gregorian_utc_hms(2024, 9, 2, 4, 0, 0),
            name.map(String::from),
        )
        .unwrap();
        ViewingPlan {
            context,
            criteria: FilterCriteria::default(),
            ordering: OrderingPolicy::default(),
            targets,
        }
    }

    fn m57() -> CelestialTarget {
        let entry = CatalogEntry::new("M57", TargetClass::Dso, "planetary nebula", Some(8.8), Body::Moon);
        CelestialTarget::new(
            &entry,
            ComputedPosition {
                azimuth: 245.052083333,
                altitude: 62.5,
                magnitude: 8.8,
                angular_size_arcsec: 230.0,
            },
        )
    }

    #[test]
    fn test_summary() {
        let text = PlanSummary(&plan(vec![], Some("Oakland"))).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Your viewing plan:");
        assert!(lines[1].contains("2024-09-02T04:00:00"));
        assert!(lines[2].starts_with("  location:  Oakland ("));
        assert_eq!(lines[3], "  including: planets, DSOs brighter than 5.0");
        assert_eq!(lines[4], "  altitude:  20° to 70°");
        assert_eq!(lines[5], "  ordering:  descending azimuth (1° buckets)");

        let anonymous = PlanSummary(&plan(vec![], None)).to_string();
        assert!(anonymous.contains("  location:  37°50'15.4\", -122°16'51.6\""));
    }

    #[test]
    fn test_summary_moon_only_with_stars() {
        let mut stars = plan(vec![], None);
        stars.criteria.include_stars = true;
        let text = PlanSummary(&stars).to_string();
        assert!(text.contains("  including: the Moon, stars brighter than 2.5"));
    }

    #[test]
    fn test_table() {
        let text = PlanTable(&plan(vec![m57()], None)).to_string();
        for header in ["Name", "Azimuth", "Altitude", "Mag", "Eyepc", "Description"] {
            assert!(text.contains(header));
        }
        assert!(text.contains("M57"));
        assert!(text.contains("245°03'07.5\""));
        assert!(text.contains("62°30'00.0\""));
        assert!(text.contains("8.8"));
        assert!(text.contains("3mm"));
        assert!(text.contains("planetary nebula"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(PlanTable(&plan(vec![], None)).to_string(), NO_TARGETS);
    }
}
