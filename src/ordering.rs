//! # Observing order
//!
//! Arranges the selected targets so that a user working down the list front to back catches
//! the objects about to set first, sweeping roughly from west to east.
//!
//! Two policies are available:
//!
//! * [`OrderingPolicy::DescendingAzimuth`] (default): azimuth is cut into buckets of
//!   `bucket_width` degrees; buckets are visited from the largest azimuth down, and inside a
//!   bucket the lowest object comes first. A heuristic, not a slewing optimisation: objects
//!   on either side of north end up at opposite ends of the list.
//! * [`OrderingPolicy::ShortestPath`]: the sky is flattened to a polar chart
//!   (`r = 90° − altitude`, `x = r·sin az`, `y = r·cos az`), targets are seeded west to east
//!   by `x`, split recursively into runs of at most [`SUBDIVIDE_LIMIT`] and each run is toured
//!   exhaustively with its end points fixed, keeping the shortest path.
//!
//! Both are deterministic and stable: equal keys keep their input order.
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::constants::{Degree, RADEG};
use crate::selection::CelestialTarget;
use crate::viewplan_errors::ViewPlanError;

/// Longest run toured exhaustively by [`OrderingPolicy::ShortestPath`].
pub const SUBDIVIDE_LIMIT: usize = 10;

/// Default width of the azimuth buckets.
pub const DEFAULT_BUCKET_WIDTH: Degree = 1.0;

/// How the plan is ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderingPolicy {
    DescendingAzimuth { bucket_width: Degree },
    ShortestPath,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        OrderingPolicy::DescendingAzimuth {
            bucket_width: DEFAULT_BUCKET_WIDTH,
        }
    }
}

impl OrderingPolicy {
    /// Same policy with another bucket width (ignored by [`OrderingPolicy::ShortestPath`]).
    pub fn with_bucket_width(self, width: Degree) -> Result<Self, ViewPlanError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(ViewPlanError::InvalidOrderingPolicy(format!(
                "bucket width must be positive, got {width}"
            )));
        }
        Ok(match self {
            OrderingPolicy::DescendingAzimuth { .. } => {
                OrderingPolicy::DescendingAzimuth { bucket_width: width }
            }
            OrderingPolicy::ShortestPath => OrderingPolicy::ShortestPath,
        })
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingPolicy::DescendingAzimuth { bucket_width } => {
                write!(f, "descending azimuth ({bucket_width}° buckets)")
            }
            OrderingPolicy::ShortestPath => write!(f, "shortest path"),
        }
    }
}

impl FromStr for OrderingPolicy {
    type Err = ViewPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azimuth" | "descending-azimuth" | "descending_azimuth" => Ok(OrderingPolicy::default()),
            "path" | "shortest-path" | "shortest_path" => Ok(OrderingPolicy::ShortestPath),
            _ => Err(ViewPlanError::InvalidOrderingPolicy(s.to_string())),
        }
    }
}

/// Order targets for observation.
///
/// Arguments
/// ---------
/// * `targets`: the selected targets, in any order.
/// * `policy`: the ordering rule.
///
/// Return
/// ------
/// * The same targets, reordered. An empty input gives an empty output.
pub fn order_targets(targets: Vec<CelestialTarget>, policy: &OrderingPolicy) -> Vec<CelestialTarget> {
    match *policy {
        OrderingPolicy::DescendingAzimuth { bucket_width } => {
            descending_azimuth(targets, bucket_width)
        }
        OrderingPolicy::ShortestPath => shortest_path(targets),
    }
}

fn azimuth_bucket(azimuth: Degree, width: Degree) -> f64 {
    if width.is_finite() && width > 0.0 {
        (azimuth / width).floor()
    } else {
        azimuth
    }
}

fn descending_azimuth(mut targets: Vec<CelestialTarget>, width: Degree) -> Vec<CelestialTarget> {
    targets.sort_by(|a, b| {
        azimuth_bucket(b.azimuth(), width)
            .total_cmp(&azimuth_bucket(a.azimuth(), width))
            .then_with(|| a.altitude().total_cmp(&b.altitude()))
    });
    targets
}

/// Target placed on the flattened polar chart of the sky.
#[derive(Debug, Clone)]
struct Located {
    x: f64,
    y: f64,
    target: CelestialTarget,
}

impl Located {
    fn new(target: CelestialTarget) -> Self {
        let r = 90.0 - target.altitude();
        let az = target.azimuth() * RADEG;
        Located {
            x: az.sin() * r,
            y: az.cos() * r,
            target,
        }
    }

    fn distance(&self, other: &Located) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

fn path_length<'a>(path: impl IntoIterator<Item = &'a Located>) -> f64 {
    path.into_iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(b))
        .sum()
}

/// Length of the tour through the targets in the given order, in chart degrees.
pub fn tour_length(targets: &[CelestialTarget]) -> f64 {
    let located: Vec<Located> = targets.iter().cloned().map(Located::new).collect();
    path_length(&located)
}

fn shortest_path(targets: Vec<CelestialTarget>) -> Vec<CelestialTarget> {
    let located = targets.into_iter().map(Located::new).collect();
    optimize(located).into_iter().map(|l| l.target).collect()
}

fn optimize(mut located: Vec<Located>) -> Vec<Located> {
    // west (negative x) first: western targets are the first lost below the horizon
    located.sort_by(|a, b| a.x.total_cmp(&b.x));

    let count = located.len();
    if count > SUBDIVIDE_LIMIT {
        let second = located.split_off(count / 2);
        let mut first = optimize(located);
        first.extend(optimize(second));
        return first;
    }

    if count < 4 {
        return located;
    }

    // end points stay, the interior is toured exhaustively
    let interior = 1..count - 1;
    let mut best: Vec<usize> = (0..count).collect();
    let mut best_length = path_length(best.iter().map(|&i| &located[i]));

    for perm in interior.clone().permutations(interior.len()) {
        let candidate: Vec<usize> = std::iter::once(0)
            .chain(perm)
            .chain(std::iter::once(count - 1))
            .collect();
        let length = path_length(candidate.iter().map(|&i| &located[i]));
        if length < best_length {
            best_length = length;
            best = candidate;
        }
    }

    let mut slots: Vec<Option<Located>> = located.into_iter().map(Some).collect();
    best.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod ordering_test {
    use super::*;
    use crate::catalog::{Body, CatalogEntry, ComputedPosition, TargetClass};

    fn target(name: &str, azimuth: f64, altitude: f64) -> CelestialTarget {
        let entry = CatalogEntry::new(name, TargetClass::Dso, "open cluster", None, Body::Moon);
        CelestialTarget::new(
            &entry,
            ComputedPosition {
                azimuth,
                altitude,
                magnitude: 5.0,
                angular_size_arcsec: 0.0,
            },
        )
    }

    fn names(targets: &[CelestialTarget]) -> Vec<&str> {
        targets.iter().map(CelestialTarget::name).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(order_targets(vec![], &OrderingPolicy::default()).is_empty());
        assert!(order_targets(vec![], &OrderingPolicy::ShortestPath).is_empty());
    }

    #[test]
    fn test_descending_azimuth() {
        let targets = vec![
            target("east", 95.0, 40.0),
            target("west", 265.0, 30.0),
            target("south", 180.0, 50.0),
        ];
        let ordered = order_targets(targets, &OrderingPolicy::default());
        assert_eq!(names(&ordered), ["west", "south", "east"]);
    }

    #[test]
    fn test_bucket_ties_by_altitude() {
        let targets = vec![
            target("high", 200.2, 60.0),
            target("low", 200.9, 25.0),
            target("mid", 200.5, 40.0),
        ];
        let ordered = order_targets(targets, &OrderingPolicy::default());
        assert_eq!(names(&ordered), ["low", "mid", "high"]);

        // one-degree buckets split these two
        let targets = vec![target("a", 200.9, 60.0), target("b", 201.1, 25.0)];
        let ordered = order_targets(targets, &OrderingPolicy::default());
        assert_eq!(names(&ordered), ["b", "a"]);

        let wide = OrderingPolicy::default().with_bucket_width(10.0).unwrap();
        let targets = vec![target("a", 200.9, 60.0), target("b", 201.1, 25.0)];
        assert_eq!(names(&order_targets(targets, &wide)), ["b", "a"]);
        let targets = vec![target("a", 205.0, 24.0), target("b", 201.1, 25.0)];
        assert_eq!(names(&order_targets(targets, &wide)), ["a", "b"]);
    }

    #[test]
    fn test_already_ordered_is_kept() {
        let targets = vec![
            target("w", 300.0, 30.0),
            target("sw1", 220.0, 20.0),
            target("sw2", 220.3, 50.0),
            target("s", 180.0, 45.0),
            target("e", 90.0, 30.0),
        ];
        let expected = names(&targets).into_iter().map(String::from).collect::<Vec<_>>();
        let ordered = order_targets(targets, &OrderingPolicy::default());
        assert_eq!(names(&ordered), expected);
    }

    #[test]
    fn test_equal_keys_are_stable() {
        let targets = vec![target("first", 150.0, 30.0), target("second", 150.0, 30.0)];
        let ordered = order_targets(targets, &OrderingPolicy::default());
        assert_eq!(names(&ordered), ["first", "second"]);
    }

    #[test]
    fn test_shortest_path_small() {
        // zig-zag on the seed order, straight line once the interior is permuted
        let targets = vec![
            target("west", 270.0, 30.0),
            target("north-ish", 330.0, 40.0),
            target("south-ish", 210.0, 40.0),
            target("north-2", 20.0, 40.0),
            target("east", 90.0, 30.0),
        ];
        let ordered = order_targets(targets.clone(), &OrderingPolicy::ShortestPath);
        assert_eq!(ordered.len(), 5);
        assert_eq!(ordered.first().map(CelestialTarget::name), Some("west"));
        assert_eq!(ordered.last().map(CelestialTarget::name), Some("east"));

        // the input has the same end points, so it can only be longer
        assert!(tour_length(&ordered) <= tour_length(&targets) + 1e-9);
    }

    #[test]
    fn test_shortest_path_subdivides() {
        let targets: Vec<CelestialTarget> = (0..23)
            .map(|i| target(&format!("t{i}"), (i as f64 * 37.0) % 360.0, 20.0 + (i % 5) as f64 * 10.0))
            .collect();
        let ordered = order_targets(targets.clone(), &OrderingPolicy::ShortestPath);
        assert_eq!(ordered.len(), targets.len());

        let mut before = names(&targets);
        let mut after = names(&ordered);
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);

        // deterministic
        assert_eq!(ordered, order_targets(targets, &OrderingPolicy::ShortestPath));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("azimuth".parse::<OrderingPolicy>().unwrap(), OrderingPolicy::default());
        assert_eq!("path".parse::<OrderingPolicy>().unwrap(), OrderingPolicy::ShortestPath);
        assert_eq!(
            "random".parse::<OrderingPolicy>(),
            Err(ViewPlanError::InvalidOrderingPolicy("random".into()))
        );
        assert!(OrderingPolicy::default().with_bucket_width(0.0).is_err());
    }
}
