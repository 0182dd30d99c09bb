//! # viewplan
//!
//! Plan an evening at the telescope: given a site and a start time, list the planets, notable
//! stars and deep-sky objects that stand in a comfortable altitude band, bright enough for their
//! class, in the order they should be observed.
//!
//! The pipeline lives in [`plan::ViewPlanner`]; [`display`] renders the result and [`config`]
//! reads the TOML run configuration used by the `viewplan` binary.
pub mod catalog;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod display;
pub mod earth_orientation;
pub mod observers;
pub mod ordering;
pub mod plan;
pub mod selection;
pub mod time;
pub mod viewplan_errors;
