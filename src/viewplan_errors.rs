use thiserror::Error;

/// Run-level failures. Any of these aborts planning before a single target is filtered.
#[derive(Error, Debug)]
pub enum ViewPlanError {
    #[error("Unknown place name: {0}")]
    UnknownPlace(String),

    #[error("Unable to understand the time description: {0}")]
    UnparseableTime(String),

    #[error("System clock unavailable: {0}")]
    ClockError(String),

    #[error("Invalid sexagesimal angle: {0}")]
    InvalidAngle(String),

    #[error("Invalid observer coordinate {name} = {value}")]
    InvalidCoordinate { name: &'static str, value: f64 },

    #[error("Invalid altitude band: minimum {min}° is above maximum {max}°")]
    InvalidAltitudeBand { min: f64, max: f64 },

    #[error("Invalid magnitude limit for {class}: {value}")]
    InvalidMagnitudeLimit { class: &'static str, value: f64 },

    #[error("Invalid target class: {0}")]
    InvalidTargetClass(String),

    #[error("Invalid ordering policy: {0}")]
    InvalidOrderingPolicy(String),

    #[error("Error during the EDB catalog parsing at line `{line}`: {reason}")]
    CatalogParse { line: String, reason: String },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid gazetteer table: {0}")]
    GazetteerError(#[from] csv::Error),

    #[error("NaN encountered in observer input")]
    NonFiniteInput(#[from] ordered_float::FloatIsNan),
}

impl ViewPlanError {
    /// `true` for failures resolving *where* or *when* the run takes place.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ViewPlanError::UnknownPlace(_)
                | ViewPlanError::UnparseableTime(_)
                | ViewPlanError::InvalidAngle(_)
                | ViewPlanError::InvalidCoordinate { .. }
                | ViewPlanError::NonFiniteInput(_)
        )
    }
}

impl PartialEq for ViewPlanError {
    fn eq(&self, other: &Self) -> bool {
        use ViewPlanError::*;
        match (self, other) {
            (UnknownPlace(a), UnknownPlace(b)) => a == b,
            (UnparseableTime(a), UnparseableTime(b)) => a == b,
            (ClockError(a), ClockError(b)) => a == b,
            (InvalidAngle(a), InvalidAngle(b)) => a == b,
            (
                InvalidCoordinate {
                    name: na,
                    value: va,
                },
                InvalidCoordinate {
                    name: nb,
                    value: vb,
                },
            ) => na == nb && va == vb,
            (InvalidAltitudeBand { min: a1, max: a2 }, InvalidAltitudeBand { min: b1, max: b2 }) => {
                a1 == b1 && a2 == b2
            }
            (
                InvalidMagnitudeLimit {
                    class: ca,
                    value: va,
                },
                InvalidMagnitudeLimit {
                    class: cb,
                    value: vb,
                },
            ) => ca == cb && va == vb,
            (InvalidTargetClass(a), InvalidTargetClass(b)) => a == b,
            (InvalidOrderingPolicy(a), InvalidOrderingPolicy(b)) => a == b,
            (CatalogParse { line: a, .. }, CatalogParse { line: b, .. }) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (ConfigError(_), ConfigError(_)) => true,
            (GazetteerError(_), GazetteerError(_)) => true,
            (NonFiniteInput(_), NonFiniteInput(_)) => true,

            _ => false,
        }
    }
}

/// Failure computing the position of a single catalog entry.
///
/// These never abort a run: the selection engine drops the entry and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("Non-finite {0} computed")]
    NonFinite(&'static str),

    #[error("Kepler equation did not converge for {0}")]
    KeplerNoConvergence(String),

    #[error("Degenerate geometry for {0}: body coincides with the observer")]
    DegenerateGeometry(String),
}
