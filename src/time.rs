//! # Observation instant
//!
//! Resolution of the user's start-time description into an absolute UTC [`Epoch`], and the
//! sidereal-time helpers the observer frame is built from.
//!
//! Accepted descriptions
//! ---------------------
//! * nothing or `now` – the current instant,
//! * relative offsets: `in 2 hours`, `+90 min`, `3 days from now`, `45 minutes ago`,
//! * absolute UTC dates: `2024-03-01T21:30:00`, `2024-03-01 21:30`, `2024-03-01`, and anything
//!   else [`hifitime`] can parse (e.g. `2024-03-01T21:30:00 UTC`).
//!
//! Anything else is a [`ViewPlanError::UnparseableTime`], which is fatal for the run.
use std::str::FromStr;

use hifitime::{Duration, Epoch, Unit};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DPI, MJD, T2000};
use crate::viewplan_errors::ViewPlanError;

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^
        (?:in\s+|\+\s*)?
        (?P<amount>\d+(?:\.\d+)?)\s*
        (?P<unit>seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d)
        (?P<dir>\s+ago|\s+from\s+now)?
        $",
    )
    .expect("relative time regex is valid")
});

static GREGORIAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<y>\d{4})-(?P<mo>\d{1,2})-(?P<d>\d{1,2})(?:[T ](?P<h>\d{1,2}):(?P<mi>\d{2})(?::(?P<s>\d{2}))?)?$",
    )
    .expect("gregorian date regex is valid")
});

/// Largest accepted relative offset; anything beyond would saturate the epoch arithmetic.
const MAX_OFFSET_CENTURIES: f64 = 100.0;

fn unit_from_label(label: &str) -> Unit {
    match label.to_ascii_lowercase().chars().next() {
        Some('s') => Unit::Second,
        Some('m') => Unit::Minute,
        Some('h') => Unit::Hour,
        _ => Unit::Day,
    }
}

fn parse_relative(description: &str) -> Option<(Duration, bool)> {
    let caps = RELATIVE_RE.captures(description)?;
    let amount: f64 = caps.name("amount")?.as_str().parse().ok()?;
    let unit = unit_from_label(caps.name("unit")?.as_str());
    let past = caps
        .name("dir")
        .is_some_and(|d| d.as_str().trim().eq_ignore_ascii_case("ago"));
    let offset = unit * amount;
    if !amount.is_finite() || offset.to_unit(Unit::Century).abs() > MAX_OFFSET_CENTURIES {
        return None;
    }
    Some((offset, past))
}

fn parse_gregorian(description: &str) -> Option<Epoch> {
    let caps = GREGORIAN_RE.captures(description)?;
    let field = |name: &str| -> Option<u8> {
        caps.name(name)
            .map_or(Some(0), |m| m.as_str().parse::<u8>().ok())
    };
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let month = field("mo")?;
    let day = field("d")?;
    let (hour, minute, second) = (field("h")?, field("mi")?, field("s")?);

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 || second > 59
    {
        return None;
    }
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0).ok()
}

/// Resolve a time description into an absolute UTC instant.
///
/// Arguments
/// ---------
/// * `description`: the user's description, `None` meaning "now".
/// * `now`: the instant relative descriptions are anchored to.
///
/// Return
/// ------
/// * The resolved [`Epoch`] (UTC).
///
/// Errors
/// ------
/// * [`ViewPlanError::UnparseableTime`] when the description matches none of the accepted forms.
pub fn resolve_instant(description: Option<&str>, now: Epoch) -> Result<Epoch, ViewPlanError> {
    let Some(raw) = description else {
        return Ok(now);
    };
    let text = raw.trim();

    if text.is_empty() || text.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Some((offset, past)) = parse_relative(text) {
        return Ok(if past { now - offset } else { now + offset });
    }

    if let Some(epoch) = parse_gregorian(text) {
        return Ok(epoch);
    }

    Epoch::from_str(text).map_err(|_| ViewPlanError::UnparseableTime(raw.to_string()))
}

/// Modified Julian Date of an instant on the UTC scale (used as a UT1 proxy).
pub fn mjd_utc(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Modified Julian Date of an instant on the TT scale.
pub fn mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_mjd_tt_days()
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Earth rotation during the elapsed fraction of the day
    let h = tjm.fract() * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn anchor() -> Epoch {
        Epoch::from_gregorian_utc_hms(2024, 3, 1, 20, 0, 0)
    }

    #[test]
    fn test_gmst() {
        assert_abs_diff_eq!(gmst(57028.478514610404), 4.851925725092499, epsilon = 1e-12);
        assert_abs_diff_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_now_and_default() {
        let now = anchor();
        assert_eq!(resolve_instant(None, now).unwrap(), now);
        assert_eq!(resolve_instant(Some("now"), now).unwrap(), now);
        assert_eq!(resolve_instant(Some("  NOW "), now).unwrap(), now);
    }

    #[test]
    fn test_relative_offsets() {
        let now = anchor();
        assert_eq!(
            resolve_instant(Some("in 1 hour"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 1, 21, 0, 0)
        );
        assert_eq!(
            resolve_instant(Some("+90 min"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 1, 21, 30, 0)
        );
        assert_eq!(
            resolve_instant(Some("2 days from now"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 3, 20, 0, 0)
        );
        assert_eq!(
            resolve_instant(Some("45 minutes ago"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 1, 19, 15, 0)
        );
    }

    #[test]
    fn test_absolute_dates() {
        let now = anchor();
        assert_eq!(
            resolve_instant(Some("2024-03-02T04:15:30"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 2, 4, 15, 30)
        );
        assert_eq!(
            resolve_instant(Some("2024-03-02 04:15"), now).unwrap(),
            Epoch::from_gregorian_utc_hms(2024, 3, 2, 4, 15, 0)
        );
        assert_eq!(
            resolve_instant(Some("2024-03-02"), now).unwrap(),
            Epoch::from_gregorian_utc_at_midnight(2024, 3, 2)
        );
    }

    #[test]
    fn test_unparseable() {
        let now = anchor();
        for bad in [
            "whenever",
            "in a while",
            "2024-13-40",
            "tomorrow-ish",
            "in 99999999999999999999999 days",
            "99999999 hours ago",
        ] {
            assert_eq!(
                resolve_instant(Some(bad), now),
                Err(ViewPlanError::UnparseableTime(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_long_but_sane_offset() {
        let now = anchor();
        assert_eq!(
            resolve_instant(Some("in 3650 days"), now).unwrap(),
            now + Unit::Day * 3650_i64
        );
    }

    #[test]
    fn test_mjd_helpers() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 1, 1);
        assert_eq!(mjd_utc(&epoch), 59215.0);
        assert!(mjd_tt(&epoch) > mjd_utc(&epoch));
    }
}
