//! # XEphem database (EDB) reader
//!
//! Reader for the fixed-object records of the XEphem `.edb` format, the format the embedded
//! Messier and bright-star catalogues are distributed in.
//!
//! ## Record layout
//!
//! ```text
//! name[|alias...],f[|T[|spectral]],RA[|pm],Dec[|pm],mag,epoch[,size[|minor|PA]]
//! ```
//!
//! * `RA` is sexagesimal hours, `Dec` sexagesimal degrees, proper motions in mas/yr.
//! * `epoch` is the equinox of the coordinates, in years (`2000` for J2000).
//! * `size` is the major axis in arcseconds.
//! * `T` is a one-letter type code, mapped to a description by [`describe_fixed_type`].
//!
//! Lines starting with `#`, blank lines and lines without a comma are not records. Records of
//! other kinds (elliptical / hyperbolic / parabolic orbits, satellites) are recognised and
//! skipped; malformed fixed records are reported and skipped by [`parse_edb`].
use camino::Utf8Path;
use nom::{
    bytes::complete::is_not,
    character::complete::{anychar, char, satisfy},
    combinator::{all_consuming, opt, rest},
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};
use tracing::{debug, warn};

use crate::constants::{ArcSec, Degree, Magnitude, DAYS_PER_CENTURY, RADEG, T2000};
use crate::conversion::parse_sexagesimal;
use crate::viewplan_errors::ViewPlanError;

use super::fixed::FixedBody;
use super::{Body, CatalogEntry, TargetClass};

/// Description of a fixed-object type code.
pub fn describe_fixed_type(code: char) -> &'static str {
    match code {
        'A' => "cluster of galaxies",
        'B' => "binary star",
        'C' => "globular cluster",
        'D' => "visual double star",
        'F' => "diffuse nebula",
        'G' => "spiral galaxy",
        'H' => "spherical galaxy",
        'J' => "radio object",
        'K' => "dark nebula",
        'L' => "pulsar",
        'M' => "multiple star",
        'N' => "bright nebula",
        'O' => "open cluster",
        'P' => "planetary nebula",
        'Q' => "quasar",
        'R' => "supernova remnant",
        'S' => "star",
        'T' => "stellar object",
        'U' => "nebulous cluster",
        'V' => "variable star",
        'Y' => "supernova",
        _ => "?",
    }
}

/// One fixed-object record.
#[derive(Debug, Clone, PartialEq)]
pub struct EdbRecord {
    /// All names of the object, the common name first.
    pub names: Vec<String>,
    pub type_code: char,
    pub spectral: Option<String>,
    /// Right ascension at `epoch`, degrees.
    pub ra: Degree,
    /// Declination at `epoch`, degrees.
    pub dec: Degree,
    /// Proper motion in RA (on the sky) and Dec, mas/yr.
    pub proper_motion: (f64, f64),
    pub magnitude: Magnitude,
    /// Equinox of the coordinates, in years.
    pub epoch: f64,
    /// Major axis, arcseconds.
    pub size: ArcSec,
}

impl EdbRecord {
    pub fn common_name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    pub fn description(&self) -> &'static str {
        describe_fixed_type(self.type_code)
    }

    /// Turn the record into a catalog entry of the given class.
    pub fn into_entry(self, class: TargetClass) -> CatalogEntry {
        let epoch_mjd = T2000 + (self.epoch - 2000.0) * DAYS_PER_CENTURY / 100.0;
        let body = FixedBody::new(
            self.ra * RADEG,
            self.dec * RADEG,
            self.proper_motion,
            epoch_mjd,
            self.magnitude,
            self.size,
        );
        CatalogEntry::new(
            self.common_name(),
            class,
            self.description(),
            Some(self.magnitude),
            Body::Fixed(body),
        )
    }
}

/// `f[|T[|spectral]]`
fn fixed_type(input: &str) -> IResult<&str, (Option<char>, Option<&str>)> {
    let (input, _) = char('f').parse(input)?;
    let (input, code) = opt(preceded(char('|'), anychar)).parse(input)?;
    let (input, spectral) = opt(preceded(char('|'), is_not(",|"))).parse(input)?;
    Ok((input, (code, spectral)))
}

/// `value[|pm]` where the value is sexagesimal.
fn coordinate_with_motion(input: &str) -> IResult<&str, (&str, Option<f64>)> {
    (is_not(",|"), opt(preceded(char('|'), double))).parse(input)
}

/// Magnitude, optionally prefixed by its photometric band letter.
fn magnitude_field(input: &str) -> IResult<&str, f64> {
    preceded(opt(satisfy(|c| c.is_ascii_alphabetic())), double)
        .parse(input)
}

/// Equinox of the coordinates, in years.
fn epoch_field(input: &str) -> IResult<&str, f64> {
    all_consuming(double).parse(input)
}

/// `major[|minor[|PA]]`
fn size_field(input: &str) -> IResult<&str, f64> {
    let (input, major) = double.parse(input)?;
    let (input, _) = rest.parse(input)?;
    Ok((input, major))
}

fn malformed(line: &str, reason: impl Into<String>) -> ViewPlanError {
    ViewPlanError::CatalogParse {
        line: line.to_string(),
        reason: reason.into(),
    }
}

fn parse_angle(line: &str, raw: &str, what: &str) -> Result<f64, ViewPlanError> {
    parse_sexagesimal(raw).ok_or_else(|| malformed(line, format!("invalid {what} `{raw}`")))
}

/// Parse one line of an EDB file.
///
/// Return
/// ------
/// * `Ok(Some(record))` for a fixed-object record,
/// * `Ok(None)` for comments, blank lines, lines without a comma and non-fixed records.
///
/// Errors
/// ------
/// * [`ViewPlanError::CatalogParse`] for a malformed fixed-object record.
pub fn parse_edb_line(line: &str) -> Result<Option<EdbRecord>, ViewPlanError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || !line.contains(',') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').collect();
    let names: Vec<String> = fields[0]
        .split('|')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();
    if names.is_empty() {
        return Err(malformed(line, "missing name"));
    }

    let kind = fields[1].trim();
    if !kind.starts_with('f') {
        debug!(name = %names[0], kind, "skipping non-fixed EDB record");
        return Ok(None);
    }
    let (code, spectral) = all_consuming(fixed_type)
        .parse(kind)
        .map(|(_, parsed)| parsed)
        .map_err(|_| malformed(line, format!("invalid type field `{kind}`")))?;

    if fields.len() < 5 {
        return Err(malformed(line, "expected at least RA, Dec and magnitude"));
    }

    let (ra_raw, pm_ra) = all_consuming(coordinate_with_motion)
        .parse(fields[2].trim())
        .map(|(_, parsed)| parsed)
        .map_err(|_| malformed(line, "invalid right ascension field"))?;
    let (dec_raw, pm_dec) = all_consuming(coordinate_with_motion)
        .parse(fields[3].trim())
        .map(|(_, parsed)| parsed)
        .map_err(|_| malformed(line, "invalid declination field"))?;

    let ra = parse_angle(line, ra_raw, "right ascension")? * 15.0;
    let dec = parse_angle(line, dec_raw, "declination")?;
    if !(0.0..360.0).contains(&ra) || !(-90.0..=90.0).contains(&dec) {
        return Err(malformed(line, "coordinates out of range"));
    }

    let (_, magnitude) = all_consuming(magnitude_field)
        .parse(fields[4].trim())
        .map_err(|_| malformed(line, format!("invalid magnitude `{}`", fields[4])))?;

    let epoch = match fields.get(5).map(|f| f.trim()).filter(|f| !f.is_empty()) {
        Some(raw) => epoch_field(raw)
            .map(|(_, epoch)| epoch)
            .map_err(|_| malformed(line, format!("invalid epoch `{raw}`")))?,
        None => 2000.0,
    };

    let size = match fields.get(6).map(|f| f.trim()).filter(|f| !f.is_empty()) {
        Some(raw) => size_field
            .parse(raw)
            .map(|(_, major)| major)
            .map_err(|_| malformed(line, format!("invalid size `{raw}`")))?,
        None => 0.0,
    };

    Ok(Some(EdbRecord {
        names,
        type_code: code.unwrap_or('T'),
        spectral: spectral.map(String::from),
        ra,
        dec,
        proper_motion: (pm_ra.unwrap_or(0.0), pm_dec.unwrap_or(0.0)),
        magnitude,
        epoch,
        size,
    }))
}

/// Parse every fixed-object record of an EDB text, skipping (with a warning) malformed ones.
pub fn parse_edb(text: &str) -> Vec<EdbRecord> {
    text.lines()
        .filter_map(|line| match parse_edb_line(line) {
            Ok(record) => record,
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}

/// Read an EDB file from disk.
pub fn read_edb_file(path: &Utf8Path) -> Result<Vec<EdbRecord>, ViewPlanError> {
    let text = std::fs::read_to_string(path)?;
    let records = parse_edb(&text);
    debug!(%path, count = records.len(), "loaded EDB catalogue");
    Ok(records)
}
