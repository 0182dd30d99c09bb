use crate::constants::Degree;

/// Parse a sexagesimal angle into a decimal value.
///
/// Components may be separated by `:` or whitespace, and one to three of them are accepted
/// (`D`, `D:M`, `D:M:S`). A leading sign applies to the whole value, so `-0:30:00` is `-0.5`.
/// The unit is whatever the first component is expressed in (degrees for latitude / declination,
/// hours for right ascension).
///
/// Arguments
/// ---------
/// * `input`: the sexagesimal string, e.g. `"37:50:15.3"`, `"-122 16 51.6"`, `"14.5"`.
///
/// Return
/// ------
/// * `Some(value)` in the unit of the first component, `None` on malformed input or when the
///   minutes / seconds fields fall outside `[0, 60)`.
pub fn parse_sexagesimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parts: Vec<&str> = unsigned
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for (i, part) in parts.iter().enumerate() {
        // a second sign in the middle of the string is malformed
        if part.starts_with(['-', '+']) {
            return None;
        }
        let field: f64 = part.parse().ok()?;
        if !field.is_finite() || (i > 0 && !(0.0..60.0).contains(&field)) {
            return None;
        }
        value += field / scale;
        scale *= 60.0;
    }

    Some(sign * value)
}

/// Split a non-negative value into (units, minutes, tenths of seconds) with carry.
fn split_tenths(value: f64) -> (u64, u64, f64) {
    let tenths = (value * 36_000.0).round() as u64;
    let units = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = (tenths % 600) as f64 / 10.0;
    (units, minutes, seconds)
}

/// Format an angle in degrees as a UTF-8 `D°MM'SS.S"` string.
///
/// Arguments
/// ---------
/// * `angle`: angle in degrees, any sign.
///
/// Return
/// ------
/// * The sexagesimal rendering, rounded to a tenth of an arcsecond, e.g. `245°03'07.5"`.
pub fn format_dms(angle: Degree) -> String {
    let sign = if angle < 0.0 { "-" } else { "" };
    let (d, m, s) = split_tenths(angle.abs());
    format!("{sign}{d}°{m:02}'{s:04.1}\"")
}

/// Format a right ascension given in degrees as `HH:MM:SS.S`.
pub fn format_hms(angle: Degree) -> String {
    let (h, m, s) = split_tenths(angle.rem_euclid(360.0) / 15.0);
    format!("{:02}:{m:02}:{s:04.1}", h % 24)
}
