//! Turns the GPS IFD's raw values into decimal degrees and UTC instants.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// How the GPS IFD writes its dates, like `2024:06:01`.
const GPS_DATE_FORMAT: &str = "%Y:%m:%d";

/// Converts a coordinate to signed decimal degrees.
///
/// `values` is usually degrees, minutes, and seconds. Missing minutes or
/// seconds count as zero, and a lone value is taken as decimal degrees
/// already. South and West references make the result negative.
pub fn coordinate(values: &[f64], reference: Option<&str>) -> Option<f64> {
    let magnitude = match values {
        [] => return None,
        [degrees] => *degrees,
        [degrees, rest @ ..] => {
            let minutes = rest.first().copied().unwrap_or(0.0);
            let seconds = rest.get(1).copied().unwrap_or(0.0);
            degrees + minutes / 60.0 + seconds / 3600.0
        }
    };

    if !magnitude.is_finite() {
        log::warn!("GPS coordinate isn't a finite number: `{values:?}`");
        return None;
    }

    Some(match reference.map(is_negative_reference) {
        Some(true) => -magnitude,
        Some(false) | None => magnitude,
    })
}

/// `S` and `W` (in either case) point below zero.
fn is_negative_reference(reference: &str) -> bool {
    matches!(
        reference.trim().chars().next().map(|c| c.to_ascii_uppercase()),
        Some('S' | 'W')
    )
}

/// Applies the altitude reference: `1` means below sea level.
pub fn altitude(value: f64, reference: Option<u8>) -> f64 {
    match reference {
        Some(1) => -value,
        _ => value,
    }
}

/// Combines the GPS time stamp (hours, minutes, seconds) with the GPS date
/// stamp into one instant.
///
/// Both parts are always UTC.
pub fn date_time(time: &[f64], date: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), GPS_DATE_FORMAT)
        .inspect_err(|e| log::warn!("GPS date stamp `{date}` isn't valid. err: {e}"))
        .ok()?;

    let [hours, minutes, seconds] = *time else {
        log::warn!("GPS time stamp should have three parts, but got: `{time:?}`");
        return None;
    };

    if [hours, minutes, seconds]
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    {
        log::warn!("GPS time stamp has an invalid part: `{time:?}`");
        return None;
    }

    let whole_seconds = seconds.trunc();
    let nanos = ((seconds - whole_seconds) * 1_000_000_000.0).round() as u32;
    let time = NaiveTime::from_hms_nano_opt(
        hours as u32,
        minutes as u32,
        whole_seconds as u32,
        nanos.min(999_999_999),
    )?;

    Some(date.and_time(time).and_utc())
}
