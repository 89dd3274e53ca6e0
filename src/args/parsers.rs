use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult, ValidationError};

/// Duration suffixes and their length in milliseconds. A bare number means
/// seconds.
const DURATION_UNITS: [(&str, u64); 4] = [
    ("ms", 1),
    ("s", 1_000),
    ("m", 60_000),
    ("h", 3_600_000),
];

pub(super) fn parse_positive<T>(raw: &str) -> AppResult<T>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse::<T>().map_err(AppError::from)
}

/// Parses a request timeout such as `250ms`, `5s`, `2m` or `5`.
pub(crate) fn parse_duration_arg(raw: &str) -> AppResult<Duration> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let unit_start = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    if unit_start == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (digits, unit) = value.split_at(unit_start);
    let amount: u64 = digits.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if unit.is_empty() { "s" } else { unit };
    let Some(&(_, millis_per_unit)) = DURATION_UNITS.iter().find(|(name, _)| *name == unit) else {
        return Err(AppError::validation(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }));
    };
    let millis = amount
        .checked_mul(millis_per_unit)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;

    if millis == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(Duration::from_millis(millis))
}
