//! Field-level checks shared by the create/update inputs.
//!
//! Each helper returns [`AppError::Validation`] naming the offending field.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{AppError, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
});

pub fn not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Length limit in characters, not bytes.
pub fn max_chars(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} (got {value})"
        )));
    }
    Ok(())
}

pub fn finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!("{field} must be a finite number")));
    }
    Ok(())
}

/// Checks total digits, decimal places and whole digits of `value`.
///
/// Trailing zeros are ignored, so `72.50` counts as two digits after the point.
pub fn decimal(field: &str, value: Decimal, max_digits: u32, decimal_places: u32) -> Result<()> {
    let normalized = value.normalize();
    let scale = normalized.scale();
    let mantissa = normalized.mantissa().unsigned_abs();
    let significant = if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    };
    // 0.05 has one significant digit but still occupies two decimal places
    let digits = significant.max(scale);
    let whole_digits = digits - scale;

    if digits > max_digits {
        return Err(AppError::Validation(format!(
            "{field} must have no more than {max_digits} digits in total"
        )));
    }
    if scale > decimal_places {
        return Err(AppError::Validation(format!(
            "{field} must have no more than {decimal_places} decimal places"
        )));
    }
    let max_whole_digits = max_digits.saturating_sub(decimal_places);
    if whole_digits > max_whole_digits {
        return Err(AppError::Validation(format!(
            "{field} must have no more than {max_whole_digits} digits before the decimal point"
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value) {
        return Err(AppError::Validation(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(())
}
