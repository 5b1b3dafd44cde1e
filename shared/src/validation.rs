//! Validation utilities for Crop Advisor
//!
//! Parses raw form fields into measurements and checks them against
//! agronomically realistic ranges.

use std::borrow::Cow;

use thiserror::Error;

use crate::types::{Feature, FeatureVector, FieldSource, FEATURE_COUNT};

// ============================================================================
// Realistic Ranges
// ============================================================================

/// Inclusive bounds for one measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRange {
    pub feature: Feature,
    pub min: f64,
    /// `None` when the measurement has no upper bound
    pub max: Option<f64>,
}

impl ValidationRange {
    /// True when the value falls below or above the bounds.
    ///
    /// NaN compares false against both bounds and is never out of range.
    pub fn rejects(&self, value: f64) -> bool {
        value < self.min || self.max.is_some_and(|max| value > max)
    }

}

/// Realistic range for each measurement, in feature vector order
pub const VALIDATION_RANGES: [ValidationRange; FEATURE_COUNT] = [
    ValidationRange { feature: Feature::Nitrogen, min: 0.0, max: None },
    ValidationRange { feature: Feature::Phosphorus, min: 0.0, max: None },
    ValidationRange { feature: Feature::Potassium, min: 0.0, max: None },
    ValidationRange { feature: Feature::Temperature, min: -50.0, max: Some(60.0) },
    ValidationRange { feature: Feature::Humidity, min: 0.0, max: Some(100.0) },
    ValidationRange { feature: Feature::Ph, min: 0.0, max: Some(14.0) },
    ValidationRange { feature: Feature::Rainfall, min: 0.0, max: None },
];

/// Bounds for a single measurement
pub fn range_for(feature: Feature) -> &'static ValidationRange {
    &VALIDATION_RANGES[feature.index()]
}

// ============================================================================
// Field Parsing
// ============================================================================

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Missing field: {}", .0.field_name())]
    Missing(Feature),

    #[error("Field {} is not numeric", .0.field_name())]
    NotNumeric(Feature),

    #[error("{0} is outside its realistic range")]
    OutOfRange(Feature),

    /// NaN or an infinity that no bound rejected
    #[error("{0} is not a finite number")]
    NonFinite(Feature),
}

impl FieldError {
    pub fn feature(&self) -> Feature {
        match self {
            FieldError::Missing(f)
            | FieldError::NotNumeric(f)
            | FieldError::OutOfRange(f)
            | FieldError::NonFinite(f) => *f,
        }
    }

    /// True for errors caused by the shape of the input rather than its value
    pub fn is_format_error(&self) -> bool {
        !matches!(self, FieldError::OutOfRange(_))
    }
}

/// Parse one raw field.
///
/// Surrounding whitespace is ignored, and single underscores between digits
/// are accepted as digit separators (`1_000`).
pub fn parse_measurement(feature: Feature, raw: Option<&str>) -> Result<f64, FieldError> {
    let raw = raw.ok_or(FieldError::Missing(feature))?;
    strip_digit_separators(raw.trim())
        .and_then(|digits| digits.parse::<f64>().ok())
        .ok_or(FieldError::NotNumeric(feature))
}

/// Remove `_` separators. `None` when an underscore is not between two digits.
fn strip_digit_separators(raw: &str) -> Option<Cow<'_, str>> {
    if !raw.contains('_') {
        return Some(Cow::Borrowed(raw));
    }
    let bytes = raw.as_bytes();
    let mut digits = String::with_capacity(raw.len());
    for (i, c) in raw.char_indices() {
        if c != '_' {
            digits.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(Cow::Owned(digits))
}

/// Parse all seven fields, in feature vector order.
///
/// Stops at the first missing or non-numeric field.
pub fn parse_measurements<S>(fields: &S) -> Result<[f64; FEATURE_COUNT], FieldError>
where
    S: FieldSource + ?Sized,
{
    let mut values = [0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        values[feature.index()] = parse_measurement(feature, fields.field(feature.field_name()))?;
    }
    Ok(values)
}

// ============================================================================
// Range Validation
// ============================================================================

/// Check parsed measurements against [`VALIDATION_RANGES`].
///
/// Bounds are checked for every field first. A NaN, or an infinity on the
/// open side of a range, then fails as [`FieldError::NonFinite`], which
/// counts as a format error.
pub fn validate_measurements(values: [f64; FEATURE_COUNT]) -> Result<FeatureVector, FieldError> {
    for range in &VALIDATION_RANGES {
        if range.rejects(values[range.feature.index()]) {
            return Err(FieldError::OutOfRange(range.feature));
        }
    }
    if let Some(feature) = Feature::ALL
        .into_iter()
        .find(|feature| !values[feature.index()].is_finite())
    {
        return Err(FieldError::NonFinite(feature));
    }
    Ok(FeatureVector::new(values))
}

/// Parse and validate a submitted form into a feature vector.
///
/// Format errors take precedence: every field is parsed before any range is
/// checked.
pub fn read_feature_vector<S>(fields: &S) -> Result<FeatureVector, FieldError>
where
    S: FieldSource + ?Sized,
{
    let values = parse_measurements(fields)?;
    validate_measurements(values)
}

/// Check a reading given as separate values
pub fn is_realistic_reading(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
) -> bool {
    validate_measurements([
        nitrogen,
        phosphorus,
        potassium,
        temperature,
        humidity,
        ph,
        rainfall,
    ])
    .is_ok()
}
