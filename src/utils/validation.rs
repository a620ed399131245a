use crate::domain::ports::ExportFormat;
use crate::utils::error::{DosageError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Multiplicative factors below 1.0 would let a condition lower the dose.
pub fn validate_factor(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 1.0 {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Factor must be finite and at least 1.0".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Each export format produces a fixed file name, so a repeat would collide.
pub fn validate_unique_formats(field_name: &str, formats: &[ExportFormat]) -> Result<()> {
    let mut seen = HashSet::new();
    for format in formats {
        if !seen.insert(*format) {
            return Err(DosageError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.as_str().to_string(),
                reason: "Format listed more than once".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DosageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Same bounds check as [`validate_range`], reported as a patient input error.
pub fn validate_input_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so test containment rather than exclusion
    if !(value >= min && value <= max) {
        return Err(DosageError::OutOfRangeInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("export.output_path", "./output").is_ok());
        assert!(validate_path("export.output_path", "").is_err());
        assert!(validate_path("export.output_path", "out\0put").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("scoring.base_dosage_mg", 2000.0).is_ok());
        assert!(validate_positive_number("scoring.base_dosage_mg", 0.0).is_err());
        assert!(validate_positive_number("scoring.base_dosage_mg", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_factor() {
        assert!(validate_factor("scoring.stress_factor", 1.3).is_ok());
        assert!(validate_factor("scoring.stress_factor", 1.0).is_ok());
        assert!(validate_factor("scoring.stress_factor", 0.9).is_err());
    }

    #[test]
    fn test_validate_unique_formats() {
        assert!(validate_unique_formats("export.formats", &[]).is_ok());
        assert!(
            validate_unique_formats("export.formats", &[ExportFormat::Csv, ExportFormat::Json])
                .is_ok()
        );
        assert!(
            validate_unique_formats("export.formats", &[ExportFormat::Json, ExportFormat::Json])
                .is_err()
        );
    }

    #[test]
    fn test_validate_input_range_rejects_nan() {
        assert!(validate_input_range("weight_kg", 70.0, 30.0, 200.0).is_ok());
        assert!(validate_input_range("weight_kg", 30.0, 30.0, 200.0).is_ok());
        assert!(validate_input_range("weight_kg", 200.5, 30.0, 200.0).is_err());
        assert!(matches!(
            validate_input_range("weight_kg", f64::NAN, 30.0, 200.0),
            Err(DosageError::OutOfRangeInput { .. })
        ));
    }
}
