//! Glue between `validator` derive output and [`CoreError`].

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::Date;

/// Run derive-generated validation and convert failures into `BadInput`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(into_bad_input)
}

/// Flatten a `ValidationErrors` tree into a single `BadInput` message.
pub fn into_bad_input(errors: ValidationErrors) -> CoreError {
    CoreError::BadInput(errors.to_string())
}

/// Reject dates later than `today`.
pub fn not_after(date: &Date, today: Date, code: &'static str) -> Result<(), ValidationError> {
    if *date > today {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("{date} is in the future").into());
        return Err(err);
    }
    Ok(())
}

/// Reject blank strings (only whitespace).
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_date_is_rejected() {
        let today = Date::from_ymd_opt(2026, 10, 16).unwrap();
        let tomorrow = Date::from_ymd_opt(2026, 10, 17).unwrap();
        assert!(not_after(&today, today, "future").is_ok());
        assert!(not_after(&tomorrow, today, "future").is_err());
    }

    #[test]
    fn blank_is_rejected() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("Dell").is_ok());
    }
}
