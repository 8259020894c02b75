//! Field rules that the validator derive cannot express.

use chrono::NaiveDate;

use crate::error::{UserError, UserResult};

/// Valid iff 10 or 11 digits remain after dropping every non-digit
/// (area code plus number, with or without the mobile prefix).
pub fn validate_phone(phone: &str) -> UserResult<()> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits == 10 || digits == 11 {
        Ok(())
    } else {
        Err(UserError::Validation(format!(
            "phone must have 10 or 11 digits, got {digits}"
        )))
    }
}

/// Birth date strictly in the past, hire date not before birth.
pub fn validate_dates(
    birth_date: NaiveDate,
    hire_date: NaiveDate,
    today: NaiveDate,
) -> UserResult<()> {
    if birth_date >= today {
        return Err(UserError::Validation(format!(
            "birth date {birth_date} must be in the past"
        )));
    }
    if hire_date < birth_date {
        return Err(UserError::Validation(format!(
            "hire date {hire_date} is before birth date {birth_date}"
        )));
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
