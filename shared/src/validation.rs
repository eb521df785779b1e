//! Input validation functions
//!
//! Every validator returns a [`FieldError`] naming the offending field so the
//! API can surface field-level messages. Email syntax is checked with the
//! `validator` crate.

use crate::errors::FieldError;
use rust_decimal::Decimal;
use validator::ValidateEmail;

/// Minimum password length accepted at sign-up and on profile updates
pub const MIN_PASSWORD_LEN: usize = 5;

/// Maximum password length (argon2 input is bounded to keep hashing cheap)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum length of names and titles (matches the VARCHAR(255) columns)
pub const MAX_NAME_LEN: usize = 255;

/// Prices are stored as NUMERIC(5,2)
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound for a recipe price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::new("email", "This field may not be blank"));
    }
    if email.len() > MAX_NAME_LEN {
        return Err(FieldError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(FieldError::new("email", "Enter a valid email address"));
    }
    Ok(())
}

/// Lower-case the domain part of an email, leaving the local part intact
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.is_empty() {
        return Err(FieldError::new("password", "This field may not be blank"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            format!("Ensure this field has at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(FieldError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate a required, bounded text field such as a tag name or a title
pub fn validate_required_text(field: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "This field may not be blank"));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(FieldError::new(
            field,
            format!("Ensure this field has no more than {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

/// Validate an optional, bounded text field
pub fn validate_optional_text(field: &str, value: &str) -> Result<(), FieldError> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(FieldError::new(
            field,
            format!("Ensure this field has no more than {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

/// Validate preparation time in minutes
pub fn validate_time_minutes(minutes: i32) -> Result<(), FieldError> {
    if minutes <= 0 {
        return Err(FieldError::new(
            "time_minutes",
            "Ensure this value is greater than 0",
        ));
    }
    Ok(())
}

/// Validate a recipe price
pub fn validate_price(price: Decimal) -> Result<(), FieldError> {
    if price <= Decimal::ZERO {
        return Err(FieldError::new("price", "Ensure this value is greater than 0"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(FieldError::new(
            "price",
            format!("Ensure that there are no more than {} decimal places", PRICE_SCALE),
        ));
    }
    if price >= MAX_PRICE {
        return Err(FieldError::new(
            "price",
            format!("Ensure this value is less than {}", MAX_PRICE),
        ));
    }
    Ok(())
}
