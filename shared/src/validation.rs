//! Validation utilities for Krishi Sahayi
//!
//! Field-level checks shared by the backend and the browser client.

use rust_decimal::Decimal;

// ============================================================================
// Soil Validations
// ============================================================================

/// Validate soil pH is on the 0-14 scale
pub fn validate_soil_ph(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("Soil pH must be between 0 and 14");
    }
    Ok(())
}

/// Check if pH suits most Kerala crops (5.5-6.5, slightly acidic laterite soils)
pub fn is_ideal_kerala_ph(ph: Decimal) -> bool {
    ph >= Decimal::new(55, 1) && ph <= Decimal::new(65, 1)
}

/// Validate organic matter percentage
pub fn validate_organic_matter(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::ZERO || percent > Decimal::from(100) {
        return Err("Organic matter must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// Market Validations
// ============================================================================

/// Validate a recorded market price
pub fn validate_market_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be greater than zero");
    }
    Ok(())
}

/// Validate a reported price change is a plausible percentage
pub fn validate_price_change(change: Decimal) -> Result<(), &'static str> {
    if change < Decimal::from(-100) || change > Decimal::from(1000) {
        return Err("Price change must be between -100% and 1000%");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate username (3-50 chars, letters, digits, '_' or '.')
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if len < 3 {
        return Err("Username must be at least 3 characters");
    }
    if len > 50 {
        return Err("Username must be at most 50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    {
        return Err("Username may only contain letters, digits, '_' and '.'");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a location name used for weather lookups
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location is required");
    }
    if trimmed.len() > 100 {
        return Err("Location must be at most 100 characters");
    }
    Ok(())
}
