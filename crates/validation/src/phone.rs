//! Per-country mobile number rules.
//!
//! OTP delivery requires a fully-qualified E.164 number; each supported
//! country carries its dialing code, the exact national digit count, and the
//! leading digit(s) a mobile number must start with.

use serde::{Deserialize, Serialize};
use shamsi_core::Message;

/// Countries the marketplace accepts mobile numbers from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    #[default]
    SaudiArabia,
    UnitedArabEmirates,
    Kuwait,
    Bahrain,
}

impl Country {
    /// International dialing prefix, without the leading `+`.
    pub fn dialing_code(&self) -> &'static str {
        match self {
            Country::SaudiArabia => "966",
            Country::UnitedArabEmirates => "971",
            Country::Kuwait => "965",
            Country::Bahrain => "973",
        }
    }

    /// Exact count of national digits for a mobile number.
    pub fn digit_count(&self) -> usize {
        match self {
            Country::SaudiArabia | Country::UnitedArabEmirates => 9,
            Country::Kuwait | Country::Bahrain => 8,
        }
    }

    /// Digits a mobile number must start with, if the plan restricts them.
    pub fn mobile_prefixes(&self) -> &'static [&'static str] {
        match self {
            Country::SaudiArabia | Country::UnitedArabEmirates => &["5"],
            Country::Kuwait => &["5", "6", "9"],
            Country::Bahrain => &["3"],
        }
    }

    /// Build the fully-qualified E.164 number from sanitized national digits.
    pub fn e164(&self, digits: &str) -> String {
        format!("+{}{}", self.dialing_code(), digits)
    }

    /// Inverse of [`Country::e164`]: strip this country's prefix from a stored
    /// number. Numbers without the prefix come back unchanged.
    pub fn local_digits<'a>(&self, full_phone: &'a str) -> &'a str {
        full_phone
            .strip_prefix('+')
            .and_then(|rest| rest.strip_prefix(self.dialing_code()))
            .unwrap_or(full_phone)
    }
}

/// Validate sanitized national digits against the country's plan.
///
/// Exactly `digit_count` digits with an allowed leading prefix passes;
/// anything else fails. Empty input is the caller's concern (required-field
/// check), so it passes here.
pub fn validate(country: Country, digits: &str) -> Result<(), Message> {
    if digits.is_empty() {
        return Ok(());
    }

    if digits.len() != country.digit_count() {
        return Err(Message::new(
            format!(
                "Mobile number must be exactly {} digits",
                country.digit_count()
            ),
            format!("يجب أن يتكون رقم الجوال من {} أرقام", country.digit_count()),
        ));
    }

    let prefix_ok = country
        .mobile_prefixes()
        .iter()
        .any(|p| digits.starts_with(p));
    if !prefix_ok {
        return Err(Message::new(
            "Enter a valid mobile number",
            "أدخل رقم جوال صحيح",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_length_with_correct_prefix_passes_for_all_countries() {
        assert!(validate(Country::SaudiArabia, "512345678").is_ok());
        assert!(validate(Country::UnitedArabEmirates, "501234567").is_ok());
        assert!(validate(Country::Kuwait, "65123456").is_ok());
        assert!(validate(Country::Bahrain, "36123456").is_ok());
    }

    #[test]
    fn wrong_length_fails_for_all_countries() {
        for country in [
            Country::SaudiArabia,
            Country::UnitedArabEmirates,
            Country::Kuwait,
            Country::Bahrain,
        ] {
            let n = country.digit_count();
            let short = "5".repeat(n - 1);
            let long = "5".repeat(n + 1);
            assert!(validate(country, &short).is_err(), "{country:?} short");
            assert!(validate(country, &long).is_err(), "{country:?} long");
        }
    }

    #[test]
    fn wrong_leading_digit_fails() {
        assert!(validate(Country::SaudiArabia, "412345678").is_err());
        assert!(validate(Country::Bahrain, "56123456").is_err());
    }

    #[test]
    fn empty_input_is_not_a_phone_error() {
        assert!(validate(Country::SaudiArabia, "").is_ok());
    }

    #[test]
    fn e164_prepends_dialing_code() {
        assert_eq!(Country::SaudiArabia.e164("512345678"), "+966512345678");
        assert_eq!(Country::Kuwait.e164("65123456"), "+96565123456");
    }

    #[test]
    fn local_digits_inverts_e164() {
        assert_eq!(
            Country::SaudiArabia.local_digits("+966512345678"),
            "512345678"
        );
        // Unqualified input passes through untouched.
        assert_eq!(Country::SaudiArabia.local_digits("512345678"), "512345678");
    }
}
