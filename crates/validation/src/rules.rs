//! Table-driven sanitize/validate dispatch.
//!
//! One exhaustive table maps every [`FieldKey`] to its `{sanitize, validate}`
//! pair; adding a field without rules is a compile error. Sanitization is
//! always applied before validation. Validation is pure and synchronous, and
//! an empty value always validates as "no error" — required-field emptiness
//! is the submit-time concern of [`crate::section`].

use shamsi_core::Message;

use crate::field::FieldKey;
use crate::phone::{self, Country};

/// Result of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub is_valid: bool,
    pub message: Option<Message>,
}

/// A localized error attached to a specific field.
///
/// Flows return this when an input (or a service failure attributable to an
/// input) should block progress and be rendered against the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {}", message.en)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: Message,
}

impl FieldError {
    pub fn new(field: FieldKey, message: Message) -> Self {
        Self { field, message }
    }
}

impl FieldOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: Message) -> Self {
        Self {
            is_valid: false,
            message: Some(message),
        }
    }
}

/// Dropdown-backed enumerations. Values are the option keys the storefront
/// submits, not display labels.
pub const REGIONS: &[&str] = &[
    "riyadh",
    "makkah",
    "madinah",
    "eastern_province",
    "asir",
    "tabuk",
    "qassim",
    "hail",
    "jazan",
    "najran",
    "al_bahah",
    "northern_borders",
    "al_jawf",
];

pub const PROPERTY_TYPES: &[&str] = &[
    "villa",
    "apartment",
    "duplex",
    "townhouse",
    "commercial",
    "other",
];

pub const PROPERTY_OWNERSHIP: &[&str] = &["owned", "rented", "family_owned"];

pub const EMPLOYMENT_STATUSES: &[&str] = &[
    "employed",
    "self_employed",
    "business_owner",
    "retired",
    "unemployed",
];

const NAME_MAX: usize = 50;
const TEXT_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;
const NATIONAL_ID_LEN: usize = 10;
const POSTAL_CODE_LEN: usize = 5;
const CR_NUMBER_LEN: usize = 10;
const VAT_NUMBER_LEN: usize = 15;
const OTP_LEN: usize = 6;
const MONETARY_MAX_DIGITS: usize = 7;
const ROOF_SIZE_MIN: u64 = 10;
const ROOF_SIZE_MAX: u64 = 10_000;

/// The sanitize/validate table, parameterized by the phone country in effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTable {
    pub country: Country,
}

impl FieldTable {
    pub fn new(country: Country) -> Self {
        Self { country }
    }

    /// Strip and truncate raw input down to what the field can contain.
    ///
    /// Sanitization never rejects; it silently drops characters the field's
    /// charset excludes and cuts at the field's maximum length.
    pub fn sanitize(&self, field: FieldKey, raw: &str) -> String {
        match field {
            FieldKey::FirstName | FieldKey::LastName => sanitize_name(raw, NAME_MAX),
            FieldKey::Email => truncate(raw.trim(), EMAIL_MAX),
            FieldKey::Password | FieldKey::ConfirmPassword => truncate(raw, PASSWORD_MAX),
            FieldKey::Phone => digits_only(raw, self.country.digit_count()),
            FieldKey::NationalId => sanitize_national_id(raw),
            FieldKey::PostalCode => digits_only(raw, POSTAL_CODE_LEN),
            FieldKey::City | FieldKey::District | FieldKey::Street => {
                sanitize_text(raw, TEXT_MAX)
            }
            FieldKey::Region
            | FieldKey::PropertyType
            | FieldKey::PropertyOwnership
            | FieldKey::EmploymentStatus => truncate(raw.trim(), TEXT_MAX),
            FieldKey::RoofSize => digits_no_leading_zeros(raw, 5),
            FieldKey::MonthlyIncome | FieldKey::ElectricityBill => {
                digits_no_leading_zeros(raw, MONETARY_MAX_DIGITS)
            }
            FieldKey::Employer | FieldKey::JobTitle | FieldKey::CompanyName => {
                sanitize_text(raw, TEXT_MAX)
            }
            FieldKey::CrNumber => digits_only(raw, CR_NUMBER_LEN),
            FieldKey::VatNumber => digits_only(raw, VAT_NUMBER_LEN),
            FieldKey::Otp => digits_only(raw, OTP_LEN),
        }
    }

    /// Validate a sanitized value.
    ///
    /// Pure and synchronous; never mutates. Callers decide whether to surface
    /// the message and whether to block submission.
    pub fn validate(&self, field: FieldKey, value: &str) -> FieldOutcome {
        // Empty optional fields are "no error" by contract.
        if value.is_empty() {
            return FieldOutcome::valid();
        }

        match field {
            FieldKey::FirstName | FieldKey::LastName => validate_name(value),
            FieldKey::Email => validate_email(value),
            FieldKey::Password | FieldKey::ConfirmPassword => validate_password(value),
            FieldKey::Phone => match phone::validate(self.country, value) {
                Ok(()) => FieldOutcome::valid(),
                Err(msg) => FieldOutcome::invalid(msg),
            },
            FieldKey::NationalId => validate_national_id(value),
            FieldKey::PostalCode => validate_exact_digits(
                value,
                POSTAL_CODE_LEN,
                Message::new(
                    "Postal code must be exactly 5 digits",
                    "يجب أن يتكون الرمز البريدي من 5 أرقام",
                ),
            ),
            FieldKey::City | FieldKey::District | FieldKey::Street => validate_text(value),
            FieldKey::Region => validate_enumerated(value, REGIONS),
            FieldKey::PropertyType => validate_enumerated(value, PROPERTY_TYPES),
            FieldKey::PropertyOwnership => validate_enumerated(value, PROPERTY_OWNERSHIP),
            FieldKey::EmploymentStatus => validate_enumerated(value, EMPLOYMENT_STATUSES),
            FieldKey::RoofSize => validate_numeric_range(
                value,
                ROOF_SIZE_MIN,
                ROOF_SIZE_MAX,
                Message::new(
                    "Roof size must be between 10 and 10,000 square meters",
                    "يجب أن تتراوح مساحة السطح بين 10 و10,000 متر مربع",
                ),
            ),
            FieldKey::MonthlyIncome | FieldKey::ElectricityBill => validate_monetary(value),
            FieldKey::Employer | FieldKey::JobTitle | FieldKey::CompanyName => {
                validate_text(value)
            }
            FieldKey::CrNumber => validate_exact_digits(
                value,
                CR_NUMBER_LEN,
                Message::new(
                    "Commercial registration number must be exactly 10 digits",
                    "يجب أن يتكون رقم السجل التجاري من 10 أرقام",
                ),
            ),
            FieldKey::VatNumber => validate_exact_digits(
                value,
                VAT_NUMBER_LEN,
                Message::new(
                    "VAT number must be exactly 15 digits",
                    "يجب أن يتكون الرقم الضريبي من 15 رقماً",
                ),
            ),
            FieldKey::Otp => validate_exact_digits(
                value,
                OTP_LEN,
                Message::new(
                    "Verification code must be 6 digits",
                    "يجب أن يتكون رمز التحقق من 6 أرقام",
                ),
            ),
        }
    }
}

// ── sanitizers ───────────────────────────────────────────────────────────────

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn is_arabic_letter(c: char) -> bool {
    ('\u{0621}'..='\u{064A}').contains(&c)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || is_arabic_letter(c) || c == ' ' || c == '-'
}

fn sanitize_name(raw: &str, max_chars: usize) -> String {
    raw.chars().filter(|&c| is_name_char(c)).take(max_chars).collect()
}

fn sanitize_text(raw: &str, max_chars: usize) -> String {
    raw.chars().filter(|c| !c.is_control()).take(max_chars).collect()
}

fn digits_only(raw: &str, max_digits: usize) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_digits)
        .collect()
}

/// Digits only, with leading zeros suppressed (monetary fields, roof size).
fn digits_no_leading_zeros(raw: &str, max_digits: usize) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    // "000" collapses to "0", not to empty.
    if trimmed.is_empty() && !digits.is_empty() {
        return "0".to_string();
    }
    truncate(trimmed, max_digits)
}

/// Digits only, first digit restricted to {1, 2}, at most 10 digits.
fn sanitize_national_id(raw: &str) -> String {
    let mut out = String::with_capacity(NATIONAL_ID_LEN);
    for c in raw.chars().filter(|c| c.is_ascii_digit()) {
        if out.is_empty() && c != '1' && c != '2' {
            continue;
        }
        out.push(c);
        if out.len() == NATIONAL_ID_LEN {
            break;
        }
    }
    out
}

// ── validators ───────────────────────────────────────────────────────────────

fn validate_name(value: &str) -> FieldOutcome {
    if value.chars().count() < 2 {
        return FieldOutcome::invalid(Message::new(
            "Name must be at least 2 characters",
            "يجب أن يتكون الاسم من حرفين على الأقل",
        ));
    }
    if !value.chars().all(is_name_char) {
        return FieldOutcome::invalid(Message::new(
            "Name may only contain letters, spaces and hyphens",
            "يجب أن يحتوي الاسم على حروف ومسافات وشرطات فقط",
        ));
    }
    FieldOutcome::valid()
}

fn validate_email(value: &str) -> FieldOutcome {
    let invalid = || {
        FieldOutcome::invalid(Message::new(
            "Enter a valid email address",
            "أدخل بريداً إلكترونياً صحيحاً",
        ))
    };

    let Some((local, domain)) = value.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.is_empty() || value.contains(char::is_whitespace) {
        return invalid();
    }
    // Domain needs at least one dot with something on each side.
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => FieldOutcome::valid(),
        _ => invalid(),
    }
}

fn validate_password(value: &str) -> FieldOutcome {
    if value.chars().count() < PASSWORD_MIN {
        return FieldOutcome::invalid(Message::new(
            "Password must be at least 8 characters",
            "يجب أن تتكون كلمة المرور من 8 أحرف على الأقل",
        ));
    }
    FieldOutcome::valid()
}

fn validate_national_id(value: &str) -> FieldOutcome {
    let all_digits = value.bytes().all(|b| b.is_ascii_digit());
    let starts_ok = value.starts_with('1') || value.starts_with('2');
    if value.len() != NATIONAL_ID_LEN || !all_digits || !starts_ok {
        return FieldOutcome::invalid(Message::new(
            "National ID must be 10 digits starting with 1 or 2",
            "يجب أن يتكون رقم الهوية من 10 أرقام ويبدأ بـ 1 أو 2",
        ));
    }
    FieldOutcome::valid()
}

fn validate_exact_digits(value: &str, len: usize, message: Message) -> FieldOutcome {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return FieldOutcome::invalid(message);
    }
    FieldOutcome::valid()
}

fn validate_text(value: &str) -> FieldOutcome {
    if value.trim().chars().count() < 2 {
        return FieldOutcome::invalid(Message::new(
            "Must be at least 2 characters",
            "يجب أن يتكون من حرفين على الأقل",
        ));
    }
    FieldOutcome::valid()
}

fn validate_enumerated(value: &str, allowed: &[&str]) -> FieldOutcome {
    if allowed.contains(&value) {
        FieldOutcome::valid()
    } else {
        FieldOutcome::invalid(Message::new(
            "Select one of the listed options",
            "اختر أحد الخيارات المتاحة",
        ))
    }
}

fn validate_numeric_range(value: &str, min: u64, max: u64, message: Message) -> FieldOutcome {
    match value.parse::<u64>() {
        Ok(n) if (min..=max).contains(&n) => FieldOutcome::valid(),
        _ => FieldOutcome::invalid(message),
    }
}

fn validate_monetary(value: &str) -> FieldOutcome {
    if value.len() > MONETARY_MAX_DIGITS || value.parse::<u64>().is_err() {
        return FieldOutcome::invalid(Message::new(
            "Enter a valid amount",
            "أدخل مبلغاً صحيحاً",
        ));
    }
    FieldOutcome::valid()
}
