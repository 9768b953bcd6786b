//! Profile sections and their required-field tables.
//!
//! Emptiness of required fields is checked here, centrally, at submit time.
//! Per-field validators deliberately treat empty input as "no error" so that
//! optional fields never surface spurious messages.

use serde::{Deserialize, Serialize};
use shamsi_core::Message;

use crate::field::FieldKey;

/// An independently editable logical group of profile fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Address,
    Property,
    Employment,
    Preferences,
}

impl Section {
    /// Fields that must be non-empty before the section can be saved.
    pub fn required_fields(&self) -> &'static [FieldKey] {
        match self {
            Section::Personal => &[FieldKey::FirstName, FieldKey::LastName, FieldKey::Phone],
            Section::Address => &[
                FieldKey::Region,
                FieldKey::City,
                FieldKey::District,
                FieldKey::PostalCode,
            ],
            Section::Property => &[FieldKey::PropertyType, FieldKey::PropertyOwnership],
            Section::Employment => &[FieldKey::EmploymentStatus],
            Section::Preferences => &[],
        }
    }
}

/// The message attached to a missing required field.
pub fn required_message() -> Message {
    Message::new("This field is required", "هذا الحقل مطلوب")
}

/// Collect the section's required fields whose current value is empty.
///
/// `value_of` resolves a field to its current (already sanitized) value.
pub fn missing_required<'a, F>(section: Section, value_of: F) -> Vec<FieldKey>
where
    F: Fn(FieldKey) -> &'a str,
{
    section
        .required_fields()
        .iter()
        .copied()
        .filter(|&field| value_of(field).trim().is_empty())
        .collect()
}
