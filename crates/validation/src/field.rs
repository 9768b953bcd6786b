//! Field identifiers shared by every form in the storefront.

use serde::{Deserialize, Serialize};

/// All fields the storefront validates, across registration, profile editing
/// and checkout.
///
/// Error maps are keyed by this enum; `as_str` yields the snake_case key the
/// presentation layer uses to attach a message to its input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    NationalId,
    PostalCode,
    City,
    District,
    Street,
    Region,
    PropertyType,
    PropertyOwnership,
    RoofSize,
    MonthlyIncome,
    ElectricityBill,
    EmploymentStatus,
    Employer,
    JobTitle,
    CompanyName,
    CrNumber,
    VatNumber,
    Otp,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FirstName => "first_name",
            FieldKey::LastName => "last_name",
            FieldKey::Email => "email",
            FieldKey::Password => "password",
            FieldKey::ConfirmPassword => "confirm_password",
            FieldKey::Phone => "phone",
            FieldKey::NationalId => "national_id",
            FieldKey::PostalCode => "postal_code",
            FieldKey::City => "city",
            FieldKey::District => "district",
            FieldKey::Street => "street",
            FieldKey::Region => "region",
            FieldKey::PropertyType => "property_type",
            FieldKey::PropertyOwnership => "property_ownership",
            FieldKey::RoofSize => "roof_size",
            FieldKey::MonthlyIncome => "monthly_income",
            FieldKey::ElectricityBill => "electricity_bill",
            FieldKey::EmploymentStatus => "employment_status",
            FieldKey::Employer => "employer",
            FieldKey::JobTitle => "job_title",
            FieldKey::CompanyName => "company_name",
            FieldKey::CrNumber => "cr_number",
            FieldKey::VatNumber => "vat_number",
            FieldKey::Otp => "otp",
        }
    }
}

impl core::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
