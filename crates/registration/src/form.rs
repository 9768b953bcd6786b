//! Registration form state.
//!
//! Created on wizard mount, mutated field-by-field, discarded after a
//! successful submit or on navigation away. Never persisted locally.

use shamsi_clients::{ProfileUpdate, RegisterRequest, RegistrationRole};
use shamsi_validation::{Country, FieldKey, FieldTable};

/// All field values of the registration wizard, role-specific ones included.
///
/// Values are stored sanitized; [`RegistrationForm::set_field`] runs the
/// field's sanitizer before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub role: RegistrationRole,
    pub country: Country,
    // personal
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub national_id: String,
    // contractor
    pub company_name: String,
    pub cr_number: String,
    pub vat_number: String,
    // address
    pub region: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub postal_code: String,
    // property (consumer)
    pub property_type: String,
    pub property_ownership: String,
    pub roof_size: String,
    pub electricity_bill: String,
    // employment (consumer)
    pub employment_status: String,
    pub employer: String,
    pub job_title: String,
    pub monthly_income: String,
    pub terms_agreed: bool,
}

impl RegistrationForm {
    pub fn new(role: RegistrationRole) -> Self {
        Self {
            role,
            country: Country::default(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            phone: String::new(),
            national_id: String::new(),
            company_name: String::new(),
            cr_number: String::new(),
            vat_number: String::new(),
            region: String::new(),
            city: String::new(),
            district: String::new(),
            street: String::new(),
            postal_code: String::new(),
            property_type: String::new(),
            property_ownership: String::new(),
            roof_size: String::new(),
            electricity_bill: String::new(),
            employment_status: String::new(),
            employer: String::new(),
            job_title: String::new(),
            monthly_income: String::new(),
            terms_agreed: false,
        }
    }

    /// Sanitize `raw` per the field's rules and store it. Returns whether the
    /// stored value actually changed.
    pub fn set_field(&mut self, table: &FieldTable, field: FieldKey, raw: &str) -> bool {
        let sanitized = table.sanitize(field, raw);
        let Some(slot) = self.slot_mut(field) else {
            return false;
        };
        if *slot == sanitized {
            return false;
        }
        *slot = sanitized;
        true
    }

    /// Current value of a field.
    pub fn value(&self, field: FieldKey) -> &str {
        match field {
            FieldKey::FirstName => &self.first_name,
            FieldKey::LastName => &self.last_name,
            FieldKey::Email => &self.email,
            FieldKey::Password => &self.password,
            FieldKey::ConfirmPassword => &self.confirm_password,
            FieldKey::Phone => &self.phone,
            FieldKey::NationalId => &self.national_id,
            FieldKey::CompanyName => &self.company_name,
            FieldKey::CrNumber => &self.cr_number,
            FieldKey::VatNumber => &self.vat_number,
            FieldKey::Region => &self.region,
            FieldKey::City => &self.city,
            FieldKey::District => &self.district,
            FieldKey::Street => &self.street,
            FieldKey::PostalCode => &self.postal_code,
            FieldKey::PropertyType => &self.property_type,
            FieldKey::PropertyOwnership => &self.property_ownership,
            FieldKey::RoofSize => &self.roof_size,
            FieldKey::ElectricityBill => &self.electricity_bill,
            FieldKey::EmploymentStatus => &self.employment_status,
            FieldKey::Employer => &self.employer,
            FieldKey::JobTitle => &self.job_title,
            FieldKey::MonthlyIncome => &self.monthly_income,
            FieldKey::Otp => "",
        }
    }

    fn slot_mut(&mut self, field: FieldKey) -> Option<&mut String> {
        let slot = match field {
            FieldKey::FirstName => &mut self.first_name,
            FieldKey::LastName => &mut self.last_name,
            FieldKey::Email => &mut self.email,
            FieldKey::Password => &mut self.password,
            FieldKey::ConfirmPassword => &mut self.confirm_password,
            FieldKey::Phone => &mut self.phone,
            FieldKey::NationalId => &mut self.national_id,
            FieldKey::CompanyName => &mut self.company_name,
            FieldKey::CrNumber => &mut self.cr_number,
            FieldKey::VatNumber => &mut self.vat_number,
            FieldKey::Region => &mut self.region,
            FieldKey::City => &mut self.city,
            FieldKey::District => &mut self.district,
            FieldKey::Street => &mut self.street,
            FieldKey::PostalCode => &mut self.postal_code,
            FieldKey::PropertyType => &mut self.property_type,
            FieldKey::PropertyOwnership => &mut self.property_ownership,
            FieldKey::RoofSize => &mut self.roof_size,
            FieldKey::ElectricityBill => &mut self.electricity_bill,
            FieldKey::EmploymentStatus => &mut self.employment_status,
            FieldKey::Employer => &mut self.employer,
            FieldKey::JobTitle => &mut self.job_title,
            FieldKey::MonthlyIncome => &mut self.monthly_income,
            // The code input lives on the verification state, not the form.
            FieldKey::Otp => return None,
        };
        Some(slot)
    }

    pub fn phone_present(&self) -> bool {
        !self.phone.is_empty()
    }

    /// Build the identity-service registration payload.
    pub fn to_register_request(&self) -> RegisterRequest {
        let contractor = self.role == RegistrationRole::Contractor;
        RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone: self
                .phone_present()
                .then(|| self.country.e164(&self.phone)),
            role: self.role,
            company_name: (contractor && !self.company_name.is_empty())
                .then(|| self.company_name.clone()),
            cr_number: (contractor && !self.cr_number.is_empty()).then(|| self.cr_number.clone()),
            vat_number: (contractor && !self.vat_number.is_empty())
                .then(|| self.vat_number.clone()),
            terms_agreed: self.terms_agreed,
        }
    }

    /// Build the profile-service payload (saga step two); only non-empty
    /// fields are sent.
    pub fn to_profile_update(&self) -> ProfileUpdate {
        fn nonempty(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }
        ProfileUpdate {
            region: nonempty(&self.region),
            city: nonempty(&self.city),
            district: nonempty(&self.district),
            street: nonempty(&self.street),
            postal_code: nonempty(&self.postal_code),
            property_type: nonempty(&self.property_type),
            property_ownership: nonempty(&self.property_ownership),
            roof_size: nonempty(&self.roof_size),
            electricity_bill: nonempty(&self.electricity_bill),
            employment_status: nonempty(&self.employment_status),
            employer: nonempty(&self.employer),
            job_title: nonempty(&self.job_title),
            monthly_income: nonempty(&self.monthly_income),
            ..Default::default()
        }
    }
}
