//! Multi-step registration wizard.
//!
//! Steps are ordered and index-addressed; moving forward is gated by the
//! current step's validation, moving backward never is. Validation failures
//! populate a shared error map keyed by field; any populated error for the
//! step blocks `next`.

use std::collections::BTreeMap;

use shamsi_clients::RegistrationRole;
use shamsi_core::Message;
use shamsi_otp::PhoneVerification;
use shamsi_validation::{section, FieldKey, FieldTable};

use crate::documents::DocumentIntake;
use crate::form::RegistrationForm;

/// Ordered wizard steps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Personal,
    Address,
    Property,
    Documents,
    Verification,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Personal,
        WizardStep::Address,
        WizardStep::Property,
        WizardStep::Documents,
        WizardStep::Verification,
    ];

    /// Form fields belonging to this step for the given role.
    pub fn fields(&self, role: RegistrationRole) -> &'static [FieldKey] {
        match (self, role) {
            (WizardStep::Personal, RegistrationRole::Consumer) => &[
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Email,
                FieldKey::Password,
                FieldKey::ConfirmPassword,
                FieldKey::Phone,
                FieldKey::NationalId,
            ],
            (WizardStep::Personal, RegistrationRole::Contractor) => &[
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Email,
                FieldKey::Password,
                FieldKey::ConfirmPassword,
                FieldKey::Phone,
                FieldKey::NationalId,
                FieldKey::CompanyName,
                FieldKey::CrNumber,
                FieldKey::VatNumber,
            ],
            (WizardStep::Address, _) => &[
                FieldKey::Region,
                FieldKey::City,
                FieldKey::District,
                FieldKey::Street,
                FieldKey::PostalCode,
            ],
            (WizardStep::Property, RegistrationRole::Consumer) => &[
                FieldKey::PropertyType,
                FieldKey::PropertyOwnership,
                FieldKey::RoofSize,
                FieldKey::ElectricityBill,
                FieldKey::EmploymentStatus,
                FieldKey::Employer,
                FieldKey::JobTitle,
                FieldKey::MonthlyIncome,
            ],
            (WizardStep::Property, RegistrationRole::Contractor) => &[],
            (WizardStep::Documents, _) | (WizardStep::Verification, _) => &[],
        }
    }

    /// Fields that must be non-empty before this step passes.
    pub fn required(&self, role: RegistrationRole) -> &'static [FieldKey] {
        match (self, role) {
            (WizardStep::Personal, RegistrationRole::Consumer) => &[
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Email,
                FieldKey::Password,
                FieldKey::ConfirmPassword,
                FieldKey::Phone,
                FieldKey::NationalId,
            ],
            (WizardStep::Personal, RegistrationRole::Contractor) => &[
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Email,
                FieldKey::Password,
                FieldKey::ConfirmPassword,
                FieldKey::Phone,
                FieldKey::NationalId,
                FieldKey::CompanyName,
                FieldKey::CrNumber,
            ],
            (WizardStep::Address, _) => &[
                FieldKey::Region,
                FieldKey::City,
                FieldKey::District,
                FieldKey::PostalCode,
            ],
            (WizardStep::Property, RegistrationRole::Consumer) => {
                &[FieldKey::PropertyType, FieldKey::PropertyOwnership]
            }
            (WizardStep::Property, RegistrationRole::Contractor) => &[],
            (WizardStep::Documents, _) | (WizardStep::Verification, _) => &[],
        }
    }
}

/// The wizard: form state, navigation, validation errors, document intake
/// and the phone verification machine, all scoped to one mount.
#[derive(Debug)]
pub struct RegistrationWizard {
    table: FieldTable,
    form: RegistrationForm,
    verification: PhoneVerification,
    documents: DocumentIntake,
    step_index: usize,
    errors: BTreeMap<FieldKey, Message>,
    terms_error: Option<Message>,
}

impl RegistrationWizard {
    pub fn new(role: RegistrationRole) -> Self {
        let form = RegistrationForm::new(role);
        Self {
            table: FieldTable::new(form.country),
            form,
            verification: PhoneVerification::new(),
            documents: DocumentIntake::new(),
            step_index: 0,
            errors: BTreeMap::new(),
            terms_error: None,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::ALL[self.step_index]
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn verification(&self) -> &PhoneVerification {
        &self.verification
    }

    /// Mutable access for the OTP flow driver.
    pub fn verification_mut(&mut self) -> &mut PhoneVerification {
        &mut self.verification
    }

    pub fn documents(&self) -> &DocumentIntake {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentIntake {
        &mut self.documents
    }

    pub fn errors(&self) -> &BTreeMap<FieldKey, Message> {
        &self.errors
    }

    pub fn error_for(&self, field: FieldKey) -> Option<&Message> {
        self.errors.get(&field)
    }

    pub fn terms_error(&self) -> Option<&Message> {
        self.terms_error.as_ref()
    }

    /// Record user input: sanitize, store, clear the field's stale error.
    ///
    /// Changing the phone number resets the whole verification state back to
    /// unverified.
    pub fn set_field(&mut self, field: FieldKey, raw: &str) {
        let changed = self.form.set_field(&self.table, field, raw);
        self.errors.remove(&field);
        if field == FieldKey::Phone && changed {
            self.verification.phone_changed();
        }
    }

    pub fn set_terms_agreed(&mut self, agreed: bool) {
        self.form.terms_agreed = agreed;
        if agreed {
            self.terms_error = None;
        }
    }

    /// Validate one step, populating the error map. Returns whether the step
    /// currently passes.
    pub fn validate_step(&mut self, step: WizardStep) -> bool {
        let role = self.form.role;

        for &field in step.fields(role) {
            self.errors.remove(&field);
            let outcome = self.table.validate(field, self.form.value(field));
            if let Some(message) = outcome.message {
                self.errors.insert(field, message);
            }
        }

        for &field in step.required(role) {
            if self.form.value(field).trim().is_empty() {
                self.errors.entry(field).or_insert_with(section::required_message);
            }
        }

        if step == WizardStep::Personal
            && !self.form.password.is_empty()
            && self.form.password != self.form.confirm_password
        {
            self.errors.insert(
                FieldKey::ConfirmPassword,
                Message::new("Passwords do not match", "كلمتا المرور غير متطابقتين"),
            );
        }

        let mut blocked = step
            .fields(role)
            .iter()
            .any(|field| self.errors.contains_key(field));

        if step == WizardStep::Documents && !self.documents.is_complete(role) {
            blocked = true;
        }

        if step == WizardStep::Verification {
            self.errors.remove(&FieldKey::Otp);
            if !self.form.terms_agreed {
                self.terms_error = Some(Message::new(
                    "You must accept the terms and conditions",
                    "يجب الموافقة على الشروط والأحكام",
                ));
                blocked = true;
            }
            if !self.verification.is_satisfied(self.form.phone_present()) {
                self.errors.insert(
                    FieldKey::Otp,
                    Message::new(
                        "Verify your phone number to continue",
                        "يرجى التحقق من رقم جوالك للمتابعة",
                    ),
                );
                blocked = true;
            }
        }

        !blocked
    }

    /// Advance to the next step if the current one validates.
    pub fn next(&mut self) -> bool {
        if !self.validate_step(self.current_step()) {
            return false;
        }
        if self.step_index + 1 < WizardStep::ALL.len() {
            self.step_index += 1;
            true
        } else {
            false
        }
    }

    /// Backward navigation is never gated.
    pub fn back(&mut self) {
        self.step_index = self.step_index.saturating_sub(1);
    }

    /// Whether every step passes; the saga refuses to run otherwise.
    pub fn is_ready_to_submit(&mut self) -> bool {
        WizardStep::ALL
            .into_iter()
            .all(|step| self.validate_step(step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::PendingDocument;
    use shamsi_clients::DocumentCategory;

    fn fill_personal(wizard: &mut RegistrationWizard) {
        wizard.set_field(FieldKey::FirstName, "Sara");
        wizard.set_field(FieldKey::LastName, "Al-Otaibi");
        wizard.set_field(FieldKey::Email, "sara@example.com");
        wizard.set_field(FieldKey::Password, "sunny-roof-77");
        wizard.set_field(FieldKey::ConfirmPassword, "sunny-roof-77");
        wizard.set_field(FieldKey::Phone, "512345678");
        wizard.set_field(FieldKey::NationalId, "1234567890");
    }

    fn fill_address(wizard: &mut RegistrationWizard) {
        wizard.set_field(FieldKey::Region, "riyadh");
        wizard.set_field(FieldKey::City, "Riyadh");
        wizard.set_field(FieldKey::District, "Al Olaya");
        wizard.set_field(FieldKey::PostalCode, "12345");
    }

    #[test]
    fn empty_personal_step_blocks_next_and_populates_errors() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), WizardStep::Personal);
        assert!(wizard.error_for(FieldKey::FirstName).is_some());
        assert!(wizard.error_for(FieldKey::Phone).is_some());
    }

    #[test]
    fn valid_personal_step_advances() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        fill_personal(&mut wizard);
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), WizardStep::Address);
    }

    #[test]
    fn password_mismatch_blocks_with_confirm_error() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        fill_personal(&mut wizard);
        wizard.set_field(FieldKey::ConfirmPassword, "different-99");
        assert!(!wizard.next());
        assert!(wizard.error_for(FieldKey::ConfirmPassword).is_some());
    }

    #[test]
    fn back_is_never_gated() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        fill_personal(&mut wizard);
        assert!(wizard.next());
        // Address step is empty and would not validate, but back still works.
        wizard.back();
        assert_eq!(wizard.current_step(), WizardStep::Personal);
        wizard.back();
        assert_eq!(wizard.current_step(), WizardStep::Personal);
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        assert!(!wizard.next());
        assert!(wizard.error_for(FieldKey::FirstName).is_some());
        wizard.set_field(FieldKey::FirstName, "Sara");
        assert!(wizard.error_for(FieldKey::FirstName).is_none());
    }

    #[test]
    fn changing_phone_resets_verification() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        wizard.set_field(FieldKey::Phone, "512345678");
        let v = wizard.verification_mut();
        v.begin_send().unwrap();
        v.send_succeeded();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_succeeded();
        assert!(wizard.verification().is_verified());

        wizard.set_field(FieldKey::Phone, "598765432");
        assert!(!wizard.verification().is_verified());
        assert!(!wizard.verification().otp_sent());
        assert_eq!(wizard.verification().resend_countdown(), 0);

        // Re-entering the same number is not a change.
        let before = wizard.verification().clone();
        wizard.set_field(FieldKey::Phone, "598765432");
        assert_eq!(*wizard.verification(), before);
    }

    #[test]
    fn documents_step_requires_role_specific_categories() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        assert!(!wizard.validate_step(WizardStep::Documents));

        for category in [DocumentCategory::NationalId, DocumentCategory::ProofOfOwnership] {
            wizard.documents_mut().attach(PendingDocument {
                category,
                file_name: "scan.png".to_string(),
                mime_type: "image/png".to_string(),
                size_bytes: 1024,
            });
        }
        assert!(wizard.validate_step(WizardStep::Documents));
    }

    #[test]
    fn verification_step_requires_terms_and_verified_phone() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        wizard.set_field(FieldKey::Phone, "512345678");

        assert!(!wizard.validate_step(WizardStep::Verification));
        assert!(wizard.terms_error().is_some());
        assert!(wizard.error_for(FieldKey::Otp).is_some());

        wizard.set_terms_agreed(true);
        let v = wizard.verification_mut();
        v.begin_send().unwrap();
        v.send_succeeded();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_succeeded();

        assert!(wizard.validate_step(WizardStep::Verification));
    }

    #[test]
    fn contractor_personal_step_requires_company_fields() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Contractor);
        fill_personal(&mut wizard);
        assert!(!wizard.next());
        assert!(wizard.error_for(FieldKey::CompanyName).is_some());
        assert!(wizard.error_for(FieldKey::CrNumber).is_some());

        wizard.set_field(FieldKey::CompanyName, "Desert Solar LLC");
        wizard.set_field(FieldKey::CrNumber, "1010101010");
        assert!(wizard.next());
    }

    #[test]
    fn contractor_property_step_has_nothing_to_validate() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Contractor);
        assert!(wizard.validate_step(WizardStep::Property));
    }

    #[test]
    fn address_step_street_is_optional() {
        let mut wizard = RegistrationWizard::new(RegistrationRole::Consumer);
        fill_personal(&mut wizard);
        assert!(wizard.next());
        fill_address(&mut wizard);
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), WizardStep::Property);
    }
}
