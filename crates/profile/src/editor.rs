//! Section-scoped profile editing.
//!
//! One section is edited at a time. Entering edit mode snapshots the
//! authoritative record into a draft; cancel just drops the draft, there is
//! no undo buffer. Saving validates the draft, splits it by owning service
//! and issues at most one call per destination.

use std::collections::BTreeMap;

use shamsi_clients::{AuthClient, IdentityUpdate, ProfileClient, ProfileUpdate};
use shamsi_core::Message;
use shamsi_validation::{section, Country, FieldKey, FieldTable, Section};

use crate::completion::completion;
use crate::notice::Notice;
use crate::record::{reconcile, UserRecord};

/// Editable fields per section. Required-ness lives in the shared section
/// tables; this is the full list the draft carries.
fn section_fields(section: Section) -> &'static [FieldKey] {
    match section {
        Section::Personal => &[FieldKey::FirstName, FieldKey::LastName, FieldKey::Phone],
        Section::Address => &[
            FieldKey::Region,
            FieldKey::City,
            FieldKey::District,
            FieldKey::Street,
            FieldKey::PostalCode,
        ],
        Section::Property => &[
            FieldKey::PropertyType,
            FieldKey::PropertyOwnership,
            FieldKey::RoofSize,
            FieldKey::ElectricityBill,
        ],
        Section::Employment => &[
            FieldKey::EmploymentStatus,
            FieldKey::Employer,
            FieldKey::JobTitle,
            FieldKey::MonthlyIncome,
        ],
        Section::Preferences => &[],
    }
}

/// Draft of the preferences section; its fields are typed, not free text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferencesDraft {
    pub preferred_language: String,
    pub marketing_opt_in: bool,
}

/// Editing state for the account pages.
#[derive(Debug)]
pub struct SectionEditor {
    table: FieldTable,
    record: UserRecord,
    editing: Option<Section>,
    draft: BTreeMap<FieldKey, String>,
    preferences: PreferencesDraft,
    errors: BTreeMap<FieldKey, Message>,
    saving: bool,
    notice: Option<Notice>,
}

impl SectionEditor {
    pub fn new(record: UserRecord, country: Country) -> Self {
        Self {
            table: FieldTable::new(country),
            record,
            editing: None,
            draft: BTreeMap::new(),
            preferences: PreferencesDraft::default(),
            errors: BTreeMap::new(),
            saving: false,
            notice: None,
        }
    }

    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    pub fn completion(&self) -> u8 {
        completion(&self.record)
    }

    pub fn editing(&self) -> Option<Section> {
        self.editing
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn notice_mut(&mut self) -> Option<&mut Notice> {
        self.notice.as_mut()
    }

    pub fn error_for(&self, field: FieldKey) -> Option<&Message> {
        self.errors.get(&field)
    }

    /// Current draft value of a field; empty when not editing it.
    pub fn draft_value(&self, field: FieldKey) -> &str {
        self.draft.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn preferences_draft(&self) -> &PreferencesDraft {
        &self.preferences
    }

    /// Start editing `section`, snapshotting its slice of the record.
    pub fn enter_edit(&mut self, section: Section) {
        self.editing = Some(section);
        self.errors.clear();
        self.draft = section_fields(section)
            .iter()
            .map(|&field| (field, self.record_value(field).to_string()))
            .collect();
        if section == Section::Preferences {
            self.preferences = PreferencesDraft {
                preferred_language: self.record.profile.preferred_language.clone(),
                marketing_opt_in: self.record.profile.marketing_opt_in,
            };
        }
    }

    /// Drop the draft. The next `enter_edit` re-snapshots from the record.
    pub fn cancel(&mut self) {
        self.editing = None;
        self.draft.clear();
        self.errors.clear();
    }

    /// Record user input into the draft (sanitized), clearing the field's
    /// stale error.
    pub fn set_field(&mut self, field: FieldKey, raw: &str) {
        let sanitized = self.table.sanitize(field, raw);
        self.draft.insert(field, sanitized);
        self.errors.remove(&field);
    }

    pub fn set_preferred_language(&mut self, language: &str) {
        self.preferences.preferred_language = language.to_string();
    }

    pub fn set_marketing_opt_in(&mut self, opt_in: bool) {
        self.preferences.marketing_opt_in = opt_in;
    }

    /// The saved value a draft starts from.
    fn record_value(&self, field: FieldKey) -> &str {
        let p = &self.record.profile;
        match field {
            FieldKey::FirstName => &self.record.first_name,
            FieldKey::LastName => &self.record.last_name,
            FieldKey::Phone => self
                .record
                .phone
                .as_deref()
                .map(|full| self.table.country.local_digits(full))
                .unwrap_or(""),
            FieldKey::Region => &p.region,
            FieldKey::City => &p.city,
            FieldKey::District => &p.district,
            FieldKey::Street => &p.street,
            FieldKey::PostalCode => &p.postal_code,
            FieldKey::PropertyType => &p.property_type,
            FieldKey::PropertyOwnership => &p.property_ownership,
            FieldKey::RoofSize => &p.roof_size,
            FieldKey::ElectricityBill => &p.electricity_bill,
            FieldKey::EmploymentStatus => &p.employment_status,
            FieldKey::Employer => &p.employer,
            FieldKey::JobTitle => &p.job_title,
            FieldKey::MonthlyIncome => &p.monthly_income,
            _ => "",
        }
    }

    fn validate_draft(&mut self, section: Section) -> bool {
        self.errors.clear();
        for &field in section_fields(section) {
            let outcome = self.table.validate(field, self.draft_value(field));
            if let Some(message) = outcome.message {
                self.errors.insert(field, message);
            }
        }
        for field in section::missing_required(section, |field| self.draft_value(field)) {
            self.errors
                .entry(field)
                .or_insert_with(section::required_message);
        }
        self.errors.is_empty()
    }

    /// A changed, non-empty draft value; `None` means "leave unchanged".
    fn changed(&self, field: FieldKey) -> Option<String> {
        let value = self.draft_value(field);
        (value != self.record_value(field) && !value.is_empty()).then(|| value.to_string())
    }

    fn identity_update(&self) -> IdentityUpdate {
        IdentityUpdate {
            first_name: self.changed(FieldKey::FirstName),
            last_name: self.changed(FieldKey::LastName),
            phone: self
                .changed(FieldKey::Phone)
                .map(|digits| self.table.country.e164(&digits)),
        }
    }

    fn profile_update(&self, section: Section) -> ProfileUpdate {
        match section {
            Section::Personal => ProfileUpdate::default(),
            Section::Address => ProfileUpdate {
                region: self.changed(FieldKey::Region),
                city: self.changed(FieldKey::City),
                district: self.changed(FieldKey::District),
                street: self.changed(FieldKey::Street),
                postal_code: self.changed(FieldKey::PostalCode),
                ..Default::default()
            },
            Section::Property => ProfileUpdate {
                property_type: self.changed(FieldKey::PropertyType),
                property_ownership: self.changed(FieldKey::PropertyOwnership),
                roof_size: self.changed(FieldKey::RoofSize),
                electricity_bill: self.changed(FieldKey::ElectricityBill),
                ..Default::default()
            },
            Section::Employment => ProfileUpdate {
                employment_status: self.changed(FieldKey::EmploymentStatus),
                employer: self.changed(FieldKey::Employer),
                job_title: self.changed(FieldKey::JobTitle),
                monthly_income: self.changed(FieldKey::MonthlyIncome),
                ..Default::default()
            },
            Section::Preferences => {
                let p = &self.record.profile;
                ProfileUpdate {
                    preferred_language: (self.preferences.preferred_language
                        != p.preferred_language
                        && !self.preferences.preferred_language.is_empty())
                    .then(|| self.preferences.preferred_language.clone()),
                    marketing_opt_in: (self.preferences.marketing_opt_in != p.marketing_opt_in)
                        .then_some(self.preferences.marketing_opt_in),
                    ..Default::default()
                }
            }
        }
    }

    /// Validate and persist the current draft.
    ///
    /// Returns whether the save went through. Validation failures populate
    /// the per-field error map; service failures raise an error notice and
    /// keep the draft so the user can retry. The saving flag is reset on
    /// every path.
    pub async fn save(
        &mut self,
        auth: &dyn AuthClient,
        profile: &dyn ProfileClient,
    ) -> bool {
        let Some(section) = self.editing else {
            return false;
        };
        if self.saving {
            return false;
        }
        if !self.validate_draft(section) {
            return false;
        }
        self.saving = true;

        let identity_update = self.identity_update();
        let profile_update = self.profile_update(section);

        if section == Section::Personal && !identity_update.is_empty() {
            if let Err(err) = auth.update_current_user(identity_update).await {
                tracing::warn!(section = ?section, code = ?err.code, "identity update failed");
                self.notice = Some(Notice::error(err.message));
                self.saving = false;
                return false;
            }
        }
        if !profile_update.is_empty() {
            if let Err(err) = profile.update_profile(profile_update).await {
                tracing::warn!(section = ?section, code = ?err.code, "profile update failed");
                self.notice = Some(Notice::error(err.message));
                self.saving = false;
                return false;
            }
        }

        // A failed refresh does not undo the writes; the stale record stands
        // until the next load.
        match (auth.refresh_user().await, profile.get_profile().await) {
            (Ok(identity), Ok(stored)) => {
                self.record = reconcile(&identity, &stored);
                self.notice = Some(Notice::success(Message::new(
                    "Changes saved",
                    "تم حفظ التغييرات",
                )));
            }
            _ => {
                self.notice = Some(Notice::error(Message::generic_failure()));
            }
        }
        tracing::debug!(section = ?section, completion = self.completion(), "section saved");

        self.editing = None;
        self.draft.clear();
        self.saving = false;
        true
    }
}
