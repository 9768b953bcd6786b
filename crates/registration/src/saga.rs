//! The registration saga: the sequential chain of remote calls that turns a
//! completed wizard into an account.
//!
//! There is no compensation. The identity registration is the only step that
//! aborts the chain; a failed profile creation or document upload is recorded
//! as a remediation item and the chain keeps going, because the account
//! already exists and rolling it back is not possible from here.

use shamsi_clients::{
    AuthBus, AuthClient, AuthStateChange, DocumentCategory, DocumentClient, DocumentUpload,
    ProfileClient, ServiceError,
};
use shamsi_core::{DomainError, UserId};
use shamsi_otp::PhoneVerification;
use thiserror::Error;

use crate::documents::DocumentIntake;
use crate::form::RegistrationForm;

/// Why the saga refused to start or could not create the account.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Preconditions not met; nothing was sent anywhere.
    #[error(transparent)]
    Blocked(#[from] DomainError),
    /// Identity registration itself failed; no account exists.
    #[error("registration failed: {0}")]
    Identity(ServiceError),
}

/// A follow-up the user must complete from their account page because a
/// non-aborting saga step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationItem {
    /// Profile creation failed; the extended profile must be filled in again.
    CompleteProfile,
    /// One document upload failed and must be retried.
    ReuploadDocument { category: DocumentCategory },
}

/// Result of a saga run that created an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Every step succeeded.
    Complete { user_id: UserId },
    /// The account exists but some steps failed; `pending` lists what the
    /// user still has to do.
    PartialSuccess {
        user_id: UserId,
        pending: Vec<RemediationItem>,
    },
}

impl RegistrationOutcome {
    pub fn user_id(&self) -> UserId {
        match self {
            RegistrationOutcome::Complete { user_id }
            | RegistrationOutcome::PartialSuccess { user_id, .. } => *user_id,
        }
    }
}

/// Runs the registration chain against the three backing services.
pub struct RegistrationSaga<'a> {
    auth: &'a dyn AuthClient,
    profile: &'a dyn ProfileClient,
    documents: &'a dyn DocumentClient,
    bus: Option<&'a dyn AuthBus>,
}

impl<'a> RegistrationSaga<'a> {
    pub fn new(
        auth: &'a dyn AuthClient,
        profile: &'a dyn ProfileClient,
        documents: &'a dyn DocumentClient,
    ) -> Self {
        Self {
            auth,
            profile,
            documents,
            bus: None,
        }
    }

    /// Announce the freshly signed-in user on `bus` once registration lands.
    pub fn with_bus(mut self, bus: &'a dyn AuthBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Run the chain: register, create profile, upload documents, in that
    /// order, one call at a time.
    ///
    /// Preconditions are re-checked here, not trusted to the wizard: terms
    /// accepted, required documents attached, and the phone verified whenever
    /// one was entered.
    pub async fn run(
        &self,
        form: &RegistrationForm,
        intake: &DocumentIntake,
        verification: &PhoneVerification,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        if !form.terms_agreed {
            return Err(DomainError::validation("terms must be accepted before submitting").into());
        }
        if !verification.is_satisfied(form.phone_present()) {
            return Err(
                DomainError::invariant("phone must be verified before submitting").into(),
            );
        }
        if let Some(missing) = intake.missing_required(form.role).first() {
            return Err(DomainError::validation(format!(
                "missing required document: {}",
                missing.as_str()
            ))
            .into());
        }

        let user = self
            .auth
            .register(form.to_register_request())
            .await
            .map_err(|err| {
                tracing::warn!(code = ?err.code, "identity registration failed");
                RegistrationError::Identity(err)
            })?;
        tracing::info!(user_id = %user.id, role = ?user.role, "account created");

        // Registration signs the user in; let subscribers react.
        if let Some(bus) = self.bus {
            bus.publish(AuthStateChange {
                user: Some(user.clone()),
            });
        }

        let mut pending = Vec::new();

        let profile_update = form.to_profile_update();
        if !profile_update.is_empty() {
            if let Err(err) = self.profile.create_profile(user.id, profile_update).await {
                tracing::warn!(user_id = %user.id, code = ?err.code, "profile creation failed");
                pending.push(RemediationItem::CompleteProfile);
            }
        }

        for document in intake.accepted() {
            let upload = DocumentUpload {
                user_id: user.id,
                category: document.category,
                file_name: document.file_name.clone(),
                mime_type: document.mime_type.clone(),
                size_bytes: document.size_bytes,
                metadata: Default::default(),
            };
            if let Err(err) = self.documents.upload_document(upload).await {
                tracing::warn!(
                    user_id = %user.id,
                    category = document.category.as_str(),
                    code = ?err.code,
                    "document upload failed"
                );
                pending.push(RemediationItem::ReuploadDocument {
                    category: document.category,
                });
            }
        }

        if pending.is_empty() {
            Ok(RegistrationOutcome::Complete { user_id: user.id })
        } else {
            Ok(RegistrationOutcome::PartialSuccess {
                user_id: user.id,
                pending,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{required_categories, PendingDocument};
    use shamsi_clients::bus::InMemoryAuthBus;
    use shamsi_clients::memory::{
        InMemoryAuthClient, InMemoryDocumentClient, InMemoryProfileClient,
    };
    use shamsi_clients::RegistrationRole;
    use shamsi_validation::{FieldKey, FieldTable};

    fn completed_form() -> RegistrationForm {
        let table = FieldTable::default();
        let mut form = RegistrationForm::new(RegistrationRole::Consumer);
        form.set_field(&table, FieldKey::FirstName, "Sara");
        form.set_field(&table, FieldKey::LastName, "Al-Otaibi");
        form.set_field(&table, FieldKey::Email, "sara@example.com");
        form.set_field(&table, FieldKey::Password, "sunny-roof-77");
        form.set_field(&table, FieldKey::ConfirmPassword, "sunny-roof-77");
        form.set_field(&table, FieldKey::Phone, "512345678");
        form.set_field(&table, FieldKey::NationalId, "1234567890");
        form.set_field(&table, FieldKey::Region, "riyadh");
        form.set_field(&table, FieldKey::City, "Riyadh");
        form.set_field(&table, FieldKey::PropertyType, "villa");
        form.set_field(&table, FieldKey::PropertyOwnership, "owned");
        form.terms_agreed = true;
        form
    }

    fn verified_phone() -> PhoneVerification {
        let mut v = PhoneVerification::new();
        v.begin_send().unwrap();
        v.send_succeeded();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_succeeded();
        v
    }

    fn completed_intake(role: RegistrationRole) -> DocumentIntake {
        let mut intake = DocumentIntake::new();
        for &category in required_categories(role) {
            intake.attach(PendingDocument {
                category,
                file_name: format!("{}.png", category.as_str()),
                mime_type: "image/png".to_string(),
                size_bytes: 1024,
            });
        }
        intake
    }

    #[tokio::test]
    async fn full_run_is_complete_and_ordered() {
        shamsi_observability::init_for_tests();
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        let outcome = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap();

        let user_id = outcome.user_id();
        assert!(matches!(outcome, RegistrationOutcome::Complete { .. }));
        assert_eq!(auth.current().unwrap().id, user_id);
        assert_eq!(profile.created_for(), vec![user_id]);
        assert_eq!(profile.stored().city, "Riyadh");
        assert_eq!(
            documents
                .uploads()
                .iter()
                .map(|u| u.category)
                .collect::<Vec<_>>(),
            vec![
                DocumentCategory::NationalId,
                DocumentCategory::ProofOfOwnership
            ]
        );
    }

    #[tokio::test]
    async fn identity_failure_aborts_before_any_downstream_call() {
        let auth = InMemoryAuthClient::new();
        auth.fail_next("register", ServiceError::generic());
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        let err = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::Identity(_)));
        assert!(profile.created_for().is_empty());
        assert!(documents.uploads().is_empty());
    }

    #[tokio::test]
    async fn profile_failure_is_partial_success_and_uploads_continue() {
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        profile.fail_next("create_profile", ServiceError::generic());
        let documents = InMemoryDocumentClient::new();
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        let outcome = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap();

        match outcome {
            RegistrationOutcome::PartialSuccess { pending, .. } => {
                assert_eq!(pending, vec![RemediationItem::CompleteProfile]);
            }
            other => panic!("expected partial success, got {other:?}"),
        }
        assert_eq!(documents.uploads().len(), 2);
    }

    #[tokio::test]
    async fn failed_upload_is_listed_while_others_land() {
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        documents.fail_category(DocumentCategory::ProofOfOwnership);
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        let outcome = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap();

        match outcome {
            RegistrationOutcome::PartialSuccess { pending, .. } => {
                assert_eq!(
                    pending,
                    vec![RemediationItem::ReuploadDocument {
                        category: DocumentCategory::ProofOfOwnership
                    }]
                );
            }
            other => panic!("expected partial success, got {other:?}"),
        }
        assert_eq!(documents.uploads().len(), 1);
        assert_eq!(
            documents.uploads()[0].category,
            DocumentCategory::NationalId
        );
    }

    #[tokio::test]
    async fn successful_registration_is_announced_on_the_bus() {
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        let bus = InMemoryAuthBus::new();
        let subscription = bus.subscribe();
        let saga = RegistrationSaga::new(&auth, &profile, &documents).with_bus(&bus);

        let outcome = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap();

        let change = subscription.try_recv().unwrap();
        assert_eq!(change.user.map(|u| u.id), Some(outcome.user_id()));
    }

    #[tokio::test]
    async fn unverified_phone_blocks_submission() {
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        // A phone was entered but its verification never ran.
        let err = saga
            .run(
                &completed_form(),
                &completed_intake(RegistrationRole::Consumer),
                &PhoneVerification::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Blocked(_)));
        assert!(auth.current().is_none());
        assert!(documents.uploads().is_empty());

        // Without a phone there is nothing to verify.
        let table = FieldTable::default();
        let mut form = completed_form();
        form.set_field(&table, FieldKey::Phone, "");
        assert!(
            saga.run(
                &form,
                &completed_intake(RegistrationRole::Consumer),
                &PhoneVerification::new(),
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn missing_terms_or_documents_blocks_without_side_effects() {
        let auth = InMemoryAuthClient::new();
        let profile = InMemoryProfileClient::new();
        let documents = InMemoryDocumentClient::new();
        let saga = RegistrationSaga::new(&auth, &profile, &documents);

        let mut form = completed_form();
        form.terms_agreed = false;
        let err = saga
            .run(
                &form,
                &completed_intake(RegistrationRole::Consumer),
                &verified_phone(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Blocked(_)));

        let err = saga
            .run(&completed_form(), &DocumentIntake::new(), &verified_phone())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Blocked(_)));

        assert!(auth.current().is_none());
        assert!(profile.created_for().is_empty());
        assert!(documents.uploads().is_empty());
    }
}
