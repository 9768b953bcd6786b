//! KYC document intake for the registration wizard.
//!
//! Files are checked at the door: wrong MIME type or oversized files are
//! rejected with a per-document error and never held in memory.

use std::collections::BTreeMap;

use shamsi_clients::{DocumentCategory, RegistrationRole};
use shamsi_core::Message;

/// Maximum accepted document size: 3 MB.
pub const MAX_DOCUMENT_BYTES: u64 = 3 * 1024 * 1024;

const ACCEPTED_MIME: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// A file that passed intake and awaits upload after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocument {
    pub category: DocumentCategory,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Documents collected so far, plus per-category intake errors.
#[derive(Debug, Clone, Default)]
pub struct DocumentIntake {
    accepted: BTreeMap<DocumentCategory, PendingDocument>,
    errors: BTreeMap<DocumentCategory, Message>,
}

/// Categories a role must provide before the documents step passes.
pub fn required_categories(role: RegistrationRole) -> &'static [DocumentCategory] {
    match role {
        RegistrationRole::Consumer => {
            &[DocumentCategory::NationalId, DocumentCategory::ProofOfOwnership]
        }
        RegistrationRole::Contractor => &[
            DocumentCategory::NationalId,
            DocumentCategory::CommercialRegistration,
            DocumentCategory::VatCertificate,
        ],
    }
}

impl DocumentIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to accept a file for `category`.
    ///
    /// Returns `true` when accepted. A rejected file is not stored; the
    /// reason lands in [`DocumentIntake::error_for`].
    pub fn attach(&mut self, document: PendingDocument) -> bool {
        let category = document.category;

        if !ACCEPTED_MIME.contains(&document.mime_type.as_str()) {
            self.errors.insert(
                category,
                Message::new(
                    "Only JPEG and PNG images are accepted",
                    "يُقبل فقط ملفات JPEG وPNG",
                ),
            );
            return false;
        }
        if document.size_bytes > MAX_DOCUMENT_BYTES {
            self.errors.insert(
                category,
                Message::new(
                    "File must be 3 MB or smaller",
                    "يجب ألا يتجاوز حجم الملف 3 ميجابايت",
                ),
            );
            return false;
        }

        self.errors.remove(&category);
        self.accepted.insert(category, document);
        true
    }

    pub fn remove(&mut self, category: DocumentCategory) {
        self.accepted.remove(&category);
        self.errors.remove(&category);
    }

    pub fn accepted(&self) -> impl Iterator<Item = &PendingDocument> {
        self.accepted.values()
    }

    pub fn has(&self, category: DocumentCategory) -> bool {
        self.accepted.contains_key(&category)
    }

    pub fn error_for(&self, category: DocumentCategory) -> Option<&Message> {
        self.errors.get(&category)
    }

    /// Required categories with no accepted file yet.
    pub fn missing_required(&self, role: RegistrationRole) -> Vec<DocumentCategory> {
        required_categories(role)
            .iter()
            .copied()
            .filter(|category| !self.has(*category))
            .collect()
    }

    pub fn is_complete(&self, role: RegistrationRole) -> bool {
        self.missing_required(role).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(category: DocumentCategory, size_bytes: u64) -> PendingDocument {
        PendingDocument {
            category,
            file_name: "scan.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            size_bytes,
        }
    }

    #[test]
    fn accepts_supported_images_within_size_limit() {
        let mut intake = DocumentIntake::new();
        assert!(intake.attach(jpeg(DocumentCategory::NationalId, MAX_DOCUMENT_BYTES)));
        assert!(intake.has(DocumentCategory::NationalId));
        assert!(intake.error_for(DocumentCategory::NationalId).is_none());
    }

    #[test]
    fn rejects_wrong_mime_without_storing() {
        let mut intake = DocumentIntake::new();
        let rejected = PendingDocument {
            mime_type: "application/pdf".to_string(),
            ..jpeg(DocumentCategory::NationalId, 1024)
        };
        assert!(!intake.attach(rejected));
        assert!(!intake.has(DocumentCategory::NationalId));
        assert!(intake.error_for(DocumentCategory::NationalId).is_some());
    }

    #[test]
    fn rejects_oversized_file() {
        let mut intake = DocumentIntake::new();
        assert!(!intake.attach(jpeg(DocumentCategory::NationalId, MAX_DOCUMENT_BYTES + 1)));
        assert!(!intake.has(DocumentCategory::NationalId));
    }

    #[test]
    fn successful_attach_clears_previous_error() {
        let mut intake = DocumentIntake::new();
        intake.attach(jpeg(DocumentCategory::NationalId, MAX_DOCUMENT_BYTES + 1));
        assert!(intake.error_for(DocumentCategory::NationalId).is_some());

        intake.attach(jpeg(DocumentCategory::NationalId, 1024));
        assert!(intake.error_for(DocumentCategory::NationalId).is_none());
        assert!(intake.has(DocumentCategory::NationalId));
    }

    #[test]
    fn missing_required_tracks_role_specific_lists() {
        let mut intake = DocumentIntake::new();
        intake.attach(jpeg(DocumentCategory::NationalId, 1024));

        assert_eq!(
            intake.missing_required(RegistrationRole::Consumer),
            vec![DocumentCategory::ProofOfOwnership]
        );
        assert_eq!(
            intake.missing_required(RegistrationRole::Contractor),
            vec![
                DocumentCategory::CommercialRegistration,
                DocumentCategory::VatCertificate
            ]
        );
        assert!(!intake.is_complete(RegistrationRole::Consumer));

        intake.attach(jpeg(DocumentCategory::ProofOfOwnership, 1024));
        assert!(intake.is_complete(RegistrationRole::Consumer));
    }
}
