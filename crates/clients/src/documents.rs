//! Document (KYC upload) service contract.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shamsi_core::{DocumentId, UserId};

use crate::error::ServiceResult;

/// KYC document categories the registration flow collects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    NationalId,
    ProofOfOwnership,
    CommercialRegistration,
    VatCertificate,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::NationalId => "national_id",
            DocumentCategory::ProofOfOwnership => "proof_of_ownership",
            DocumentCategory::CommercialRegistration => "commercial_registration",
            DocumentCategory::VatCertificate => "vat_certificate",
        }
    }
}

/// Upload payload. The file body itself travels out of band; the domain layer
/// only carries what it validated (name, MIME type, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub user_id: UserId,
    pub category: DocumentCategory,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Acknowledgement of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReceipt {
    pub document_id: DocumentId,
}

/// Behavioral contract of the document service.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn upload_document(&self, upload: DocumentUpload) -> ServiceResult<DocumentReceipt>;
}
