//! Auth/identity service contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shamsi_core::UserId;

use crate::error::ServiceResult;

/// Account role chosen at registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationRole {
    Consumer,
    Contractor,
}

/// The identity service's view of a user.
///
/// Identity fields (name, phone, email) are owned here; everything else lives
/// in the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Fully-qualified E.164 number, once verified.
    pub phone: Option<String>,
    pub phone_verified: bool,
    pub role: RegistrationRole,
}

/// Registration payload. Serialized camelCase at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: RegistrationRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cr_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    pub terms_agreed: bool,
}

/// Partial update of identity-owned fields. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl IdentityUpdate {
    /// Whether the update would change anything at all. Callers skip the
    /// service call entirely when this is true.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}

/// Behavioral contract of the auth service.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Create a new account; returns the created identity on success.
    async fn register(&self, request: RegisterRequest) -> ServiceResult<IdentityUser>;

    /// Send a one-time password to a fully-qualified E.164 number.
    async fn send_phone_otp(&self, full_phone: &str) -> ServiceResult<()>;

    /// Verify a previously sent code against the same number.
    async fn verify_phone_otp(&self, full_phone: &str, otp: &str) -> ServiceResult<()>;

    /// Fetch the currently authenticated user.
    async fn current_user(&self) -> ServiceResult<IdentityUser>;

    /// Update identity-owned fields of the current user.
    async fn update_current_user(&self, update: IdentityUpdate) -> ServiceResult<IdentityUser>;

    /// Re-fetch the authoritative user after out-of-band changes.
    async fn refresh_user(&self) -> ServiceResult<IdentityUser>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_payload_is_camel_case_and_skips_absent_fields() {
        let request = RegisterRequest {
            first_name: "Sara".to_string(),
            last_name: "Al-Otaibi".to_string(),
            email: "sara@example.com".to_string(),
            password: "sunny-roof-77".to_string(),
            phone: Some("+966512345678".to_string()),
            role: RegistrationRole::Consumer,
            company_name: None,
            cr_number: None,
            vat_number: None,
            terms_agreed: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Sara");
        assert_eq!(json["termsAgreed"], true);
        assert_eq!(json["role"], "consumer");
        // Contractor-only fields never appear for a consumer.
        assert!(json.get("companyName").is_none());
    }
}
