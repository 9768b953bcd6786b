//! Profile service contract (consumer and contractor variants share it).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shamsi_core::UserId;

use crate::error::ServiceResult;

/// Profile-owned fields, as stored by the profile service.
///
/// Empty string means "not provided"; the completion computation and the
/// section editors treat the two identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    // address
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    // property
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub property_ownership: String,
    #[serde(default)]
    pub roof_size: String,
    #[serde(default)]
    pub electricity_bill: String,
    // employment
    #[serde(default)]
    pub employment_status: String,
    #[serde(default)]
    pub employer: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub monthly_income: String,
    // preferences
    #[serde(default)]
    pub preferred_language: String,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

/// Partial update of profile-owned fields. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_ownership: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roof_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_bill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_opt_in: Option<bool>,
}

impl ProfileUpdate {
    /// Whether the update carries any change at all.
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

/// KYC verification state as reported by the profile service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
    Rejected,
}

/// Behavioral contract of the profile service.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Fetch the current user's profile.
    async fn get_profile(&self) -> ServiceResult<ProfileRecord>;

    /// Create the profile for a freshly registered user (registration saga
    /// step two).
    async fn create_profile(&self, user_id: UserId, update: ProfileUpdate) -> ServiceResult<()>;

    /// Apply a partial update to the current user's profile.
    async fn update_profile(&self, update: ProfileUpdate) -> ServiceResult<()>;

    /// KYC verification status for a user.
    async fn verification_status(&self, user_id: UserId) -> ServiceResult<VerificationStatus>;
}
