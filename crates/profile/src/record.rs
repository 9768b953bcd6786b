//! The reconciled user record.
//!
//! Identity fields come from the auth service, profile fields from the
//! profile service. Precedence is fixed per field owner; there is no
//! fallback from one service to the other.

use serde::{Deserialize, Serialize};
use shamsi_clients::{IdentityUser, ProfileRecord, RegistrationRole};
use shamsi_core::UserId;

/// Everything the account pages render, merged from both services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    pub role: RegistrationRole,
    // identity-owned
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Fully-qualified E.164 number, when set.
    pub phone: Option<String>,
    pub phone_verified: bool,
    // profile-owned
    pub profile: ProfileRecord,
}

/// Merge the two service views into one record.
///
/// The auth service is authoritative for identity fields, the profile service
/// for everything else. A field never falls back to the other service's copy.
pub fn reconcile(identity: &IdentityUser, profile: &ProfileRecord) -> UserRecord {
    UserRecord {
        user_id: identity.id,
        role: identity.role,
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        email: identity.email.clone(),
        phone: identity.phone.clone(),
        phone_verified: identity.phone_verified,
        profile: profile.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_wins_for_identity_fields_profile_for_the_rest() {
        let identity = IdentityUser {
            id: UserId::new(),
            first_name: "Sara".to_string(),
            last_name: "Al-Otaibi".to_string(),
            email: "sara@example.com".to_string(),
            phone: Some("+966512345678".to_string()),
            phone_verified: true,
            role: RegistrationRole::Consumer,
        };
        let profile = ProfileRecord {
            city: "Riyadh".to_string(),
            roof_size: "120".to_string(),
            ..Default::default()
        };

        let record = reconcile(&identity, &profile);
        assert_eq!(record.first_name, "Sara");
        assert_eq!(record.phone.as_deref(), Some("+966512345678"));
        assert!(record.phone_verified);
        assert_eq!(record.profile.city, "Riyadh");
        assert_eq!(record.profile.roof_size, "120");
        assert_eq!(record.profile.region, "");
    }
}
