//! Remote-call failure model.

use shamsi_core::Message;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A failed call to a backend service.
///
/// Covers network failures and 4xx/5xx responses alike; callers map it to a
/// field-specific or banner-level [`Message`]. The service-reported message is
/// carried when usable, otherwise the generic localized fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("service call failed: {}", message.en)]
pub struct ServiceError {
    /// Machine-readable error code from the service, when one was returned
    /// (e.g. "phone_already_registered").
    pub code: Option<String>,
    pub message: Message,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: Message) -> Self {
        Self {
            code: Some(code.into()),
            message,
        }
    }

    /// A failure with no usable service-reported detail.
    pub fn generic() -> Self {
        Self {
            code: None,
            message: Message::generic_failure(),
        }
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}
