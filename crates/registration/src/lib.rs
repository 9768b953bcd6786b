//! `shamsi-registration` — multi-step registration wizard and its saga.
//!
//! The wizard ([`wizard`]) owns form state, per-step validation and the error
//! map; document intake ([`documents`]) enforces MIME/size rules before a file
//! is ever held; the saga ([`saga`]) runs the sequential, best-effort chain of
//! remote calls that turns a completed wizard into an account.

pub mod documents;
pub mod form;
pub mod saga;
pub mod wizard;

pub use documents::{DocumentIntake, PendingDocument, MAX_DOCUMENT_BYTES};
pub use form::RegistrationForm;
pub use saga::{RegistrationError, RegistrationOutcome, RegistrationSaga, RemediationItem};
pub use wizard::{RegistrationWizard, WizardStep};
