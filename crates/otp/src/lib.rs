//! `shamsi-otp` — phone verification state machine and flow driver.
//!
//! Registration and card checkout both gate on a verified phone number. The
//! machine itself ([`verification`]) is pure and synchronous; the driver
//! ([`flow`]) runs it against the auth service and owns error mapping.

pub mod flow;
pub mod verification;

pub use flow::{OtpFlow, run_countdown};
pub use verification::{OtpPhase, PhoneVerification, RESEND_SECONDS};
