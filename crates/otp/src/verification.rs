//! Phone verification state machine.
//!
//! Phases: `Idle → Sending → Sent → Verifying → Verified`, with
//! `Sent → Sending` on resend and any phase `→ Idle` when the phone number
//! changes. Transitions are pure; the async flow driver decides *when* they
//! fire.

use serde::{Deserialize, Serialize};
use shamsi_core::{DomainError, DomainResult};

/// Seconds a user must wait between OTP sends.
pub const RESEND_SECONDS: u32 = 60;

const OTP_LEN: usize = 6;

/// Where the verification currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OtpPhase {
    #[default]
    Idle,
    Sending,
    Sent,
    Verifying,
    Verified,
}

/// Full verification state for one phone number.
///
/// Invariants:
/// - `Verified` is only ever entered through [`PhoneVerification::verify_succeeded`].
/// - A phone change resets everything to the initial unverified state.
/// - Resend is blocked while `resend_countdown > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhoneVerification {
    phase: OtpPhase,
    /// Seconds until resend unlocks; only nonzero in `Sent`.
    resend_countdown: u32,
    /// Sanitized code the user has typed so far.
    otp: String,
}

impl PhoneVerification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OtpPhase {
        self.phase
    }

    pub fn is_verified(&self) -> bool {
        self.phase == OtpPhase::Verified
    }

    pub fn otp_sent(&self) -> bool {
        matches!(
            self.phase,
            OtpPhase::Sent | OtpPhase::Verifying | OtpPhase::Verified
        )
    }

    pub fn resend_countdown(&self) -> u32 {
        self.resend_countdown
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    /// Whether a send (or resend) may start right now.
    pub fn can_send(&self) -> bool {
        match self.phase {
            OtpPhase::Idle => true,
            OtpPhase::Sent => self.resend_countdown == 0,
            OtpPhase::Sending | OtpPhase::Verifying | OtpPhase::Verified => false,
        }
    }

    /// Submission gate: when a phone number has been entered, nothing that
    /// requires verification may proceed unless we are `Verified`.
    pub fn is_satisfied(&self, phone_present: bool) -> bool {
        !phone_present || self.phase == OtpPhase::Verified
    }

    /// Start a send. Fails while the countdown gates resend or while another
    /// transition is in flight.
    pub fn begin_send(&mut self) -> DomainResult<()> {
        match self.phase {
            OtpPhase::Idle => {}
            OtpPhase::Sent => {
                if self.resend_countdown > 0 {
                    return Err(DomainError::conflict(format!(
                        "resend blocked for {} more seconds",
                        self.resend_countdown
                    )));
                }
            }
            OtpPhase::Sending => {
                return Err(DomainError::conflict("a send is already in flight"));
            }
            OtpPhase::Verifying => {
                return Err(DomainError::conflict("verification is in flight"));
            }
            OtpPhase::Verified => {
                return Err(DomainError::conflict("phone is already verified"));
            }
        }
        self.phase = OtpPhase::Sending;
        Ok(())
    }

    pub fn send_succeeded(&mut self) {
        self.phase = OtpPhase::Sent;
        self.resend_countdown = RESEND_SECONDS;
    }

    pub fn send_failed(&mut self) {
        self.phase = OtpPhase::Idle;
        self.resend_countdown = 0;
    }

    /// Record the user's (already sanitized) code input.
    pub fn set_otp(&mut self, otp: impl Into<String>) {
        self.otp = otp.into();
    }

    /// Start verifying the stored code. Requires a full 6-digit code and a
    /// previously successful send.
    pub fn begin_verify(&mut self) -> DomainResult<()> {
        if self.phase != OtpPhase::Sent {
            return Err(DomainError::conflict("no code has been sent"));
        }
        if self.otp.len() != OTP_LEN || !self.otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation("verification code must be 6 digits"));
        }
        self.phase = OtpPhase::Verifying;
        Ok(())
    }

    pub fn verify_succeeded(&mut self) {
        self.phase = OtpPhase::Verified;
        self.otp.clear();
        self.resend_countdown = 0;
    }

    pub fn verify_failed(&mut self) {
        // Stay in Sent so the user can retype or resend once unlocked.
        self.phase = OtpPhase::Sent;
    }

    /// The phone number changed: everything resets to the initial state.
    pub fn phone_changed(&mut self) {
        *self = Self::default();
    }

    /// One countdown second elapsed. Returns the remaining seconds.
    pub fn tick(&mut self) -> u32 {
        self.resend_countdown = self.resend_countdown.saturating_sub(1);
        self.resend_countdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_state() -> PhoneVerification {
        let mut v = PhoneVerification::new();
        v.begin_send().unwrap();
        v.send_succeeded();
        v
    }

    #[test]
    fn countdown_starts_at_sixty_and_gates_resend() {
        let mut v = sent_state();
        assert_eq!(v.resend_countdown(), 60);
        assert!(!v.can_send());
        assert!(v.begin_send().is_err());

        for _ in 0..60 {
            v.tick();
        }
        assert_eq!(v.resend_countdown(), 0);
        assert!(v.can_send());
        assert!(v.begin_send().is_ok());
    }

    #[test]
    fn tick_saturates_at_zero() {
        let mut v = sent_state();
        for _ in 0..100 {
            v.tick();
        }
        assert_eq!(v.resend_countdown(), 0);
    }

    #[test]
    fn verified_only_via_verify_succeeded() {
        let mut v = sent_state();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        assert_eq!(v.phase(), OtpPhase::Verifying);
        v.verify_succeeded();
        assert!(v.is_verified());
        assert_eq!(v.otp(), "");
    }

    #[test]
    fn verify_failure_returns_to_sent() {
        let mut v = sent_state();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_failed();
        assert_eq!(v.phase(), OtpPhase::Sent);
        assert!(!v.is_verified());
    }

    #[test]
    fn short_or_non_numeric_code_cannot_start_verification() {
        let mut v = sent_state();
        v.set_otp("12345");
        assert!(v.begin_verify().is_err());
        v.set_otp("12345a");
        assert!(v.begin_verify().is_err());
        assert_eq!(v.phase(), OtpPhase::Sent);
    }

    #[test]
    fn phone_change_resets_everything_from_any_phase() {
        let mut v = sent_state();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_succeeded();
        assert!(v.is_verified());

        v.phone_changed();
        assert_eq!(v.phase(), OtpPhase::Idle);
        assert!(!v.is_verified());
        assert!(!v.otp_sent());
        assert_eq!(v.otp(), "");
        assert_eq!(v.resend_countdown(), 0);
    }

    #[test]
    fn submission_gate_requires_verified_when_phone_present() {
        let v = PhoneVerification::new();
        assert!(v.is_satisfied(false));
        assert!(!v.is_satisfied(true));

        let mut v = sent_state();
        v.set_otp("123456");
        v.begin_verify().unwrap();
        v.verify_succeeded();
        assert!(v.is_satisfied(true));
    }

    #[test]
    fn send_failure_returns_to_idle() {
        let mut v = PhoneVerification::new();
        v.begin_send().unwrap();
        assert_eq!(v.phase(), OtpPhase::Sending);
        v.send_failed();
        assert_eq!(v.phase(), OtpPhase::Idle);
        assert!(v.can_send());
    }
}
