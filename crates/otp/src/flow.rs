//! Async driver running the verification machine against the auth service.

use shamsi_clients::AuthClient;
use shamsi_core::Message;
use shamsi_validation::{Country, FieldError, FieldKey, FieldTable};
use tokio::time::{Duration, sleep};

use crate::verification::PhoneVerification;

/// Orchestrates OTP send/verify for one phone field.
///
/// Error mapping lives here: phone problems land on the phone field, code
/// problems on the OTP field, and service failures fall back to the generic
/// localized message. The transient `Sending`/`Verifying` phases are exited on
/// every path, success or failure.
pub struct OtpFlow<'a, A: ?Sized> {
    auth: &'a A,
    table: FieldTable,
}

impl<'a, A: AuthClient + ?Sized> OtpFlow<'a, A> {
    pub fn new(auth: &'a A, country: Country) -> Self {
        Self {
            auth,
            table: FieldTable::new(country),
        }
    }

    pub fn country(&self) -> Country {
        self.table.country
    }

    /// Send (or resend) a code to `phone_raw`.
    ///
    /// Preconditions: the sanitized number passes the country's validation and
    /// the machine allows a send (no countdown gating, nothing in flight).
    pub async fn send_otp(
        &self,
        state: &mut PhoneVerification,
        phone_raw: &str,
    ) -> Result<(), FieldError> {
        let digits = self.table.sanitize(FieldKey::Phone, phone_raw);
        if digits.is_empty() {
            return Err(FieldError::new(
                FieldKey::Phone,
                Message::new("Enter your mobile number", "أدخل رقم جوالك"),
            ));
        }
        let outcome = self.table.validate(FieldKey::Phone, &digits);
        if let Some(message) = outcome.message {
            return Err(FieldError::new(FieldKey::Phone, message));
        }

        state
            .begin_send()
            .map_err(|e| FieldError::new(FieldKey::Phone, gate_message(&e.to_string())))?;

        let full_phone = self.country().e164(&digits);
        match self.auth.send_phone_otp(&full_phone).await {
            Ok(()) => {
                state.send_succeeded();
                tracing::debug!(phone = %full_phone, "otp sent");
                Ok(())
            }
            Err(err) => {
                state.send_failed();
                tracing::warn!(phone = %full_phone, code = ?err.code, "otp send failed");
                Err(FieldError::new(FieldKey::Phone, err.message))
            }
        }
    }

    /// Verify the code the user typed against the number it was sent to.
    pub async fn verify_otp(
        &self,
        state: &mut PhoneVerification,
        phone_raw: &str,
        otp_raw: &str,
    ) -> Result<(), FieldError> {
        let code = self.table.sanitize(FieldKey::Otp, otp_raw);
        state.set_otp(code.clone());

        let outcome = self.table.validate(FieldKey::Otp, &code);
        if code.len() != 6 || !outcome.is_valid {
            return Err(FieldError::new(
                FieldKey::Otp,
                outcome.message.unwrap_or_else(|| {
                    Message::new(
                        "Verification code must be 6 digits",
                        "يجب أن يتكون رمز التحقق من 6 أرقام",
                    )
                }),
            ));
        }

        state
            .begin_verify()
            .map_err(|e| FieldError::new(FieldKey::Otp, gate_message(&e.to_string())))?;

        let digits = self.table.sanitize(FieldKey::Phone, phone_raw);
        let full_phone = self.country().e164(&digits);
        match self.auth.verify_phone_otp(&full_phone, &code).await {
            Ok(()) => {
                state.verify_succeeded();
                tracing::debug!(phone = %full_phone, "phone verified");
                Ok(())
            }
            Err(err) => {
                state.verify_failed();
                tracing::warn!(phone = %full_phone, code = ?err.code, "otp verify failed");
                Err(FieldError::new(FieldKey::Otp, err.message))
            }
        }
    }
}

fn gate_message(detail: &str) -> Message {
    Message::new(
        format!("Cannot do that right now: {detail}"),
        "لا يمكن تنفيذ ذلك الآن",
    )
}

/// Drive the resend countdown: one tick per second until it reaches zero.
///
/// Cooperative cleanup: dropping the future (view unmounted, phone changed)
/// simply stops ticking.
pub async fn run_countdown(state: &mut PhoneVerification) {
    while state.resend_countdown() > 0 {
        sleep(Duration::from_secs(1)).await;
        state.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::OtpPhase;
    use shamsi_clients::ServiceError;
    use shamsi_clients::memory::{InMemoryAuthClient, TEST_OTP};

    const PHONE: &str = "512345678";

    #[tokio::test]
    async fn send_then_verify_reaches_verified() {
        let auth = InMemoryAuthClient::new();
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        flow.send_otp(&mut state, PHONE).await.unwrap();
        assert_eq!(state.phase(), OtpPhase::Sent);
        assert_eq!(state.resend_countdown(), 60);
        assert_eq!(auth.otp_sends(), vec!["+966512345678".to_string()]);

        flow.verify_otp(&mut state, PHONE, TEST_OTP).await.unwrap();
        assert!(state.is_verified());
        assert_eq!(state.otp(), "");
    }

    #[tokio::test]
    async fn invalid_phone_never_reaches_the_service() {
        let auth = InMemoryAuthClient::new();
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        let err = flow.send_otp(&mut state, "41234").await.unwrap_err();
        assert_eq!(err.field, FieldKey::Phone);
        assert_eq!(state.phase(), OtpPhase::Idle);
        assert!(auth.otp_sends().is_empty());
    }

    #[tokio::test]
    async fn send_failure_surfaces_on_phone_field_and_returns_to_idle() {
        let auth = InMemoryAuthClient::new();
        auth.fail_next(
            "send_phone_otp",
            ServiceError::new(
                "phone_already_registered",
                Message::new("Phone already registered", "الرقم مسجل مسبقاً"),
            ),
        );
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        let err = flow.send_otp(&mut state, PHONE).await.unwrap_err();
        assert_eq!(err.field, FieldKey::Phone);
        assert_eq!(err.message.en, "Phone already registered");
        assert_eq!(state.phase(), OtpPhase::Idle);
        assert!(state.can_send());
    }

    #[tokio::test]
    async fn wrong_code_stays_in_sent() {
        let auth = InMemoryAuthClient::new();
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        flow.send_otp(&mut state, PHONE).await.unwrap();
        let err = flow
            .verify_otp(&mut state, PHONE, "000000")
            .await
            .unwrap_err();
        assert_eq!(err.field, FieldKey::Otp);
        assert_eq!(state.phase(), OtpPhase::Sent);
    }

    #[tokio::test]
    async fn short_code_blocks_before_any_service_call() {
        let auth = InMemoryAuthClient::new();
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        flow.send_otp(&mut state, PHONE).await.unwrap();
        let err = flow.verify_otp(&mut state, PHONE, "123").await.unwrap_err();
        assert_eq!(err.field, FieldKey::Otp);
        assert_eq!(state.phase(), OtpPhase::Sent);
    }

    #[tokio::test]
    async fn resend_blocked_until_countdown_elapses() {
        let auth = InMemoryAuthClient::new();
        let flow = OtpFlow::new(&auth, Country::SaudiArabia);
        let mut state = PhoneVerification::new();

        flow.send_otp(&mut state, PHONE).await.unwrap();
        let err = flow.send_otp(&mut state, PHONE).await.unwrap_err();
        assert_eq!(err.field, FieldKey::Phone);
        assert_eq!(auth.otp_sends().len(), 1);

        for _ in 0..60 {
            state.tick();
        }
        flow.send_otp(&mut state, PHONE).await.unwrap();
        assert_eq!(auth.otp_sends().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_driver_reaches_zero_after_sixty_ticks() {
        let mut state = PhoneVerification::new();
        state.begin_send().unwrap();
        state.send_succeeded();
        assert_eq!(state.resend_countdown(), 60);

        run_countdown(&mut state).await;
        assert_eq!(state.resend_countdown(), 0);
        assert!(state.can_send());
    }
}
