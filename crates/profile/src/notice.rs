//! Transient notices (saved confirmations, banner errors).

use serde::{Deserialize, Serialize};
use shamsi_core::Message;
use tokio::time::{Duration, sleep};

/// Seconds a notice stays on screen before auto-dismissing.
pub const NOTICE_SECONDS: u32 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message with a remaining lifetime; `tick` counts it down one second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: Message,
    remaining: u32,
}

impl Notice {
    pub fn success(message: Message) -> Self {
        Self {
            kind: NoticeKind::Success,
            message,
            remaining: NOTICE_SECONDS,
        }
    }

    pub fn error(message: Message) -> Self {
        Self {
            kind: NoticeKind::Error,
            message,
            remaining: NOTICE_SECONDS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_dismissed(&self) -> bool {
        self.remaining == 0
    }

    /// One second elapsed. Returns the remaining lifetime.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }
}

/// Drive a notice to dismissal, one tick per second. Dropping the future
/// simply stops the countdown.
pub async fn run_dismiss(notice: &mut Notice) {
    while !notice.is_dismissed() {
        sleep(Duration::from_secs(1)).await;
        notice.tick();
    }
}
