use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Identity and timing knobs for [`SmtpProbe`](super::SmtpProbe).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Mailbox announced in `MAIL FROM`.
    pub sender: String,
    /// Name announced in `EHLO`.
    pub client_hostname: String,
    pub timeout_ms: u64,
    pub port: u16,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            sender: "check@postman.example".to_string(),
            client_hostname: "postman.example".to_string(),
            timeout_ms: 500,
            port: 25,
        }
    }
}

impl ProbeOptions {
    /// Idle timeout as a [`Duration`]. A zero timeout disables the timer.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}
