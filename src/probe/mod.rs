//! SMTP probing without sending mail.
//!
//! [`SmtpProbe`] connects to a mail exchange and walks a fixed transcript
//! (greeting, `EHLO`, `MAIL FROM`, `RCPT TO`, `QUIT`). It returns every
//! complete raw reply so that [`classify`](crate::classify) can inspect them.

mod error;
mod options;
mod reply;
mod session;
mod stage;

pub use error::ProbeError;
pub use options::ProbeOptions;
pub use stage::Stage;

/// Complete raw replies in arrival order, CRLF line endings included.
pub type ProbeOutcome = Vec<String>;

/// Seam between the pipeline and the network.
pub trait MailProbe {
    fn probe(&self, recipient: &str, exchange: &str) -> Result<ProbeOutcome, ProbeError>;
}

/// Plain-TCP probe, one connection per call.
#[derive(Debug, Clone, Default)]
pub struct SmtpProbe {
    options: ProbeOptions,
}

impl SmtpProbe {
    pub fn new(options: ProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }
}

impl MailProbe for SmtpProbe {
    fn probe(&self, recipient: &str, exchange: &str) -> Result<ProbeOutcome, ProbeError> {
        session::probe_exchange(recipient, exchange, &self.options)
    }
}
