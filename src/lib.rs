#![forbid(unsafe_code)]
//! mailprobe_lib: tells whether an e-mail address can receive mail by asking
//! its mail exchange, without sending anything.
//!
//! ```no_run
//! use mailprobe_lib::{ProbeOptions, Verifier};
//!
//! let verifier = Verifier::from_system_conf(ProbeOptions::default())?;
//! let result = verifier.verify("someone@example.com");
//! println!("{result}");
//! # Ok::<(), mailprobe_lib::VerifyError>(())
//! ```

pub mod classify;
pub mod exchange;
pub mod probe;
pub mod validator;
pub mod verify;

pub use classify::{ExchangeVerdict, classify, classify_with};
pub use exchange::{
    ExchangeCandidate, ExchangeError, LookupFailure, LookupMx, resolve_exchange, select_preferred,
};
pub use probe::{MailProbe, ProbeError, ProbeOptions, ProbeOutcome, SmtpProbe, Stage};
pub use validator::{ValidationReport, is_valid_email_format, validate_email};
pub use verify::{
    Check, OrderViolation, VerificationResult, Verifier, VerifyError, verify_email,
};
