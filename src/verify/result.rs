use std::fmt;

use thiserror::Error;

#[cfg(feature = "with-serde")]
use serde::Serialize;

use super::Check;

/// Outcome of one verification. Every field is tri-state: `Some(true)`,
/// `Some(false)` or `None` when the step was never reached.
///
/// The field set and order are fixed. Values are only produced by
/// [`Verifier::verify`](super::Verifier::verify) and cannot be changed
/// afterwards.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub(super) format: Option<bool>,
    pub(super) domain_resolves: Option<bool>,
    pub(super) domain_has_exchange_record: Option<bool>,
    pub(super) exchange_resolves: Option<bool>,
    pub(super) exchange_allowed_initial_connection: Option<bool>,
    pub(super) exchange_allowed_mail_session: Option<bool>,
    pub(super) exchange_accepted_hello: Option<bool>,
    pub(super) exchange_accepted_mail_command: Option<bool>,
    pub(super) exchange_accepted_recipient_command: Option<bool>,
    pub(super) mailbox_exists: Option<bool>,
    pub(super) mailbox_could_receive: Option<bool>,
    /// Raw SMTP replies the verdicts were drawn from.
    pub(super) responses: Option<Vec<String>>,
    pub(super) error: Option<String>,
}

/// Broken pipeline ordering, reported by
/// [`VerificationResult::check_pipeline_order`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderViolation {
    #[error("unexpected {check} after failure at {failed}")]
    ResolvedAfterFailure { check: Check, failed: Check },
    #[error("unexpected unknown at {check} without an earlier failure")]
    UnknownWithoutFailure { check: Check },
    #[error("mailbox verdicts do not follow from the recipient step")]
    InconsistentMailbox,
}

impl VerificationResult {
    pub fn format(&self) -> Option<bool> {
        self.format
    }

    pub fn domain_resolves(&self) -> Option<bool> {
        self.domain_resolves
    }

    pub fn domain_has_exchange_record(&self) -> Option<bool> {
        self.domain_has_exchange_record
    }

    pub fn exchange_resolves(&self) -> Option<bool> {
        self.exchange_resolves
    }

    pub fn exchange_allowed_initial_connection(&self) -> Option<bool> {
        self.exchange_allowed_initial_connection
    }

    pub fn exchange_allowed_mail_session(&self) -> Option<bool> {
        self.exchange_allowed_mail_session
    }

    pub fn exchange_accepted_hello(&self) -> Option<bool> {
        self.exchange_accepted_hello
    }

    pub fn exchange_accepted_mail_command(&self) -> Option<bool> {
        self.exchange_accepted_mail_command
    }

    pub fn exchange_accepted_recipient_command(&self) -> Option<bool> {
        self.exchange_accepted_recipient_command
    }

    pub fn mailbox_exists(&self) -> Option<bool> {
        self.mailbox_exists
    }

    pub fn mailbox_could_receive(&self) -> Option<bool> {
        self.mailbox_could_receive
    }

    pub fn responses(&self) -> Option<&[String]> {
        self.responses.as_deref()
    }

    /// Message of the failure that stopped the pipeline, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, check: Check) -> Option<bool> {
        match check {
            Check::Format => self.format,
            Check::DomainResolves => self.domain_resolves,
            Check::DomainHasExchangeRecord => self.domain_has_exchange_record,
            Check::ExchangeResolves => self.exchange_resolves,
            Check::ExchangeAllowedInitialConnection => self.exchange_allowed_initial_connection,
            Check::ExchangeAllowedMailSession => self.exchange_allowed_mail_session,
            Check::ExchangeAcceptedHello => self.exchange_accepted_hello,
            Check::ExchangeAcceptedMailCommand => self.exchange_accepted_mail_command,
            Check::ExchangeAcceptedRecipientCommand => self.exchange_accepted_recipient_command,
            Check::MailboxExists => self.mailbox_exists,
            Check::MailboxCouldReceive => self.mailbox_could_receive,
        }
    }

    /// All fields in declared order.
    pub fn checks(&self) -> impl Iterator<Item = (Check, Option<bool>)> + '_ {
        Check::ALL.into_iter().map(|check| (check, self.get(check)))
    }

    /// The protocol step that stopped the pipeline.
    pub fn first_failure(&self) -> Option<Check> {
        Check::PROTOCOL_STEPS
            .into_iter()
            .find(|check| self.get(*check) == Some(false))
    }

    /// The mailbox exists and can take mail.
    pub fn is_deliverable(&self) -> bool {
        self.mailbox_exists == Some(true) && self.mailbox_could_receive == Some(true)
    }

    /// Verifies the pipeline-order contract: protocol steps read
    /// `true* (false unknown*)?`, and the mailbox verdicts are consistent with
    /// the recipient step.
    pub fn check_pipeline_order(&self) -> Result<(), OrderViolation> {
        let mut failed = None;
        for check in Check::PROTOCOL_STEPS {
            match (self.get(check), failed) {
                (Some(_), Some(failed)) => {
                    return Err(OrderViolation::ResolvedAfterFailure { check, failed });
                }
                (Some(false), None) => failed = Some(check),
                (Some(true), None) | (None, Some(_)) => {}
                (None, None) => return Err(OrderViolation::UnknownWithoutFailure { check }),
            }
        }

        let consistent = matches!(
            (
                self.exchange_accepted_recipient_command,
                self.mailbox_exists,
                self.mailbox_could_receive,
            ),
            (None, None, None)
                | (Some(true), Some(true), Some(true))
                | (Some(false), None, None)
                | (Some(false), Some(false), Some(false))
                | (Some(false), Some(true), Some(false))
        );
        if !consistent {
            return Err(OrderViolation::InconsistentMailbox);
        }
        Ok(())
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (check, value) in self.checks() {
            let value = match value {
                Some(true) => "true",
                Some(false) => "false",
                None => "unknown",
            };
            writeln!(f, "{check}: {value}")?;
        }
        Ok(())
    }
}
