use crate::classify::ExchangeVerdict;

use super::check::PROTOCOL_STEP_COUNT;
use super::{Check, VerificationResult};

/// Records pipeline steps strictly in declared order.
///
/// Recording out of order, or after a failed step, is a programming error
/// and panics.
#[derive(Debug, Default)]
pub(crate) struct ResultBuilder {
    steps: [Option<bool>; PROTOCOL_STEP_COUNT],
    next: usize,
    halted: bool,
    mailbox_exists: Option<bool>,
    mailbox_could_receive: Option<bool>,
    responses: Option<Vec<String>>,
    error: Option<String>,
}

impl ResultBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, check: Check, passed: bool) -> &mut Self {
        assert!(
            check.is_protocol_step(),
            "[ORDER] {check} is a verdict, not a pipeline step"
        );
        assert!(
            !self.halted,
            "[ORDER] {check} recorded after the pipeline stopped"
        );
        assert_eq!(
            check.index(),
            self.next,
            "[ORDER] {check} recorded out of pipeline order"
        );
        self.steps[self.next] = Some(passed);
        self.next += 1;
        self.halted = !passed;
        self
    }

    /// Records the exchange verdict up to its first unknown or failed step.
    /// Mailbox verdicts are kept only when the recipient step was recorded.
    pub(crate) fn merge(&mut self, verdict: &ExchangeVerdict) -> &mut Self {
        let steps = [
            (
                Check::ExchangeAllowedInitialConnection,
                verdict.exchange_allowed_initial_connection,
            ),
            (
                Check::ExchangeAllowedMailSession,
                verdict.exchange_allowed_mail_session,
            ),
            (
                Check::ExchangeAcceptedHello,
                verdict.exchange_accepted_hello,
            ),
            (
                Check::ExchangeAcceptedMailCommand,
                verdict.exchange_accepted_mail_command,
            ),
            (
                Check::ExchangeAcceptedRecipientCommand,
                verdict.exchange_accepted_recipient_command,
            ),
        ];
        for (check, value) in steps {
            let Some(passed) = value else {
                break;
            };
            self.record(check, passed);
            if !passed {
                break;
            }
        }

        if self.value(Check::ExchangeAcceptedRecipientCommand).is_some() {
            self.mailbox_exists = verdict.mailbox_exists;
            self.mailbox_could_receive = verdict.mailbox_could_receive;
        }
        self
    }

    pub(crate) fn responses(&mut self, replies: Vec<String>) -> &mut Self {
        self.responses = (!replies.is_empty()).then_some(replies);
        self
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.error = Some(message.into());
        self
    }

    fn value(&self, check: Check) -> Option<bool> {
        self.steps.get(check.index()).copied().flatten()
    }

    /// Closes the pipeline. When it stopped without a failed step, the first
    /// step that was never completed is recorded as failed.
    pub(crate) fn finish(mut self) -> VerificationResult {
        if !self.halted && self.next < PROTOCOL_STEP_COUNT {
            let stalled = Check::PROTOCOL_STEPS[self.next];
            tracing::debug!(step = %stalled, "pipeline stopped before completing step");
            self.record(stalled, false);
        }

        let [
            format,
            domain_resolves,
            domain_has_exchange_record,
            exchange_resolves,
            exchange_allowed_initial_connection,
            exchange_allowed_mail_session,
            exchange_accepted_hello,
            exchange_accepted_mail_command,
            exchange_accepted_recipient_command,
        ] = self.steps;

        VerificationResult {
            format,
            domain_resolves,
            domain_has_exchange_record,
            exchange_resolves,
            exchange_allowed_initial_connection,
            exchange_allowed_mail_session,
            exchange_accepted_hello,
            exchange_accepted_mail_command,
            exchange_accepted_recipient_command,
            mailbox_exists: self.mailbox_exists,
            mailbox_could_receive: self.mailbox_could_receive,
            responses: self.responses,
            error: self.error,
        }
    }
}
