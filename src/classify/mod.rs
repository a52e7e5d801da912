//! Mailbox status classification from raw SMTP replies.
//!
//! Reply codes decide the session and command verdicts. When `RCPT TO` is
//! rejected, the reply text is matched against [`KNOWN_RCPT_REPLIES`] to tell
//! a missing mailbox from one that exists but cannot receive. Unrecognised
//! text leaves the mailbox verdicts unknown.

mod table;

pub use table::{KNOWN_RCPT_REPLIES, MailboxState, ReplySignature};

#[cfg(feature = "with-serde")]
use serde::Serialize;

/// Partial verdict derived from a probe transcript. `None` means the
/// transcript ran out before the question could be answered.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeVerdict {
    pub exchange_allowed_initial_connection: Option<bool>,
    pub exchange_allowed_mail_session: Option<bool>,
    pub exchange_accepted_hello: Option<bool>,
    pub exchange_accepted_mail_command: Option<bool>,
    pub exchange_accepted_recipient_command: Option<bool>,
    pub mailbox_exists: Option<bool>,
    pub mailbox_could_receive: Option<bool>,
}

/// Classifies `replies` with the built-in signature table.
///
/// Panics when `replies` is empty: a probe that produced nothing must be
/// reported as an error, not classified.
pub fn classify(replies: &[String]) -> ExchangeVerdict {
    classify_with(replies, KNOWN_RCPT_REPLIES)
}

pub fn classify_with(replies: &[String], table: &[ReplySignature]) -> ExchangeVerdict {
    assert!(
        !replies.is_empty(),
        "[NO_RESPONSES] could not guess from nothing"
    );

    let mut verdict = ExchangeVerdict {
        exchange_allowed_initial_connection: Some(true),
        ..ExchangeVerdict::default()
    };

    let greeting = replies[0].as_str();
    if greeting.starts_with("554") {
        verdict.exchange_allowed_mail_session = Some(false);
        return verdict;
    }
    if greeting.starts_with("220") {
        verdict.exchange_allowed_mail_session = Some(true);
    }

    let Some(ehlo) = replies.get(1) else {
        return verdict;
    };
    verdict.exchange_accepted_hello = Some(ehlo.starts_with("250"));

    let Some(mail) = replies.get(2) else {
        return verdict;
    };
    verdict.exchange_accepted_mail_command = Some(mail.starts_with("250"));

    let Some(rcpt) = replies.get(3) else {
        return verdict;
    };
    let accepted = rcpt.starts_with("250");
    verdict.exchange_accepted_recipient_command = Some(accepted);

    if accepted {
        verdict.mailbox_exists = Some(true);
        verdict.mailbox_could_receive = Some(true);
        return verdict;
    }

    // A rejected RCPT alone does not prove the mailbox is missing; only
    // known wording does.
    if let Some(signature) = table::lookup(table, rcpt) {
        tracing::debug!(
            provider = signature.provider,
            state = ?signature.state,
            "recognised RCPT rejection"
        );
        let (exists, could_receive) = signature.state.verdict();
        verdict.mailbox_exists = Some(exists);
        verdict.mailbox_could_receive = Some(could_receive);
    }
    verdict
}
