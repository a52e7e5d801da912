#[cfg(feature = "with-serde")]
use serde::Serialize;

/// What a recognised RCPT rejection says about the mailbox.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxState {
    /// No such account at the exchange.
    Missing,
    /// The account exists but cannot take mail right now (disabled, full).
    Unavailable,
}

impl MailboxState {
    /// `(mailbox_exists, mailbox_could_receive)`
    pub fn verdict(self) -> (bool, bool) {
        match self {
            Self::Missing => (false, false),
            Self::Unavailable => (true, false),
        }
    }
}

/// A provider-specific RCPT reply prefix and its meaning.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplySignature {
    pub provider: &'static str,
    pub prefix: &'static str,
    pub state: MailboxState,
}

impl ReplySignature {
    pub const fn new(provider: &'static str, prefix: &'static str, state: MailboxState) -> Self {
        Self {
            provider,
            prefix,
            state,
        }
    }

    pub fn matches(&self, reply: &str) -> bool {
        reply.starts_with(self.prefix)
    }
}

/// Known RCPT rejections, checked in order.
pub const KNOWN_RCPT_REPLIES: &[ReplySignature] = &[
    ReplySignature::new(
        "gmail.com",
        "550-5.1.1 The email account that you tried to reach does not exist.",
        MailboxState::Missing,
    ),
    ReplySignature::new(
        "outlook.com",
        "550 5.5.0 Requested action not taken: mailbox unavailable.",
        MailboxState::Missing,
    ),
    ReplySignature::new(
        "gmail.com",
        "550-5.2.1 The email account that you tried to reach is disabled.",
        MailboxState::Unavailable,
    ),
    ReplySignature::new(
        "gmail.com",
        "552-5.2.2 The email account that you tried to reach is over quota.",
        MailboxState::Unavailable,
    ),
];

pub(crate) fn lookup<'a>(
    table: &'a [ReplySignature],
    reply: &str,
) -> Option<&'a ReplySignature> {
    table.iter().find(|signature| signature.matches(reply))
}
