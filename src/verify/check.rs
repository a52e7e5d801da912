use std::fmt;

#[cfg(feature = "with-serde")]
use serde::Serialize;

/// Fields of a [`VerificationResult`](super::VerificationResult), in
/// pipeline order.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Check {
    Format,
    DomainResolves,
    DomainHasExchangeRecord,
    ExchangeResolves,
    ExchangeAllowedInitialConnection,
    ExchangeAllowedMailSession,
    ExchangeAcceptedHello,
    ExchangeAcceptedMailCommand,
    ExchangeAcceptedRecipientCommand,
    MailboxExists,
    MailboxCouldReceive,
}

pub(crate) const PROTOCOL_STEP_COUNT: usize = 9;

impl Check {
    pub const ALL: [Check; 11] = [
        Check::Format,
        Check::DomainResolves,
        Check::DomainHasExchangeRecord,
        Check::ExchangeResolves,
        Check::ExchangeAllowedInitialConnection,
        Check::ExchangeAllowedMailSession,
        Check::ExchangeAcceptedHello,
        Check::ExchangeAcceptedMailCommand,
        Check::ExchangeAcceptedRecipientCommand,
        Check::MailboxExists,
        Check::MailboxCouldReceive,
    ];

    /// The steps that stop the pipeline when they fail. The two mailbox
    /// fields are verdicts read from the RCPT reply instead.
    pub const PROTOCOL_STEPS: [Check; PROTOCOL_STEP_COUNT] = [
        Check::Format,
        Check::DomainResolves,
        Check::DomainHasExchangeRecord,
        Check::ExchangeResolves,
        Check::ExchangeAllowedInitialConnection,
        Check::ExchangeAllowedMailSession,
        Check::ExchangeAcceptedHello,
        Check::ExchangeAcceptedMailCommand,
        Check::ExchangeAcceptedRecipientCommand,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_protocol_step(self) -> bool {
        self.index() < PROTOCOL_STEP_COUNT
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::DomainResolves => "domainResolves",
            Self::DomainHasExchangeRecord => "domainHasExchangeRecord",
            Self::ExchangeResolves => "exchangeResolves",
            Self::ExchangeAllowedInitialConnection => "exchangeAllowedInitialConnection",
            Self::ExchangeAllowedMailSession => "exchangeAllowedMailSession",
            Self::ExchangeAcceptedHello => "exchangeAcceptedHello",
            Self::ExchangeAcceptedMailCommand => "exchangeAcceptedMailCommand",
            Self::ExchangeAcceptedRecipientCommand => "exchangeAcceptedRecipientCommand",
            Self::MailboxExists => "mailboxExists",
            Self::MailboxCouldReceive => "mailboxCouldReceive",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
