use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Position in the fixed probe transcript. Each stage waits for one reply.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Greeting,
    Ehlo,
    MailFrom,
    RcptTo,
    Quit,
}

impl Stage {
    pub fn index(self) -> u8 {
        match self {
            Self::Greeting => 0,
            Self::Ehlo => 1,
            Self::MailFrom => 2,
            Self::RcptTo => 3,
            Self::Quit => 4,
        }
    }

    /// Reply prefix required to move on; `None` when any reply will do.
    pub(crate) fn expected_code(self) -> Option<&'static str> {
        match self {
            Self::Greeting => Some("220"),
            Self::Ehlo | Self::MailFrom => Some("250"),
            Self::RcptTo | Self::Quit => None,
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Self::Greeting => Self::Ehlo,
            Self::Ehlo => Self::MailFrom,
            Self::MailFrom => Self::RcptTo,
            Self::RcptTo | Self::Quit => Self::Quit,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Greeting => "greeting",
            Self::Ehlo => "EHLO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        };
        write!(f, "{} ({name})", self.index())
    }
}
