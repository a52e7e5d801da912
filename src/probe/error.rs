use std::io;

use thiserror::Error;

use super::Stage;

/// Errors that end a probe before the transcript completes.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("exchange {host} does not resolve: {source}")]
    Unresolvable {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("connection to {host} failed: {source}")]
    Refused {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("connection lost at stage {stage}: {source}")]
    Reset {
        stage: Stage,
        replies: Vec<String>,
        #[source]
        source: io::Error,
    },
    /// No complete reply arrived in time. `stage` is the stage whose reply
    /// was awaited, so that step is reported as failed even though the
    /// exchange never answered it.
    #[error("SMTP connection was idle too long at stage {stage}")]
    Idle { stage: Stage, replies: Vec<String> },
    #[error("connection closed while reply from stage {stage} wasn't complete")]
    IncompleteReply {
        stage: Stage,
        partial: String,
        replies: Vec<String>,
    },
}

impl ProbeError {
    /// Only a failed name lookup means the exchange host does not resolve;
    /// a refused or dropped connection proves it does.
    pub fn exchange_resolves(&self) -> bool {
        !matches!(self, Self::Unresolvable { .. })
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Unresolvable { .. } | Self::Refused { .. } => None,
            Self::Reset { stage, .. }
            | Self::Idle { stage, .. }
            | Self::IncompleteReply { stage, .. } => Some(*stage),
        }
    }

    /// Complete replies collected before the failure.
    pub fn replies(&self) -> &[String] {
        match self {
            Self::Unresolvable { .. } | Self::Refused { .. } => &[],
            Self::Reset { replies, .. }
            | Self::Idle { replies, .. }
            | Self::IncompleteReply { replies, .. } => replies.as_slice(),
        }
    }
}
