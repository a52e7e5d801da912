use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to initialise DNS resolver from system configuration: {source}")]
    ResolverInit {
        #[source]
        source: io::Error,
    },
}
