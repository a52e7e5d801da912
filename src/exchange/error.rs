use thiserror::Error;

/// Tagged failure reported by a [`LookupMx`](super::LookupMx) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    /// The name does not exist (NXDOMAIN).
    #[error("name does not exist")]
    NotFound,
    /// The name exists but the answer holds no MX record.
    #[error("no MX records in answer")]
    NoData,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("domain {domain} does not resolve")]
    DomainNotFound { domain: String },
    #[error("domain {domain} has no MX records")]
    NoExchangeRecord { domain: String },
    #[error("unexpected value in MX record for {domain}")]
    EmptyExchange { domain: String },
    #[error("MX lookup for {domain} failed: {message}")]
    Lookup {
        domain: String,
        message: String,
        domain_resolves: bool,
    },
}

impl ExchangeError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn from_lookup(domain: &str, failure: LookupFailure) -> Self {
        let domain = domain.to_string();
        match failure {
            LookupFailure::NotFound => Self::DomainNotFound { domain },
            LookupFailure::NoData => Self::NoExchangeRecord { domain },
            LookupFailure::Other(message) => {
                let domain_resolves = !looks_like_not_found(&message);
                Self::Lookup {
                    domain,
                    message,
                    domain_resolves,
                }
            }
        }
    }

    /// Whether the domain name itself exists.
    pub fn domain_resolves(&self) -> bool {
        match self {
            Self::EmptyDomain | Self::IdnaConversion { .. } | Self::DomainNotFound { .. } => false,
            Self::NoExchangeRecord { .. } | Self::EmptyExchange { .. } => true,
            Self::Lookup {
                domain_resolves, ..
            } => *domain_resolves,
        }
    }

    /// `None` when the domain does not resolve at all, since the MX question
    /// was never answered.
    pub fn domain_has_exchange_record(&self) -> Option<bool> {
        if self.domain_resolves() {
            Some(false)
        } else {
            None
        }
    }
}

// Resolver messages that still mean "no such name" even though they did not
// come back as a typed NXDOMAIN.
const NOT_FOUND_MARKERS: &[&str] = &["nxdomain", "not found", "no such host", "enotfound"];

fn looks_like_not_found(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker))
}
