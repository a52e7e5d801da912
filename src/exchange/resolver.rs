use trust_dns_resolver::{
    Name, Resolver,
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
};

use super::{ExchangeCandidate, ExchangeError, LookupFailure, select_preferred};

/// Resolves `domain` to its preferred mail exchange host.
///
/// The domain is normalized via IDNA before querying DNS. Failures are
/// tagged so the caller can tell a missing domain from a domain without
/// mail service.
pub fn resolve_exchange<R>(resolver: &R, domain: &str) -> Result<String, ExchangeError>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let candidates = resolver
        .lookup_mx(&ascii)
        .map_err(|failure| ExchangeError::from_lookup(&ascii, failure))?;

    if candidates.is_empty() {
        return Err(ExchangeError::NoExchangeRecord { domain: ascii });
    }

    let host = select_preferred(&candidates);
    // A null MX (".") normalizes to an empty host.
    if host.is_empty() {
        return Err(ExchangeError::EmptyExchange { domain: ascii });
    }

    tracing::debug!(domain = %ascii, exchange = %host, "resolved preferred exchange");
    Ok(host.to_string())
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, ExchangeError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(ExchangeError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(ExchangeError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// MX lookup seam. The production implementation is the system
/// [`Resolver`]; tests plug in stubs.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<ExchangeCandidate>, LookupFailure>;
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<ExchangeCandidate>, LookupFailure> {
        let name = absolute_name(domain)?;
        let lookup = Resolver::mx_lookup(self, name).map_err(|err| lookup_failure(&err))?;
        let mut candidates = Vec::new();
        for mx in lookup.iter() {
            let host = normalize_exchange(mx.exchange().to_utf8());
            candidates.push(ExchangeCandidate::new(mx.preference(), host));
        }
        Ok(candidates)
    }
}

/// Mail domains are queried as absolute names: the resolv.conf search list
/// never applies to them.
pub(crate) fn absolute_name(domain: &str) -> Result<Name, LookupFailure> {
    let mut name = Name::from_ascii(domain).map_err(|err| LookupFailure::Other(err.to_string()))?;
    name.set_fqdn(true);
    Ok(name)
}

pub(crate) fn lookup_failure(err: &ResolveError) -> LookupFailure {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            LookupFailure::NotFound
        }
        ResolveErrorKind::NoRecordsFound { .. } => LookupFailure::NoData,
        _ => LookupFailure::Other(err.to_string()),
    }
}

#[cfg(test)]
impl LookupMx for crate::exchange::tests::StubResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<ExchangeCandidate>, LookupFailure> {
        (self.on_lookup)(domain)
    }
}
