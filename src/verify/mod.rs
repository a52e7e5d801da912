//! Verification pipeline.
//!
//! [`Verifier::verify`] runs the format check, the exchange lookup and the
//! SMTP probe in that order and folds their outcomes into a
//! [`VerificationResult`]. Steps are recorded strictly in declared order and
//! the pipeline stops at the first failed step, leaving the rest unknown.

mod builder;
mod check;
mod error;
mod result;

pub use check::Check;
pub use error::VerifyError;
pub use result::{OrderViolation, VerificationResult};

use trust_dns_resolver::Resolver;

use crate::classify::classify;
use crate::exchange::{LookupMx, resolve_exchange};
use crate::probe::{MailProbe, ProbeOptions, SmtpProbe};
use crate::validator::{domain_of, is_valid_email_format};
use builder::ResultBuilder;

/// Runs verifications through a resolver and a probe. Each call to
/// [`verify`](Self::verify) is independent, so one verifier can be reused.
#[derive(Debug)]
pub struct Verifier<R = Resolver, P = SmtpProbe> {
    resolver: R,
    probe: P,
}

impl Verifier {
    /// System DNS configuration and a plain-TCP probe built from `options`.
    pub fn from_system_conf(options: ProbeOptions) -> Result<Self, VerifyError> {
        let resolver =
            Resolver::from_system_conf().map_err(|source| VerifyError::ResolverInit { source })?;
        Ok(Self::with_parts(resolver, SmtpProbe::new(options)))
    }
}

impl<R: LookupMx, P: MailProbe> Verifier<R, P> {
    pub fn with_parts(resolver: R, probe: P) -> Self {
        Self { resolver, probe }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Verifies one address. Never fails: every outcome, including network
    /// errors, is reported through the returned record.
    ///
    /// A `false` step does not always mean the exchange rejected something.
    /// When the probe stopped early (idle timer, reset, truncated reply),
    /// the step it was waiting on is recorded as `false` and
    /// [`VerificationResult::error`] says why.
    pub fn verify(&self, address: &str) -> VerificationResult {
        let address = address.trim();
        let result = self.run(address);
        tracing::info!(
            address,
            deliverable = result.is_deliverable(),
            failed_at = ?result.first_failure(),
            "verification finished"
        );
        result
    }

    fn run(&self, address: &str) -> VerificationResult {
        let mut result = ResultBuilder::new();

        let format = is_valid_email_format(address);
        result.record(Check::Format, format);
        if !format {
            tracing::debug!(address, "address rejected by format check");
            return result.finish();
        }

        let exchange = match resolve_exchange(&self.resolver, domain_of(address)) {
            Ok(exchange) => exchange,
            Err(err) => {
                tracing::debug!(address, error = %err, "exchange lookup failed");
                result.record(Check::DomainResolves, err.domain_resolves());
                if let Some(has_record) = err.domain_has_exchange_record() {
                    result.record(Check::DomainHasExchangeRecord, has_record);
                }
                result.error(err.to_string());
                return result.finish();
            }
        };
        result
            .record(Check::DomainResolves, true)
            .record(Check::DomainHasExchangeRecord, true);

        match self.probe.probe(address, &exchange) {
            Ok(replies) => {
                result.record(Check::ExchangeResolves, true);
                if !replies.is_empty() {
                    result.merge(&classify(&replies));
                }
                result.responses(replies);
            }
            Err(err) => {
                tracing::debug!(address, %exchange, error = %err, "probe stopped early");
                let resolves = err.exchange_resolves();
                result.record(Check::ExchangeResolves, resolves);
                let replies = err.replies();
                if resolves && !replies.is_empty() {
                    result.merge(&classify(replies));
                }
                result.responses(replies.to_vec()).error(err.to_string());
            }
        }
        result.finish()
    }
}

/// One-shot verification with the system resolver and default probe options.
pub fn verify_email(address: &str) -> Result<VerificationResult, VerifyError> {
    Ok(Verifier::from_system_conf(ProbeOptions::default())?.verify(address))
}

#[cfg(test)]
mod tests;
