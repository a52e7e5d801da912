//! Syntactic address checks used before any network traffic.

mod domain;
mod local;
mod types;

pub use types::ValidationReport;

use domain::check_domain;
use local::check_local;

const MAX_ADDRESS_LEN: usize = 254;

/// Validates `email` against an RFC 5321 subset and lists every rule it
/// breaks. Surrounding whitespace is ignored.
pub fn validate_email(email: &str) -> ValidationReport {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.len() > MAX_ADDRESS_LEN {
        reasons.push(format!("total length {} > {MAX_ADDRESS_LEN}", input.len()));
    }

    let Some((local, domain)) = input.split_once('@') else {
        reasons.push("must contain exactly one '@'".to_string());
        return ValidationReport {
            ok: false,
            reasons,
            ascii_domain: None,
        };
    };
    if domain.contains('@') {
        reasons.push("must contain exactly one '@'".to_string());
        return ValidationReport {
            ok: false,
            reasons,
            ascii_domain: None,
        };
    }

    check_local(local, &mut reasons);
    let ascii_domain = check_domain(domain, &mut reasons);

    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
        ascii_domain,
    }
}

pub fn is_valid_email_format(email: &str) -> bool {
    validate_email(email).ok
}

/// Text after the last `@`, or the whole input when there is none.
pub fn domain_of(address: &str) -> &str {
    match address.rfind('@') {
        Some(at) => &address[at + 1..],
        None => address,
    }
}
