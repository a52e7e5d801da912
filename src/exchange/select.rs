use super::ExchangeCandidate;

/// Host with the numerically lowest priority (RFC 5321 "most preferred").
///
/// Ties keep discovery order. Panics on an empty slice: callers must have
/// rejected that case already.
pub fn select_preferred(candidates: &[ExchangeCandidate]) -> &str {
    let Some(preferred) = candidates.iter().min_by_key(|c| c.priority) else {
        panic!("[NO_CANDIDATES] candidates should have at least one exchange");
    };
    preferred.host.as_str()
}
