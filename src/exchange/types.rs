/// One MX record as returned by a lookup, in discovery order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCandidate {
    pub host: String,
    pub priority: u16,
}

impl ExchangeCandidate {
    pub fn new(priority: u16, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            priority,
        }
    }
}
