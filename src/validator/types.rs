/// Outcome of the syntactic check.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    /// Every broken rule, in check order.
    pub reasons: Vec<String>,
    /// Domain after IDNA conversion, when conversion succeeded.
    pub ascii_domain: Option<String>,
}
