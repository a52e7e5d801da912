const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Checks the mail domain in its ASCII (IDNA) form. Every broken rule is
/// appended to `reasons`; the ASCII form is returned when conversion worked.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> Option<String> {
    let Ok(ascii) = idna::domain_to_ascii(domain) else {
        reasons.push("domain punycode conversion failed".to_string());
        return None;
    };

    if ascii.is_empty() {
        reasons.push("domain is empty".to_string());
        return None;
    }
    if ascii.len() > MAX_DOMAIN_LEN {
        reasons.push(format!("domain length {} > {MAX_DOMAIN_LEN}", ascii.len()));
    }
    if !ascii.contains('.') {
        reasons.push("domain needs at least two labels".to_string());
    }
    reasons.extend(ascii.split('.').filter_map(label_problem));

    Some(ascii)
}

fn label_problem(label: &str) -> Option<String> {
    if label.is_empty() {
        return Some("empty domain label".to_string());
    }
    if label.len() > MAX_LABEL_LEN {
        return Some(format!("label '{label}' longer than {MAX_LABEL_LEN}"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Some(format!("label '{label}' starts or ends with '-'"));
    }
    if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Some(format!("label '{label}' has characters outside [A-Za-z0-9-]"));
    }
    None
}
