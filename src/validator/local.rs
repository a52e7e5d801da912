const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";
const MAX_LOCAL_LEN: usize = 64;

/// Dot-atom local part: non-empty atoms of atext joined by single dots.
/// Quoted local parts are not accepted.
pub(crate) fn check_local(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} outside 1..={MAX_LOCAL_LEN}",
            local.len()
        ));
    }
    if !local.is_empty() && !is_dot_atom(local) {
        reasons.push("invalid local part".to_string());
    }
}

fn is_dot_atom(s: &str) -> bool {
    s.split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(c)
}
