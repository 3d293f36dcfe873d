use std::sync::LazyLock;

use regex::Regex;

// forme générale: local@domaine.tld (tld alphabétique, 2+ caractères)
static ADDRESS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("address shape pattern is a valid regex")
});

pub(crate) const MAX_ADDRESS_LEN: usize = 254;
pub(crate) const MAX_LOCAL_LEN: usize = 64;
pub(crate) const MAX_LABEL_LEN: usize = 63;

/// Pushes a reason for every rule `input` breaks. `input` must already be
/// trimmed.
pub(crate) fn check_address(input: &str, reasons: &mut Vec<String>) {
    if input.is_empty() {
        reasons.push("address is empty".to_string());
        return;
    }
    if input.len() > MAX_ADDRESS_LEN {
        reasons.push(format!("total length {} > {MAX_ADDRESS_LEN}", input.len()));
    }

    let at_count = input.matches('@').count();
    if at_count != 1 {
        reasons.push("must contain exactly one '@'".to_string());
        return;
    }

    if !ADDRESS_SHAPE.is_match(input) {
        reasons.push("does not match local@domain.tld".to_string());
    }

    if let Some((local, domain)) = input.split_once('@') {
        check_local(local, reasons);
        check_labels(domain, reasons);
    }
}

fn check_local(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} invalid (1..={MAX_LOCAL_LEN})",
            local.len()
        ));
    }
    if local.starts_with('.') || local.ends_with('.') {
        reasons.push("local part cannot start/end with '.'".to_string());
    }
    if local.contains("..") {
        reasons.push("local part contains '..'".to_string());
    }
}

fn check_labels(domain: &str, reasons: &mut Vec<String>) {
    for label in domain.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > MAX_LABEL_LEN {
            reasons.push(format!(
                "domain label '{label}' length {} > {MAX_LABEL_LEN}",
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons_for(input: &str) -> Vec<String> {
        let mut reasons = Vec::new();
        check_address(input, &mut reasons);
        reasons
    }

    #[test]
    fn accepts_common_shapes() {
        for ok in [
            "alice@example.com",
            "first.last+tag@mail.example.co.uk",
            "a_b-c%d@sub-domain.example.io",
            "UPPER@EXAMPLE.ORG",
        ] {
            assert!(reasons_for(ok).is_empty(), "{ok}: {:?}", reasons_for(ok));
        }
    }

    #[test]
    fn rejects_missing_or_double_at() {
        assert!(!reasons_for("alice.example.com").is_empty());
        assert!(!reasons_for("a@@example.com").is_empty());
        assert!(!reasons_for("a@b@example.com").is_empty());
    }

    #[test]
    fn rejects_short_or_numeric_tld() {
        assert!(!reasons_for("alice@example.c").is_empty());
        assert!(!reasons_for("alice@example.123").is_empty());
        assert!(!reasons_for("alice@localhost").is_empty());
    }

    #[test]
    fn rejects_dot_rules() {
        assert!(!reasons_for(".alice@example.com").is_empty());
        assert!(!reasons_for("alice.@example.com").is_empty());
        assert!(!reasons_for("al..ice@example.com").is_empty());
        assert!(!reasons_for("alice@example..com").is_empty());
    }

    #[test]
    fn rejects_hyphen_edges_and_long_labels() {
        assert!(!reasons_for("alice@-example.com").is_empty());
        let long = "a".repeat(64);
        assert!(!reasons_for(&format!("alice@{long}.com")).is_empty());
        let local = "b".repeat(65);
        assert!(!reasons_for(&format!("{local}@example.com")).is_empty());
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(reasons_for(""), vec!["address is empty".to_string()]);
        assert!(!reasons_for("al ice@example.com").is_empty());
    }
}
