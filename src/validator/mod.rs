mod syntax;
mod typo;
mod types;

pub use types::{EmailError, ParsedAddress, ValidationReport};
pub use typo::TypoTable;

use syntax::check_address;

/// Checks the shape of `email` without touching the network.
pub fn validate_email(email: &str) -> ValidationReport {
    let input = email.trim();
    let mut reasons = Vec::new();
    check_address(input, &mut reasons);
    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
    }
}

/// Validates `email` and splits it into local part and lower-cased domain.
pub fn parse_email(email: &str) -> Result<ParsedAddress, EmailError> {
    let input = email.trim();
    let report = validate_email(input);
    if !report.ok {
        return Err(EmailError::InvalidSyntax {
            reasons: report.reasons,
        });
    }
    match input.split_once('@') {
        Some((local, domain)) => Ok(ParsedAddress {
            original: email.to_string(),
            local: local.to_string(),
            domain: domain.to_ascii_lowercase(),
        }),
        None => Err(EmailError::InvalidSyntax {
            reasons: vec!["must contain exactly one '@'".to_string()],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com");
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b");
        assert!(!r.ok);
    }

    #[test]
    fn parse_trims_and_lowercases_domain() {
        let parsed = parse_email("  Alice@Example.COM \n").expect("valid");
        assert_eq!(parsed.local, "Alice");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.address(), "Alice@example.com");
        assert_eq!(parsed.original, "  Alice@Example.COM \n");
    }

    #[test]
    fn parse_reports_reasons() {
        let err = parse_email("not-an-address").expect_err("invalid");
        let EmailError::InvalidSyntax { reasons } = err;
        assert!(reasons.iter().any(|r| r.contains("'@'")));
    }

    proptest! {
        #[test]
        fn strings_without_at_never_parse(s in "[^@]{0,40}") {
            prop_assert!(parse_email(&s).is_err());
        }
    }
}
