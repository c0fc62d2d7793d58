// models/src/redact.rs

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").expect("email pattern"));
// SSN must be masked before the looser phone pattern eats it.
static SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}-\d{2}-\d{4}").expect("ssn pattern"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}-?\d{3}-?\d{4}").expect("phone pattern"));

/// Masks email addresses, SSNs, and phone numbers in free text bound for
/// the operational log. The audit ledger is exempt: it is the system of
/// record for access to protected data and keeps values verbatim.
pub fn redact_phi(text: &str) -> String {
    let text = EMAIL.replace_all(text, "[REDACTED_EMAIL]");
    let text = SSN.replace_all(&text, "[REDACTED_SSN]");
    PHONE.replace_all(&text, "[REDACTED_PHONE]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::redact_phi;

    #[test]
    fn should_mask_emails() {
        assert_eq!(
            redact_phi("patient p1@example.com registered"),
            "patient [REDACTED_EMAIL] registered"
        );
    }

    #[test]
    fn should_mask_phone_numbers() {
        assert_eq!(redact_phi("call 555-867-5309"), "call [REDACTED_PHONE]");
        assert_eq!(redact_phi("call 5558675309"), "call [REDACTED_PHONE]");
    }

    #[test]
    fn should_mask_ssn_before_phone() {
        assert_eq!(redact_phi("ssn 123-45-6789"), "ssn [REDACTED_SSN]");
    }

    #[test]
    fn should_leave_plain_text_alone() {
        assert_eq!(redact_phi("appointment cancelled"), "appointment cancelled");
    }
}
