//! Format checks applied to a [`SubmissionDraft`] before any remote call.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::draft::{DraftField, Region, SubmissionDraft};

pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_PHONE: &str = "Invalid UAE phone number";
pub const MISSING_REGION: &str = "Please select an Emirate";
pub const MISSING_FULL_NAME: &str = "Please enter your full name";

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static UAE_MOBILE_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn email_pattern() -> Option<&'static Regex> {
    EMAIL_PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok()).as_ref()
}

fn uae_mobile_pattern() -> Option<&'static Regex> {
    // optional +971 / 971 / 0, operator prefix, seven subscriber digits
    UAE_MOBILE_PATTERN
        .get_or_init(|| Regex::new(r"^(?:\+971|971|0)?(?:50|51|52|54|55|56|58)[0-9]{7}$").ok())
        .as_ref()
}

/// Per-field errors from one validation pass. An absent field is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: BTreeMap<DraftField, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: DraftField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = DraftField> + '_ {
        self.errors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: DraftField, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|pattern| pattern.is_match(email))
}

pub fn is_valid_uae_phone(phone: &str) -> bool {
    uae_mobile_pattern().is_some_and(|pattern| pattern.is_match(phone))
}

pub fn validate_region(region: &str) -> Option<Region> {
    if region.trim().is_empty() {
        return None;
    }
    region.parse().ok()
}

/// Runs every check in one pass so the view can show all errors together.
pub fn validate_draft(draft: &SubmissionDraft) -> ValidationResult {
    let mut result = ValidationResult::default();

    if draft.full_name.trim().is_empty() {
        result.insert(DraftField::FullName, MISSING_FULL_NAME);
    }
    if !is_valid_email(&draft.email) {
        result.insert(DraftField::Email, INVALID_EMAIL);
    }
    if !is_valid_uae_phone(&draft.phone) {
        result.insert(DraftField::Phone, INVALID_PHONE);
    }
    if validate_region(&draft.region).is_none() {
        result.insert(DraftField::Region, MISSING_REGION);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{
        email_pattern, is_valid_email, is_valid_uae_phone, uae_mobile_pattern, validate_draft,
        validate_region, INVALID_EMAIL, INVALID_PHONE, MISSING_REGION,
    };
    use crate::domain::draft::{DraftField, Region, SubmissionDraft};

    fn valid_draft() -> SubmissionDraft {
        SubmissionDraft::new("Mariam Khan", "mariam@example.ae", "0501234567", "Dubai")
    }

    #[test]
    fn format_patterns_compile() {
        assert!(email_pattern().is_some(), "email pattern must compile");
        assert!(uae_mobile_pattern().is_some(), "phone pattern must compile");
    }

    #[test]
    fn email_accepts_local_at_domain_tld() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.ae"));
    }

    #[test]
    fn email_rejects_malformed_shapes() {
        for email in ["", "plain", "a@b", "@b.co", "a b@c.de", "a@b c.de", "a@@b.co", "a@b."] {
            assert!(!is_valid_email(email), "expected `{email}` to be rejected");
        }
    }

    #[test]
    fn phone_accepts_every_prefix_form() {
        for phone in ["501234567", "0501234567", "971551234567", "+971581234567", "0521234567"] {
            assert!(is_valid_uae_phone(phone), "expected `{phone}` to be accepted");
        }
    }

    #[test]
    fn phone_rejects_unknown_operator_and_length() {
        for phone in [
            "0531234567",
            "050123456",
            "05012345678",
            "+9710501234567",
            "00971501234567",
            "050 123 4567",
            "",
        ] {
            assert!(!is_valid_uae_phone(phone), "expected `{phone}` to be rejected");
        }
    }

    #[test]
    fn region_must_come_from_fixed_set() {
        assert_eq!(validate_region("Sharjah"), Some(Region::Sharjah));
        assert_eq!(validate_region(""), None);
        assert_eq!(validate_region("   "), None);
        assert_eq!(validate_region("Riyadh"), None);
    }

    #[test]
    fn valid_draft_has_no_errors() {
        let result = validate_draft(&valid_draft());
        assert!(result.is_valid());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn invalid_phone_blocks_even_when_other_fields_are_valid() {
        let mut draft = valid_draft();
        draft.phone = "12345".to_owned();
        let result = validate_draft(&draft);

        assert!(!result.is_valid());
        assert_eq!(result.error(DraftField::Phone), Some(INVALID_PHONE));
        assert_eq!(result.fields().collect::<Vec<_>>(), vec![DraftField::Phone]);
    }

    #[test]
    fn all_failing_checks_are_reported_in_one_pass() {
        let draft = SubmissionDraft::new("Mariam Khan", "not-an-email", "999", "");
        let result = validate_draft(&draft);

        assert_eq!(result.error(DraftField::Email), Some(INVALID_EMAIL));
        assert_eq!(result.error(DraftField::Phone), Some(INVALID_PHONE));
        assert_eq!(result.error(DraftField::Region), Some(MISSING_REGION));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn blank_full_name_is_rejected() {
        let mut draft = valid_draft();
        draft.full_name = "  ".to_owned();
        let result = validate_draft(&draft);
        assert!(result.error(DraftField::FullName).is_some());
    }
}
