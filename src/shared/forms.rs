/**
 * Form Values and Validation
 *
 * Each form holds the submitted field values together with a [`Failures`]
 * map. `validate()` rebuilds the map from scratch and the form is valid iff
 * the map ends up empty. Failure keys are the field names as they are
 * shown to the user (`"Title"`, `"Email"`, ...).
 *
 * Lengths are counted in Unicode code points, not bytes.
 */

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::shared::models::Expiry;

/// Maximum title length in code points
pub const MAX_TITLE_CHARS: usize = 100;
/// Maximum email length
pub const MAX_EMAIL_CHARS: usize = 254;
/// Minimum password length in code points
pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Field name -> human readable message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failures(BTreeMap<String, String>);

impl Failures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`, replacing any earlier one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

/// Snippet creation form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSnippetForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires: String,
    #[serde(skip)]
    pub failures: Failures,
}

impl NewSnippetForm {
    pub fn validate(&mut self) -> bool {
        let mut failures = Failures::new();

        if is_blank(&self.title) {
            failures.add("Title", "Title is required");
        } else if char_count(&self.title) > MAX_TITLE_CHARS {
            failures.add("Title", "Title cannot be longer than 100 characters");
        }

        if is_blank(&self.content) {
            failures.add("Content", "Content is required");
        }

        if is_blank(&self.expires) {
            failures.add("Expires", "Expiry time is required");
        } else if Expiry::from_form_value(&self.expires).is_none() {
            failures.add("Expires", "Expiry time must be 3600, 86400 or 31536000 seconds");
        }

        self.failures = failures;
        self.failures.is_empty()
    }

    /// The parsed expiry, once the form has validated.
    pub fn expiry(&self) -> Option<Expiry> {
        Expiry::from_form_value(&self.expires)
    }
}

/// Signup form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip)]
    pub failures: Failures,
}

impl SignupForm {
    pub fn validate(&mut self) -> bool {
        let mut failures = Failures::new();

        if is_blank(&self.name) {
            failures.add("Name", "Name is required");
        }

        if is_blank(&self.email) {
            failures.add("Email", "Email is required");
        } else if char_count(&self.email) > MAX_EMAIL_CHARS || !EMAIL_RX.is_match(&self.email) {
            failures.add("Email", "Email is not a valid address");
        }

        // Whitespace counts toward a signup password; only an empty one is missing.
        if self.password.is_empty() {
            failures.add("Password", "Password is required");
        } else if char_count(&self.password) < MIN_PASSWORD_CHARS {
            failures.add("Password", "Password cannot be shorter than 8 characters");
        }

        self.failures = failures;
        self.failures.is_empty()
    }
}

/// Login form. Only presence is checked here; whether the credentials are
/// right is up to the credential manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip)]
    pub failures: Failures,
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        let mut failures = Failures::new();

        if is_blank(&self.email) {
            failures.add("Email", "Email is required");
        }
        if is_blank(&self.password) {
            failures.add("Password", "Password is required");
        }

        self.failures = failures;
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snippet(title: &str, content: &str, expires: &str) -> NewSnippetForm {
        NewSnippetForm {
            title: title.to_string(),
            content: content.to_string(),
            expires: expires.to_string(),
            ..Default::default()
        }
    }

    fn signup(name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_snippet_form_valid() {
        let mut form = snippet("Café", "Hello", "3600");
        assert!(form.validate());
        assert!(form.failures.is_empty());
        assert_eq!(form.expiry(), Some(Expiry::OneHour));
    }

    #[test]
    fn test_snippet_form_blank_title_and_unlisted_expiry() {
        let mut form = snippet("", "x", "99");
        assert!(!form.validate());
        assert!(form.failures.contains("Title"));
        assert!(form.failures.contains("Expires"));
        assert!(!form.failures.contains("Content"));
        assert_eq!(form.failures.len(), 2);
    }

    #[test]
    fn test_snippet_form_whitespace_is_blank() {
        let mut form = snippet("   ", "\n\t", " ");
        assert!(!form.validate());
        assert_eq!(form.failures.get("Title"), Some("Title is required"));
        assert_eq!(form.failures.get("Content"), Some("Content is required"));
        assert_eq!(form.failures.get("Expires"), Some("Expiry time is required"));
    }

    #[test]
    fn test_snippet_title_length_counts_code_points() {
        // 100 two-byte characters: 200 bytes, still within the limit
        let mut form = snippet(&"é".repeat(100), "x", "86400");
        assert!(form.validate());

        let mut form = snippet(&"é".repeat(101), "x", "86400");
        assert!(!form.validate());
        assert_eq!(
            form.failures.get("Title"),
            Some("Title cannot be longer than 100 characters")
        );
    }

    #[test]
    fn test_snippet_expiry_numeric_but_unlisted() {
        let mut form = snippet("t", "c", "7200");
        assert!(!form.validate());
        assert!(form.failures.contains("Expires"));
    }

    #[test]
    fn test_validate_resets_failures() {
        let mut form = snippet("", "", "");
        assert!(!form.validate());
        form.title = "t".into();
        form.content = "c".into();
        form.expires = "31536000".into();
        assert!(form.validate());
        assert!(form.failures.is_empty());
    }

    #[test]
    fn test_signup_form_valid() {
        let mut form = signup("Alice", "alice@example.com", "pa55word");
        assert!(form.validate());
    }

    #[test]
    fn test_signup_form_rejects_bad_email() {
        for email in ["alice", "alice@", "@example.com", "alice@-example.com", "a b@example.com"] {
            let mut form = signup("Alice", email, "pa55word");
            assert!(!form.validate(), "{email} should be rejected");
            assert_eq!(form.failures.get("Email"), Some("Email is not a valid address"));
        }
    }

    #[test]
    fn test_signup_form_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        let mut form = signup("Alice", &email, "pa55word");
        assert!(!form.validate());
        assert!(form.failures.contains("Email"));
    }

    #[test]
    fn test_signup_form_password_counts_code_points() {
        let mut form = signup("Alice", "alice@example.com", "ééééééé");
        assert!(!form.validate());
        assert!(form.failures.contains("Password"));

        let mut form = signup("Alice", "alice@example.com", "éééééééé");
        assert!(form.validate());
    }

    #[test]
    fn test_signup_form_whitespace_password() {
        let mut form = signup("Alice", "alice@example.com", "        ");
        assert!(form.validate());

        let mut form = signup("Alice", "alice@example.com", "   ");
        assert!(!form.validate());
        assert_eq!(
            form.failures.get("Password"),
            Some("Password cannot be shorter than 8 characters")
        );
    }

    #[test]
    fn test_signup_form_required_fields() {
        let mut form = signup(" ", "", "");
        assert!(!form.validate());
        assert_eq!(form.failures.get("Name"), Some("Name is required"));
        assert_eq!(form.failures.get("Email"), Some("Email is required"));
        assert_eq!(form.failures.get("Password"), Some("Password is required"));
    }

    #[test]
    fn test_login_form_only_checks_presence() {
        let mut form = LoginForm {
            email: "not-an-email".into(),
            password: "x".into(),
            ..Default::default()
        };
        assert!(form.validate());

        let mut form = LoginForm::default();
        assert!(!form.validate());
        assert!(form.failures.contains("Email"));
        assert!(form.failures.contains("Password"));
    }
}
