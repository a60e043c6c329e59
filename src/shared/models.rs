//! Snippet and user data models
//!
//! A snippet is immutable once written. Its expiry is fixed at creation to
//! one of the durations in [`Expiry`] and it is only visible while that
//! expiry lies in the future.

use chrono::{DateTime, Utc};

/// Database identity of a snippet
pub type SnippetId = i64;

/// Database identity of a user
pub type UserId = i64;

/// A stored text item with a bounded visibility window
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// The permitted snippet lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiry {
    OneHour,
    OneDay,
    OneYear,
}

impl Expiry {
    pub const ALL: [Expiry; 3] = [Expiry::OneHour, Expiry::OneDay, Expiry::OneYear];

    /// Lifetime in seconds
    pub fn as_secs(self) -> i64 {
        match self {
            Expiry::OneHour => 3_600,
            Expiry::OneDay => 86_400,
            Expiry::OneYear => 31_536_000,
        }
    }

    /// Parse the literal form value. Only the exact strings `"3600"`,
    /// `"86400"` and `"31536000"` are accepted.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "3600" => Some(Expiry::OneHour),
            "86400" => Some(Expiry::OneDay),
            "31536000" => Some(Expiry::OneYear),
            _ => None,
        }
    }

    /// The value submitted by the snippet form for this lifetime
    pub fn form_value(self) -> &'static str {
        match self {
            Expiry::OneHour => "3600",
            Expiry::OneDay => "86400",
            Expiry::OneYear => "31536000",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Expiry::OneHour => "One Hour",
            Expiry::OneDay => "One Day",
            Expiry::OneYear => "One Year",
        }
    }
}
