//! Form validation.
//!
//! Validators are pure functions from field values to [`ValidationErrors`].
//! The error set is rebuilt on every attempt; callers show each message next
//! to its field and refuse to proceed while any error is present.

pub mod account;
pub mod checkout;

pub use account::{ProfileForm, RegistrationForm, validate_login, validate_profile, validate_registration};
pub use checkout::{CheckoutField, CheckoutForm, PaymentMethod, validate_checkout};

use regex::Regex;
use std::sync::LazyLock;

/// Key used for errors that belong to the whole form rather than one field
pub const FORM: &str = "form";

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Whether `value` contains something shaped like an email address
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(value))
}

/// Empty once surrounding whitespace is removed
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Field name to message, in the order the errors were found
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an error, replacing any earlier one for the same field
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = message;
        } else {
            self.entries.push((field, message));
        }
    }

    /// Record `message` for `field` if `value` is blank
    ///
    /// Returns whether the value was present.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if is_blank(value) {
            self.insert(field, message);
            false
        } else {
            true
        }
    }

    /// The message for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether a field has an error
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Drop the error for a field (the user started editing it)
    pub fn clear_field(&mut self, field: &str) {
        self.entries.retain(|(name, _)| *name != field);
    }

    /// Drop every error
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether there are no errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Field names with errors, in order
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// `(field, message)` pairs, in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (*name, message.as_str()))
    }
}
