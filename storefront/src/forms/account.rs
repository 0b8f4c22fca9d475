//! Sign-in, registration and profile forms.

use super::{FORM, ValidationErrors, is_blank, is_valid_email};
use serde::{Deserialize, Serialize};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// New account details
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Must equal `password`
    pub confirm_password: String,
}

/// Editable account profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Phone number, free form
    pub phone: String,
    /// Postal address, free form
    pub address: String,
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if errors.require("email", email, "Email is required") && !is_valid_email(email) {
        errors.insert("email", "Email is invalid");
    }
}

/// Validate a registration
#[must_use]
pub fn validate_registration(form: &RegistrationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("name", &form.name, "Name is required");
    check_email(&mut errors, &form.email);

    if form.password.is_empty() {
        errors.insert("password", "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 6 characters");
    }

    if form.password != form.confirm_password {
        errors.insert("confirm_password", "Passwords do not match");
    }

    errors
}

/// Validate a profile update; phone and address are optional
#[must_use]
pub fn validate_profile(form: &ProfileForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("name", &form.name, "Name is required");
    check_email(&mut errors, &form.email);
    errors
}

/// Validate a sign-in attempt
///
/// Both fields are required; a single form-level message is reported.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(email) || password.is_empty() {
        errors.insert(FORM, "Please fill in all fields");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&registration()).is_empty());
    }

    #[test]
    fn short_password_rejected() {
        let form = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..registration()
        };

        let errors = validate_registration(&form);
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
        assert!(!errors.contains("confirm_password"));
    }

    #[test]
    fn password_length_counts_characters() {
        let form = RegistrationForm {
            password: "ééééé".into(),
            confirm_password: "ééééé".into(),
            ..registration()
        };

        assert!(validate_registration(&form).contains("password"));
    }

    #[test]
    fn mismatched_confirmation_rejected() {
        let form = RegistrationForm {
            confirm_password: "hunter23".into(),
            ..registration()
        };

        let errors = validate_registration(&form);
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn empty_registration_reports_all() {
        let errors = validate_registration(&RegistrationForm::default());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "email", "password"]);
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn profile_requires_name_and_email_only() {
        let form = ProfileForm {
            name: "Jane".into(),
            email: "jane@example".into(),
            ..ProfileForm::default()
        };

        let errors = validate_profile(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is invalid"));
    }

    #[test]
    fn login_needs_both_fields() {
        assert!(validate_login("jane@example.com", "secret").is_empty());
        assert_eq!(
            validate_login("", "secret").get(FORM),
            Some("Please fill in all fields")
        );
        assert!(!validate_login("jane@example.com", "").is_empty());
    }
}
