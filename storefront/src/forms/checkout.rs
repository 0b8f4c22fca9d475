//! Checkout form and its validator.

use super::{ValidationErrors, is_blank, is_valid_email};
use serde::{Deserialize, Serialize};

/// How the customer pays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card details are collected and validated
    #[default]
    #[serde(rename = "credit")]
    CreditCard,
    /// Card fields are ignored
    PayPal,
}

/// Shipping and payment details entered at checkout
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip_code: String,
    /// Name printed on the card
    pub card_name: String,
    /// Card number, spaces allowed
    pub card_number: String,
    /// Expiration date as entered
    pub exp_date: String,
    /// Card security code
    pub cvv: String,
}

/// Names a single [`CheckoutForm`] field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `email`
    Email,
    /// `address`
    Address,
    /// `city`
    City,
    /// `state`
    State,
    /// `zip_code`
    ZipCode,
    /// `card_name`
    CardName,
    /// `card_number`
    CardNumber,
    /// `exp_date`
    ExpDate,
    /// `cvv`
    Cvv,
}

impl CheckoutField {
    /// Key used in [`ValidationErrors`]
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zip_code",
            Self::CardName => "card_name",
            Self::CardNumber => "card_number",
            Self::ExpDate => "exp_date",
            Self::Cvv => "cvv",
        }
    }
}

impl CheckoutForm {
    /// Overwrite one field
    pub fn set(&mut self, field: CheckoutField, value: String) {
        let slot = match field {
            CheckoutField::FirstName => &mut self.first_name,
            CheckoutField::LastName => &mut self.last_name,
            CheckoutField::Email => &mut self.email,
            CheckoutField::Address => &mut self.address,
            CheckoutField::City => &mut self.city,
            CheckoutField::State => &mut self.state,
            CheckoutField::ZipCode => &mut self.zip_code,
            CheckoutField::CardName => &mut self.card_name,
            CheckoutField::CardNumber => &mut self.card_number,
            CheckoutField::ExpDate => &mut self.exp_date,
            CheckoutField::Cvv => &mut self.cvv,
        };
        *slot = value;
    }

    /// Full name for the order confirmation
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

fn is_card_number(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 16 && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_cvv(value: &str) -> bool {
    (3..=4).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate the checkout form
///
/// Card fields are checked only for [`PaymentMethod::CreditCard`].
#[must_use]
pub fn validate_checkout(form: &CheckoutForm, payment_method: PaymentMethod) -> ValidationErrors {
    use CheckoutField as F;

    let mut errors = ValidationErrors::new();
    errors.require(F::FirstName.key(), &form.first_name, "First name is required");
    errors.require(F::LastName.key(), &form.last_name, "Last name is required");
    if errors.require(F::Email.key(), &form.email, "Email is required")
        && !is_valid_email(&form.email)
    {
        errors.insert(F::Email.key(), "Email is invalid");
    }
    errors.require(F::Address.key(), &form.address, "Address is required");
    errors.require(F::City.key(), &form.city, "City is required");
    errors.require(F::State.key(), &form.state, "State is required");
    errors.require(F::ZipCode.key(), &form.zip_code, "Zip code is required");

    if payment_method == PaymentMethod::CreditCard {
        errors.require(F::CardName.key(), &form.card_name, "Name on card is required");
        if is_blank(&form.card_number) {
            errors.insert(F::CardNumber.key(), "Card number is required");
        } else if !is_card_number(&form.card_number) {
            errors.insert(F::CardNumber.key(), "Invalid card number");
        }
        errors.require(F::ExpDate.key(), &form.exp_date, "Expiration date is required");
        if errors.require(F::Cvv.key(), &form.cvv, "CVV is required") && !is_cvv(&form.cvv) {
            errors.insert(F::Cvv.key(), "Invalid CVV");
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            card_name: "Jane Doe".into(),
            card_number: "4242 4242 4242 4242".into(),
            exp_date: "12/30".into(),
            cvv: "123".into(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(validate_checkout(&filled(), PaymentMethod::CreditCard).is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field_in_order() {
        let errors = validate_checkout(&CheckoutForm::default(), PaymentMethod::CreditCard);

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![
                "first_name", "last_name", "email", "address", "city", "state", "zip_code",
                "card_name", "card_number", "exp_date", "cvv",
            ]
        );
        assert_eq!(errors.get("zip_code"), Some("Zip code is required"));
    }

    #[test]
    fn paypal_skips_card_fields() {
        let form = CheckoutForm {
            card_name: String::new(),
            card_number: "nope".into(),
            cvv: String::new(),
            ..filled()
        };

        assert!(validate_checkout(&form, PaymentMethod::PayPal).is_empty());
        assert_eq!(validate_checkout(&form, PaymentMethod::CreditCard).len(), 3);
    }

    #[test]
    fn email_format_checked_after_presence() {
        let form = CheckoutForm {
            email: "jane.example.com".into(),
            ..filled()
        };

        let errors = validate_checkout(&form, PaymentMethod::CreditCard);
        assert_eq!(errors.get("email"), Some("Email is invalid"));
    }

    #[test]
    fn card_number_needs_sixteen_digits() {
        for bad in ["4242 4242 4242 424", "4242-4242-4242-4242", "４２４２424242424242"] {
            let form = CheckoutForm {
                card_number: bad.into(),
                ..filled()
            };
            let errors = validate_checkout(&form, PaymentMethod::CreditCard);
            assert_eq!(errors.get("card_number"), Some("Invalid card number"), "{bad}");
        }
    }

    #[test]
    fn cvv_is_three_or_four_digits() {
        for (cvv, valid) in [("123", true), ("1234", true), ("12", false), ("12345", false), ("12a", false)] {
            let form = CheckoutForm {
                cvv: cvv.into(),
                ..filled()
            };
            let errors = validate_checkout(&form, PaymentMethod::CreditCard);
            assert_eq!(!errors.contains("cvv"), valid, "{cvv}");
        }
    }

    #[test]
    fn set_updates_named_field() {
        let mut form = CheckoutForm::default();
        form.set(CheckoutField::ZipCode, "10001".into());
        assert_eq!(form.zip_code, "10001");
    }
}
