//! Per-step guards for the booking wizard.
//!
//! Each step checks that its required fields are present; the schedule step
//! also requires the chosen date to be one the wizard offered.

use super::types::{BookingForm, BookingStep};
use crate::forms::ValidationErrors;
use chrono::NaiveDate;

/// Step 1: device type, brand, model
#[must_use]
pub fn validate_device_info(form: &BookingForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.device_type.is_none() {
        errors.insert("device_type", "Device type is required");
    }
    errors.require("brand", &form.brand, "Brand is required");
    errors.require("model", &form.model, "Model is required");
    errors
}

/// Step 2: issue type and description
#[must_use]
pub fn validate_issue_details(form: &BookingForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("issue_type", &form.issue_type, "Issue type is required");
    errors.require(
        "issue_description",
        &form.issue_description,
        "Issue description is required",
    );
    errors
}

/// Step 3: contact details, slot and terms
///
/// The date must be one of `offered_dates`.
#[must_use]
pub fn validate_schedule(form: &BookingForm, offered_dates: &[NaiveDate]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("first_name", &form.first_name, "First name is required");
    errors.require("last_name", &form.last_name, "Last name is required");
    errors.require("email", &form.email, "Email is required");
    errors.require("phone", &form.phone, "Phone number is required");
    match form.date {
        None => errors.insert("date", "Date is required"),
        Some(date) if !offered_dates.contains(&date) => {
            errors.insert("date", "Please choose an available date");
        },
        Some(_) => {},
    }
    if form.time.is_none() {
        errors.insert("time", "Time is required");
    }
    if !form.terms_accepted {
        errors.insert("terms_accepted", "You must accept the terms and conditions");
    }
    errors
}

/// Guard for leaving `step` forwards
#[must_use]
pub fn validate_step(
    step: BookingStep,
    form: &BookingForm,
    offered_dates: &[NaiveDate],
) -> ValidationErrors {
    match step {
        BookingStep::DeviceInfo => validate_device_info(form),
        BookingStep::IssueDetails => validate_issue_details(form),
        BookingStep::Schedule => validate_schedule(form, offered_dates),
        BookingStep::Confirmation => ValidationErrors::new(),
    }
}
