//! Booking wizard state.

use super::options::DeviceType;
use super::schedule::{format_long_date, format_slot, time_slots};
use crate::forms::ValidationErrors;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Wizard steps, in order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BookingStep {
    /// Step 1: device type, brand, model
    #[default]
    DeviceInfo,
    /// Step 2: issue type and description, photos
    IssueDetails,
    /// Step 3: contact details, date, time, terms
    Schedule,
    /// Step 4: terminal summary
    Confirmation,
}

impl BookingStep {
    /// 1-based position shown in the step indicator
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::DeviceInfo => 1,
            Self::IssueDetails => 2,
            Self::Schedule => 3,
            Self::Confirmation => 4,
        }
    }

    /// Heading for the step
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::DeviceInfo => "Device Info",
            Self::IssueDetails => "Issue Details",
            Self::Schedule => "Schedule",
            Self::Confirmation => "Confirmation",
        }
    }

    /// The following step, `None` at the end
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::DeviceInfo => Some(Self::IssueDetails),
            Self::IssueDetails => Some(Self::Schedule),
            Self::Schedule => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// The step `Back` returns to; `None` on the first and terminal steps
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::IssueDetails => Some(Self::DeviceInfo),
            Self::Schedule => Some(Self::IssueDetails),
            Self::DeviceInfo | Self::Confirmation => None,
        }
    }
}

/// Everything entered so far
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    /// Selected device type
    pub device_type: Option<DeviceType>,
    /// Manufacturer
    pub brand: String,
    /// Model name
    pub model: String,
    /// One of the device type's common issues
    pub issue_type: String,
    /// Free text
    pub issue_description: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Appointment day
    pub date: Option<NaiveDate>,
    /// Appointment slot
    pub time: Option<NaiveTime>,
    /// Names of attached photos
    pub images: Vec<String>,
    /// Terms and conditions checkbox
    pub terms_accepted: bool,
}

/// A single field edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingField {
    /// Device type select; `None` clears it
    DeviceType(Option<DeviceType>),
    /// Brand input
    Brand(String),
    /// Model input
    Model(String),
    /// Issue type select
    IssueType(String),
    /// Issue description textarea
    IssueDescription(String),
    /// First name input
    FirstName(String),
    /// Last name input
    LastName(String),
    /// Email input
    Email(String),
    /// Phone input
    Phone(String),
    /// Date select
    Date(Option<NaiveDate>),
    /// Time select
    Time(Option<NaiveTime>),
    /// Terms checkbox
    TermsAccepted(bool),
}

impl BookingField {
    /// Key used in [`ValidationErrors`]
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::DeviceType(_) => "device_type",
            Self::Brand(_) => "brand",
            Self::Model(_) => "model",
            Self::IssueType(_) => "issue_type",
            Self::IssueDescription(_) => "issue_description",
            Self::FirstName(_) => "first_name",
            Self::LastName(_) => "last_name",
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::TermsAccepted(_) => "terms_accepted",
        }
    }
}

impl BookingForm {
    /// Apply an edit
    ///
    /// Any device type change resets the issue type.
    pub fn apply(&mut self, field: BookingField) {
        match field {
            BookingField::DeviceType(device_type) => {
                self.device_type = device_type;
                self.issue_type.clear();
            },
            BookingField::Brand(value) => self.brand = value,
            BookingField::Model(value) => self.model = value,
            BookingField::IssueType(value) => self.issue_type = value,
            BookingField::IssueDescription(value) => self.issue_description = value,
            BookingField::FirstName(value) => self.first_name = value,
            BookingField::LastName(value) => self.last_name = value,
            BookingField::Email(value) => self.email = value,
            BookingField::Phone(value) => self.phone = value,
            BookingField::Date(value) => self.date = value,
            BookingField::Time(value) => self.time = value,
            BookingField::TermsAccepted(value) => self.terms_accepted = value,
        }
    }
}

/// Summary shown once the booking is submitted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// `Brand Model (Device Type)`
    pub device: String,
    /// Issue type
    pub issue: String,
    /// Long form date
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// First and last name
    pub name: String,
    /// Contact email
    pub email: String,
}

impl BookingConfirmation {
    /// Build from a form that passed every step; `None` if a selection is missing
    #[must_use]
    pub fn from_form(form: &BookingForm) -> Option<Self> {
        let device_type = form.device_type?;
        Some(Self {
            device: format!("{} {} ({})", form.brand.trim(), form.model.trim(), device_type),
            issue: form.issue_type.clone(),
            date: format_long_date(form.date?),
            time: format_slot(form.time?),
            name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
            email: form.email.trim().to_string(),
        })
    }
}

/// State of one pass through the wizard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingState {
    /// Current step
    pub step: BookingStep,
    /// Accumulated input
    pub form: BookingForm,
    /// Errors from the last rejected `Next`
    pub errors: ValidationErrors,
    /// Issue types for the chosen device
    pub issue_options: &'static [&'static str],
    /// Days offered on the schedule step
    pub available_dates: Vec<NaiveDate>,
    /// Slots offered on the schedule step
    pub time_slots: Vec<NaiveTime>,
    /// Set on reaching [`BookingStep::Confirmation`]
    pub confirmation: Option<BookingConfirmation>,
}

impl BookingState {
    /// Fresh wizard on the first step
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: BookingStep::DeviceInfo,
            form: BookingForm::default(),
            errors: ValidationErrors::new(),
            issue_options: &[],
            available_dates: Vec::new(),
            time_slots: time_slots(),
            confirmation: None,
        }
    }

    /// Whether the wizard has finished
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.step == BookingStep::Confirmation
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions accepted by the wizard
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    /// Edit a field
    UpdateField(BookingField),
    /// Attach a photo of the damage
    AttachImage {
        /// File name
        name: String,
    },
    /// Detach the photo at `index`
    RemoveImage {
        /// Position in the attachment list
        index: usize,
    },
    /// Advance if the current step is complete; submits from `Schedule`
    Next,
    /// Return to the previous step
    Back,
    /// Discard the wizard
    Leave,
}
