//! Repair booking wizard.
//!
//! Four linear steps: `DeviceInfo → IssueDetails → Schedule → Confirmation`.
//! Moving forward is guarded by the current step's validator; moving back is
//! not. Submitting from `Schedule` always succeeds and lands on the terminal
//! `Confirmation` step.

pub mod options;
pub mod reducer;
pub mod schedule;
pub mod types;
pub mod validation;

pub use options::{DeviceType, UnknownDeviceType};
pub use reducer::{BookingEnvironment, BookingReducer};
pub use schedule::{DEFAULT_WINDOW_DAYS, available_dates, format_long_date, format_slot, time_slots};
pub use types::{
    BookingAction, BookingConfirmation, BookingField, BookingForm, BookingState, BookingStep,
};
pub use validation::{validate_device_info, validate_issue_details, validate_schedule, validate_step};
