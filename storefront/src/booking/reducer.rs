//! Reducer logic for the repair booking wizard.

use super::options::DeviceType;
use super::schedule::available_dates;
use super::types::{BookingAction, BookingConfirmation, BookingField, BookingState, BookingStep};
use super::validation::validate_step;
use std::sync::Arc;
use storefront_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer};

/// Environment dependencies for the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock used to offer appointment dates
    pub clock: Arc<dyn Clock>,
    /// How many days ahead appointments may be booked
    pub window_days: u32,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, window_days: u32) -> Self {
        Self { clock, window_days }
    }
}

fn issue_options(device_type: Option<DeviceType>) -> &'static [&'static str] {
    device_type.map(DeviceType::common_issues).unwrap_or_default()
}

/// Reducer for the booking wizard
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Work done on arriving at a step
    fn enter(state: &mut BookingState, step: BookingStep, env: &BookingEnvironment) {
        match step {
            BookingStep::IssueDetails => {
                state.issue_options = issue_options(state.form.device_type);
            },
            BookingStep::Schedule => {
                let today = env.clock.now().date_naive();
                state.available_dates = available_dates(today, env.window_days);
            },
            BookingStep::DeviceInfo | BookingStep::Confirmation => {},
        }
        state.step = step;
    }

    fn next(state: &mut BookingState, env: &BookingEnvironment) {
        let Some(target) = state.step.next() else {
            tracing::warn!("booking already confirmed, ignoring next");
            return;
        };

        let errors = validate_step(state.step, &state.form, &state.available_dates);
        if !errors.is_empty() {
            tracing::warn!(
                step = state.step.title(),
                missing = ?errors.fields().collect::<Vec<_>>(),
                "step incomplete"
            );
            state.errors = errors;
            return;
        }
        state.errors.clear();

        if target == BookingStep::Confirmation {
            let Some(confirmation) = BookingConfirmation::from_form(&state.form) else {
                tracing::warn!("schedule passed validation without a selection");
                return;
            };
            tracing::info!(device = %confirmation.device, date = %confirmation.date, "repair booked");
            state.confirmation = Some(confirmation);
        }

        tracing::debug!(
            from = state.step.number(),
            to = target.number(),
            step = target.title(),
            "advancing"
        );
        Self::enter(state, target, env);
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if state.is_complete() && !matches!(action, BookingAction::Leave) {
            tracing::debug!(?action, "booking confirmed, ignoring");
            return SmallVec::new();
        }

        match action {
            BookingAction::UpdateField(field) => {
                let device_changed = matches!(field, BookingField::DeviceType(_));
                state.errors.clear_field(field.key());
                state.form.apply(field);
                if device_changed {
                    state.issue_options = issue_options(state.form.device_type);
                }
            },
            BookingAction::AttachImage { name } => {
                state.form.images.push(name);
            },
            BookingAction::RemoveImage { index } => {
                if index < state.form.images.len() {
                    state.form.images.remove(index);
                }
            },
            BookingAction::Next => Self::next(state, env),
            BookingAction::Back => {
                if let Some(previous) = state.step.previous() {
                    state.errors.clear();
                    Self::enter(state, previous, env);
                }
            },
            BookingAction::Leave => {
                *state = BookingState::new();
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use storefront_testing::{ReducerTest, assertions, test_clock};

    fn env() -> BookingEnvironment {
        BookingEnvironment::new(Arc::new(test_clock()), 14)
    }

    fn device_info() -> Vec<BookingAction> {
        vec![
            BookingAction::UpdateField(BookingField::DeviceType(Some(DeviceType::Smartphone))),
            BookingAction::UpdateField(BookingField::Brand("Apple".into())),
            BookingAction::UpdateField(BookingField::Model("iPhone 13".into())),
        ]
    }

    fn issue_details() -> Vec<BookingAction> {
        vec![
            BookingAction::UpdateField(BookingField::IssueType("Cracked Screen".into())),
            BookingAction::UpdateField(BookingField::IssueDescription("Dropped it".into())),
        ]
    }

    fn schedule() -> Vec<BookingAction> {
        vec![
            BookingAction::UpdateField(BookingField::FirstName("Jane".into())),
            BookingAction::UpdateField(BookingField::LastName("Doe".into())),
            BookingAction::UpdateField(BookingField::Email("jane@example.com".into())),
            BookingAction::UpdateField(BookingField::Phone("555-0100".into())),
            BookingAction::UpdateField(BookingField::Date(NaiveDate::from_ymd_opt(2025, 1, 6))),
            BookingAction::UpdateField(BookingField::Time(NaiveTime::from_hms_opt(10, 30, 0))),
            BookingAction::UpdateField(BookingField::TermsAccepted(true)),
        ]
    }

    fn through_schedule() -> Vec<BookingAction> {
        let mut actions = device_info();
        actions.push(BookingAction::Next);
        actions.extend(issue_details());
        actions.push(BookingAction::Next);
        actions.extend(schedule());
        actions
    }

    #[test]
    fn next_with_missing_fields_stays_put() {
        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions([
                BookingAction::UpdateField(BookingField::Brand("Apple".into())),
                BookingAction::Next,
            ])
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::DeviceInfo);
                assert_eq!(
                    state.errors.fields().collect::<Vec<_>>(),
                    vec!["device_type", "model"]
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn complete_device_info_advances_exactly_once() {
        let mut actions = device_info();
        actions.push(BookingAction::Next);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::IssueDetails);
                assert!(state.errors.is_empty());
                assert_eq!(state.issue_options, DeviceType::Smartphone.common_issues());
            })
            .run();
    }

    #[test]
    fn editing_field_clears_its_error() {
        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions([
                BookingAction::Next,
                BookingAction::UpdateField(BookingField::Model("Pixel 7".into())),
            ])
            .then_state(|state| {
                assert!(!state.errors.contains("model"));
                assert!(state.errors.contains("brand"));
            })
            .run();
    }

    #[test]
    fn changing_device_resets_issue_type() {
        let mut actions = device_info();
        actions.push(BookingAction::Next);
        actions.extend(issue_details());
        actions.push(BookingAction::Back);
        actions.push(BookingAction::UpdateField(BookingField::DeviceType(Some(
            DeviceType::GameConsole,
        ))));

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::DeviceInfo);
                assert!(state.form.issue_type.is_empty());
                assert_eq!(state.form.issue_description, "Dropped it");
                assert_eq!(state.issue_options, DeviceType::GameConsole.common_issues());
            })
            .run();
    }

    #[test]
    fn back_is_noop_on_first_step() {
        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_action(BookingAction::Back)
            .then_state(|state| assert_eq!(state.step, BookingStep::DeviceInfo))
            .run();
    }

    #[test]
    fn back_from_schedule_is_unguarded() {
        let mut actions = device_info();
        actions.push(BookingAction::Next);
        actions.extend(issue_details());
        actions.push(BookingAction::Next);
        actions.extend([
            BookingAction::Next,
            BookingAction::UpdateField(BookingField::IssueType(String::new())),
            BookingAction::UpdateField(BookingField::IssueDescription(String::new())),
            BookingAction::Back,
        ]);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::IssueDetails);
                assert_eq!(state.step.number(), 2);
                assert!(state.errors.is_empty());
                assert!(state.form.issue_type.is_empty());
                assert_eq!(state.issue_options, DeviceType::Smartphone.common_issues());
            })
            .run();
    }

    #[test]
    fn steps_number_one_to_four() {
        let mut step = BookingStep::DeviceInfo;
        let mut numbers = vec![step.number()];
        while let Some(next) = step.next() {
            numbers.push(next.number());
            step = next;
        }
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn schedule_rejects_date_that_was_not_offered() {
        let mut actions = through_schedule();
        // Sunday
        actions.push(BookingAction::UpdateField(BookingField::Date(NaiveDate::from_ymd_opt(2025, 1, 5))));
        actions.push(BookingAction::Next);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Schedule);
                assert_eq!(state.errors.get("date"), Some("Please choose an available date"));
                assert!(state.confirmation.is_none());
            })
            .run();
    }

    #[test]
    fn entering_schedule_offers_dates_from_clock() {
        let mut actions = device_info();
        actions.push(BookingAction::Next);
        actions.extend(issue_details());
        actions.push(BookingAction::Next);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Schedule);
                assert_eq!(state.available_dates.len(), 12);
                assert_eq!(state.available_dates.first(), NaiveDate::from_ymd_opt(2025, 1, 2).as_ref());
                assert_eq!(state.time_slots.len(), 18);
            })
            .run();
    }

    #[test]
    fn schedule_without_terms_is_rejected() {
        let mut actions = through_schedule();
        actions.push(BookingAction::UpdateField(BookingField::TermsAccepted(false)));
        actions.push(BookingAction::Next);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Schedule);
                assert!(state.errors.contains("terms_accepted"));
                assert!(state.confirmation.is_none());
            })
            .run();
    }

    #[test]
    fn submitting_schedule_confirms() {
        let mut actions = through_schedule();
        actions.push(BookingAction::Next);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Confirmation);
                let confirmation = state.confirmation.clone().unwrap_or_else(|| {
                    unreachable!("confirmation expected")
                });
                assert_eq!(confirmation.device, "Apple iPhone 13 (Smartphone)");
                assert_eq!(confirmation.issue, "Cracked Screen");
                assert_eq!(confirmation.date, "Monday, January 6, 2025");
                assert_eq!(confirmation.time, "10:30");
                assert_eq!(confirmation.name, "Jane Doe");
                assert_eq!(confirmation.email, "jane@example.com");
            })
            .run();
    }

    #[test]
    fn confirmation_is_terminal() {
        let mut actions = through_schedule();
        actions.extend([
            BookingAction::Next,
            BookingAction::Back,
            BookingAction::Next,
            BookingAction::UpdateField(BookingField::Brand("Samsung".into())),
        ]);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Confirmation);
                assert_eq!(state.form.brand, "Apple");
            })
            .run();
    }

    #[test]
    fn leave_discards_everything() {
        let mut actions = through_schedule();
        actions.push(BookingAction::Next);
        actions.push(BookingAction::Leave);

        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions(actions)
            .then_state(|state| assert_eq!(state, &BookingState::new()))
            .run();
    }

    #[test]
    fn images_attach_and_detach() {
        ReducerTest::new(BookingReducer::new())
            .with_env(env())
            .given_state(BookingState::new())
            .when_actions([
                BookingAction::AttachImage { name: "front.jpg".into() },
                BookingAction::AttachImage { name: "back.jpg".into() },
                BookingAction::RemoveImage { index: 0 },
                BookingAction::RemoveImage { index: 5 },
            ])
            .then_state(|state| assert_eq!(state.form.images, vec!["back.jpg".to_string()]))
            .run();
    }
}
