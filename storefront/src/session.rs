//! Mock sign-in session.
//!
//! Sign-in accepts only the demo account; registration accepts anyone whose
//! form validates.

use crate::forms::{
    FORM, ProfileForm, RegistrationForm, ValidationErrors, validate_login, validate_profile,
    validate_registration,
};
use serde::{Deserialize, Serialize};
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Name given to users who sign in without registering
pub const DEFAULT_USER_NAME: &str = "Demo User";

/// The only email [`SessionAction::SignIn`] accepts
pub const DEMO_EMAIL: &str = "user@example.com";

/// Password of the demo account
pub const DEMO_PASSWORD: &str = "password";

/// Form-level message for rejected credentials
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// The signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Postal address
    pub address: String,
}

impl User {
    fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

/// Session state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// `None` when signed out
    pub user: Option<User>,
    /// Errors from the last rejected form
    pub errors: ValidationErrors,
}

impl SessionState {
    /// Whether someone is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Actions accepted by the session store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Sign in with email and password
    SignIn {
        /// Login email
        email: String,
        /// Password (never stored)
        password: String,
    },
    /// Create an account and sign in
    Register(RegistrationForm),
    /// Edit the signed-in user's profile
    UpdateProfile(ProfileForm),
    /// Sign out
    SignOut,
}

/// Reducer for the session store
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    fn accept(state: &mut SessionState, errors: ValidationErrors) -> bool {
        let ok = errors.is_empty();
        if !ok {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "session form rejected");
        }
        state.errors = errors;
        ok
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::SignIn { email, password } => {
                let mut errors = validate_login(&email, &password);
                if errors.is_empty() && (email.trim() != DEMO_EMAIL || password != DEMO_PASSWORD) {
                    tracing::warn!(%email, "sign-in rejected");
                    errors.insert(FORM, INVALID_CREDENTIALS);
                }
                if Self::accept(state, errors) {
                    tracing::info!(%email, "signed in");
                    state.user = Some(User::new(DEFAULT_USER_NAME, &email));
                }
            },
            SessionAction::Register(form) => {
                if Self::accept(state, validate_registration(&form)) {
                    tracing::info!(email = %form.email, "registered");
                    state.user = Some(User::new(&form.name, &form.email));
                }
            },
            SessionAction::UpdateProfile(form) => {
                let errors = validate_profile(&form);
                match state.user.as_mut() {
                    None => tracing::warn!("profile update while signed out, ignoring"),
                    Some(user) if errors.is_empty() => {
                        user.name = form.name.trim().to_string();
                        user.email = form.email.trim().to_string();
                        user.phone = form.phone;
                        user.address = form.address;
                        state.errors.clear();
                    },
                    Some(_) => {
                        Self::accept(state, errors);
                    },
                }
            },
            SessionAction::SignOut => {
                state.user = None;
                state.errors.clear();
            },
        }
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testing::ReducerTest;

    fn sign_in() -> SessionAction {
        SessionAction::SignIn {
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        }
    }

    #[test]
    fn sign_in_uses_demo_name() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_action(sign_in())
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some(DEFAULT_USER_NAME));
            })
            .run();
    }

    #[test]
    fn sign_in_rejects_unknown_credentials() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_actions([
                SessionAction::SignIn {
                    email: "jane@example.com".into(),
                    password: DEMO_PASSWORD.into(),
                },
                SessionAction::SignIn {
                    email: DEMO_EMAIL.into(),
                    password: "hunter22".into(),
                },
            ])
            .then_state(|state| {
                assert!(!state.is_authenticated());
                assert_eq!(state.errors.get(FORM), Some(INVALID_CREDENTIALS));
                assert_eq!(state.errors.len(), 1);
            })
            .run();
    }

    #[test]
    fn sign_in_with_blank_field_fails() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_action(SessionAction::SignIn {
                email: "jane@example.com".into(),
                password: String::new(),
            })
            .then_state(|state| {
                assert!(!state.is_authenticated());
                assert_eq!(state.errors.get(FORM), Some("Please fill in all fields"));
            })
            .run();
    }

    #[test]
    fn register_signs_in_with_given_name() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_action(SessionAction::Register(RegistrationForm {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                password: "hunter22".into(),
                confirm_password: "hunter22".into(),
            }))
            .then_state(|state| {
                assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("Jane Doe"));
            })
            .run();
    }

    #[test]
    fn profile_update_validates() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_actions([
                sign_in(),
                SessionAction::UpdateProfile(ProfileForm {
                    name: String::new(),
                    email: "jane@example.com".into(),
                    ..ProfileForm::default()
                }),
            ])
            .then_state(|state| {
                assert_eq!(state.errors.get("name"), Some("Name is required"));
                assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some(DEFAULT_USER_NAME));
            })
            .run();
    }

    #[test]
    fn profile_update_applies() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_actions([
                sign_in(),
                SessionAction::UpdateProfile(ProfileForm {
                    name: "Jane Doe".into(),
                    email: "jane@example.org".into(),
                    phone: "555-0100".into(),
                    address: "1 Main St".into(),
                }),
            ])
            .then_state(|state| {
                let user = state.user.clone().unwrap_or_else(|| unreachable!("signed in"));
                assert_eq!(user.email, "jane@example.org");
                assert_eq!(user.phone, "555-0100");
            })
            .run();
    }

    #[test]
    fn sign_out_clears_user() {
        ReducerTest::new(SessionReducer)
            .with_env(())
            .given_state(SessionState::default())
            .when_actions([sign_in(), SessionAction::SignOut])
            .then_state(|state| assert!(!state.is_authenticated()))
            .run();
    }
}
