//! Light/dark theme preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use storefront_core::{SmallVec, effect::Effect, environment::KeyValueStorage, reducer::Reducer};
use thiserror::Error;

/// Storage slot holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Colour scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

/// Stored value was neither `light` nor `dark`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme: {0:?}")]
pub struct UnknownTheme(pub String);

impl Theme {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Current theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    /// Active theme
    pub theme: Theme,
}

/// Actions accepted by the theme store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeAction {
    /// Switch to the other theme
    Toggle,
    /// Switch to a specific theme
    Set(Theme),
}

/// Environment dependencies for the theme reducer
#[derive(Clone)]
pub struct ThemeEnvironment {
    /// Where the preference is kept
    pub storage: Arc<dyn KeyValueStorage>,
}

impl ThemeEnvironment {
    /// Creates a new `ThemeEnvironment`
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

/// Reducer for the theme store; every change is persisted
#[derive(Clone, Debug, Default)]
pub struct ThemeReducer;

impl Reducer for ThemeReducer {
    type State = ThemeState;
    type Action = ThemeAction;
    type Environment = ThemeEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        state.theme = match action {
            ThemeAction::Toggle => state.theme.toggled(),
            ThemeAction::Set(theme) => theme,
        };

        if let Err(error) = env.storage.set(THEME_KEY, state.theme.as_str()) {
            tracing::error!(%error, theme = %state.theme, "failed to persist theme");
        }
        SmallVec::new()
    }
}

/// Initial theme: a valid stored preference, else the system preference
pub fn load_theme(storage: &dyn KeyValueStorage, prefers_dark: bool) -> Theme {
    let fallback = if prefers_dark { Theme::Dark } else { Theme::Light };

    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|error: UnknownTheme| {
            tracing::warn!(%error, "ignoring stored theme");
            fallback
        }),
        Ok(None) => fallback,
        Err(error) => {
            tracing::error!(%error, "could not read stored theme");
            fallback
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testing::{FailingStorage, InMemoryStorage, ReducerTest};

    #[test]
    fn toggle_flips_and_persists() {
        let storage = Arc::new(InMemoryStorage::new());
        let slot = storage.clone();

        ReducerTest::new(ThemeReducer)
            .with_env(ThemeEnvironment::new(storage))
            .given_state(ThemeState::default())
            .when_action(ThemeAction::Toggle)
            .then_state(move |state| {
                assert_eq!(state.theme, Theme::Dark);
                assert_eq!(slot.slot(THEME_KEY).as_deref(), Some("dark"));
            })
            .run();
    }

    #[test]
    fn set_persists() {
        let storage = Arc::new(InMemoryStorage::new());
        let env = ThemeEnvironment::new(storage.clone());
        let mut state = ThemeState { theme: Theme::Dark };

        let _ = ThemeReducer.reduce(&mut state, ThemeAction::Set(Theme::Light), &env);

        assert_eq!(storage.slot(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn stored_preference_wins() {
        let storage = InMemoryStorage::with_slot(THEME_KEY, "dark");
        assert_eq!(load_theme(&storage, false), Theme::Dark);
    }

    #[test]
    fn falls_back_to_system_preference() {
        assert_eq!(load_theme(&InMemoryStorage::new(), true), Theme::Dark);
        assert_eq!(load_theme(&InMemoryStorage::new(), false), Theme::Light);
        assert_eq!(load_theme(&InMemoryStorage::with_slot(THEME_KEY, "sepia"), true), Theme::Dark);
        assert_eq!(load_theme(&FailingStorage, false), Theme::Light);
    }
}
