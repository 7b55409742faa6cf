//! Admin console support
//!
//! The console is gated by a single hardcoded username and password. This
//! keeps casual players out of the settings screens and is not meant as a
//! security boundary.

use std::{fmt::Display, str::FromStr};

use enum_map::Enum;
use itertools::Itertools;
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::{
    catalog,
    constants::admin::{PASSWORD, USERNAME},
    game::{self, GameState, Intent},
    persistence::Storage,
    store::Store,
};

/// Failures of the admin console
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The username or password did not match
    #[error("invalid username or password")]
    InvalidCredentials,
    /// The state rejected the login
    #[error(transparent)]
    Game(#[from] game::Error),
}

/// Checks a username and password against the admin account
///
/// # Errors
///
/// Returns [`Error::InvalidCredentials`] on any mismatch, without saying
/// which part was wrong.
pub fn verify_credentials(username: &str, password: &str) -> Result<(), Error> {
    if username == USERNAME && password == PASSWORD {
        Ok(())
    } else {
        tracing::info!("rejected admin login");
        Err(Error::InvalidCredentials)
    }
}

/// Verifies the credentials and unlocks the console
///
/// # Errors
///
/// Returns [`Error::InvalidCredentials`] on a mismatch; the state is left
/// locked.
pub fn login<S: Storage>(store: &mut Store<S>, username: &str, password: &str) -> Result<(), Error> {
    verify_credentials(username, password)?;
    store.dispatch(Intent::AdminLogin)?;
    Ok(())
}

/// Number of cards in one custom category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category name
    pub name: String,
    /// Cards in it
    pub card_count: usize,
}

/// Usage figures shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Games played to the end
    pub games_played: u64,
    /// Loose custom cards
    pub custom_cards: usize,
    /// Custom categories
    pub custom_categories: usize,
    /// Cards across all custom categories
    pub category_cards: usize,
    /// Built-in and custom categories together
    pub total_categories: usize,
    /// Card count per custom category
    pub categories: Vec<CategoryCount>,
}

impl AdminStats {
    /// Gathers the figures from the current state
    pub fn from_state(state: &GameState) -> Self {
        let categories = state
            .custom_categories()
            .values()
            .map(|category| CategoryCount {
                name: category.name.clone(),
                card_count: category.cards.len(),
            })
            .collect_vec();
        Self {
            games_played: state.game_stats().total_games,
            custom_cards: state.custom_cards().len(),
            custom_categories: categories.len(),
            category_cards: categories.iter().map(|c| c.card_count).sum(),
            total_categories: catalog::built_in().len() + categories.len(),
            categories,
        }
    }
}

/// The screens of the application
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, SerializeDisplay, DeserializeFromStr,
)]
pub enum Screen {
    /// Landing page
    Home,
    /// Team creation
    TeamSetup,
    /// Category selection
    Categories,
    /// Play
    Game,
    /// Final standings
    Results,
    /// Admin sign-in
    AdminLogin,
    /// Admin overview
    AdminDashboard,
    /// Branding
    AdminCustomization,
    /// Custom categories
    AdminCategories,
    /// Custom cards
    AdminCards,
    /// Game rules and limits
    AdminSettings,
    /// Sound effects
    AdminSounds,
    /// Usage figures
    AdminStats,
}

impl Screen {
    /// Route path of the screen
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::TeamSetup => "/team-setup",
            Self::Categories => "/categories",
            Self::Game => "/game",
            Self::Results => "/results",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminCustomization => "/admin/customization",
            Self::AdminCategories => "/admin/categories",
            Self::AdminCards => "/admin/cards",
            Self::AdminSettings => "/admin/settings",
            Self::AdminSounds => "/admin/sounds",
            Self::AdminStats => "/admin/stats",
        }
    }

    /// Whether the screen is only for a signed-in admin
    pub fn requires_admin(self) -> bool {
        !matches!(
            self,
            Self::Home
                | Self::TeamSetup
                | Self::Categories
                | Self::Game
                | Self::Results
                | Self::AdminLogin
        )
    }

    /// The screen to actually show: admin screens redirect to the login
    /// screen unless `authenticated`
    pub fn guard(self, authenticated: bool) -> Self {
        if self.requires_admin() && !authenticated {
            Self::AdminLogin
        } else {
            self
        }
    }

    /// Every screen in declaration order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A path that names no screen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no screen at {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|screen| screen.path() == s)
            .ok_or_else(|| UnknownScreen(s.to_owned()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        card::{Card, Difficulty},
        catalog::CategoryRecord,
        persistence::MemoryStorage,
    };

    #[test]
    fn test_verify_credentials() {
        assert_eq!(verify_credentials("GameMicey", "RUReady25?"), Ok(()));
        assert_eq!(
            verify_credentials("GameMicey", "ruready25?"),
            Err(Error::InvalidCredentials)
        );
        assert_eq!(
            verify_credentials("gamemicey", "RUReady25?"),
            Err(Error::InvalidCredentials)
        );
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "invalid username or password"
        );
    }

    #[test]
    fn test_login() {
        let mut store = Store::with_seed(MemoryStorage::new(), 1);
        assert!(login(&mut store, "admin", "admin").is_err());
        assert!(!store.state().is_admin_authenticated());
        login(&mut store, USERNAME, PASSWORD).unwrap();
        assert!(store.state().is_admin_authenticated());
    }

    #[test]
    fn test_admin_stats() {
        let mut store = Store::with_seed(MemoryStorage::new(), 1);
        store
            .dispatch(Intent::AddCustomCard(Card::new(
                "Kazoo",
                Difficulty::Easy,
                None,
                "Custom",
            )))
            .unwrap();
        for name in ["Board Games", "Snacks"] {
            store
                .dispatch(Intent::CreateCustomCategory(CategoryRecord::new(
                    name, "", "", "",
                )))
                .unwrap();
        }
        for text in ["Chess", "Go"] {
            store
                .dispatch(Intent::AddCardToCategory {
                    category_name: "Board Games".into(),
                    card: Card::new(text, Difficulty::Medium, None, ""),
                })
                .unwrap();
        }
        store.dispatch(Intent::FinishGame).unwrap();

        let stats = AdminStats::from_state(store.state());
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.custom_cards, 1);
        assert_eq!(stats.custom_categories, 2);
        assert_eq!(stats.category_cards, 2);
        assert_eq!(stats.total_categories, catalog::built_in().len() + 2);
        assert_eq!(
            stats.categories,
            vec![
                CategoryCount {
                    name: "Board Games".into(),
                    card_count: 2
                },
                CategoryCount {
                    name: "Snacks".into(),
                    card_count: 0
                },
            ]
        );
    }

    #[test]
    fn test_screen_paths_round_trip() {
        for screen in Screen::all() {
            assert_eq!(screen.path().parse::<Screen>(), Ok(screen));
        }
        assert_eq!(Screen::all().count(), 13);
        assert!("/nowhere".parse::<Screen>().is_err());
    }

    #[test]
    fn test_guard() {
        assert_eq!(Screen::AdminCards.guard(false), Screen::AdminLogin);
        assert_eq!(Screen::AdminCards.guard(true), Screen::AdminCards);
        assert_eq!(Screen::Game.guard(false), Screen::Game);
        assert_eq!(Screen::AdminLogin.guard(false), Screen::AdminLogin);
    }

    #[test]
    fn test_screen_serializes_as_path() {
        assert_eq!(
            serde_json::to_string(&Screen::AdminSounds).unwrap(),
            r#""/admin/sounds""#
        );
    }
}
