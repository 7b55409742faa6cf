//! Core game state and the intent reducer
//!
//! `GameState` is the root aggregate for one running game: the teams and
//! their scores, the drawn card pool, the current card, settings, custom
//! content and the admin flag. Every change goes through an [`Intent`];
//! applying an intent either succeeds completely or leaves the state
//! untouched and returns an [`Error`].

use fastrand::Rng;
use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    card::{Card, CardId},
    catalog::{self, CategoryRecord, CategorySummary, CustomCategories, CustomCategory},
    constants::cards::DEFAULT_CARD_CATEGORY,
    deck,
    persistence::Snapshot,
    settings::{AdminSettings, AdminSettingsPatch, GameSettings, GameSettingsPatch},
    teams::Team,
};

/// Whether a game is under way, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Teams and categories are being chosen
    NotStarted,
    /// Cards have been drawn and teams are taking turns
    InProgress,
}

/// Lifetime statistics over all finished games
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    /// Games played to the end
    pub total_games: u64,
    /// Cards guessed correctly across all games
    pub total_cards: u64,
    /// Mean team score per game, averaged over all games
    pub average_score: f64,
}

impl GameStats {
    /// Folds a finished game's final team scores into the statistics
    pub fn record(&mut self, teams: &[Team]) {
        let guessed: u64 = teams.iter().map(|team| team.score).sum();
        let game_mean = if teams.is_empty() {
            0.
        } else {
            guessed as f64 / teams.len() as f64
        };
        self.total_games += 1;
        self.total_cards += guessed;
        self.average_score += (game_mean - self.average_score) / self.total_games as f64;
    }
}

/// Changes that can be requested of the game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Intent {
    /// Replace the team list; callers ensure at least two teams with players
    SetTeams(Vec<Team>),
    /// Replace the selected category names
    SetCategories(Vec<String>),
    /// Draw the shuffled pool and show its first card
    StartGame,
    /// Show a random card from the pool
    NextCard,
    /// Award one point to the team whose turn it is
    CorrectGuess,
    /// Pass the turn to the next team, wrapping after the last
    NextTurn,
    /// Shallow-merge into the game settings
    UpdateSettings(GameSettingsPatch),
    /// Shallow-merge into the admin settings
    UpdateAdminSettings(AdminSettingsPatch),
    /// Append a loose custom card
    AddCustomCard(Card),
    /// Replace the loose custom card with the same ID
    UpdateCustomCard(Card),
    /// Remove a loose custom card
    RemoveCustomCard(CardId),
    /// Create an empty custom category, replacing a custom one of the same name
    CreateCustomCategory(CategoryRecord),
    /// Rename and/or restyle a custom category, keeping its cards
    UpdateCustomCategory {
        /// Current name of the category
        old_name: String,
        /// New metadata, possibly under a new name
        category: CategoryRecord,
    },
    /// Delete a custom category and its cards
    DeleteCustomCategory(String),
    /// Append a card to a custom category
    AddCardToCategory {
        /// Target category
        category_name: String,
        /// The card to append
        card: Card,
    },
    /// Replace a card inside a custom category, keeping its position
    UpdateCardInCategory {
        /// Target category
        category_name: String,
        /// The replacement, matched by ID
        card: Card,
    },
    /// Remove a card from a custom category
    RemoveCardFromCategory {
        /// Target category
        category_name: String,
        /// ID of the card to remove
        card_id: CardId,
    },
    /// Mark the admin as authenticated; credentials are checked by the caller
    AdminLogin,
    /// Clear the admin authentication flag
    AdminLogout,
    /// Fold the current scores into the lifetime statistics
    FinishGame,
    /// Return to a fresh session, keeping settings, custom content and login
    ResetGame,
    /// Restore the persisted subset of the state
    LoadSavedData(Snapshot),
}

/// Reasons an intent is rejected
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A custom category may not share its name with a built-in one
    #[error("\"{0}\" is a built-in category")]
    BuiltInCategory(String),
    /// Renaming would overwrite another custom category
    #[error("category \"{0}\" already exists")]
    CategoryExists(String),
    /// No custom category has this name
    #[error("category \"{0}\" does not exist")]
    UnknownCategory(String),
    /// No card has this ID
    #[error("card {0} does not exist")]
    UnknownCard(CardId),
    /// The card failed validation
    #[error("invalid card: {0}")]
    InvalidCard(String),
    /// The category metadata failed validation
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    /// The merged settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// The root aggregate for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    teams: Vec<Team>,
    current_team_index: usize,
    selected_categories: Vec<String>,
    game_cards: Vec<Card>,
    current_card: Option<Card>,
    game_started: bool,
    game_settings: GameSettings,
    game_stats: GameStats,
    custom_cards: Vec<Card>,
    custom_categories: CustomCategories,
    admin_settings: AdminSettings,
    is_admin_authenticated: bool,
}

// Accessors
impl GameState {
    /// Teams in turn order
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Index of the team whose turn it is
    pub fn current_team_index(&self) -> usize {
        self.current_team_index
    }

    /// The team whose turn it is
    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.current_team_index)
    }

    /// Selected category names in selection order
    pub fn selected_categories(&self) -> &[String] {
        &self.selected_categories
    }

    /// The shuffled pool drawn at game start
    pub fn game_cards(&self) -> &[Card] {
        &self.game_cards
    }

    /// The card being acted out, `None` when the pool is empty
    pub fn current_card(&self) -> Option<&Card> {
        self.current_card.as_ref()
    }

    /// Whether the game has started
    pub fn game_started(&self) -> bool {
        self.game_started
    }

    /// Derived game phase
    pub fn phase(&self) -> Phase {
        if self.game_started {
            Phase::InProgress
        } else {
            Phase::NotStarted
        }
    }

    /// Per-game settings
    pub fn game_settings(&self) -> &GameSettings {
        &self.game_settings
    }

    /// Lifetime statistics
    pub fn game_stats(&self) -> &GameStats {
        &self.game_stats
    }

    /// Loose custom cards
    pub fn custom_cards(&self) -> &[Card] {
        &self.custom_cards
    }

    /// Custom categories by name
    pub fn custom_categories(&self) -> &CustomCategories {
        &self.custom_categories
    }

    /// Branding, sounds and feature flags
    pub fn admin_settings(&self) -> &AdminSettings {
        &self.admin_settings
    }

    /// Whether the admin console is unlocked
    pub fn is_admin_authenticated(&self) -> bool {
        self.is_admin_authenticated
    }

    /// Built-in and custom categories merged for display
    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        catalog::summaries(&self.custom_categories)
    }

    /// The persisted subset of this state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.game_settings,
            self.custom_cards.clone(),
            self.custom_categories.clone(),
            self.game_stats,
            self.admin_settings.clone(),
        )
    }
}

fn invalid_settings(report: garde::Report) -> Error {
    Error::InvalidSettings(report.to_string())
}

fn check_card(card: &Card) -> Result<(), Error> {
    card.validate()
        .map_err(|report| Error::InvalidCard(report.to_string()))
}

fn check_record(record: &CategoryRecord) -> Result<CategoryRecord, Error> {
    let record = record.normalized();
    record
        .validate()
        .map_err(|report| Error::InvalidCategory(report.to_string()))?;
    if catalog::is_built_in(&record.name) {
        return Err(Error::BuiltInCategory(record.name));
    }
    Ok(record)
}

impl GameState {
    /// Creates a fresh state with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the state that results from applying `intent`
    ///
    /// # Errors
    ///
    /// Returns the reason the intent was rejected; `self` is never modified.
    pub fn reduce(&self, intent: Intent, rng: &mut Rng) -> Result<Self, Error> {
        let mut next = self.clone();
        next.apply(intent, rng)?;
        Ok(next)
    }

    /// Applies `intent` in place
    ///
    /// Every check happens before any field is written, so a rejected intent
    /// leaves the state unchanged.
    ///
    /// # Errors
    ///
    /// Returns the reason the intent was rejected.
    pub fn apply(&mut self, intent: Intent, rng: &mut Rng) -> Result<(), Error> {
        tracing::debug!(?intent, "applying intent");
        match intent {
            Intent::SetTeams(teams) => {
                self.teams = teams;
            }
            Intent::SetCategories(categories) => {
                self.selected_categories = categories;
            }
            Intent::StartGame => self.start_game(rng),
            Intent::NextCard => {
                self.current_card = deck::draw(&self.game_cards, rng).cloned();
            }
            Intent::CorrectGuess => {
                if let Some(team) = self.teams.get_mut(self.current_team_index) {
                    team.score += 1;
                }
            }
            Intent::NextTurn => {
                if !self.teams.is_empty() {
                    self.current_team_index = (self.current_team_index + 1) % self.teams.len();
                }
            }
            Intent::UpdateSettings(patch) => {
                let merged = self.game_settings.merged(&patch);
                merged.validate().map_err(invalid_settings)?;
                self.game_settings = merged;
            }
            Intent::UpdateAdminSettings(patch) => {
                let merged = self.admin_settings.merged(&patch);
                merged.validate().map_err(invalid_settings)?;
                self.admin_settings = merged;
            }
            Intent::AddCustomCard(mut card) => {
                check_card(&card)?;
                if card.category.trim().is_empty() {
                    DEFAULT_CARD_CATEGORY.clone_into(&mut card.category);
                }
                self.custom_cards.push(card);
            }
            Intent::UpdateCustomCard(card) => {
                check_card(&card)?;
                let slot = self
                    .custom_cards
                    .iter_mut()
                    .find(|existing| existing.id == card.id)
                    .ok_or(Error::UnknownCard(card.id))?;
                *slot = card;
            }
            Intent::RemoveCustomCard(id) => {
                let position = self
                    .custom_cards
                    .iter()
                    .position(|card| card.id == id)
                    .ok_or(Error::UnknownCard(id))?;
                self.custom_cards.remove(position);
            }
            Intent::CreateCustomCategory(record) => {
                let record = check_record(&record)?;
                if self.custom_categories.contains_key(&record.name) {
                    tracing::debug!(name = %record.name, "replacing custom category");
                }
                self.custom_categories
                    .insert(record.name.clone(), CustomCategory::from_record(record));
            }
            Intent::UpdateCustomCategory { old_name, category } => {
                self.update_category(&old_name, &category)?;
            }
            Intent::DeleteCustomCategory(name) => {
                self.custom_categories
                    .remove(&name)
                    .ok_or(Error::UnknownCategory(name))?;
            }
            Intent::AddCardToCategory {
                category_name,
                mut card,
            } => {
                check_card(&card)?;
                let category = self.custom_category_mut(&category_name)?;
                card.category.clone_from(&category.name);
                category.cards.push(card);
            }
            Intent::UpdateCardInCategory {
                category_name,
                mut card,
            } => {
                check_card(&card)?;
                let category = self.custom_category_mut(&category_name)?;
                card.category.clone_from(&category.name);
                let slot = category
                    .cards
                    .iter_mut()
                    .find(|existing| existing.id == card.id)
                    .ok_or(Error::UnknownCard(card.id))?;
                *slot = card;
            }
            Intent::RemoveCardFromCategory {
                category_name,
                card_id,
            } => {
                self.custom_category_mut(&category_name)?
                    .cards
                    .retain(|card| card.id != card_id);
            }
            Intent::AdminLogin => {
                tracing::info!("admin logged in");
                self.is_admin_authenticated = true;
            }
            Intent::AdminLogout => {
                tracing::info!("admin logged out");
                self.is_admin_authenticated = false;
            }
            Intent::FinishGame => {
                self.game_stats.record(&self.teams);
                tracing::info!(
                    total_games = self.game_stats.total_games,
                    "game finished"
                );
            }
            Intent::ResetGame => self.reset(),
            Intent::LoadSavedData(snapshot) => self.restore(snapshot),
        }
        Ok(())
    }

    fn start_game(&mut self, rng: &mut Rng) {
        self.game_cards = deck::generate_game_cards(
            &self.selected_categories,
            self.game_settings.difficulty,
            &self.custom_categories,
            rng,
        );
        self.current_card = self.game_cards.first().cloned();
        self.game_started = true;
        tracing::info!(
            teams = self.teams.len(),
            cards = self.game_cards.len(),
            "game started"
        );
    }

    fn custom_category_mut(&mut self, name: &str) -> Result<&mut CustomCategory, Error> {
        self.custom_categories
            .get_mut(name)
            .ok_or_else(|| Error::UnknownCategory(name.to_owned()))
    }

    fn update_category(&mut self, old_name: &str, record: &CategoryRecord) -> Result<(), Error> {
        let record = check_record(record)?;
        if !self.custom_categories.contains_key(old_name) {
            return Err(Error::UnknownCategory(old_name.to_owned()));
        }
        if record.name != old_name && self.custom_categories.contains_key(&record.name) {
            return Err(Error::CategoryExists(record.name));
        }

        let Some(old) = self.custom_categories.remove(old_name) else {
            return Err(Error::UnknownCategory(old_name.to_owned()));
        };
        let mut updated = old.with_record(record);
        for card in &mut updated.cards {
            card.category.clone_from(&updated.name);
        }
        for selected in &mut self.selected_categories {
            if selected == old_name {
                selected.clone_from(&updated.name);
            }
        }
        self.custom_categories.insert(updated.name.clone(), updated);
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self {
            game_settings: self.game_settings,
            game_stats: self.game_stats,
            custom_cards: std::mem::take(&mut self.custom_cards),
            custom_categories: std::mem::take(&mut self.custom_categories),
            admin_settings: std::mem::take(&mut self.admin_settings),
            is_admin_authenticated: self.is_admin_authenticated,
            ..Self::default()
        };
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            game_settings,
            custom_cards,
            custom_categories,
            game_stats,
            admin_settings,
            ..
        } = snapshot;

        match game_settings.validate() {
            Ok(()) => self.game_settings = game_settings,
            Err(report) => tracing::warn!(%report, "ignoring saved game settings"),
        }
        match admin_settings.validate() {
            Ok(()) => self.admin_settings = admin_settings,
            Err(report) => tracing::warn!(%report, "ignoring saved admin settings"),
        }
        self.custom_cards = custom_cards;
        self.custom_categories = custom_categories;
        self.game_stats = game_stats;
    }
}
