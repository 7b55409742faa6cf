//! Cards and their difficulty
//!
//! A card is a single word or phrase that a player acts out while their
//! team guesses. Built-in cards come from the static catalog, custom cards
//! are created by players and administrators.

use std::{fmt::Display, str::FromStr};

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::{SerializeDisplay, skip_serializing_none};
use uuid::Uuid;

/// A unique identifier for a card
///
/// Saved data from before versioning used millisecond timestamps as card
/// IDs; those are read as stable name-based UUIDs.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, SerializeDisplay,
)]
#[serde(try_from = "StoredCardId")]
pub struct CardId(Uuid);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCardId {
    Uuid(String),
    Timestamp(u64),
}

impl TryFrom<StoredCardId> for CardId {
    type Error = uuid::Error;

    fn try_from(stored: StoredCardId) -> Result<Self, Self::Error> {
        match stored {
            StoredCardId::Uuid(s) => s.parse(),
            StoredCardId::Timestamp(millis) => Ok(Self::from_name(&format!("card/{millis}"))),
        }
    }
}

impl CardId {
    /// Creates a new random card ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a card ID deterministically from a name, used for built-in cards
    /// so that their identity is stable across runs
    pub(crate) fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// How hard a card is to act out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Simple, everyday words
    Easy,
    /// The default for newly created cards
    #[default]
    Medium,
    /// Abstract or multi-word phrases
    Hard,
}

/// Which cards to include when drawing a game deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    /// Only easy cards
    Easy,
    /// Only medium cards
    Medium,
    /// Only hard cards
    Hard,
    /// Every card regardless of difficulty
    #[default]
    Mixed,
}

impl DifficultyFilter {
    /// Returns whether a card of the given difficulty passes this filter
    pub fn admits(self, difficulty: Difficulty) -> bool {
        match self {
            Self::Mixed => true,
            Self::Easy => difficulty == Difficulty::Easy,
            Self::Medium => difficulty == Difficulty::Medium,
            Self::Hard => difficulty == Difficulty::Hard,
        }
    }
}

/// A single prompt to act out
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Card {
    /// Unique identifier of the card
    #[garde(skip)]
    pub id: CardId,
    /// The word or phrase to act out
    #[garde(length(min = 1, max = crate::constants::cards::MAX_TEXT_LENGTH), custom(not_blank))]
    pub text: String,
    /// How hard the card is
    #[garde(skip)]
    pub difficulty: Difficulty,
    /// Optional clue shown on request
    #[garde(length(max = crate::constants::cards::MAX_HINT_LENGTH))]
    pub hint: Option<String>,
    /// Free-text category label
    #[garde(skip)]
    #[serde(default)]
    pub category: String,
}

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("cannot be blank"))
    } else {
        Ok(())
    }
}

impl Card {
    /// Creates a new card with a fresh ID
    ///
    /// Text and hint are trimmed; an empty hint becomes `None`.
    pub fn new(
        text: &str,
        difficulty: Difficulty,
        hint: Option<&str>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: CardId::new(),
            text: text.trim().to_owned(),
            difficulty,
            hint: hint
                .map(str::trim)
                .filter(|hint| !hint.is_empty())
                .map(ToOwned::to_owned),
            category: category.into(),
        }
    }
}
