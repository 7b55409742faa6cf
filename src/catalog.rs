//! Built-in and custom card categories
//!
//! The built-in table is static data shipped with the game. Custom
//! categories are created at runtime and persisted with the snapshot.
//! This module merges both into one view for category selection and
//! resolves a category name to its card list when a deck is drawn.

use std::collections::BTreeMap;

use garde::Validate;
use itertools::Itertools;
use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, CardId, Difficulty},
    constants::cards::{
        DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_DESCRIPTION, DEFAULT_CATEGORY_ICON,
        MAX_CATEGORY_NAME_LENGTH,
    },
};

/// Custom categories keyed by their name
pub type CustomCategories = BTreeMap<String, CustomCategory>;

/// A category that ships with the game
#[derive(Debug, Clone)]
pub struct BuiltInCategory {
    /// Unique category name
    pub name: &'static str,
    /// Emoji shown next to the name
    pub icon: &'static str,
    /// Short description
    pub description: &'static str,
    /// Theme gradient token
    pub color: &'static str,
    /// The fixed card list
    pub cards: Vec<Card>,
}

type RawCategory = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, Difficulty, &'static str)],
);

const BUILT_IN_DATA: &[RawCategory] = &[
    (
        "Actions",
        "🏃",
        "Everyday activities and movements",
        "from-green-400 to-teal-500",
        &[
            ("Jumping rope", Difficulty::Easy, "A playground classic"),
            ("Brushing teeth", Difficulty::Medium, "Twice a day"),
            ("Riding a unicycle", Difficulty::Hard, "One wheel only"),
        ],
    ),
    (
        "Movies",
        "🎬",
        "Blockbusters and classics",
        "from-red-400 to-pink-500",
        &[
            ("Titanic", Difficulty::Easy, "An iceberg ends the voyage"),
            ("Jaws", Difficulty::Easy, "You'll need a bigger boat"),
            ("The Lion King", Difficulty::Medium, "Circle of life"),
            ("Back to the Future", Difficulty::Medium, "88 miles per hour"),
            ("Inception", Difficulty::Hard, "A dream within a dream"),
            ("The Matrix", Difficulty::Hard, "Red pill or blue pill"),
        ],
    ),
    (
        "Animals",
        "🐘",
        "Creatures great and small",
        "from-yellow-400 to-orange-500",
        &[
            ("Elephant", Difficulty::Easy, "Never forgets"),
            ("Kangaroo", Difficulty::Easy, "Carries a pouch"),
            ("Penguin", Difficulty::Medium, "Waddles on ice"),
            ("Octopus", Difficulty::Medium, "Eight arms"),
            ("Chameleon", Difficulty::Hard, "Changes color"),
            ("Platypus", Difficulty::Hard, "Duck bill, lays eggs"),
        ],
    ),
    (
        "Sports",
        "⚽",
        "Games, athletes and competitions",
        "from-blue-400 to-purple-500",
        &[
            ("Swimming", Difficulty::Easy, "Pool or sea"),
            ("Basketball", Difficulty::Easy, "Shoot some hoops"),
            ("Fencing", Difficulty::Medium, "En garde"),
            ("Curling", Difficulty::Hard, "Sweeping the ice"),
            ("Pole vault", Difficulty::Hard, "Up and over the bar"),
        ],
    ),
    (
        "Professions",
        "👩‍🚒",
        "Jobs and the people who do them",
        "from-purple-400 to-indigo-500",
        &[
            ("Firefighter", Difficulty::Easy, "Puts out fires"),
            ("Chef", Difficulty::Easy, "Runs the kitchen"),
            ("Dentist", Difficulty::Medium, "Open wide"),
            ("Lighthouse keeper", Difficulty::Hard, "Guides ships at night"),
            ("Air traffic controller", Difficulty::Hard, "Cleared for landing"),
        ],
    ),
];

static BUILT_IN: OnceCell<Vec<BuiltInCategory>> = OnceCell::new();

/// Returns the built-in categories in display order
pub fn built_in() -> &'static [BuiltInCategory] {
    BUILT_IN.get_or_init(|| {
        BUILT_IN_DATA
            .iter()
            .map(|&(name, icon, description, color, cards)| BuiltInCategory {
                name,
                icon,
                description,
                color,
                cards: cards
                    .iter()
                    .map(|&(text, difficulty, hint)| Card {
                        id: CardId::from_name(&format!("{name}/{text}")),
                        text: text.to_owned(),
                        difficulty,
                        hint: Some(hint.to_owned()),
                        category: name.to_owned(),
                    })
                    .collect_vec(),
            })
            .collect_vec()
    })
}

/// Looks up a built-in category by its exact name
pub fn built_in_category(name: &str) -> Option<&'static BuiltInCategory> {
    built_in().iter().find(|category| category.name == name)
}

/// Returns whether `name` collides with a built-in category
///
/// The comparison ignores case and surrounding whitespace so that a custom
/// category cannot shadow a built-in one by changing capitalization.
pub fn is_built_in(name: &str) -> bool {
    let name = name.trim();
    built_in()
        .iter()
        .any(|category| category.name.eq_ignore_ascii_case(name))
}

/// The editable metadata of a custom category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryRecord {
    /// Unique category name
    #[garde(length(min = 1, max = MAX_CATEGORY_NAME_LENGTH))]
    pub name: String,
    /// Short description
    #[garde(skip)]
    pub description: String,
    /// Emoji shown next to the name
    #[garde(skip)]
    pub icon: String,
    /// Theme gradient token
    #[garde(skip)]
    pub color: String,
}

impl CategoryRecord {
    /// Creates a record, falling back to default metadata where fields are empty
    pub fn new(name: &str, description: &str, icon: &str, color: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            description: non_empty_or(description, DEFAULT_CATEGORY_DESCRIPTION),
            icon: non_empty_or(icon, DEFAULT_CATEGORY_ICON),
            color: non_empty_or(color, DEFAULT_CATEGORY_COLOR),
        }
    }

    /// Returns a copy with names trimmed and empty metadata replaced by defaults
    pub fn normalized(&self) -> Self {
        Self::new(&self.name, &self.description, &self.icon, &self.color)
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_owned()
    } else {
        value.to_owned()
    }
}

/// A user-defined category and its cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCategory {
    /// Unique category name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Emoji shown next to the name
    #[serde(default)]
    pub icon: String,
    /// Theme gradient token
    #[serde(default)]
    pub color: String,
    /// Cards in insertion order
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl CustomCategory {
    /// Creates an empty category from a record
    pub fn from_record(record: CategoryRecord) -> Self {
        let CategoryRecord {
            name,
            description,
            icon,
            color,
        } = record;
        Self {
            name,
            description,
            icon,
            color,
            cards: Vec::new(),
        }
    }

    /// Replaces the metadata with a record, keeping the cards
    pub fn with_record(self, record: CategoryRecord) -> Self {
        Self {
            cards: self.cards,
            ..Self::from_record(record)
        }
    }
}

/// One entry of the merged category view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Category name
    pub name: String,
    /// Number of cards the category holds
    pub card_count: usize,
    /// Emoji shown next to the name
    pub icon: String,
    /// Short description
    pub description: String,
    /// Theme gradient token
    pub color: String,
    /// Whether the category was user-defined
    pub custom: bool,
}

/// Produces the unified category view, built-ins first, then custom categories
pub fn summaries(custom: &CustomCategories) -> Vec<CategorySummary> {
    let built_in = built_in().iter().map(|category| CategorySummary {
        name: category.name.to_owned(),
        card_count: category.cards.len(),
        icon: category.icon.to_owned(),
        description: category.description.to_owned(),
        color: category.color.to_owned(),
        custom: false,
    });
    let custom = custom.values().map(|category| CategorySummary {
        name: category.name.clone(),
        card_count: category.cards.len(),
        icon: non_empty_or(&category.icon, DEFAULT_CATEGORY_ICON),
        description: category.description.clone(),
        color: non_empty_or(&category.color, DEFAULT_CATEGORY_COLOR),
        custom: true,
    });
    built_in.chain(custom).collect_vec()
}

/// Resolves a category name to its cards, preferring the built-in table
pub fn resolve<'a>(name: &str, custom: &'a CustomCategories) -> Option<&'a [Card]> {
    built_in_category(name)
        .map(|category| category.cards.as_slice())
        .or_else(|| custom.get(name).map(|category| category.cards.as_slice()))
}

/// Total number of cards across the selected categories, before filtering
pub fn total_cards(selected: &[String], custom: &CustomCategories) -> usize {
    selected
        .iter()
        .filter_map(|name| resolve(name, custom))
        .map(<[Card]>::len)
        .sum()
}
