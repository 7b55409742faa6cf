//! Deck generation, shuffling and drawing

use fastrand::Rng;
use itertools::Itertools;

use crate::{
    card::{Card, DifficultyFilter},
    catalog::{self, CustomCategories},
};

/// Shuffles a slice in place with a uniform Fisher–Yates permutation
///
/// Walks from the last index down to 1, swapping each element with one
/// chosen uniformly from `[0, i]`.
pub fn shuffle<T>(items: &mut [T], rng: &mut Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.usize(..=i);
        items.swap(i, j);
    }
}

/// Builds the shuffled card pool for a game session
///
/// Each selected category is resolved against the built-in table first and
/// the custom categories second; unknown names contribute nothing. Cards are
/// filtered by difficulty, concatenated in selection order and shuffled.
///
/// An empty result is a valid outcome and not an error.
pub fn generate_game_cards(
    categories: &[String],
    difficulty: DifficultyFilter,
    custom: &CustomCategories,
    rng: &mut Rng,
) -> Vec<Card> {
    let mut cards = categories
        .iter()
        .filter_map(|name| catalog::resolve(name, custom))
        .flatten()
        .filter(|card| difficulty.admits(card.difficulty))
        .cloned()
        .collect_vec();
    shuffle(&mut cards, rng);
    cards
}

/// Draws a uniformly random card from the pool
///
/// The pool is not consumed, so the same card can come up again before
/// every card has been seen.
pub fn draw<'a>(pool: &'a [Card], rng: &mut Rng) -> Option<&'a Card> {
    if pool.is_empty() {
        None
    } else {
        pool.get(rng.usize(..pool.len()))
    }
}
