//! # Charades Game Library
//!
//! This library provides the core logic of a team charades party game:
//! built-in and custom card categories, shuffled card pools, team turns and
//! scoring, the per-turn countdown, persisted settings and statistics, and
//! the admin console's settings and sound effects.
//!
//! Rendering, routing and audio playback are left to the embedding
//! application, which drives the game through a [`store::Store`] and a
//! [`gameplay::GamePlay`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod admin;
pub mod card;
pub mod catalog;
pub mod deck;
pub mod game;
pub mod gameplay;
pub mod leaderboard;
pub mod persistence;
pub mod settings;
pub mod sound;
pub mod store;
pub mod teams;
pub mod timer;

/// Alarm messages for timed events
///
/// The host delivers each scheduled alarm back after the requested delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// A tick of the turn countdown
    Countdown(timer::AlarmMessage),
}
