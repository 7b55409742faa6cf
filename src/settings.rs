//! Game and admin settings
//!
//! Both settings records are persisted with the snapshot and updated by
//! shallow-merging a patch whose absent fields leave the current value in
//! place. Merged results are validated before they are accepted.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    card::DifficultyFilter,
    constants::{branding, game, teams},
    sound::{SoundEffects, default_sound_effects},
};

type ValidationResult = garde::Result;

/// Validates that a turn length is one of the selectable choices
fn validate_time_limit(val: &u64) -> ValidationResult {
    if game::TIME_LIMIT_CHOICES.contains(val) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "time limit must be one of {:?} seconds",
            game::TIME_LIMIT_CHOICES
        )))
    }
}

/// Settings chosen before a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Length of each turn in seconds
    #[garde(custom(|v, _| validate_time_limit(v)))]
    pub time_limit: u64,
    /// Which cards are drawn
    #[garde(skip)]
    pub difficulty: DifficultyFilter,
    /// Number of turns each team plays
    #[garde(range(min = game::MIN_ROUNDS, max = game::MAX_ROUNDS))]
    pub rounds: u8,
    /// Whether sound effects play
    #[garde(skip)]
    pub sound_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_limit: game::DEFAULT_TIME_LIMIT,
            difficulty: DifficultyFilter::Mixed,
            rounds: game::DEFAULT_ROUNDS,
            sound_enabled: true,
        }
    }
}

impl GameSettings {
    /// Turn length as a duration
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.time_limit)
    }

    /// Returns these settings with every present field of `patch` applied
    pub fn merged(&self, patch: &GameSettingsPatch) -> Self {
        Self {
            time_limit: patch.time_limit.unwrap_or(self.time_limit),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
            rounds: patch.rounds.unwrap_or(self.rounds),
            sound_enabled: patch.sound_enabled.unwrap_or(self.sound_enabled),
        }
    }
}

/// A partial update of [`GameSettings`]
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsPatch {
    /// New turn length in seconds
    pub time_limit: Option<u64>,
    /// New difficulty filter
    pub difficulty: Option<DifficultyFilter>,
    /// New number of rounds
    pub rounds: Option<u8>,
    /// New sound toggle
    pub sound_enabled: Option<bool>,
}

/// Branding, sounds and feature flags controlled from the admin console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    /// Title on the home screen
    #[garde(length(min = 1, max = branding::MAX_TITLE_LENGTH))]
    pub game_title: String,
    /// Subtitle on the home screen
    #[garde(length(max = branding::MAX_TITLE_LENGTH))]
    pub game_subtitle: String,
    /// Description on the home screen
    #[garde(length(max = branding::MAX_DESCRIPTION_LENGTH))]
    pub game_description: String,
    /// Emoji used as the game's icon
    #[garde(skip)]
    pub game_icon: String,
    /// Theme gradient token
    #[garde(skip)]
    pub primary_color: String,
    /// Sound URL per event
    #[garde(skip)]
    pub sound_effects: SoundEffects,
    /// Whether screens animate
    #[garde(skip)]
    pub enable_animations: bool,
    /// Whether per-player statistics are shown
    #[garde(skip)]
    pub show_player_stats: bool,
    /// Whether teams can be added, removed and renamed during setup
    #[garde(skip)]
    pub allow_team_editing: bool,
    /// Maximum number of teams during setup
    #[garde(range(min = teams::MIN_MAX_TEAMS, max = teams::MAX_MAX_TEAMS))]
    pub max_teams: usize,
    /// Maximum number of players per team
    #[garde(range(min = teams::MIN_MAX_PLAYERS_PER_TEAM, max = teams::MAX_MAX_PLAYERS_PER_TEAM))]
    pub max_players_per_team: usize,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            game_title: branding::TITLE.to_owned(),
            game_subtitle: branding::SUBTITLE.to_owned(),
            game_description: branding::DESCRIPTION.to_owned(),
            game_icon: branding::ICON.to_owned(),
            primary_color: branding::PRIMARY_COLOR.to_owned(),
            sound_effects: default_sound_effects(),
            enable_animations: true,
            show_player_stats: true,
            allow_team_editing: true,
            max_teams: teams::DEFAULT_MAX_TEAMS,
            max_players_per_team: teams::DEFAULT_MAX_PLAYERS_PER_TEAM,
        }
    }
}

impl AdminSettings {
    /// Returns these settings with every present field of `patch` applied
    pub fn merged(&self, patch: &AdminSettingsPatch) -> Self {
        let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());
        Self {
            game_title: pick(&patch.game_title, &self.game_title),
            game_subtitle: pick(&patch.game_subtitle, &self.game_subtitle),
            game_description: pick(&patch.game_description, &self.game_description),
            game_icon: pick(&patch.game_icon, &self.game_icon),
            primary_color: pick(&patch.primary_color, &self.primary_color),
            sound_effects: patch
                .sound_effects
                .clone()
                .unwrap_or_else(|| self.sound_effects.clone()),
            enable_animations: patch.enable_animations.unwrap_or(self.enable_animations),
            show_player_stats: patch.show_player_stats.unwrap_or(self.show_player_stats),
            allow_team_editing: patch.allow_team_editing.unwrap_or(self.allow_team_editing),
            max_teams: patch.max_teams.unwrap_or(self.max_teams),
            max_players_per_team: patch
                .max_players_per_team
                .unwrap_or(self.max_players_per_team),
        }
    }
}

/// A partial update of [`AdminSettings`]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettingsPatch {
    /// New title
    pub game_title: Option<String>,
    /// New subtitle
    pub game_subtitle: Option<String>,
    /// New description
    pub game_description: Option<String>,
    /// New icon
    pub game_icon: Option<String>,
    /// New theme gradient
    pub primary_color: Option<String>,
    /// Replacement sound map
    pub sound_effects: Option<SoundEffects>,
    /// New animation toggle
    pub enable_animations: Option<bool>,
    /// New player statistics toggle
    pub show_player_stats: Option<bool>,
    /// New team editing toggle
    pub allow_team_editing: Option<bool>,
    /// New team cap
    pub max_teams: Option<usize>,
    /// New player cap
    pub max_players_per_team: Option<usize>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::sound::SoundEvent;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
        assert!(AdminSettings::default().validate().is_ok());
    }

    #[test]
    fn test_time_limit_must_be_a_choice() {
        for choice in game::TIME_LIMIT_CHOICES {
            let settings = GameSettings {
                time_limit: choice,
                ..GameSettings::default()
            };
            assert!(settings.validate().is_ok());
        }
        let settings = GameSettings {
            time_limit: 45,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rounds_bounds() {
        let mut settings = GameSettings::default();
        settings.rounds = 0;
        assert!(settings.validate().is_err());
        settings.rounds = 10;
        assert!(settings.validate().is_ok());
        settings.rounds = 11;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_game_settings_merge_is_shallow() {
        let patch = GameSettingsPatch {
            rounds: Some(3),
            ..GameSettingsPatch::default()
        };
        let merged = GameSettings::default().merged(&patch);
        assert_eq!(merged.rounds, 3);
        assert_eq!(merged.time_limit, game::DEFAULT_TIME_LIMIT);
        assert!(merged.sound_enabled);
    }

    #[test]
    fn test_game_settings_patch_from_partial_json() {
        let patch: GameSettingsPatch =
            serde_json::from_str(r#"{"timeLimit": 90, "difficulty": "hard"}"#).unwrap();
        let merged = GameSettings::default().merged(&patch);
        assert_eq!(merged.time_limit, 90);
        assert_eq!(merged.difficulty, DifficultyFilter::Hard);
        assert_eq!(merged.rounds, game::DEFAULT_ROUNDS);
    }

    #[test]
    fn test_game_settings_json_field_names() {
        let json = serde_json::to_value(GameSettings::default()).unwrap();
        assert_eq!(json["timeLimit"], 60);
        assert_eq!(json["difficulty"], "mixed");
        assert_eq!(json["soundEnabled"], true);
    }

    #[test]
    fn test_admin_settings_merge() {
        let mut sounds = default_sound_effects();
        sounds[SoundEvent::TimeUp] = "none".to_string();
        let patch = AdminSettingsPatch {
            game_title: Some("Party Night".to_string()),
            sound_effects: Some(sounds.clone()),
            max_teams: Some(4),
            ..AdminSettingsPatch::default()
        };
        let merged = AdminSettings::default().merged(&patch);
        assert_eq!(merged.game_title, "Party Night");
        assert_eq!(merged.game_subtitle, branding::SUBTITLE);
        assert_eq!(merged.sound_effects, sounds);
        assert_eq!(merged.max_teams, 4);
        assert!(merged.enable_animations);
    }

    #[test]
    fn test_admin_caps_bounds() {
        let settings = AdminSettings {
            max_teams: 13,
            ..AdminSettings::default()
        };
        assert!(settings.validate().is_err());
        let settings = AdminSettings {
            max_players_per_team: 0,
            ..AdminSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_turn_duration() {
        assert_eq!(
            GameSettings::default().turn_duration(),
            Duration::from_secs(60)
        );
    }
}
