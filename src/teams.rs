//! Teams and team setup
//!
//! This module defines the `Team` record scored by the game and the
//! `TeamRoster` used on the setup screen to build the team list before a
//! game starts. The roster enforces the team and player caps configured by
//! the administrator and filters names for inappropriate content.

use std::{fmt::Display, str::FromStr};

use heck::ToTitleCase;
use itertools::Itertools;
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    constants::teams::{MAX_NAME_LENGTH, MIN_TEAMS},
    settings::AdminSettings,
};

/// Theme gradients assigned to teams in creation order
pub const TEAM_COLORS: [&str; 8] = [
    "from-red-400 to-pink-500",
    "from-blue-400 to-purple-500",
    "from-green-400 to-teal-500",
    "from-yellow-400 to-orange-500",
    "from-purple-400 to-indigo-500",
    "from-pink-400 to-red-500",
    "from-indigo-400 to-blue-500",
    "from-teal-400 to-green-500",
];

/// A unique identifier for a team
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new random team ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TeamId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A team taking part in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier of the team
    pub id: TeamId,
    /// Display name
    pub name: String,
    /// Player names in join order
    pub players: Vec<String>,
    /// Cards guessed correctly so far
    pub score: u64,
    /// Theme gradient token
    pub color: String,
}

impl Team {
    /// Creates a scoreless team
    pub fn new(name: impl Into<String>, players: Vec<String>, color: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            players,
            score: 0,
            color: color.into(),
        }
    }
}

/// Errors that can occur while setting up teams
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The team cap has been reached
    #[error("maximum number of teams reached")]
    MaximumTeams,
    /// Removing the team would leave fewer than the minimum
    #[error("at least two teams are required")]
    MinimumTeams,
    /// The player cap of a team has been reached
    #[error("maximum number of players reached")]
    MaximumPlayers,
    /// Fewer than two teams have any players
    #[error("at least two teams need a player")]
    NotEnoughTeams,
    /// No team has the requested ID
    #[error("team does not exist")]
    UnknownTeam,
    /// No player exists at the requested position
    #[error("player does not exist")]
    UnknownPlayer,
    /// Team editing has been disabled by the administrator
    #[error("team editing is disabled")]
    EditingDisabled,
    /// The name is already used by another team
    #[error("name already in-use")]
    Used,
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Trims and checks a team or player name
///
/// # Errors
///
/// * `Error::TooLong` - Name exceeds the maximum length
/// * `Error::Empty` - Name is empty after trimming whitespace
/// * `Error::Sinful` - Name contains inappropriate content
pub fn clean_name(name: &str) -> Result<String, Error> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::TooLong);
    }
    let name = rustrict::trim_whitespace(name);
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

/// The team list being edited on the setup screen
#[derive(Debug, Clone, Serialize)]
pub struct TeamRoster {
    teams: Vec<Team>,
    max_teams: usize,
    max_players_per_team: usize,
    editing_allowed: bool,
    /// Number of teams ever added, used to cycle colors
    created: usize,
}

impl TeamRoster {
    /// Creates the default roster of two teams with one player each
    pub fn new(admin: &AdminSettings) -> Self {
        Self {
            teams: vec![
                Team::new("Team Awesome", vec!["Player 1".to_owned()], TEAM_COLORS[0]),
                Team::new("Team Fantastic", vec!["Player 2".to_owned()], TEAM_COLORS[1]),
            ],
            max_teams: admin.max_teams,
            max_players_per_team: admin.max_players_per_team,
            editing_allowed: admin.allow_team_editing,
            created: 2,
        }
    }

    /// Returns the teams in display order
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Returns whether another team can be added
    pub fn can_add_team(&self) -> bool {
        self.teams.len() < self.max_teams
    }

    /// Returns whether enough teams have players to start
    pub fn can_proceed(&self) -> bool {
        self.playable_count() >= MIN_TEAMS
    }

    fn playable_count(&self) -> usize {
        self.teams
            .iter()
            .filter(|team| !team.players.is_empty())
            .count()
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, Error> {
        self.teams
            .iter_mut()
            .find(|team| team.id == id)
            .ok_or(Error::UnknownTeam)
    }

    fn check_editable(&self) -> Result<(), Error> {
        if self.editing_allowed {
            Ok(())
        } else {
            Err(Error::EditingDisabled)
        }
    }

    fn check_unused(&self, name: &str, except: Option<TeamId>) -> Result<(), Error> {
        if self
            .teams
            .iter()
            .filter(|team| Some(team.id) != except)
            .any(|team| team.name.eq_ignore_ascii_case(name))
        {
            Err(Error::Used)
        } else {
            Ok(())
        }
    }

    /// Suggests an unused team name such as "Team Brave Otter"
    pub fn suggest_team_name(&self) -> String {
        for _ in 0..16 {
            if let Some(name) = petname::petname(2, " ") {
                let name = format!("Team {}", name.to_title_case());
                if self.check_unused(&name, None).is_ok() {
                    return name;
                }
            }
        }
        format!("Team {}", self.created + 1)
    }

    /// Adds an empty team and returns its ID
    ///
    /// # Errors
    ///
    /// Fails when the team cap is reached, editing is disabled, or the name
    /// is rejected by [`clean_name`] or already used.
    pub fn add_team(&mut self, name: &str) -> Result<TeamId, Error> {
        self.check_editable()?;
        if !self.can_add_team() {
            return Err(Error::MaximumTeams);
        }
        let name = clean_name(name)?;
        self.check_unused(&name, None)?;
        let team = Team::new(
            name,
            Vec::new(),
            TEAM_COLORS[self.created % TEAM_COLORS.len()],
        );
        let id = team.id;
        self.teams.push(team);
        self.created += 1;
        Ok(id)
    }

    /// Removes a team while more than the minimum remain
    ///
    /// # Errors
    ///
    /// Fails with `Error::MinimumTeams` when only the minimum remain.
    pub fn remove_team(&mut self, id: TeamId) -> Result<Team, Error> {
        self.check_editable()?;
        if self.teams.len() <= MIN_TEAMS {
            return Err(Error::MinimumTeams);
        }
        let position = self
            .teams
            .iter()
            .position(|team| team.id == id)
            .ok_or(Error::UnknownTeam)?;
        Ok(self.teams.remove(position))
    }

    /// Renames a team
    ///
    /// # Errors
    ///
    /// Fails if the team is unknown or the name is rejected.
    pub fn rename_team(&mut self, id: TeamId, name: &str) -> Result<(), Error> {
        self.check_editable()?;
        let name = clean_name(name)?;
        self.check_unused(&name, Some(id))?;
        self.team_mut(id)?.name = name;
        Ok(())
    }

    /// Appends a player to a team
    ///
    /// # Errors
    ///
    /// Fails if the team is unknown, full, or the name is rejected.
    pub fn add_player(&mut self, id: TeamId, name: &str) -> Result<(), Error> {
        let name = clean_name(name)?;
        let max_players = self.max_players_per_team;
        let team = self.team_mut(id)?;
        if team.players.len() >= max_players {
            return Err(Error::MaximumPlayers);
        }
        team.players.push(name);
        Ok(())
    }

    /// Removes the player at `index` from a team
    ///
    /// # Errors
    ///
    /// Fails if the team or the player position is unknown.
    pub fn remove_player(&mut self, id: TeamId, index: usize) -> Result<String, Error> {
        let team = self.team_mut(id)?;
        if index >= team.players.len() {
            return Err(Error::UnknownPlayer);
        }
        Ok(team.players.remove(index))
    }

    /// Finishes setup, keeping only teams that have at least one player
    ///
    /// # Errors
    ///
    /// Returns `Error::NotEnoughTeams` if fewer than two teams have players.
    pub fn finish(&self) -> Result<Vec<Team>, Error> {
        if !self.can_proceed() {
            return Err(Error::NotEnoughTeams);
        }
        Ok(self
            .teams
            .iter()
            .filter(|team| !team.players.is_empty())
            .cloned()
            .collect_vec())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn roster() -> TeamRoster {
        TeamRoster::new(&AdminSettings::default())
    }

    #[test]
    fn test_default_roster() {
        let roster = roster();
        assert_eq!(roster.teams().len(), 2);
        assert_eq!(roster.teams()[0].name, "Team Awesome");
        assert_eq!(roster.teams()[1].players, vec!["Player 2".to_string()]);
        assert!(roster.can_proceed());
    }

    #[test]
    fn test_add_team_cycles_colors() {
        let mut roster = roster();
        let id = roster.add_team("  Team Three ").unwrap();
        let team = roster.teams().iter().find(|t| t.id == id).unwrap();
        assert_eq!(team.name, "Team Three");
        assert_eq!(team.color, TEAM_COLORS[2]);
        assert!(team.players.is_empty());
        assert_eq!(team.score, 0);
    }

    #[test]
    fn test_add_team_respects_cap() {
        let mut roster = roster();
        for i in 3..=crate::constants::teams::DEFAULT_MAX_TEAMS {
            roster.add_team(&format!("Team {i}")).unwrap();
        }
        assert!(!roster.can_add_team());
        assert_eq!(roster.add_team("One Too Many"), Err(Error::MaximumTeams));
    }

    #[test]
    fn test_add_team_rejects_bad_names() {
        let mut roster = roster();
        assert_eq!(roster.add_team("   "), Err(Error::Empty));
        assert_eq!(
            roster.add_team(&"a".repeat(MAX_NAME_LENGTH + 1)),
            Err(Error::TooLong)
        );
        assert_eq!(roster.add_team("team awesome"), Err(Error::Used));
        assert_eq!(roster.add_team("shit"), Err(Error::Sinful));
    }

    #[test]
    fn test_remove_team_keeps_minimum() {
        let mut roster = roster();
        let first = roster.teams()[0].id;
        assert_eq!(roster.remove_team(first), Err(Error::MinimumTeams));

        let extra = roster.add_team("Extra").unwrap();
        assert!(roster.remove_team(extra).is_ok());
        assert_eq!(roster.teams().len(), 2);
    }

    #[test]
    fn test_players_and_cap() {
        let admin = AdminSettings {
            max_players_per_team: 2,
            ..AdminSettings::default()
        };
        let mut roster = TeamRoster::new(&admin);
        let id = roster.teams()[0].id;
        roster.add_player(id, "Alice").unwrap();
        assert_eq!(roster.add_player(id, "Bob"), Err(Error::MaximumPlayers));
        assert_eq!(roster.remove_player(id, 5), Err(Error::UnknownPlayer));
        assert_eq!(roster.remove_player(id, 0).unwrap(), "Player 1");
        assert_eq!(roster.teams()[0].players, vec!["Alice".to_string()]);
    }

    #[test]
    fn test_finish_drops_empty_teams() {
        let mut roster = roster();
        roster.add_team("Empty Team").unwrap();
        let teams = roster.finish().unwrap();
        assert_eq!(teams.len(), 2);
        assert!(teams.iter().all(|t| !t.players.is_empty()));
    }

    #[test]
    fn test_finish_requires_two_playable_teams() {
        let mut roster = roster();
        let id = roster.teams()[0].id;
        roster.remove_player(id, 0).unwrap();
        assert!(!roster.can_proceed());
        assert_eq!(roster.finish(), Err(Error::NotEnoughTeams));
    }

    #[test]
    fn test_rename_team() {
        let mut roster = roster();
        let id = roster.teams()[0].id;
        roster.rename_team(id, "Renamed").unwrap();
        assert_eq!(roster.teams()[0].name, "Renamed");
        // renaming to its own name in another case is allowed
        roster.rename_team(id, "RENAMED").unwrap();
        let other = roster.teams()[1].id;
        assert_eq!(roster.rename_team(other, "renamed"), Err(Error::Used));
    }

    #[test]
    fn test_editing_disabled() {
        let admin = AdminSettings {
            allow_team_editing: false,
            ..AdminSettings::default()
        };
        let mut roster = TeamRoster::new(&admin);
        assert_eq!(roster.add_team("Nope"), Err(Error::EditingDisabled));
        let id = roster.teams()[0].id;
        assert_eq!(roster.rename_team(id, "Nope"), Err(Error::EditingDisabled));
        // players can still join
        assert!(roster.add_player(id, "Late Arrival").is_ok());
    }

    #[test]
    fn test_suggest_team_name_is_unused() {
        let roster = roster();
        let name = roster.suggest_team_name();
        assert!(name.starts_with("Team "));
        assert!(roster.teams().iter().all(|t| t.name != name));
    }

    #[test]
    fn test_team_serialization() {
        let team = Team::new("A", vec!["p1".to_string()], TEAM_COLORS[0]);
        let json = serde_json::to_string(&team).unwrap();
        let back: Team = serde_json::from_str(&json).unwrap();
        assert_eq!(back, team);
    }
}
