//! Final standings
//!
//! Orders the teams by score once the game is over and produces the text
//! players can share.

use itertools::Itertools;
use serde::Serialize;

use crate::teams::{Team, TeamId};

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based place in the standings
    pub position: usize,
    /// Team this row belongs to
    pub id: TeamId,
    /// Team name
    pub name: String,
    /// Final score
    pub score: u64,
    /// Team color tag
    pub color: String,
}

/// Teams by descending score
///
/// Teams with equal scores keep their turn order.
pub fn standings(teams: &[Team]) -> Vec<Standing> {
    teams
        .iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .enumerate()
        .map(|(index, team)| Standing {
            position: index + 1,
            id: team.id,
            name: team.name.clone(),
            score: team.score,
            color: team.color.clone(),
        })
        .collect_vec()
}

/// Every team sharing the highest score
pub fn winners(teams: &[Team]) -> Vec<&Team> {
    let Some(best) = teams.iter().map(|team| team.score).max() else {
        return Vec::new();
    };
    teams.iter().filter(|team| team.score == best).collect_vec()
}

fn points(score: u64) -> String {
    pluralizer::pluralize("point", isize::try_from(score).unwrap_or(isize::MAX), true)
}

/// Text summarizing the result, headed by the game's icon and title
pub fn share_text(icon: &str, title: &str, teams: &[Team]) -> String {
    let lines = standings(teams)
        .iter()
        .map(|standing| {
            let trophy = if standing.position == 1 { " 🏆" } else { "" };
            format!(
                "{}. {}: {}{trophy}",
                standing.position,
                standing.name,
                points(standing.score)
            )
        })
        .join("\n");
    format!("{icon} {title} Results!\n\n{lines}\n\nWhat a fun game! 🎉")
}
