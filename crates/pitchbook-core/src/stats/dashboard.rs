use serde::Serialize;

use crate::models::{Player, PlayerId, Team};

/// How many of the latest-registered players the overview lists.
pub const RECENT_PLAYERS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TeamCount {
    pub team: Team,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecentPlayer {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
}

/// Academy-wide counts shown on the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardSummary {
    pub total_players: usize,
    pub total_evaluations: usize,
    pub total_attendance: usize,
    /// Teams in the order they first appear in the player list
    pub players_per_team: Vec<TeamCount>,
    pub largest_team: Option<Team>,
    pub recent_players: Vec<RecentPlayer>,
}

/// Build the overview from the player list and the other collections' sizes.
///
/// `players` is taken in storage order; the first `RECENT_PLAYERS_LIMIT`
/// entries are reported as recent. Ties for the largest team go to the team
/// seen first.
pub fn build_dashboard_summary(
    players: &[Player],
    total_evaluations: usize,
    total_attendance: usize,
) -> DashboardSummary {
    let mut players_per_team: Vec<TeamCount> = Vec::new();
    for player in players {
        match players_per_team.iter_mut().find(|c| c.team == player.team) {
            Some(entry) => entry.count += 1,
            None => players_per_team.push(TeamCount {
                team: player.team,
                count: 1,
            }),
        }
    }

    let largest_team = players_per_team
        .iter()
        .fold(None::<&TeamCount>, |max, c| match max {
            Some(m) if m.count >= c.count => Some(m),
            _ => Some(c),
        })
        .map(|c| c.team);

    let recent_players = players
        .iter()
        .take(RECENT_PLAYERS_LIMIT)
        .map(|p| RecentPlayer {
            id: p.id.clone(),
            name: p.name.clone(),
            team: p.team,
        })
        .collect();

    DashboardSummary {
        total_players: players.len(),
        total_evaluations,
        total_attendance,
        players_per_team,
        largest_team,
        recent_players,
    }
}
