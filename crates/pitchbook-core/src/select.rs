//! Selection and ordering of records.
//!
//! All functions borrow their input, keep input order unless they sort, and
//! return references into it. Filters are single linear scans.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Attendance, Evaluation, Player, PlayerId, Subscription, Team};
use crate::utils::contains_ignore_case;

/// Records owned by a single player.
pub trait PlayerRecord {
    fn player_id(&self) -> &str;
}

/// Records placed on a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl PlayerRecord for Evaluation {
    fn player_id(&self) -> &str {
        &self.player_id
    }
}

impl PlayerRecord for Attendance {
    fn player_id(&self) -> &str {
        &self.player_id
    }
}

impl PlayerRecord for Subscription {
    fn player_id(&self) -> &str {
        &self.player_id
    }
}

impl Dated for Evaluation {
    fn date(&self) -> NaiveDate {
        self.evaluation_date
    }
}

impl Dated for Attendance {
    fn date(&self) -> NaiveDate {
        self.session_date
    }
}

impl Dated for Subscription {
    fn date(&self) -> NaiveDate {
        self.start_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

pub fn find_player<'a>(players: &'a [Player], player_id: &str) -> Option<&'a Player> {
    players.iter().find(|p| p.id == player_id)
}

pub fn select_by_player<'a, T, I>(records: I, player_id: &str) -> Vec<&'a T>
where
    T: PlayerRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| r.player_id() == player_id)
        .collect()
}

pub fn select_by_team<'a, I>(players: I, team: Team) -> Vec<&'a Player>
where
    I: IntoIterator<Item = &'a Player>,
{
    players.into_iter().filter(|p| p.team == team).collect()
}

/// Keep records dated within `from..=to`; a missing bound is open.
pub fn select_in_date_range<'a, T, I>(
    records: I,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| {
            let date = r.date();
            from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
        })
        .collect()
}

/// Order records by date. Records sharing a date keep their input order in
/// both directions.
pub fn sort_by_date<'a, T, I>(records: I, order: SortOrder) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = records.into_iter().collect();
    // sort_by is stable
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.date().cmp(&b.date())),
        SortOrder::Descending => sorted.sort_by(|a, b| b.date().cmp(&a.date())),
    }
    sorted
}

/// Most recent evaluation for each player. When two share a date the one
/// later in the input wins.
pub fn latest_evaluation_by_player<'a, I>(evaluations: I) -> HashMap<PlayerId, &'a Evaluation>
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    let mut latest: HashMap<PlayerId, &Evaluation> = HashMap::new();
    for evaluation in evaluations {
        match latest.get(&evaluation.player_id) {
            Some(current) if current.evaluation_date > evaluation.evaluation_date => {}
            _ => {
                latest.insert(evaluation.player_id.clone(), evaluation);
            }
        }
    }
    latest
}

/// Distinct teams in the order they first appear.
pub fn teams_present<'a, I>(players: I) -> Vec<Team>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut teams = Vec::new();
    for player in players {
        if !teams.contains(&player.team) {
            teams.push(player.team);
        }
    }
    teams
}

fn player_matches_search(player: &Player, query: &str) -> bool {
    contains_ignore_case(&player.name, query)
        || contains_ignore_case(&player.national_id, query)
        || contains_ignore_case(player.team.as_str(), query)
        || contains_ignore_case(&player.team.to_string(), query)
}

/// Free-text player search over name, national id and team.
pub fn search_players<'a>(players: &'a [Player], query: &str) -> Vec<&'a Player> {
    let query = query.trim();
    players
        .iter()
        .filter(|p| player_matches_search(p, query))
        .collect()
}

/// Name placeholder for records whose player is not on the roster.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Evaluation search by player name, optionally limited to one team.
/// Evaluations of unknown players only survive when no team is requested.
pub fn search_evaluations<'a>(
    evaluations: &'a [Evaluation],
    players: &[Player],
    query: &str,
    team: Option<Team>,
) -> Vec<&'a Evaluation> {
    let query = query.trim();
    evaluations
        .iter()
        .filter(|e| {
            let player = find_player(players, &e.player_id);
            let name = player.map(|p| p.name.as_str()).unwrap_or(UNKNOWN_PLAYER);
            let team_ok = match team {
                Some(t) => player.map(|p| p.team == t).unwrap_or(false),
                None => true,
            };
            team_ok && contains_ignore_case(name, query)
        })
        .collect()
}

/// Subscription search by player name or plan.
pub fn search_subscriptions<'a>(
    subscriptions: &'a [Subscription],
    players: &[Player],
    query: &str,
) -> Vec<&'a Subscription> {
    let query = query.trim();
    subscriptions
        .iter()
        .filter(|s| {
            let name = find_player(players, &s.player_id)
                .map(|p| p.name.as_str())
                .unwrap_or(UNKNOWN_PLAYER);
            contains_ignore_case(name, query)
                || contains_ignore_case(s.plan.as_str(), query)
                || contains_ignore_case(&s.plan.to_string(), query)
        })
        .collect()
}
