use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Repository, StoreError, StoreResult};
use crate::models::{
    Attendance, AttendanceKey, Evaluation, Player, RosterEntry, Subscription, Team,
};
use crate::validate::{validate_player, validate_scores, validate_subscription};

/// Demo academy bundled with the binary.
const SAMPLE_DATA: &str = include_str!("../../data/sample_data.json");

#[derive(Debug, Default, Deserialize)]
struct FixtureData {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    evaluations: Vec<Evaluation>,
    #[serde(default)]
    attendance: Vec<Attendance>,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

#[derive(Debug, Default)]
struct FixtureState {
    players: Vec<Player>,
    evaluations: Vec<Evaluation>,
    attendance: BTreeMap<AttendanceKey, Attendance>,
    subscriptions: Vec<Subscription>,
}

impl FixtureState {
    fn player(&self, player_id: &str) -> StoreResult<&Player> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| StoreError::UnknownPlayer(player_id.to_string()))
    }
}

/// Next free id of the form `{prefix}{n}`, one past the highest in use.
fn next_id<'a>(prefix: &str, ids: impl Iterator<Item = &'a str>) -> String {
    let highest = ids
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", prefix, highest + 1)
}

/// In-memory store, seeded from JSON. Used for demos and tests.
#[derive(Debug, Default)]
pub struct FixtureRepository {
    state: RwLock<FixtureState>,
}

impl FixtureRepository {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seed from records. Duplicate player ids are rejected; attendance for
    /// a repeated player and date keeps the last record.
    pub fn new(
        players: Vec<Player>,
        evaluations: Vec<Evaluation>,
        attendance: Vec<Attendance>,
        subscriptions: Vec<Subscription>,
    ) -> StoreResult<Self> {
        let mut seen: Vec<&str> = Vec::with_capacity(players.len());
        for player in &players {
            if seen.contains(&player.id.as_str()) {
                return Err(StoreError::DuplicatePlayer(player.id.clone()));
            }
            seen.push(&player.id);
        }

        let attendance = attendance.into_iter().map(|a| (a.key(), a)).collect();

        Ok(Self {
            state: RwLock::new(FixtureState {
                players,
                evaluations,
                attendance,
                subscriptions,
            }),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: FixtureData = serde_json::from_str(json).context("Failed to parse fixture data")?;
        Ok(Self::new(
            data.players,
            data.evaluations,
            data.attendance,
            data.subscriptions,
        )?)
    }

    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_DATA).context("Failed to load built-in sample data")
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[async_trait]
impl Repository for FixtureRepository {
    async fn fetch_players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.state.read().await.players.clone())
    }

    async fn fetch_evaluations(&self) -> StoreResult<Vec<Evaluation>> {
        Ok(self.state.read().await.evaluations.clone())
    }

    async fn fetch_attendance(&self) -> StoreResult<Vec<Attendance>> {
        Ok(self.state.read().await.attendance.values().cloned().collect())
    }

    async fn fetch_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
        Ok(self.state.read().await.subscriptions.clone())
    }

    async fn add_player(&self, mut player: Player) -> StoreResult<Player> {
        validate_player(&player, today())?;
        let mut state = self.state.write().await;
        if player.id.is_empty() {
            player.id = next_id("p", state.players.iter().map(|p| p.id.as_str()));
        } else if state.players.iter().any(|p| p.id == player.id) {
            return Err(StoreError::DuplicatePlayer(player.id));
        }
        debug!(player_id = %player.id, "Adding player");
        state.players.push(player.clone());
        Ok(player)
    }

    async fn update_player(&self, player: Player) -> StoreResult<Player> {
        validate_player(&player, today())?;
        let mut state = self.state.write().await;
        let slot = state
            .players
            .iter_mut()
            .find(|p| p.id == player.id)
            .ok_or_else(|| StoreError::UnknownPlayer(player.id.clone()))?;
        *slot = player.clone();
        Ok(player)
    }

    async fn add_evaluation(&self, mut evaluation: Evaluation) -> StoreResult<Evaluation> {
        validate_scores(evaluation.scores())?;
        let mut state = self.state.write().await;
        state.player(&evaluation.player_id)?;
        if evaluation.id.is_empty() {
            evaluation.id = next_id("e", state.evaluations.iter().map(|e| e.id.as_str()));
        } else if state.evaluations.iter().any(|e| e.id == evaluation.id) {
            return Err(StoreError::DuplicateRecord(evaluation.id));
        }
        state.evaluations.push(evaluation.clone());
        Ok(evaluation)
    }

    async fn record_attendance(
        &self,
        team: Team,
        session_date: NaiveDate,
        entries: Vec<RosterEntry>,
    ) -> StoreResult<Vec<Attendance>> {
        let mut state = self.state.write().await;
        // Check the whole roster before touching anything
        for entry in &entries {
            let player = state.player(&entry.player_id)?;
            if player.team != team {
                return Err(StoreError::NotOnTeam {
                    player_id: entry.player_id.clone(),
                    team,
                });
            }
        }

        let records: Vec<Attendance> = entries
            .into_iter()
            .map(|e| e.into_attendance(session_date))
            .collect();
        for record in &records {
            state.attendance.insert(record.key(), record.clone());
        }
        debug!(team = %team, date = %session_date, count = records.len(), "Recorded attendance");
        Ok(records)
    }

    async fn add_subscription(&self, mut subscription: Subscription) -> StoreResult<Subscription> {
        validate_subscription(&subscription)?;
        let mut state = self.state.write().await;
        state.player(&subscription.player_id)?;
        if subscription.id.is_empty() {
            subscription.id = next_id("s", state.subscriptions.iter().map(|s| s.id.as_str()));
        } else if state.subscriptions.iter().any(|s| s.id == subscription.id) {
            return Err(StoreError::DuplicateRecord(subscription.id));
        }
        state.subscriptions.push(subscription.clone());
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, Plan, Position, SkillScores};
    use crate::validate::ValidationError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn player(id: &str, team: Team) -> Player {
        Player {
            id: id.to_string(),
            name: "Saeed Jafari".to_string(),
            national_id: "0012345678".to_string(),
            birth_date: date(2011, 2, 20),
            team,
            position: Position::Defender,
            phone: "09121234567".to_string(),
            height: None,
            weight: None,
            email: None,
            strong_foot: None,
        }
    }

    fn repo() -> FixtureRepository {
        FixtureRepository::new(
            vec![
                player("p1", Team::Juniors),
                player("p2", Team::Juniors),
                player("p3", Team::Adults),
            ],
            vec![],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_data_loads() {
        let repo = FixtureRepository::sample().unwrap();
        let state = repo.state.try_read().unwrap();
        assert_eq!(state.players.len(), 16);
        assert_eq!(state.evaluations.len(), 12);
        assert_eq!(state.attendance.len(), 64);
        assert_eq!(state.subscriptions.len(), 6);
        assert_eq!(state.players[0].name, "Ali Mohammadi");
        assert_eq!(state.evaluations[0].overall(), 7.3);
    }

    #[test]
    fn test_new_rejects_duplicate_player_ids() {
        let result = FixtureRepository::new(
            vec![player("p1", Team::Youth), player("p1", Team::Adults)],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(StoreError::DuplicatePlayer(id)) if id == "p1"));
    }

    #[tokio::test]
    async fn test_add_player_duplicate_and_generated_id() {
        let repo = repo();
        let err = repo.add_player(player("p2", Team::Youth)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePlayer(_)));

        let added = repo.add_player(player("", Team::Youth)).await.unwrap();
        assert_eq!(added.id, "p4");
        assert_eq!(repo.fetch_players().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_add_player_validates() {
        let repo = repo();
        let mut bad = player("p9", Team::Youth);
        bad.phone = "123".to_string();
        let err = repo.add_player(bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ValidationError::InvalidPhone)));
    }

    #[tokio::test]
    async fn test_update_player_replaces_record() {
        let repo = repo();
        let mut moved = player("p1", Team::Youth);
        moved.height = Some(171);
        repo.update_player(moved).await.unwrap();

        let players = repo.fetch_players().await.unwrap();
        assert_eq!(players[0].team, Team::Youth);
        assert_eq!(players[0].height, Some(171));

        let err = repo.update_player(player("p42", Team::Youth)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownPlayer(_)));
    }

    #[tokio::test]
    async fn test_add_evaluation_checks_player_and_scores() {
        let repo = repo();
        let scores = SkillScores::from_array([7; 10]);
        let evaluation = Evaluation::new("", "p1", scores, date(2024, 5, 1), None);
        let added = repo.add_evaluation(evaluation).await.unwrap();
        assert_eq!(added.id, "e1");

        let orphan = Evaluation::new("", "p99", scores, date(2024, 5, 1), None);
        assert!(matches!(
            repo.add_evaluation(orphan).await,
            Err(StoreError::UnknownPlayer(_))
        ));

        let mut bad_scores = scores;
        bad_scores.aerial = 12;
        let bad = Evaluation::new("", "p1", bad_scores, date(2024, 5, 1), None);
        assert!(matches!(
            repo.add_evaluation(bad).await,
            Err(StoreError::Invalid(ValidationError::ScoreOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_record_attendance_replaces_same_session() {
        let repo = repo();
        let session = date(2024, 3, 2);
        repo.record_attendance(
            Team::Juniors,
            session,
            vec![RosterEntry::present("p1"), RosterEntry::present("p2")],
        )
        .await
        .unwrap();

        let late = RosterEntry {
            player_id: "p1".to_string(),
            status: AttendanceStatus::Late,
            notes: Some("Bus delay".to_string()),
        };
        repo.record_attendance(Team::Juniors, session, vec![late])
            .await
            .unwrap();

        let records = repo.fetch_attendance().await.unwrap();
        assert_eq!(records.len(), 2);
        let p1: Vec<&Attendance> = records.iter().filter(|a| a.player_id == "p1").collect();
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].status, AttendanceStatus::Late);
        assert_eq!(p1[0].notes.as_deref(), Some("Bus delay"));
    }

    #[tokio::test]
    async fn test_record_attendance_rejects_other_team_atomically() {
        let repo = repo();
        let err = repo
            .record_attendance(
                Team::Juniors,
                date(2024, 3, 2),
                vec![RosterEntry::present("p1"), RosterEntry::present("p3")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotOnTeam { team: Team::Juniors, .. }));
        assert!(repo.fetch_attendance().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_subscription() {
        let repo = repo();
        let sub = Subscription::new("", "p3", Plan::SemiAnnual, 9_000_000, 9_000_000, date(2024, 8, 31));
        let added = repo.add_subscription(sub).await.unwrap();
        assert_eq!(added.id, "s1");
        assert_eq!(added.end_date(), date(2025, 2, 28));

        let free = Subscription::new("", "p3", Plan::Monthly, 0, 0, date(2024, 8, 31));
        assert!(matches!(
            repo.add_subscription(free).await,
            Err(StoreError::Invalid(ValidationError::MissingAmount))
        ));
    }

    #[test]
    fn test_next_id_skips_foreign_ids() {
        let ids = ["p1", "p12", "x7", "p3"];
        assert_eq!(next_id("p", ids.iter().copied()), "p13");
        assert_eq!(next_id("e", std::iter::empty()), "e1");
    }
}
