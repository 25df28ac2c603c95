use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::info;

use super::{Repository, StoreError, StoreResult};
use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Attendance, Evaluation, Player, RosterEntry, Subscription, Team};
use crate::validate::{validate_player, validate_scores, validate_subscription};

/// Repository backed by the hosted database.
pub struct RemoteRepository {
    client: ApiClient,
}

impl RemoteRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config
            .api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| anyhow!("No API URL configured; set PITCHBOOK_API_URL or api_url in the config file"))?;
        let key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("No API key configured; set PITCHBOOK_API_KEY"))?;
        Ok(Self::new(ApiClient::new(url, key)?))
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    async fn require_player(&self, player_id: &str) -> StoreResult<Player> {
        self.client
            .fetch_players()
            .await?
            .into_iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| StoreError::UnknownPlayer(player_id.to_string()))
    }
}

#[async_trait]
impl Repository for RemoteRepository {
    async fn fetch_players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.client.fetch_players().await?)
    }

    async fn fetch_evaluations(&self) -> StoreResult<Vec<Evaluation>> {
        Ok(self.client.fetch_evaluations().await?)
    }

    async fn fetch_attendance(&self) -> StoreResult<Vec<Attendance>> {
        Ok(self.client.fetch_attendance().await?)
    }

    async fn fetch_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
        Ok(self.client.fetch_subscriptions().await?)
    }

    async fn add_player(&self, player: Player) -> StoreResult<Player> {
        validate_player(&player, Local::now().date_naive())?;
        if !player.id.is_empty()
            && self
                .client
                .fetch_players()
                .await?
                .iter()
                .any(|p| p.id == player.id)
        {
            return Err(StoreError::DuplicatePlayer(player.id));
        }
        let added = self.client.insert_player(&player).await?;
        info!(player_id = %added.id, "Player added");
        Ok(added)
    }

    async fn update_player(&self, player: Player) -> StoreResult<Player> {
        validate_player(&player, Local::now().date_naive())?;
        self.require_player(&player.id).await?;
        Ok(self.client.update_player(&player).await?)
    }

    async fn add_evaluation(&self, evaluation: Evaluation) -> StoreResult<Evaluation> {
        validate_scores(evaluation.scores())?;
        self.require_player(&evaluation.player_id).await?;
        Ok(self.client.insert_evaluation(&evaluation).await?)
    }

    async fn record_attendance(
        &self,
        team: Team,
        session_date: NaiveDate,
        entries: Vec<RosterEntry>,
    ) -> StoreResult<Vec<Attendance>> {
        let players = self.client.fetch_players().await?;
        for entry in &entries {
            match players.iter().find(|p| p.id == entry.player_id) {
                None => return Err(StoreError::UnknownPlayer(entry.player_id.clone())),
                Some(p) if p.team != team => {
                    return Err(StoreError::NotOnTeam {
                        player_id: entry.player_id.clone(),
                        team,
                    })
                }
                Some(_) => {}
            }
        }

        let records: Vec<Attendance> = entries
            .into_iter()
            .map(|e| e.into_attendance(session_date))
            .collect();
        if records.is_empty() {
            return Ok(records);
        }
        let saved = self.client.upsert_attendance(&records).await?;
        info!(team = %team, date = %session_date, count = saved.len(), "Attendance recorded");
        Ok(saved)
    }

    async fn add_subscription(&self, subscription: Subscription) -> StoreResult<Subscription> {
        validate_subscription(&subscription)?;
        self.require_player(&subscription.player_id).await?;
        Ok(self.client.insert_subscription(&subscription).await?)
    }
}
