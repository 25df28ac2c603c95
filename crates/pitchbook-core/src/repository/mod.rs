//! Storage backends for academy records.
//!
//! Every caller goes through the [`Repository`] trait. The backend is picked
//! once at startup by [`Backend::from_config`] and shared as an
//! [`ArcRepository`].

pub mod caching;
pub mod fixture;
pub mod remote;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::cache::CacheManager;
use crate::config::{Config, DataSource};
use crate::models::{Attendance, Evaluation, Player, PlayerId, RosterEntry, Subscription, Team};
use crate::validate::ValidationError;

pub use caching::CachingRepository;
pub use fixture::FixtureRepository;
pub use remote::RemoteRepository;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Player {0} already exists")]
    DuplicatePlayer(PlayerId),

    #[error("Record {0} already exists")]
    DuplicateRecord(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {player_id} is not on the {team} team")]
    NotOnTeam { player_id: PlayerId, team: Team },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Offline - no cached {0} available")]
    Offline(&'static str),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read and write access to the academy's records.
///
/// Writes validate their input and reject records that point at unknown
/// players. Empty ids on new records are assigned by the backend.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn fetch_players(&self) -> StoreResult<Vec<Player>>;
    async fn fetch_evaluations(&self) -> StoreResult<Vec<Evaluation>>;
    async fn fetch_attendance(&self) -> StoreResult<Vec<Attendance>>;
    async fn fetch_subscriptions(&self) -> StoreResult<Vec<Subscription>>;

    async fn add_player(&self, player: Player) -> StoreResult<Player>;
    /// Replace the player with the same id.
    async fn update_player(&self, player: Player) -> StoreResult<Player>;
    async fn add_evaluation(&self, evaluation: Evaluation) -> StoreResult<Evaluation>;
    /// Record one session for a team. A player recorded again for the same
    /// date replaces the earlier record.
    async fn record_attendance(
        &self,
        team: Team,
        session_date: NaiveDate,
        entries: Vec<RosterEntry>,
    ) -> StoreResult<Vec<Attendance>>;
    async fn add_subscription(&self, subscription: Subscription) -> StoreResult<Subscription>;
}

pub type ArcRepository = Arc<dyn Repository>;

/// All four collections, fetched together.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub evaluations: Vec<Evaluation>,
    pub attendance: Vec<Attendance>,
    pub subscriptions: Vec<Subscription>,
}

impl Snapshot {
    pub async fn load(repo: &dyn Repository) -> StoreResult<Self> {
        let (players, evaluations, attendance, subscriptions) = futures::try_join!(
            repo.fetch_players(),
            repo.fetch_evaluations(),
            repo.fetch_attendance(),
            repo.fetch_subscriptions(),
        )?;
        Ok(Self {
            players,
            evaluations,
            attendance,
            subscriptions,
        })
    }
}

pub struct Backend;

impl Backend {
    /// Build the repository named by the config.
    ///
    /// The remote backend is wrapped in the offline cache; with `offline`
    /// set it never touches the network and serves cached data only.
    pub fn from_config(config: &Config, offline: bool) -> Result<ArcRepository> {
        match config.source {
            DataSource::Fixture => {
                info!("Using built-in sample data");
                Ok(Arc::new(FixtureRepository::sample()?))
            }
            DataSource::Remote if offline => {
                info!("Offline mode, serving cached data");
                let cache = CacheManager::new(config.cache_dir()?)?;
                Ok(Arc::new(CachingRepository::<RemoteRepository>::offline(cache)))
            }
            DataSource::Remote => {
                let remote = RemoteRepository::from_config(config)?;
                let cache = CacheManager::new(config.cache_dir()?)?;
                info!(url = remote.base_url(), "Using hosted database");
                Ok(Arc::new(CachingRepository::new(remote, cache)))
            }
        }
    }
}
