use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{Repository, StoreError, StoreResult};
use crate::cache::{CacheManager, CachedData};
use crate::models::{Attendance, Evaluation, Player, RosterEntry, Subscription, Team};

type Save<T> = fn(&CacheManager, &[T]) -> Result<()>;
type Load<T> = fn(&CacheManager) -> Result<Option<CachedData<Vec<T>>>>;

/// Wraps a repository with the offline cache.
///
/// Successful fetches are written to the cache. When a fetch fails the last
/// cached copy is served instead, however old. Without an inner repository
/// every read comes from the cache and every write fails.
pub struct CachingRepository<R> {
    inner: Option<R>,
    cache: CacheManager,
}

impl<R: Repository> CachingRepository<R> {
    pub fn new(inner: R, cache: CacheManager) -> Self {
        Self {
            inner: Some(inner),
            cache,
        }
    }

    pub fn offline(cache: CacheManager) -> Self {
        Self { inner: None, cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    fn online(&self, what: &'static str) -> StoreResult<&R> {
        self.inner.as_ref().ok_or(StoreError::Offline(what))
    }

    /// Store a fresh result, or fall back to the cache when the fetch failed.
    fn settle<T>(
        &self,
        name: &'static str,
        fetched: StoreResult<Vec<T>>,
        save: Save<T>,
        load: Load<T>,
    ) -> StoreResult<Vec<T>> {
        let error = match fetched {
            Ok(data) => {
                if let Err(e) = save(&self.cache, &data) {
                    warn!(cache = name, error = %e, "Failed to update cache");
                }
                return Ok(data);
            }
            Err(error) => error,
        };

        match load(&self.cache) {
            Ok(Some(cached)) => {
                if self.inner.is_some() {
                    warn!(cache = name, error = %error, age = %cached.age_display(), "Fetch failed, using cached data");
                } else {
                    debug!(cache = name, age = %cached.age_display(), "Serving cached data");
                }
                Ok(cached.data)
            }
            Ok(None) => Err(error),
            Err(e) => {
                warn!(cache = name, error = %e, "Cache unreadable");
                Err(error)
            }
        }
    }
}

#[async_trait]
impl<R: Repository> Repository for CachingRepository<R> {
    async fn fetch_players(&self) -> StoreResult<Vec<Player>> {
        let fetched = match &self.inner {
            Some(inner) => inner.fetch_players().await,
            None => Err(StoreError::Offline("players")),
        };
        self.settle("players", fetched, CacheManager::save_players, CacheManager::load_players)
    }

    async fn fetch_evaluations(&self) -> StoreResult<Vec<Evaluation>> {
        let fetched = match &self.inner {
            Some(inner) => inner.fetch_evaluations().await,
            None => Err(StoreError::Offline("evaluations")),
        };
        self.settle(
            "evaluations",
            fetched,
            CacheManager::save_evaluations,
            CacheManager::load_evaluations,
        )
    }

    async fn fetch_attendance(&self) -> StoreResult<Vec<Attendance>> {
        let fetched = match &self.inner {
            Some(inner) => inner.fetch_attendance().await,
            None => Err(StoreError::Offline("attendance")),
        };
        self.settle(
            "attendance",
            fetched,
            CacheManager::save_attendance,
            CacheManager::load_attendance,
        )
    }

    async fn fetch_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
        let fetched = match &self.inner {
            Some(inner) => inner.fetch_subscriptions().await,
            None => Err(StoreError::Offline("subscriptions")),
        };
        self.settle(
            "subscriptions",
            fetched,
            CacheManager::save_subscriptions,
            CacheManager::load_subscriptions,
        )
    }

    async fn add_player(&self, player: Player) -> StoreResult<Player> {
        self.online("players")?.add_player(player).await
    }

    async fn update_player(&self, player: Player) -> StoreResult<Player> {
        self.online("players")?.update_player(player).await
    }

    async fn add_evaluation(&self, evaluation: Evaluation) -> StoreResult<Evaluation> {
        self.online("evaluations")?.add_evaluation(evaluation).await
    }

    async fn record_attendance(
        &self,
        team: Team,
        session_date: NaiveDate,
        entries: Vec<RosterEntry>,
    ) -> StoreResult<Vec<Attendance>> {
        self.online("attendance")?
            .record_attendance(team, session_date, entries)
            .await
    }

    async fn add_subscription(&self, subscription: Subscription) -> StoreResult<Subscription> {
        self.online("subscriptions")?
            .add_subscription(subscription)
            .await
    }
}
