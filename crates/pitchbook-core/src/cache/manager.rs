use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Attendance, Evaluation, Player, Subscription};

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

const PLAYERS: &str = "players";
const EVALUATIONS: &str = "evaluations";
const ATTENDANCE: &str = "attendance";
const SUBSCRIPTIONS: &str = "subscriptions";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

/// Human-readable age, rounding to the nearest hour or day once past them.
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Negative ages come from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60 + i64::from(minutes % 60 >= 30);
        format!("{}h ago", hours)
    } else {
        let days = minutes / 1440 + i64::from((minutes % 1440) / 60 >= 12);
        format!("{}d ago", days)
    }
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        format_age(self.age_minutes())
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Last fetched copy of each collection, one JSON file per collection.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        debug!(cache = name, age_minutes = cached.age_minutes(), "Loaded cache");
        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    pub fn load_players(&self) -> Result<Option<CachedData<Vec<Player>>>> {
        self.load(PLAYERS)
    }

    pub fn save_players(&self, players: &[Player]) -> Result<()> {
        self.save(PLAYERS, &players)
    }

    pub fn load_evaluations(&self) -> Result<Option<CachedData<Vec<Evaluation>>>> {
        self.load(EVALUATIONS)
    }

    pub fn save_evaluations(&self, evaluations: &[Evaluation]) -> Result<()> {
        self.save(EVALUATIONS, &evaluations)
    }

    pub fn load_attendance(&self) -> Result<Option<CachedData<Vec<Attendance>>>> {
        self.load(ATTENDANCE)
    }

    pub fn save_attendance(&self, attendance: &[Attendance]) -> Result<()> {
        self.save(ATTENDANCE, &attendance)
    }

    pub fn load_subscriptions(&self) -> Result<Option<CachedData<Vec<Subscription>>>> {
        self.load(SUBSCRIPTIONS)
    }

    pub fn save_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()> {
        self.save(SUBSCRIPTIONS, &subscriptions)
    }

    // ===== Cache Age Information =====

    /// Age of one cache file, logging and ignoring read errors.
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<i64> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_minutes()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            players: self.load_age(PLAYERS, || self.load_players()),
            evaluations: self.load_age(EVALUATIONS, || self.load_evaluations()),
            attendance: self.load_age(ATTENDANCE, || self.load_attendance()),
            subscriptions: self.load_age(SUBSCRIPTIONS, || self.load_subscriptions()),
        }
    }

    /// Missing or unreadable caches count as stale.
    pub fn any_stale(&self) -> bool {
        let ages = self.get_cache_ages();
        ages.all()
            .iter()
            .any(|age| age.map_or(true, |m| m > CACHE_STALE_MINUTES))
    }
}

/// Age in minutes of each cached collection; `None` when never cached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheAges {
    pub players: Option<i64>,
    pub evaluations: Option<i64>,
    pub attendance: Option<i64>,
    pub subscriptions: Option<i64>,
}

impl CacheAges {
    fn all(&self) -> [Option<i64>; 4] {
        [self.players, self.evaluations, self.attendance, self.subscriptions]
    }

    pub fn roster_age(&self) -> String {
        self.players.map(format_age).unwrap_or_else(|| "never".to_string())
    }

    /// Age of the most recently written collection.
    pub fn last_updated(&self) -> String {
        self.all()
            .into_iter()
            .flatten()
            .min()
            .map(format_age)
            .unwrap_or_else(|| "never".to_string())
    }
}
