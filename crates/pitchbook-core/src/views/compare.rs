use thiserror::Error;

use crate::models::{Player, PlayerId};

/// How many players can be overlaid on one comparison chart.
pub const MAX_COMPARABLE_PLAYERS: usize = 3;

/// One series color per comparable player, in selection order.
pub const SERIES_COLORS: [&str; MAX_COMPARABLE_PLAYERS] = ["#8884d8", "#82ca9d", "#ffc658"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("At most {max} players can be compared at once")]
    LimitReached { max: usize },
}

/// Players picked for side-by-side comparison, capped at
/// [`MAX_COMPARABLE_PLAYERS`]. Selection order decides series colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    player_ids: Vec<PlayerId>,
}

impl ComparisonSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from ids, rejecting more than the cap.
    /// Repeated ids are kept once.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.select(id)?;
        }
        Ok(selection)
    }

    /// Add a player. Selecting an already selected player is a no-op.
    pub fn select(&mut self, player_id: impl Into<PlayerId>) -> Result<(), SelectionError> {
        let player_id = player_id.into();
        if self.contains(&player_id) {
            return Ok(());
        }
        if self.player_ids.len() >= MAX_COMPARABLE_PLAYERS {
            return Err(SelectionError::LimitReached {
                max: MAX_COMPARABLE_PLAYERS,
            });
        }
        self.player_ids.push(player_id);
        Ok(())
    }

    /// Flip a player's membership; returns whether the player is now selected.
    pub fn toggle(&mut self, player_id: &str) -> Result<bool, SelectionError> {
        if self.contains(player_id) {
            self.player_ids.retain(|id| id != player_id);
            Ok(false)
        } else {
            self.select(player_id)?;
            Ok(true)
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.player_ids.iter().any(|id| id == player_id)
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.player_ids
    }

    pub fn len(&self) -> usize {
        self.player_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.player_ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.player_ids.len() >= MAX_COMPARABLE_PLAYERS
    }

    pub fn color_of(&self, player_id: &str) -> Option<&'static str> {
        self.player_ids
            .iter()
            .position(|id| id == player_id)
            .and_then(|i| SERIES_COLORS.get(i).copied())
    }

    /// Resolve the selection against a roster, in selection order.
    /// Ids not on the roster are skipped.
    pub fn players<'a>(&self, roster: &'a [Player]) -> Vec<&'a Player> {
        self.player_ids
            .iter()
            .filter_map(|id| roster.iter().find(|p| &p.id == id))
            .collect()
    }
}
