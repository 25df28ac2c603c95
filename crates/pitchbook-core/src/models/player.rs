use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PlayerId = String;

/// Age category a player trains with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Children,
    Juniors,
    Youth,
    Adults,
}

impl Team {
    pub const ALL: [Team; 4] = [Team::Children, Team::Juniors, Team::Youth, Team::Adults];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Children => "children",
            Team::Juniors => "juniors",
            Team::Youth => "youth",
            Team::Adults => "adults",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Children => write!(f, "Children"),
            Team::Juniors => write!(f, "Juniors"),
            Team::Youth => write!(f, "Youth"),
            Team::Adults => write!(f, "Adults"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for Team {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Team::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError::new("team", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn short(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Goalkeeper => write!(f, "Goalkeeper"),
            Position::Defender => write!(f, "Defender"),
            Position::Midfielder => write!(f, "Midfielder"),
            Position::Forward => write!(f, "Forward"),
        }
    }
}

impl FromStr for Position {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goalkeeper" | "gk" => Ok(Position::Goalkeeper),
            "defender" | "df" => Ok(Position::Defender),
            "midfielder" | "mf" => Ok(Position::Midfielder),
            "forward" | "fw" => Ok(Position::Forward),
            _ => Err(ParseEnumError::new("position", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Foot {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub team: Team,
    pub position: Position,
    pub phone: String,
    /// Centimetres
    #[serde(default)]
    pub height: Option<u16>,
    /// Kilograms
    #[serde(default)]
    pub weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_foot: Option<Foot>,
}

impl Player {
    /// Age in completed years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> Option<i32> {
        if date < self.birth_date {
            return None;
        }
        let mut age = date.year() - self.birth_date.year();
        if (date.month(), date.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        Some(age)
    }

    pub fn height_str(&self) -> String {
        self.height
            .map(|h| format!("{} cm", h))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn weight_str(&self) -> String {
        self.weight
            .map(|w| format!("{} kg", w))
            .unwrap_or_else(|| "-".to_string())
    }
}
