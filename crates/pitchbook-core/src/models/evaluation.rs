use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::stats::compute_overall;

/// Lowest score a coach can give on any skill.
pub const MIN_SCORE: u8 = 1;

/// Highest score a coach can give on any skill.
pub const MAX_SCORE: u8 = 10;

/// The ten scored dimensions, in form and chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Passing,
    Shooting,
    Dribbling,
    Technique,
    Tactical,
    Physical,
    Speed,
    Aerial,
    Defending,
    Morale,
}

impl Skill {
    pub const ALL: [Skill; 10] = [
        Skill::Passing,
        Skill::Shooting,
        Skill::Dribbling,
        Skill::Technique,
        Skill::Tactical,
        Skill::Physical,
        Skill::Speed,
        Skill::Aerial,
        Skill::Defending,
        Skill::Morale,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Skill::Passing => "passing",
            Skill::Shooting => "shooting",
            Skill::Dribbling => "dribbling",
            Skill::Technique => "technique",
            Skill::Tactical => "tactical",
            Skill::Physical => "physical",
            Skill::Speed => "speed",
            Skill::Aerial => "aerial",
            Skill::Defending => "defending",
            Skill::Morale => "morale",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Skill::Passing => "Passing",
            Skill::Shooting => "Shooting",
            Skill::Dribbling => "Dribbling",
            Skill::Technique => "Technique",
            Skill::Tactical => "Tactical",
            Skill::Physical => "Physical",
            Skill::Speed => "Speed",
            Skill::Aerial => "Aerial play",
            Skill::Defending => "Defending",
            Skill::Morale => "Morale",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One coach-entered score per skill, each expected in `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SkillScores {
    pub passing: u8,
    pub shooting: u8,
    pub dribbling: u8,
    pub technique: u8,
    pub tactical: u8,
    pub physical: u8,
    pub speed: u8,
    pub aerial: u8,
    pub defending: u8,
    // The hosted database still calls this column "personality"
    #[serde(alias = "personality")]
    pub morale: u8,
}

impl SkillScores {
    /// Build from scores listed in `Skill::ALL` order.
    pub fn from_array(scores: [u8; 10]) -> Self {
        let [passing, shooting, dribbling, technique, tactical, physical, speed, aerial, defending, morale] =
            scores;
        Self {
            passing,
            shooting,
            dribbling,
            technique,
            tactical,
            physical,
            speed,
            aerial,
            defending,
            morale,
        }
    }

    pub fn to_array(&self) -> [u8; 10] {
        Skill::ALL.map(|skill| self.get(skill))
    }

    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Passing => self.passing,
            Skill::Shooting => self.shooting,
            Skill::Dribbling => self.dribbling,
            Skill::Technique => self.technique,
            Skill::Tactical => self.tactical,
            Skill::Physical => self.physical,
            Skill::Speed => self.speed,
            Skill::Aerial => self.aerial,
            Skill::Defending => self.defending,
            Skill::Morale => self.morale,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        Skill::ALL.into_iter().map(move |skill| (skill, self.get(skill)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, score)| u32::from(score)).sum()
    }
}

/// A single scoring of one player.
///
/// `overall` is derived from the scores when the record is built and cannot
/// be set independently. Deserializing goes through [`EvaluationRecord`], so
/// any stored overall value is discarded and recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EvaluationRecord")]
pub struct Evaluation {
    pub id: String,
    pub player_id: PlayerId,
    #[serde(flatten)]
    scores: SkillScores,
    pub evaluation_date: NaiveDate,
    pub notes: Option<String>,
    overall: f64,
}

impl Evaluation {
    pub fn new(
        id: impl Into<String>,
        player_id: impl Into<PlayerId>,
        scores: SkillScores,
        evaluation_date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            player_id: player_id.into(),
            overall: compute_overall(&scores),
            scores,
            evaluation_date,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn scores(&self) -> &SkillScores {
        &self.scores
    }

    pub fn score(&self, skill: Skill) -> u8 {
        self.scores.get(skill)
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }
}

/// Wire shape of an evaluation; carries no trusted derived fields.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRecord {
    pub id: String,
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub scores: SkillScores,
    pub evaluation_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<EvaluationRecord> for Evaluation {
    fn from(record: EvaluationRecord) -> Self {
        Evaluation::new(
            record.id,
            record.player_id,
            record.scores,
            record.evaluation_date,
            record.notes,
        )
    }
}
