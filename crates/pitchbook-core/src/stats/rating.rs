use serde::Serialize;

use crate::models::{Evaluation, Skill, SkillScores};

/// Precision used when a mean is turned into a displayed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// One decimal place, half-up (7.25 -> 7.3).
    Tenths,
    /// Whole number, half-up (7.5 -> 8).
    Whole,
}

/// The single rule every overall rating goes through.
pub const OVERALL_ROUNDING: Rounding = Rounding::Tenths;

impl Rounding {
    /// Round `sum / count` at this precision. A zero count yields 0.
    pub fn round_mean(self, sum: u64, count: u64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        match self {
            Rounding::Tenths => div_round_half_up(sum * 10, count) as f64 / 10.0,
            Rounding::Whole => div_round_half_up(sum, count) as f64,
        }
    }
}

/// Integer division rounding halves up; `den` must be non-zero.
pub(crate) fn div_round_half_up(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// Mean of the ten skill scores under [`OVERALL_ROUNDING`].
pub fn compute_overall(scores: &SkillScores) -> f64 {
    OVERALL_ROUNDING.round_mean(u64::from(scores.total()), Skill::ALL.len() as u64)
}

/// Per-skill means over a player's evaluations, each to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AverageRatings {
    pub evaluation_count: usize,
    pub passing: f64,
    pub shooting: f64,
    pub dribbling: f64,
    pub technique: f64,
    pub tactical: f64,
    pub physical: f64,
    pub speed: f64,
    pub aerial: f64,
    pub defending: f64,
    pub morale: f64,
    pub overall: f64,
}

impl AverageRatings {
    pub fn get(&self, skill: Skill) -> f64 {
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
}

/// Average every skill and the overall rating across `evaluations`.
///
/// Returns `None` when there is nothing to average, so a player with no
/// evaluations is never confused with one scored all zeros.
pub fn compute_average_ratings<'a, I>(evaluations: I) -> Option<AverageRatings>
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    let mut sums = [0u64; 10];
    let mut overall_tenths = 0u64;
    let mut count = 0u64;

    for evaluation in evaluations {
        for (slot, score) in sums.iter_mut().zip(evaluation.scores().to_array()) {
            *slot += u64::from(score);
        }
        // Overall ratings are already whole tenths; sum them exactly
        overall_tenths += (evaluation.overall() * 10.0).round() as u64;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let avg = |sum: u64| Rounding::Tenths.round_mean(sum, count);
    let [passing, shooting, dribbling, technique, tactical, physical, speed, aerial, defending, morale] =
        sums.map(avg);

    Some(AverageRatings {
        evaluation_count: count as usize,
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
        overall: div_round_half_up(overall_tenths, count) as f64 / 10.0,
    })
}
