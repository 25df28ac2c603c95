use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::compare::SERIES_COLORS;
use crate::models::{Evaluation, Player, PlayerId, Skill, SkillScores};
use crate::select::{sort_by_date, SortOrder};
use crate::utils::format_date_slashed;

/// One player's value on a radar axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RadarValue {
    pub player_id: PlayerId,
    pub player_name: String,
    pub color: Option<String>,
    pub value: u8,
}

/// One radar axis with a value per compared player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RadarRow {
    pub skill: Skill,
    pub label: String,
    pub values: Vec<RadarValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct BarRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub color: Option<String>,
    /// `None` when the player has never been evaluated
    pub scores: Option<SkillScores>,
    pub overall: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub scores: SkillScores,
    pub overall: f64,
}

/// A single axis of a player's own profile radar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SkillPoint {
    pub skill: Skill,
    pub value: u8,
}

fn series_color(index: usize) -> Option<String> {
    SERIES_COLORS.get(index).map(|c| c.to_string())
}

/// Radar data for compared players, one row per skill.
///
/// Players without an evaluation are left out of every row. Colors follow
/// the position in `players`, so pass them in selection order.
pub fn build_radar_series(
    players: &[&Player],
    latest: &HashMap<PlayerId, &Evaluation>,
) -> Vec<RadarRow> {
    Skill::ALL
        .iter()
        .map(|&skill| RadarRow {
            skill,
            label: skill.label().to_string(),
            values: players
                .iter()
                .enumerate()
                .filter_map(|(index, player)| {
                    latest.get(&player.id).map(|evaluation| RadarValue {
                        player_id: player.id.clone(),
                        player_name: player.name.clone(),
                        color: series_color(index),
                        value: evaluation.score(skill),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Bar data for compared players, one row per player.
pub fn build_bar_series(
    players: &[&Player],
    latest: &HashMap<PlayerId, &Evaluation>,
) -> Vec<BarRow> {
    players
        .iter()
        .enumerate()
        .map(|(index, player)| {
            let evaluation = latest.get(&player.id);
            BarRow {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                color: series_color(index),
                scores: evaluation.map(|e| *e.scores()),
                overall: evaluation.map(|e| e.overall()),
            }
        })
        .collect()
}

/// Progress over time for one player's evaluations, oldest first.
pub fn build_trend_series<'a, I>(evaluations: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    sort_by_date(evaluations, SortOrder::Ascending)
        .into_iter()
        .map(|e| TrendPoint {
            date: e.evaluation_date,
            label: format_date_slashed(e.evaluation_date),
            scores: *e.scores(),
            overall: e.overall(),
        })
        .collect()
}

pub fn build_player_radar(evaluation: &Evaluation) -> Vec<SkillPoint> {
    evaluation
        .scores()
        .iter()
        .map(|(skill, value)| SkillPoint { skill, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Team};
    use crate::select::latest_evaluation_by_player;

    fn player(id: &str, name: &str) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
            national_id: "0012345678".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 5, 1).unwrap(),
            team: Team::Juniors,
            position: Position::Forward,
            phone: "09121234567".to_string(),
            height: None,
            weight: None,
            email: None,
            strong_foot: None,
        }
    }

    fn evaluation(id: &str, player_id: &str, scores: [u8; 10], date: (i32, u32, u32)) -> Evaluation {
        Evaluation::new(
            id,
            player_id,
            SkillScores::from_array(scores),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            None,
        )
    }

    fn sample() -> (Vec<Player>, Vec<Evaluation>) {
        let players = vec![
            player("p1", "Ali Mohammadi"),
            player("p2", "Mohammad Rezaei"),
            player("p3", "Amir Hosseini"),
        ];
        let evaluations = vec![
            evaluation("e1", "p1", [7, 5, 6, 7, 8, 8, 7, 8, 9, 8], (2023, 11, 10)),
            evaluation("e2", "p1", [8, 5, 6, 8, 8, 9, 7, 9, 9, 9], (2024, 2, 15)),
            evaluation("e3", "p2", [8, 6, 7, 7, 8, 8, 7, 8, 9, 8], (2023, 10, 20)),
        ];
        (players, evaluations)
    }

    #[test]
    fn test_radar_series_is_dimension_major() {
        let (players, evaluations) = sample();
        let latest = latest_evaluation_by_player(&evaluations);
        let selected: Vec<&Player> = players.iter().collect();

        let rows = build_radar_series(&selected, &latest);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].skill, Skill::Passing);
        // p3 has no evaluation and is left out
        assert_eq!(rows[0].values.len(), 2);
        assert_eq!(rows[0].values[0].value, 8);
        assert_eq!(rows[0].values[0].color.as_deref(), Some(SERIES_COLORS[0]));
        assert_eq!(rows[9].skill, Skill::Morale);
        assert_eq!(rows[9].values[1].player_id, "p2");
        assert_eq!(rows[9].values[1].color.as_deref(), Some(SERIES_COLORS[1]));
    }

    #[test]
    fn test_bar_series_keeps_unevaluated_player() {
        let (players, evaluations) = sample();
        let latest = latest_evaluation_by_player(&evaluations);
        let selected: Vec<&Player> = players.iter().collect();

        let rows = build_bar_series(&selected, &latest);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].overall, Some(7.8));
        assert_eq!(rows[0].scores.map(|s| s.passing), Some(8));
        assert_eq!(rows[1].overall, Some(7.6));
        assert_eq!(rows[2].scores, None);
        assert_eq!(rows[2].overall, None);
        assert_eq!(rows[2].color.as_deref(), Some(SERIES_COLORS[2]));
    }

    #[test]
    fn test_trend_series_sorted_ascending() {
        let (_, evaluations) = sample();
        let mut p1: Vec<&Evaluation> = evaluations.iter().filter(|e| e.player_id == "p1").collect();
        p1.reverse();

        let points = build_trend_series(p1);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "2023/11/10");
        assert_eq!(points[0].overall, 7.3);
        assert_eq!(points[1].label, "2024/02/15");
        assert_eq!(points[1].overall, 7.8);
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_trend_series_empty() {
        assert!(build_trend_series(&Vec::<Evaluation>::new()).is_empty());
    }

    #[test]
    fn test_player_radar_has_every_skill() {
        let (_, evaluations) = sample();
        let radar = build_player_radar(&evaluations[0]);
        assert_eq!(radar.len(), 10);
        assert_eq!(radar[0], SkillPoint { skill: Skill::Passing, value: 7 });
        assert_eq!(radar[9], SkillPoint { skill: Skill::Morale, value: 8 });
    }
}
