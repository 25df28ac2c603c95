//! Row shapes returned by the hosted database.
//!
//! Rows written by older versions of the web app use Persian labels for
//! teams, positions and feet, and store attendance as a present flag plus an
//! absence reason. These types accept both that shape and the one this crate
//! writes, and convert to the domain models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::models::{Attendance, AttendanceKey, AttendanceStatus, Foot, Player, PlayerId, Position, Team};

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
    pub birth_date: NaiveDate,
    pub team: String,
    pub position: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub height: Option<u16>,
    #[serde(default)]
    pub weight: Option<u16>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub strong_foot: Option<String>,
}

/// Team from a stored label. Legacy labels name a squad inside an age
/// category, e.g. "تیم A نوجوانان".
pub fn parse_team(label: &str) -> Option<Team> {
    if let Ok(team) = label.parse::<Team>() {
        return Some(team);
    }
    const CATEGORIES: [(&str, Team); 4] = [
        ("نونهالان", Team::Children),
        ("نوجوانان", Team::Juniors),
        ("جوانان", Team::Youth),
        ("بزرگسالان", Team::Adults),
    ];
    // "نوجوانان" contains "جوانان", so the longer names are tried first
    CATEGORIES
        .iter()
        .find(|(name, _)| label.contains(name))
        .map(|(_, team)| *team)
}

/// Position from a stored label. Legacy labels are detailed roles that fold
/// into the four line positions.
pub fn parse_position(label: &str) -> Option<Position> {
    if let Ok(position) = label.parse::<Position>() {
        return Some(position);
    }
    if label.contains("دروازه") {
        Some(Position::Goalkeeper)
    } else if label.contains("مدافع") {
        Some(Position::Defender)
    } else if label.contains("هافبک") {
        Some(Position::Midfielder)
    } else if label.contains("وینگر") || label.contains("مهاجم") {
        Some(Position::Forward)
    } else {
        None
    }
}

pub fn parse_foot(label: &str) -> Option<Foot> {
    match label.trim().to_lowercase().as_str() {
        "left" | "چپ" => Some(Foot::Left),
        "right" | "راست" => Some(Foot::Right),
        _ => None,
    }
}

impl PlayerRow {
    /// Convert to a `Player`, or `None` when the team or position label is
    /// not recognised.
    pub fn to_player(&self) -> Option<Player> {
        let Some(team) = parse_team(&self.team) else {
            warn!(player_id = %self.id, team = %self.team, "Skipping player with unknown team");
            return None;
        };
        let Some(position) = parse_position(&self.position) else {
            warn!(player_id = %self.id, position = %self.position, "Skipping player with unknown position");
            return None;
        };

        Some(Player {
            id: self.id.clone(),
            name: self.name.clone(),
            national_id: self.national_id.clone().unwrap_or_default(),
            birth_date: self.birth_date,
            team,
            position,
            phone: self.phone.clone().unwrap_or_default(),
            height: self.height,
            weight: self.weight,
            email: self.email.clone().filter(|e| !e.is_empty()),
            strong_foot: self.strong_foot.as_deref().and_then(parse_foot),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecordRow {
    pub player_id: PlayerId,
    pub session_date: NaiveDate,
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub is_present: Option<bool>,
    #[serde(default)]
    pub absence_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecordRow {
    /// An explicit status wins over the legacy present flag. Rows with
    /// neither count as present.
    pub fn to_attendance(&self) -> Attendance {
        let status = match (self.status, self.is_present) {
            (Some(status), _) => status,
            (None, Some(false)) => AttendanceStatus::Absent,
            (None, _) => AttendanceStatus::Present,
        };
        let notes = self
            .notes
            .clone()
            .or_else(|| self.absence_reason.clone())
            .filter(|n| !n.trim().is_empty());

        Attendance {
            player_id: self.player_id.clone(),
            session_date: self.session_date,
            status,
            notes,
        }
    }
}

/// Convert attendance rows, keeping one record per player and session.
/// Later rows replace earlier ones; the result is ordered by key.
pub fn collapse_attendance(rows: &[AttendanceRecordRow]) -> Vec<Attendance> {
    let mut by_key: BTreeMap<AttendanceKey, Attendance> = BTreeMap::new();
    for row in rows {
        let record = row.to_attendance();
        if let Some(replaced) = by_key.insert(record.key(), record) {
            warn!(
                player_id = %replaced.player_id,
                date = %replaced.session_date,
                "Duplicate attendance row, keeping the later one"
            );
        }
    }
    by_key.into_values().collect()
}
