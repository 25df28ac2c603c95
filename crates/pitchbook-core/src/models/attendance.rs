use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Late => write!(f, "Late"),
        }
    }
}

/// One player's presence at one training session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub player_id: PlayerId,
    pub session_date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Attendance {
    pub fn key(&self) -> AttendanceKey {
        AttendanceKey {
            player_id: self.player_id.clone(),
            session_date: self.session_date,
        }
    }
}

/// Composite key: a player has at most one record per session date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttendanceKey {
    pub player_id: PlayerId,
    pub session_date: NaiveDate,
}

/// A roster line submitted for one player when a coach takes attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RosterEntry {
    pub fn present(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            status: AttendanceStatus::Present,
            notes: None,
        }
    }

    pub fn into_attendance(self, session_date: NaiveDate) -> Attendance {
        Attendance {
            player_id: self.player_id,
            session_date,
            status: self.status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}
