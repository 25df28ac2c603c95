//! Data models for academy records.
//!
//! This module contains the plain records the rest of the crate works on:
//!
//! - `Player`: identity, team and position, contact info
//! - `Evaluation`, `SkillScores`, `Skill`: coach scorings and the derived overall rating
//! - `Attendance`, `RosterEntry`: per-session presence, keyed by player and date
//! - `Subscription`, `Plan`: billing periods with derived end date and payment status
//!
//! Derived fields are computed by constructors and recomputed on deserialize.

pub mod attendance;
pub mod evaluation;
pub mod player;
pub mod subscription;

pub use attendance::{Attendance, AttendanceKey, AttendanceStatus, RosterEntry};
pub use evaluation::{Evaluation, EvaluationRecord, Skill, SkillScores, MAX_SCORE, MIN_SCORE};
pub use player::{Foot, ParseEnumError, Player, PlayerId, Position, Team};
pub use subscription::{
    PaymentStatus, Plan, Subscription, SubscriptionRecord, SubscriptionStatus,
};
