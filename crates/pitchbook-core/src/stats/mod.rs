//! Aggregations over academy records.
//!
//! Every function here is pure: it reads its arguments and returns a fresh
//! value. Inputs are assumed validated; empty inputs produce zero or
//! "no data" results instead of errors.

pub mod attendance;
pub mod dashboard;
pub mod rating;

pub use attendance::{compute_attendance_stats, AttendanceStats};
pub use dashboard::{build_dashboard_summary, DashboardSummary, RecentPlayer, TeamCount, RECENT_PLAYERS_LIMIT};
pub use rating::{compute_average_ratings, compute_overall, AverageRatings, Rounding, OVERALL_ROUNDING};
