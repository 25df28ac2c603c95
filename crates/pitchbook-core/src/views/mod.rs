//! Presentation-ready rows built from records.
//!
//! Chart series for comparing players and tracking progress, plus joined
//! table rows. Builders are pure and never fail; missing data shows up as
//! `None` fields or omitted values.

pub mod charts;
pub mod compare;
pub mod tables;

pub use charts::{
    build_bar_series, build_player_radar, build_radar_series, build_trend_series, BarRow,
    RadarRow, RadarValue, SkillPoint, TrendPoint,
};
pub use compare::{ComparisonSelection, SelectionError, MAX_COMPARABLE_PLAYERS, SERIES_COLORS};
pub use tables::{
    build_attendance_rows, build_evaluation_rows, build_subscription_rows, AttendanceRow,
    EvaluationRow, SubscriptionRow,
};
