use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Attendance, Evaluation, PaymentStatus, Plan, Player, PlayerId, Position, Subscription,
    SubscriptionStatus, Team,
};
use crate::select::{find_player, select_by_player, UNKNOWN_PLAYER};
use crate::stats::{compute_attendance_stats, AttendanceStats};

/// Evaluation list entry joined with its player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EvaluationRow {
    pub evaluation_id: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub team: Option<Team>,
    pub position: Option<Position>,
    pub evaluation_date: NaiveDate,
    pub overall: f64,
}

/// Attendance summary for one player on a team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AttendanceRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub team: Team,
    pub stats: AttendanceStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SubscriptionRow {
    pub subscription_id: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub plan: Plan,
    pub amount: u64,
    pub paid_amount: u64,
    pub outstanding: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub status: SubscriptionStatus,
}

/// Join evaluations with the roster. Evaluations whose player is missing
/// keep their row with the name `Unknown` and no team or position.
pub fn build_evaluation_rows<'a, I>(evaluations: I, players: &[Player]) -> Vec<EvaluationRow>
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    evaluations
        .into_iter()
        .map(|e| {
            let player = find_player(players, &e.player_id);
            EvaluationRow {
                evaluation_id: e.id.clone(),
                player_id: e.player_id.clone(),
                player_name: player
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
                team: player.map(|p| p.team),
                position: player.map(|p| p.position),
                evaluation_date: e.evaluation_date,
                overall: e.overall(),
            }
        })
        .collect()
}

/// One row per roster player with their attendance statistics.
pub fn build_attendance_rows(players: &[&Player], attendance: &[Attendance]) -> Vec<AttendanceRow> {
    players
        .iter()
        .map(|player| AttendanceRow {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            team: player.team,
            stats: compute_attendance_stats(select_by_player(attendance, &player.id)),
        })
        .collect()
}

/// Subscriptions with their lifecycle status as of `today`.
pub fn build_subscription_rows<'a, I>(
    subscriptions: I,
    players: &[Player],
    today: NaiveDate,
) -> Vec<SubscriptionRow>
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .map(|s| SubscriptionRow {
            subscription_id: s.id.clone(),
            player_id: s.player_id.clone(),
            player_name: find_player(players, &s.player_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
            plan: s.plan,
            amount: s.amount,
            paid_amount: s.paid_amount,
            outstanding: s.outstanding(),
            start_date: s.start_date,
            end_date: s.end_date(),
            payment_status: s.payment_status(),
            status: s.status_on(today),
        })
        .collect()
}
