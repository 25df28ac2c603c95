//! Plain-text rendering of the core views.

use std::fmt::Write;

use chrono::NaiveDate;
use pitchbook_core::cache::CacheAges;
use pitchbook_core::models::{Foot, Player, Skill, Subscription};
use pitchbook_core::stats::{AttendanceStats, AverageRatings, DashboardSummary};
use pitchbook_core::utils::{format_phone, truncate_string};
use pitchbook_core::views::{
    AttendanceRow, BarRow, EvaluationRow, RadarRow, SkillPoint, SubscriptionRow, TrendPoint,
};
use serde::Serialize;

const NAME_WIDTH: usize = 22;

/// Group thousands with commas: `12500000` -> `12,500,000`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn name_cell(name: &str) -> String {
    truncate_string(name, NAME_WIDTH)
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

fn foot_str(foot: Option<Foot>) -> &'static str {
    match foot {
        Some(Foot::Left) => "Left",
        Some(Foot::Right) => "Right",
        None => "-",
    }
}

pub fn players_table(players: &[&Player], today: NaiveDate) -> String {
    if players.is_empty() {
        return "No players found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<w$} {:<9} {:<4} {:>3}  {:<13}",
        "ID",
        "Name",
        "Team",
        "Pos",
        "Age",
        "Phone",
        w = NAME_WIDTH
    );
    for p in players {
        let age = p.age_on(today).map_or_else(|| "-".to_string(), |a| a.to_string());
        let _ = writeln!(
            out,
            "{:<5} {:<w$} {:<9} {:<4} {:>3}  {:<13}",
            p.id,
            name_cell(&p.name),
            p.team.to_string(),
            p.position.short(),
            age,
            format_phone(&p.phone),
            w = NAME_WIDTH
        );
    }
    let _ = writeln!(out, "\n{} player(s)", players.len());
    out
}

/// Everything known about one player, as shown on the profile page.
#[derive(Serialize)]
pub struct Profile<'a> {
    pub player: &'a Player,
    pub averages: Option<AverageRatings>,
    pub latest: Option<Vec<SkillPoint>>,
    pub attendance: AttendanceStats,
    pub subscriptions: Vec<&'a Subscription>,
}

pub fn player_profile(profile: &Profile<'_>, today: NaiveDate) -> String {
    let p = profile.player;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", p.name, p.id);
    let _ = writeln!(out, "  Team:        {}", p.team);
    let _ = writeln!(out, "  Position:    {}", p.position);
    let _ = writeln!(
        out,
        "  Born:        {} (age {})",
        p.birth_date,
        p.age_on(today).map_or_else(|| "-".to_string(), |a| a.to_string())
    );
    let _ = writeln!(out, "  National ID: {}", p.national_id);
    let _ = writeln!(out, "  Phone:       {}", format_phone(&p.phone));
    if let Some(email) = &p.email {
        let _ = writeln!(out, "  Email:       {}", email);
    }
    let _ = writeln!(
        out,
        "  Height/Weight: {} / {}   Strong foot: {}",
        p.height_str(),
        p.weight_str(),
        foot_str(p.strong_foot)
    );

    out.push_str("\nRatings\n");
    match &profile.averages {
        Some(avg) => {
            let _ = writeln!(
                out,
                "  {:<12} {:>7} {:>7}",
                "Skill", "Latest", "Average"
            );
            for skill in Skill::ALL {
                let latest = profile
                    .latest
                    .as_ref()
                    .and_then(|points| points.iter().find(|pt| pt.skill == skill))
                    .map_or_else(|| "-".to_string(), |pt| pt.value.to_string());
                let _ = writeln!(
                    out,
                    "  {:<12} {:>7} {:>7.1}",
                    skill.label(),
                    latest,
                    avg.get(skill)
                );
            }
            let _ = writeln!(
                out,
                "  Overall average {:.1} over {} evaluation(s)",
                avg.overall, avg.evaluation_count
            );
        }
        None => out.push_str("  No evaluations yet\n"),
    }

    out.push_str("\nAttendance\n");
    if profile.attendance.total == 0 {
        out.push_str("  No sessions recorded\n");
    } else {
        let _ = writeln!(
            out,
            "  {} ({} session(s))",
            profile.attendance.summary(),
            profile.attendance.total
        );
    }

    out.push_str("\nSubscriptions\n");
    if profile.subscriptions.is_empty() {
        out.push_str("  None\n");
    }
    for s in &profile.subscriptions {
        let _ = writeln!(
            out,
            "  {} {} to {}  {} / {}  {}  {}",
            s.plan,
            s.start_date,
            s.end_date(),
            format_amount(s.paid_amount),
            format_amount(s.amount),
            s.payment_status(),
            s.status_on(today)
        );
    }
    out
}

pub fn comparison(radar: &[RadarRow], bars: &[BarRow]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<12}", "Skill");
    for bar in bars {
        let _ = write!(out, " {:>14}", truncate_string(&bar.player_name, 14));
    }
    out.push('\n');

    for row in radar {
        let _ = write!(out, "{:<12}", row.label);
        for bar in bars {
            let value = row
                .values
                .iter()
                .find(|v| v.player_id == bar.player_id)
                .map_or_else(|| "-".to_string(), |v| v.value.to_string());
            let _ = write!(out, " {:>14}", value);
        }
        out.push('\n');
    }

    let _ = write!(out, "{:<12}", "Overall");
    for bar in bars {
        let _ = write!(out, " {:>14}", optional(bar.overall));
    }
    out.push('\n');

    for bar in bars.iter().filter(|b| b.scores.is_none()) {
        let _ = writeln!(out, "\n{} has no evaluations yet", bar.player_name);
    }
    out
}

pub fn trend_table(player: &Player, points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return format!("{} has no evaluations yet\n", player.name);
    }
    let mut out = String::new();
    let _ = writeln!(out, "Progress for {}\n", player.name);
    let _ = write!(out, "{:<11}", "Date");
    for skill in Skill::ALL {
        let _ = write!(out, " {:>4}", &skill.key()[..4.min(skill.key().len())]);
    }
    let _ = writeln!(out, " {:>7}", "Overall");
    for point in points {
        let _ = write!(out, "{:<11}", point.label);
        for (_, value) in point.scores.iter() {
            let _ = write!(out, " {:>4}", value);
        }
        let _ = writeln!(out, " {:>7.1}", point.overall);
    }
    out
}

pub fn evaluations_table(rows: &[EvaluationRow]) -> String {
    if rows.is_empty() {
        return "No evaluations found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<w$} {:<9} {:<4} {:<10} {:>7}",
        "ID",
        "Player",
        "Team",
        "Pos",
        "Date",
        "Overall",
        w = NAME_WIDTH
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<6} {:<w$} {:<9} {:<4} {:<10} {:>7.1}",
            row.evaluation_id,
            name_cell(&row.player_name),
            row.team.map_or_else(|| "-".to_string(), |t| t.to_string()),
            row.position.map_or("-", |p| p.short()),
            row.evaluation_date,
            row.overall,
            w = NAME_WIDTH
        );
    }
    out
}

pub fn attendance_table(rows: &[AttendanceRow]) -> String {
    if rows.is_empty() {
        return "No players on this team.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$} {:>8} {:>8} {:>7} {:>6}",
        "Player",
        "Sessions",
        "Present",
        "Absent",
        "Late",
        w = NAME_WIDTH
    );
    for row in rows {
        let s = &row.stats;
        let _ = writeln!(
            out,
            "{:<w$} {:>8} {:>7}% {:>6}% {:>5}%",
            name_cell(&row.player_name),
            s.total,
            s.present_pct,
            s.absent_pct,
            s.late_pct,
            w = NAME_WIDTH
        );
    }
    out
}

pub fn subscriptions_table(rows: &[SubscriptionRow]) -> String {
    if rows.is_empty() {
        return "No subscriptions found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$} {:<11} {:<10} {:<10} {:>12} {:>12} {:<7} {:<7}",
        "Player",
        "Plan",
        "Start",
        "End",
        "Amount",
        "Outstanding",
        "Payment",
        "Status",
        w = NAME_WIDTH
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<w$} {:<11} {:<10} {:<10} {:>12} {:>12} {:<7} {:<7}",
            name_cell(&row.player_name),
            row.plan.to_string(),
            row.start_date,
            row.end_date,
            format_amount(row.amount),
            format_amount(row.outstanding),
            row.payment_status.to_string(),
            row.status.to_string(),
            w = NAME_WIDTH
        );
    }
    out
}

pub fn dashboard(academy: &str, summary: &DashboardSummary, ages: Option<CacheAges>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", academy);
    let _ = writeln!(out, "  Players:     {}", summary.total_players);
    let _ = writeln!(out, "  Evaluations: {}", summary.total_evaluations);
    let _ = writeln!(out, "  Attendance:  {}", summary.total_attendance);

    if !summary.players_per_team.is_empty() {
        out.push_str("\nPlayers per team\n");
        for count in &summary.players_per_team {
            let marker = if Some(count.team) == summary.largest_team {
                " *"
            } else {
                ""
            };
            let _ = writeln!(out, "  {:<9} {:>3}{}", count.team.to_string(), count.count, marker);
        }
    }

    if !summary.recent_players.is_empty() {
        out.push_str("\nRecent players\n");
        for p in &summary.recent_players {
            let _ = writeln!(out, "  {:<5} {} ({})", p.id, p.name, p.team);
        }
    }

    if let Some(ages) = ages {
        let _ = writeln!(
            out,
            "\nLast synced {} (roster {})",
            ages.last_updated(),
            ages.roster_age()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchbook_core::repository::{FixtureRepository, Repository, Snapshot};
    use pitchbook_core::select::{latest_evaluation_by_player, select_by_player};
    use pitchbook_core::stats::build_dashboard_summary;
    use pitchbook_core::views::{build_bar_series, build_radar_series, build_trend_series, ComparisonSelection};

    async fn sample() -> Snapshot {
        let repo = FixtureRepository::sample().unwrap();
        Snapshot::load(&repo as &dyn Repository).await.unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(12_500_000), "12,500,000");
    }

    #[tokio::test]
    async fn test_players_table_lists_everyone() {
        let snapshot = sample().await;
        let players: Vec<&Player> = snapshot.players.iter().collect();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let table = players_table(&players, today);
        assert!(table.contains("Ali Mohammadi"));
        assert!(table.contains("16 player(s)"));
        assert_eq!(players_table(&[], today), "No players found.\n");
    }

    #[tokio::test]
    async fn test_comparison_shows_overall_per_player() {
        let snapshot = sample().await;
        let selection = ComparisonSelection::from_ids(["p1", "p2"]).unwrap();
        let players = selection.players(&snapshot.players);
        let latest = latest_evaluation_by_player(&snapshot.evaluations);
        let text = comparison(
            &build_radar_series(&players, &latest),
            &build_bar_series(&players, &latest),
        );
        assert!(text.starts_with("Skill"));
        assert!(text.contains("Overall"));
        assert!(text.contains("Passing"));
    }

    #[tokio::test]
    async fn test_trend_table_without_evaluations() {
        let snapshot = sample().await;
        let unevaluated = &snapshot.players[15];
        let points = build_trend_series(select_by_player(&snapshot.evaluations, &unevaluated.id));
        assert!(trend_table(unevaluated, &points).contains("no evaluations yet"));

        let ali = &snapshot.players[0];
        let points = build_trend_series(select_by_player(&snapshot.evaluations, &ali.id));
        let text = trend_table(ali, &points);
        assert!(text.contains("Progress for Ali Mohammadi"));
        let first = text.find("2023/11/10").unwrap();
        let second = text.find("2024/02/15").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_dashboard_marks_largest_team() {
        let snapshot = sample().await;
        let summary = build_dashboard_summary(
            &snapshot.players,
            snapshot.evaluations.len(),
            snapshot.attendance.len(),
        );
        let text = dashboard("Football Academy", &summary, None);
        assert!(text.starts_with("Football Academy"));
        assert!(text.contains("Players:     16"));
        assert!(text.contains(" *"));
        assert!(!text.contains("Last synced"));

        let ages = CacheAges {
            players: Some(90),
            evaluations: Some(5),
            attendance: None,
            subscriptions: None,
        };
        let text = dashboard("A", &summary, Some(ages));
        assert!(text.contains("Last synced 5m ago"));
        assert!(text.contains("roster 2h ago"));
    }
}
