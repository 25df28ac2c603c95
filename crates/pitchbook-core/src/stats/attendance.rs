use serde::Serialize;

use super::rating::div_round_half_up;
use crate::models::{Attendance, AttendanceStatus};

/// Share of sessions per status for one player.
///
/// Each percentage is rounded on its own, so the three need not add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub present_pct: u8,
    pub absent_pct: u8,
    pub late_pct: u8,
}

impl AttendanceStats {
    pub fn summary(&self) -> String {
        format!(
            "Present: {}% | Absent: {}% | Late: {}%",
            self.present_pct, self.absent_pct, self.late_pct
        )
    }
}

fn percent(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    div_round_half_up(count as u64 * 100, total as u64) as u8
}

/// Tally attendance records for one player. An empty input gives all zeros.
pub fn compute_attendance_stats<'a, I>(records: I) -> AttendanceStats
where
    I: IntoIterator<Item = &'a Attendance>,
{
    let mut stats = AttendanceStats::default();
    for record in records {
        stats.total += 1;
        match record.status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Late => stats.late += 1,
        }
    }

    stats.present_pct = percent(stats.present, stats.total);
    stats.absent_pct = percent(stats.absent, stats.total);
    stats.late_pct = percent(stats.late, stats.total);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn records(present: usize, absent: usize, late: usize) -> Vec<Attendance> {
        let statuses = std::iter::repeat(AttendanceStatus::Present)
            .take(present)
            .chain(std::iter::repeat(AttendanceStatus::Absent).take(absent))
            .chain(std::iter::repeat(AttendanceStatus::Late).take(late));
        statuses
            .enumerate()
            .map(|(i, status)| Attendance {
                player_id: "p1".to_string(),
                session_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                status,
                notes: None,
            })
            .collect()
    }

    #[test]
    fn test_attendance_stats_empty() {
        let stats = compute_attendance_stats(&records(0, 0, 0));
        assert_eq!((stats.present_pct, stats.absent_pct, stats.late_pct), (0, 0, 0));
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn test_attendance_stats_eight_one_one() {
        let stats = compute_attendance_stats(&records(8, 1, 1));
        assert_eq!((stats.present_pct, stats.absent_pct, stats.late_pct), (80, 10, 10));
        assert_eq!(stats.present, 8);
        assert_eq!(stats.summary(), "Present: 80% | Absent: 10% | Late: 10%");
    }

    #[test]
    fn test_attendance_stats_rounding_can_undershoot_100() {
        // Three equal thirds round to 33 each; the total of 99 is expected
        let stats = compute_attendance_stats(&records(1, 1, 1));
        assert_eq!((stats.present_pct, stats.absent_pct, stats.late_pct), (33, 33, 33));
    }

    #[test]
    fn test_attendance_stats_rounding_can_overshoot_100() {
        // 37.5% and 37.5% both round up, 25% stays: 101 in total
        let stats = compute_attendance_stats(&records(3, 3, 2));
        assert_eq!((stats.present_pct, stats.absent_pct, stats.late_pct), (38, 38, 25));
    }
}
