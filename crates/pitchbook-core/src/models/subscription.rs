use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ParseEnumError, PlayerId};

/// Billing plan; each covers a fixed number of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum Plan {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Monthly, Plan::Quarterly, Plan::SemiAnnual, Plan::Annual];

    pub fn months(&self) -> u32 {
        match self {
            Plan::Monthly => 1,
            Plan::Quarterly => 3,
            Plan::SemiAnnual => 6,
            Plan::Annual => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Quarterly => "quarterly",
            Plan::SemiAnnual => "semi-annual",
            Plan::Annual => "annual",
        }
    }

    /// End date for a plan starting on `start`.
    /// Month arithmetic clamps to the last day of shorter months (Jan 31 + 1 month = Feb 28/29).
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Monthly => write!(f, "Monthly"),
            Plan::Quarterly => write!(f, "Quarterly"),
            Plan::SemiAnnual => write!(f, "Semi-annual"),
            Plan::Annual => write!(f, "Annual"),
        }
    }
}

impl FromStr for Plan {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Plan::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError::new("plan", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

impl PaymentStatus {
    pub fn from_amounts(amount: u64, paid_amount: u64) -> Self {
        if paid_amount >= amount {
            PaymentStatus::Paid
        } else if paid_amount > 0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::Partial => write!(f, "Partial"),
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Pending => write!(f, "Pending"),
            SubscriptionStatus::Active => write!(f, "Active"),
            SubscriptionStatus::Expired => write!(f, "Expired"),
        }
    }
}

/// A billing period for one player.
///
/// `end_date` and `payment_status` are computed in [`Subscription::new`];
/// deserializing recomputes them from the stored inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubscriptionRecord")]
pub struct Subscription {
    pub id: String,
    pub player_id: PlayerId,
    pub plan: Plan,
    pub amount: u64,
    pub paid_amount: u64,
    pub start_date: NaiveDate,
    end_date: NaiveDate,
    payment_status: PaymentStatus,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        player_id: impl Into<PlayerId>,
        plan: Plan,
        amount: u64,
        paid_amount: u64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            player_id: player_id.into(),
            plan,
            amount,
            paid_amount,
            start_date,
            end_date: plan.end_date(start_date),
            payment_status: PaymentStatus::from_amounts(amount, paid_amount),
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn outstanding(&self) -> u64 {
        self.amount.saturating_sub(self.paid_amount)
    }

    /// Lifecycle status as seen on `today`; the end date itself is still active.
    pub fn status_on(&self, today: NaiveDate) -> SubscriptionStatus {
        if today < self.start_date {
            SubscriptionStatus::Pending
        } else if today > self.end_date {
            SubscriptionStatus::Expired
        } else {
            SubscriptionStatus::Active
        }
    }
}

/// Stored inputs of a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRecord {
    pub id: String,
    pub player_id: PlayerId,
    pub plan: Plan,
    pub amount: u64,
    #[serde(default)]
    pub paid_amount: u64,
    pub start_date: NaiveDate,
}

impl From<SubscriptionRecord> for Subscription {
    fn from(r: SubscriptionRecord) -> Self {
        Subscription::new(r.id, r.player_id, r.plan, r.amount, r.paid_amount, r.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_payment_status_from_amounts() {
        assert_eq!(PaymentStatus::from_amounts(500, 500), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_amounts(500, 800), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_amounts(500, 1), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_amounts(500, 0), PaymentStatus::Unpaid);
        // Zero-amount subscriptions count as settled
        assert_eq!(PaymentStatus::from_amounts(0, 0), PaymentStatus::Paid);
    }

    #[test]
    fn test_end_date_per_plan() {
        let start = date(2024, 3, 15);
        assert_eq!(Plan::Monthly.end_date(start), date(2024, 4, 15));
        assert_eq!(Plan::Quarterly.end_date(start), date(2024, 6, 15));
        assert_eq!(Plan::SemiAnnual.end_date(start), date(2024, 9, 15));
        assert_eq!(Plan::Annual.end_date(start), date(2025, 3, 15));
    }

    #[test]
    fn test_end_date_clamps_to_month_end() {
        assert_eq!(Plan::Monthly.end_date(date(2024, 1, 31)), date(2024, 2, 29));
        assert_eq!(Plan::Monthly.end_date(date(2023, 1, 31)), date(2023, 2, 28));
        assert_eq!(Plan::Quarterly.end_date(date(2024, 11, 30)), date(2025, 2, 28));
    }

    #[test]
    fn test_status_on_boundaries() {
        let sub = Subscription::new("s1", "p1", Plan::Monthly, 100, 0, date(2024, 5, 1));
        assert_eq!(sub.status_on(date(2024, 4, 30)), SubscriptionStatus::Pending);
        assert_eq!(sub.status_on(date(2024, 5, 1)), SubscriptionStatus::Active);
        assert_eq!(sub.status_on(date(2024, 6, 1)), SubscriptionStatus::Active);
        assert_eq!(sub.status_on(date(2024, 6, 2)), SubscriptionStatus::Expired);
    }

    #[test]
    fn test_outstanding_saturates() {
        let over = Subscription::new("s1", "p1", Plan::Annual, 100, 150, date(2024, 1, 1));
        assert_eq!(over.outstanding(), 0);
        let partial = Subscription::new("s2", "p1", Plan::Annual, 100, 40, date(2024, 1, 1));
        assert_eq!(partial.outstanding(), 60);
        assert_eq!(partial.payment_status(), PaymentStatus::Partial);
    }

    #[test]
    fn test_deserialize_recomputes_derived_fields() {
        let json = r#"{"id":"s1","player_id":"p2","plan":"semi-annual","amount":900,
            "paid_amount":900,"start_date":"2024-02-10","end_date":"1999-01-01",
            "payment_status":"unpaid"}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.end_date(), date(2024, 8, 10));
        assert_eq!(sub.payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!("Semi-Annual".parse::<Plan>(), Ok(Plan::SemiAnnual));
        assert_eq!("quarterly".parse::<Plan>(), Ok(Plan::Quarterly));
        assert!("weekly".parse::<Plan>().is_err());
    }
}
