//! Checks applied to records before they are stored.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Player, Skill, SkillScores, Subscription, MAX_SCORE, MIN_SCORE};

pub const MIN_NAME_LEN: usize = 3;
pub const NATIONAL_ID_LEN: usize = 10;
pub const PHONE_LEN: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be at least {min} characters", min = MIN_NAME_LEN)]
    NameTooShort,

    #[error("National ID must be exactly {len} digits", len = NATIONAL_ID_LEN)]
    InvalidNationalId,

    #[error("Phone number must be exactly {len} digits", len = PHONE_LEN)]
    InvalidPhone,

    #[error("Birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{skill} score {value} is outside {min}-{max}", min = MIN_SCORE, max = MAX_SCORE)]
    ScoreOutOfRange { skill: Skill, value: u8 },

    #[error("Subscription amount is required")]
    MissingAmount,
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a player record as entered on the registration form.
/// `today` bounds the birth date.
pub fn validate_player(player: &Player, today: NaiveDate) -> Result<(), ValidationError> {
    if player.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    if !is_digits(&player.national_id, NATIONAL_ID_LEN) {
        return Err(ValidationError::InvalidNationalId);
    }
    if !is_digits(&player.phone, PHONE_LEN) {
        return Err(ValidationError::InvalidPhone);
    }
    if player.birth_date > today {
        return Err(ValidationError::BirthDateInFuture(player.birth_date));
    }
    if player.height == Some(0) {
        return Err(ValidationError::NotPositive { field: "Height" });
    }
    if player.weight == Some(0) {
        return Err(ValidationError::NotPositive { field: "Weight" });
    }
    Ok(())
}

/// Every skill must be scored within `MIN_SCORE..=MAX_SCORE`.
pub fn validate_scores(scores: &SkillScores) -> Result<(), ValidationError> {
    match scores
        .iter()
        .find(|(_, value)| !(MIN_SCORE..=MAX_SCORE).contains(value))
    {
        Some((skill, value)) => Err(ValidationError::ScoreOutOfRange { skill, value }),
        None => Ok(()),
    }
}

pub fn validate_subscription(subscription: &Subscription) -> Result<(), ValidationError> {
    if subscription.amount == 0 {
        return Err(ValidationError::MissingAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plan, Position, Team};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn player() -> Player {
        Player {
            id: "p1".to_string(),
            name: "Ali Mohammadi".to_string(),
            national_id: "0012345678".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 5, 15).unwrap(),
            team: Team::Juniors,
            position: Position::Forward,
            phone: "09121234567".to_string(),
            height: Some(165),
            weight: Some(55),
            email: None,
            strong_foot: None,
        }
    }

    #[test]
    fn test_valid_player() {
        assert_eq!(validate_player(&player(), today()), Ok(()));
    }

    #[test]
    fn test_player_name_too_short() {
        let mut p = player();
        p.name = " Al ".to_string();
        assert_eq!(validate_player(&p, today()), Err(ValidationError::NameTooShort));
    }

    #[test]
    fn test_player_national_id_and_phone_digits() {
        let mut p = player();
        p.national_id = "00123456789".to_string();
        assert_eq!(validate_player(&p, today()), Err(ValidationError::InvalidNationalId));

        let mut p = player();
        p.phone = "0912-123-456".to_string();
        assert_eq!(validate_player(&p, today()), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_player_birth_date_in_future() {
        let mut p = player();
        p.birth_date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(matches!(
            validate_player(&p, today()),
            Err(ValidationError::BirthDateInFuture(_))
        ));
    }

    #[test]
    fn test_player_zero_height() {
        let mut p = player();
        p.height = Some(0);
        assert_eq!(
            validate_player(&p, today()),
            Err(ValidationError::NotPositive { field: "Height" })
        );
    }

    #[test]
    fn test_scores_out_of_range() {
        let mut scores = SkillScores::from_array([5; 10]);
        assert_eq!(validate_scores(&scores), Ok(()));

        scores.speed = 11;
        assert_eq!(
            validate_scores(&scores),
            Err(ValidationError::ScoreOutOfRange { skill: Skill::Speed, value: 11 })
        );

        scores.speed = 5;
        scores.passing = 0;
        assert_eq!(
            validate_scores(&scores).map_err(|e| e.to_string()),
            Err("Passing score 0 is outside 1-10".to_string())
        );
    }

    #[test]
    fn test_subscription_amount_required() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let free = Subscription::new("s1", "p1", Plan::Monthly, 0, 0, start);
        assert_eq!(validate_subscription(&free), Err(ValidationError::MissingAmount));

        let paid = Subscription::new("s2", "p1", Plan::Monthly, 1_500_000, 0, start);
        assert_eq!(validate_subscription(&paid), Ok(()));
    }
}
