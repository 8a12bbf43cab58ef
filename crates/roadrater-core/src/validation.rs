//! Pure payload validation.
//!
//! Two deliberately different policies live here:
//!
//! - [`validate_rating`] accumulates **every** violation so the client
//!   sees the full list in one round trip.
//! - [`validate_username`] / [`validate_password`] short-circuit and
//!   report only the first applicable violation.
//!
//! Nothing in this module performs I/O.

use crate::rating::{MAX_COMMENT_LENGTH, SCORE_RANGE};

/// A rating payload after input normalization, before any I/O.
///
/// Numeric fields are held as `f64` so that non-integer inputs can be
/// rejected by the validator rather than at deserialization time.
#[derive(Debug, Clone, Default)]
pub struct RatingCandidate {
    /// Target segment identifier, if supplied.
    pub segment_id: Option<f64>,

    /// Score, if supplied.
    pub rating: Option<f64>,

    /// Trimmed comment, if supplied and non-empty.
    pub comment: Option<String>,

    /// The authenticated submitter, resolved before validation runs.
    pub user_id: Option<i64>,
}

/// A rating payload that passed validation, with typed fields.
#[derive(Debug, Clone)]
pub struct ValidRating {
    /// Target segment identifier (positive).
    pub segment_id: i64,

    /// Score in [1, 5].
    pub rating: i32,

    /// Trimmed comment, at most 500 characters.
    pub comment: Option<String>,

    /// The submitting user (positive).
    pub user_id: i64,
}

/// Validate a rating payload, reporting every failing rule.
///
/// # Errors
///
/// Returns the complete list of human-readable violations. The rules
/// are independent; no rule short-circuits another.
#[allow(clippy::cast_possible_truncation)] // integral values checked before casting
pub fn validate_rating(candidate: &RatingCandidate) -> Result<ValidRating, Vec<String>> {
    let mut violations = Vec::new();

    // Each field reports the first failing condition for that field;
    // fields themselves never short-circuit one another.
    let segment_id = match candidate.segment_id {
        None => {
            violations.push("segmentId is required".to_string());
            None
        }
        Some(id) if id.fract() == 0.0 && id >= 1.0 => Some(id as i64),
        Some(_) => {
            violations.push("segmentId must be a positive integer".to_string());
            None
        }
    };

    let rating = match candidate.rating {
        None => {
            violations.push("rating is required".to_string());
            None
        }
        Some(score) if score.fract() != 0.0 => {
            violations.push("rating must be an integer".to_string());
            None
        }
        Some(score) if !SCORE_RANGE.contains(&(score as i32)) => {
            violations.push("rating must be between 1 and 5".to_string());
            None
        }
        Some(score) => Some(score as i32),
    };

    if let Some(comment) = &candidate.comment {
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            violations.push(format!(
                "comment must be less than {MAX_COMMENT_LENGTH} characters"
            ));
        }
    }

    let user_id = match candidate.user_id {
        None => {
            violations.push("userId is required".to_string());
            None
        }
        Some(id) if id >= 1 => Some(id),
        Some(_) => {
            violations.push("userId must be a positive integer".to_string());
            None
        }
    };

    match (segment_id, rating, user_id) {
        (Some(segment_id), Some(rating), Some(user_id)) if violations.is_empty() => {
            Ok(ValidRating {
                segment_id,
                rating,
                comment: candidate.comment.clone(),
                user_id,
            })
        }
        _ => Err(violations),
    }
}

/// Validate a username: trimmed length >= 8, letters and digits only.
///
/// # Errors
///
/// Returns the first applicable violation message.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let trimmed = username.trim();
    if trimmed.chars().count() < 8 {
        return Err("Username must be at least 8 characters long");
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Username may only contain letters and numbers");
    }
    Ok(())
}

/// Validate a password: length >= 8, at least one digit.
///
/// # Errors
///
/// Returns the first applicable violation message.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(segment_id: f64, rating: f64, user_id: i64) -> RatingCandidate {
        RatingCandidate {
            segment_id: Some(segment_id),
            rating: Some(rating),
            comment: None,
            user_id: Some(user_id),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        let valid = validate_rating(&candidate(8.0, 5.0, 77)).expect("payload should be valid");
        assert_eq!(valid.segment_id, 8);
        assert_eq!(valid.rating, 5);
        assert_eq!(valid.user_id, 77);
        assert!(valid.comment.is_none());
    }

    #[test]
    fn reports_every_violation_at_once() {
        let payload = RatingCandidate {
            segment_id: Some(0.0),
            rating: Some(10.0),
            comment: Some("x".repeat(MAX_COMMENT_LENGTH + 1)),
            user_id: None,
        };
        let violations = validate_rating(&payload).expect_err("payload should be rejected");
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn rejects_non_integer_rating() {
        let violations =
            validate_rating(&candidate(1.0, 4.5, 1)).expect_err("fractional score must fail");
        assert_eq!(violations, vec!["rating must be an integer".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for score in [0.0, 6.0, -3.0] {
            let violations = validate_rating(&candidate(1.0, score, 1))
                .expect_err("out-of-range score must fail");
            assert_eq!(violations, vec!["rating must be between 1 and 5".to_string()]);
        }
    }

    #[test]
    fn rejects_non_positive_segment_ids() {
        for id in [0.0, -4.0, 2.5] {
            let violations =
                validate_rating(&candidate(id, 3.0, 1)).expect_err("bad segment id must fail");
            assert_eq!(
                violations,
                vec!["segmentId must be a positive integer".to_string()]
            );
        }
    }

    #[test]
    fn missing_fields_are_required() {
        let violations =
            validate_rating(&RatingCandidate::default()).expect_err("empty payload must fail");
        assert_eq!(
            violations,
            vec![
                "segmentId is required".to_string(),
                "rating is required".to_string(),
                "userId is required".to_string(),
            ]
        );
    }

    #[test]
    fn comment_boundary_is_inclusive() {
        let mut payload = candidate(1.0, 3.0, 1);
        payload.comment = Some("x".repeat(MAX_COMMENT_LENGTH));
        assert!(validate_rating(&payload).is_ok());

        payload.comment = Some("x".repeat(MAX_COMMENT_LENGTH + 1));
        assert!(validate_rating(&payload).is_err());
    }

    #[test]
    fn username_reports_first_violation_only() {
        // Too short *and* non-alphanumeric: length fires first.
        assert_eq!(
            validate_username("ab!"),
            Err("Username must be at least 8 characters long")
        );
        assert_eq!(
            validate_username("roadie#99"),
            Err("Username may only contain letters and numbers")
        );
        assert_eq!(validate_username("freshroadie1"), Ok(()));
    }

    #[test]
    fn username_is_trimmed_before_checks() {
        assert_eq!(validate_username("  roadie99  "), Ok(()));
        assert_eq!(
            validate_username("  road  "),
            Err("Username must be at least 8 characters long")
        );
    }

    #[test]
    fn password_rules_short_circuit() {
        assert_eq!(
            validate_password("short1"),
            Err("Password must be at least 8 characters long")
        );
        assert_eq!(
            validate_password("allletters"),
            Err("Password must contain at least one number")
        );
        assert_eq!(validate_password("Password123"), Ok(()));
    }
}
