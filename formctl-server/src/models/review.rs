//! Review input validation
//!
//! Reviews are validated here rather than by table constraints so clients
//! get a specific 400 message instead of a generic database failure.

use serde_json::Value;

use super::validation::bounded;
use super::ValidationError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

const MAX_REACTION_LEN: usize = 50;
const MAX_FEEDBACK_LEN: usize = 2000;

const REQUIRED_FIELDS: ValidationError = ValidationError::MissingFields {
    fields: "respondentId and rating",
};

const RATING_RANGE: ValidationError = ValidationError::OutOfRange {
    field: "Rating",
    min: MIN_RATING,
    max: MAX_RATING,
};

/// Star rating, 1 through 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i32);

impl Rating {
    /// # Example
    /// ```
    /// use formctl_server::models::Rating;
    ///
    /// assert!(Rating::new(5).is_ok());
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(RATING_RANGE);
        }
        Ok(Self(value as i32))
    }

    /// Interpret a raw JSON rating.
    ///
    /// Absent, `null`, `0`, `false` and `""` count as missing. Any other
    /// value must be a whole number in range, written either way (`5` or
    /// `5.0`).
    fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(REQUIRED_FIELDS),
            Some(Value::String(s)) if s.is_empty() => Err(REQUIRED_FIELDS),
            Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
                (Some(0), _) => Err(REQUIRED_FIELDS),
                (Some(i), _) => Self::new(i),
                (None, Some(f)) if f == 0.0 => Err(REQUIRED_FIELDS),
                // 5.0 is a whole number; 4.5 is not
                (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => {
                    Self::new(f as i64)
                }
                _ => Err(RATING_RANGE),
            },
            Some(_) => Err(RATING_RANGE),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// A validated review, ready to persist.
///
/// `respondent_id` is kept as the caller sent it; the repository resolves it
/// and reports an unknown or malformed id as not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub respondent_id: String,
    pub rating: Rating,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
}

impl NewReview {
    pub fn new(
        respondent_id: Option<&str>,
        rating: Option<&Value>,
        reaction: Option<&str>,
        feedback: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let respondent_id = match respondent_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => return Err(REQUIRED_FIELDS),
        };
        let rating = Rating::from_json(rating)?;

        Ok(Self {
            respondent_id,
            rating,
            reaction: optional_text("reaction", reaction, MAX_REACTION_LEN)?,
            feedback: optional_text("feedback", feedback, MAX_FEEDBACK_LEN)?,
        })
    }
}

fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => bounded(field, v, max).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review(id: Option<&str>, rating: Value) -> Result<NewReview, ValidationError> {
        NewReview::new(id, Some(&rating), None, None)
    }

    #[test]
    fn accepts_every_valid_rating() {
        for r in 1..=5 {
            let review = review(Some("abc"), json!(r)).unwrap();
            assert_eq!(review.rating.get(), r);
        }
    }

    #[test]
    fn out_of_range_ratings() {
        for bad in [json!(6), json!(-1), json!(100), json!(4.5), json!("5"), json!(true)] {
            assert_eq!(review(Some("abc"), bad).unwrap_err(), RATING_RANGE);
        }
    }

    #[test]
    fn whole_floats_are_ratings() {
        let parsed: NewReview = NewReview::new(
            Some("abc"),
            Some(&serde_json::from_str("5.0").unwrap()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(parsed.rating.get(), 5);
        assert_eq!(
            NewReview::new(Some("abc"), Some(&json!(1.0)), None, None)
                .unwrap()
                .rating
                .get(),
            1
        );

        for bad in [json!(4.5), json!(5.5), json!(6.0), json!(-1.0), json!(1e300)] {
            assert_eq!(review(Some("abc"), bad).unwrap_err(), RATING_RANGE);
        }
        assert_eq!(review(Some("abc"), json!(0.0)).unwrap_err(), REQUIRED_FIELDS);
    }

    #[test]
    fn falsy_rating_is_missing() {
        for missing in [json!(0), json!(null), json!(false), json!("")] {
            assert_eq!(review(Some("abc"), missing).unwrap_err(), REQUIRED_FIELDS);
        }
        assert_eq!(
            NewReview::new(Some("abc"), None, None, None).unwrap_err(),
            REQUIRED_FIELDS
        );
    }

    #[test]
    fn missing_respondent_reported_before_rating() {
        assert_eq!(review(None, json!(9)).unwrap_err(), REQUIRED_FIELDS);
        assert_eq!(review(Some("  "), json!(3)).unwrap_err(), REQUIRED_FIELDS);
    }

    #[test]
    fn empty_reaction_and_feedback_become_none() {
        let r = NewReview::new(Some("abc"), Some(&json!(4)), Some(""), Some("   ")).unwrap();
        assert_eq!(r.reaction, None);
        assert_eq!(r.feedback, None);
    }

    #[test]
    fn reaction_max_length() {
        let long = "x".repeat(51);
        let err = NewReview::new(Some("abc"), Some(&json!(4)), Some(&long), None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "reaction",
                max: 50
            }
        );
    }

    #[test]
    fn feedback_max_length() {
        let ok = "y".repeat(2000);
        assert!(NewReview::new(Some("abc"), Some(&json!(4)), None, Some(&ok)).is_ok());

        let long = "y".repeat(2001);
        let err = NewReview::new(Some("abc"), Some(&json!(4)), None, Some(&long)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 2000, .. }));
    }
}
