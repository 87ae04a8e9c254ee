//! Form submission validation

use serde_json::Value;

use super::validation::bounded;
use super::{NewRespondent, ValidationError};

/// Column limit for form_submissions.form_type
const MAX_FORM_TYPE_LEN: usize = 50;

/// A validated form submission, ready to persist.
///
/// `responses` is stored verbatim as jsonb; any JSON document except `null`
/// is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub respondent: NewRespondent,
    pub form_type: String,
    pub responses: Value,
}

impl NewSubmission {
    pub fn new(
        respondent: NewRespondent,
        form_type: &str,
        responses: Option<Value>,
    ) -> Result<Self, ValidationError> {
        let form_type = bounded("formType", form_type, MAX_FORM_TYPE_LEN)?;
        let responses = match responses {
            Some(Value::Null) | None => return Err(ValidationError::Empty { field: "responses" }),
            Some(v) => v,
        };

        Ok(Self {
            respondent,
            form_type,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn respondent() -> NewRespondent {
        NewRespondent::new("A", "a@x.com", None).unwrap()
    }

    #[test]
    fn keeps_responses_verbatim() {
        let doc = json!({"q1": "yes", "nested": {"n": [1, 2.5, null, true]}});
        let s = NewSubmission::new(respondent(), "risk", Some(doc.clone())).unwrap();
        assert_eq!(s.responses, doc);
        assert_eq!(s.form_type, "risk");
    }

    #[test]
    fn non_object_responses_are_allowed() {
        assert!(NewSubmission::new(respondent(), "risk", Some(json!([1, 2]))).is_ok());
        assert!(NewSubmission::new(respondent(), "risk", Some(json!("free text"))).is_ok());
    }

    #[test]
    fn rejects_missing_responses() {
        let err = NewSubmission::new(respondent(), "risk", None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "responses" });

        let err = NewSubmission::new(respondent(), "risk", Some(Value::Null)).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "responses" });
    }

    #[test]
    fn form_type_max_length() {
        let long = "f".repeat(51);
        let err = NewSubmission::new(respondent(), &long, Some(json!({}))).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 50, .. }));
    }
}
