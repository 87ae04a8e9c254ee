//! Insight drafts and the generator that produces them

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An insight before it is stored against a submission.
///
/// Priority runs from 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: i32,
    pub data: Option<Value>,
}

/// Turns a submission's answers into insight drafts.
///
/// Called inside the submission transaction, so implementations must not
/// block on I/O.
pub trait InsightGenerator: Send + Sync {
    fn generate(&self, form_type: &str, responses: &Value) -> Vec<InsightDraft>;
}

/// Placeholder generator: one fixed insight per submission, whatever the answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleInsightGenerator;

impl InsightGenerator for SampleInsightGenerator {
    fn generate(&self, _form_type: &str, _responses: &Value) -> Vec<InsightDraft> {
        vec![InsightDraft {
            title: "Sample Financial Insight".to_owned(),
            content: "This is a sample financial insight based on the submitted form.".to_owned(),
            category: "Finance".to_owned(),
            priority: 1,
            data: Some(json!({ "sample": "data" })),
        }]
    }
}

/// Any `Fn(form_type, responses)` works as a generator.
impl<F> InsightGenerator for F
where
    F: Fn(&str, &Value) -> Vec<InsightDraft> + Send + Sync,
{
    fn generate(&self, form_type: &str, responses: &Value) -> Vec<InsightDraft> {
        self(form_type, responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_generator_yields_one_insight() {
        let drafts = SampleInsightGenerator.generate("risk", &json!({"q1": "yes"}));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Sample Financial Insight");
        assert_eq!(drafts[0].category, "Finance");
        assert_eq!(drafts[0].priority, 1);
        assert_eq!(drafts[0].data, Some(json!({"sample": "data"})));
    }

    #[test]
    fn generators_are_object_safe() {
        struct PerForm;

        impl InsightGenerator for PerForm {
            fn generate(&self, form_type: &str, _responses: &Value) -> Vec<InsightDraft> {
                vec![InsightDraft {
                    title: format!("{form_type} summary"),
                    content: String::new(),
                    category: "Risk".into(),
                    priority: 3,
                    data: None,
                }]
            }
        }

        let generators: Vec<Box<dyn InsightGenerator>> =
            vec![Box::new(SampleInsightGenerator), Box::new(PerForm)];
        let titles: Vec<String> = generators
            .iter()
            .flat_map(|g| g.generate("risk", &Value::Null))
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, ["Sample Financial Insight", "risk summary"]);
    }

    #[test]
    fn closures_are_generators() {
        let per_answer = |form_type: &str, responses: &Value| {
            responses
                .as_object()
                .into_iter()
                .flatten()
                .map(|(question, _)| InsightDraft {
                    title: format!("{form_type}/{question}"),
                    content: String::new(),
                    category: "Risk".into(),
                    priority: 2,
                    data: None,
                })
                .collect::<Vec<_>>()
        };

        let generator: &dyn InsightGenerator = &per_answer;
        let drafts = generator.generate("risk", &json!({"q1": "yes"}));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "risk/q1");
        assert!(generator.generate("risk", &Value::Null).is_empty());
    }

    #[test]
    fn draft_serializes_with_plain_keys() {
        let draft = &SampleInsightGenerator.generate("risk", &Value::Null)[0];
        let value = serde_json::to_value(draft).unwrap();
        assert_eq!(value["title"], "Sample Financial Insight");
        assert_eq!(value["priority"], 1);
        assert_eq!(value["data"]["sample"], "data");
    }
}
