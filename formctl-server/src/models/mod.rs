//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod respondent;
pub mod submission;
pub mod review;
pub mod insight;

pub use validation::ValidationError;
pub use respondent::{Email, NewRespondent};
pub use submission::NewSubmission;
pub use review::{NewReview, Rating};
pub use insight::{InsightDraft, InsightGenerator, SampleInsightGenerator};
