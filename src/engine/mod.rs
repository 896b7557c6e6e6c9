//! Portal logic: symptom triage and appointment categorization.

pub mod appointments;
pub mod questions;
pub mod severity;
pub mod triage;

pub use appointments::{categorize, filter_by_search, Categorized, CategoryCounts, CategorizeWarning};
pub use questions::{Questionnaire, SeverityTier, TriageProtocol};
pub use severity::{compute_severity, Classification, SeverityRule};
pub use triage::{assess, Answer, Assessment, ResponseSet, SessionState, TriageSession};
