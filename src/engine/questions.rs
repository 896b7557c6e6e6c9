//! Static triage configuration: the questionnaire, the roles the severity
//! rules read from it, and the per-tier outcome table.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ProtocolError;

pub type QuestionId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Single,
    Multiple,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => f.write_str("single"),
            QuestionKind::Multiple => f.write_str("multiple"),
        }
    }
}

/// Triage outcome tier, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityTier::Low => f.write_str("low"),
            SeverityTier::Medium => f.write_str("medium"),
            SeverityTier::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_hint: Option<SeverityTier>,
    /// "None of these" choice; never counted as a symptom.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub none_option: bool,
}

impl AnswerOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            severity_hint: None,
            none_option: false,
        }
    }

    fn hint(mut self, tier: SeverityTier) -> Self {
        self.severity_hint = Some(tier);
        self
    }

    fn none(mut self) -> Self {
        self.none_option = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Which questions the severity rules consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRoles {
    pub main_symptom: QuestionId,
    pub fever: QuestionId,
    pub additional_symptoms: QuestionId,
}

/// Ordered question list; position defines the flow order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub questions: Vec<Question>,
    pub roles: QuestionRoles,
}

impl Questionnaire {
    /// The symptom checker's built-in five questions.
    pub fn standard() -> Self {
        use SeverityTier::*;

        let questions = vec![
            Question {
                id: 1,
                prompt: "Who is experiencing the symptoms?".into(),
                kind: QuestionKind::Single,
                options: vec![
                    AnswerOption::new("self", "Myself"),
                    AnswerOption::new("child", "My child"),
                    AnswerOption::new("elderly", "An elderly family member"),
                    AnswerOption::new("other", "Someone else"),
                ],
            },
            Question {
                id: 2,
                prompt: "What is the main symptom?".into(),
                kind: QuestionKind::Single,
                options: vec![
                    AnswerOption::new("fever", "Fever"),
                    AnswerOption::new("cough", "Cough"),
                    AnswerOption::new("headache", "Headache"),
                    AnswerOption::new("stomach", "Stomach pain"),
                    AnswerOption::new("rash", "Skin rash"),
                    AnswerOption::new("breathing", "Difficulty breathing").hint(High),
                    AnswerOption::new("pain", "Severe pain").hint(High),
                ],
            },
            Question {
                id: 3,
                prompt: "How long have the symptoms lasted?".into(),
                kind: QuestionKind::Single,
                options: vec![
                    AnswerOption::new("hours", "A few hours"),
                    AnswerOption::new("days", "1-3 days"),
                    AnswerOption::new("week", "About a week"),
                    AnswerOption::new("longer", "More than a week"),
                ],
            },
            Question {
                id: 4,
                prompt: "Is there a fever?".into(),
                kind: QuestionKind::Single,
                options: vec![
                    AnswerOption::new("none", "No fever"),
                    AnswerOption::new("low", "Low grade (37.5-38°C)").hint(Low),
                    AnswerOption::new("moderate", "Moderate (38-39°C)").hint(Medium),
                    AnswerOption::new("high", "High (above 39°C)").hint(High),
                ],
            },
            Question {
                id: 5,
                prompt: "Any additional symptoms?".into(),
                kind: QuestionKind::Multiple,
                options: vec![
                    AnswerOption::new("breathing", "Shortness of breath").hint(High),
                    AnswerOption::new("nausea", "Nausea or vomiting"),
                    AnswerOption::new("fatigue", "Fatigue"),
                    AnswerOption::new("body_aches", "Body aches"),
                    AnswerOption::new("sore_throat", "Sore throat"),
                    AnswerOption::new("none", "None of these").none(),
                ],
            },
        ];

        Self {
            questions,
            roles: QuestionRoles {
                main_symptom: 2,
                fever: 4,
                additional_symptoms: 5,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Question at a 1-based flow position.
    pub fn at(&self, position: usize) -> Option<&Question> {
        position.checked_sub(1).and_then(|i| self.questions.get(i))
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.questions.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let mut ids = HashSet::new();
        for question in &self.questions {
            if !ids.insert(question.id) {
                return Err(ProtocolError::DuplicateQuestion(question.id));
            }

            let mut values = HashSet::new();
            for option in &question.options {
                if !values.insert(option.value.as_str()) {
                    return Err(ProtocolError::DuplicateOption {
                        question: question.id,
                        value: option.value.clone(),
                    });
                }
            }
        }

        let roles = [
            ("main symptom", self.roles.main_symptom, QuestionKind::Single),
            ("fever", self.roles.fever, QuestionKind::Single),
            (
                "additional symptoms",
                self.roles.additional_symptoms,
                QuestionKind::Multiple,
            ),
        ];
        for (role, id, expected) in roles {
            let question = self
                .question(id)
                .ok_or(ProtocolError::MissingRole { role, id })?;
            if question.kind != expected {
                return Err(ProtocolError::RoleKind { role, id, expected });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    BookAppointment,
    ChatWithDoctor,
    EmergencyServices,
    FindClinic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub title: String,
    pub recommendations: Vec<String>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable {
    pub low: Outcome,
    pub medium: Outcome,
    pub high: Outcome,
}

impl OutcomeTable {
    pub fn standard() -> Self {
        fn outcome(title: &str, recommendations: &[&str], actions: &[(ActionKind, &str)]) -> Outcome {
            Outcome {
                title: title.to_string(),
                recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
                actions: actions
                    .iter()
                    .map(|(kind, label)| Action {
                        kind: *kind,
                        label: label.to_string(),
                    })
                    .collect(),
            }
        }

        Self {
            low: outcome(
                "Your symptoms can likely be managed at home",
                &[
                    "Rest and drink plenty of fluids",
                    "Monitor your symptoms over the next few days",
                    "Use over-the-counter remedies as directed",
                    "Book a visit if symptoms get worse or do not improve",
                ],
                &[
                    (ActionKind::ChatWithDoctor, "Chat with a doctor"),
                    (ActionKind::BookAppointment, "Book an appointment"),
                ],
            ),
            medium: outcome(
                "You should see a doctor soon",
                &[
                    "Schedule an appointment within the next 24-48 hours",
                    "Keep track of your temperature and other symptoms",
                    "Stay hydrated and get plenty of rest",
                    "Seek urgent care if symptoms suddenly worsen",
                ],
                &[
                    (ActionKind::BookAppointment, "Book an appointment"),
                    (ActionKind::ChatWithDoctor, "Chat with a doctor"),
                ],
            ),
            high: outcome(
                "Seek medical attention immediately",
                &[
                    "Call emergency services or go to the nearest emergency room",
                    "Do not drive yourself if you feel faint or short of breath",
                    "Bring a list of current medications with you",
                ],
                &[
                    (ActionKind::EmergencyServices, "Call emergency services"),
                    (ActionKind::FindClinic, "Find the nearest clinic"),
                ],
            ),
        }
    }

    pub fn for_tier(&self, tier: SeverityTier) -> &Outcome {
        match tier {
            SeverityTier::Low => &self.low,
            SeverityTier::Medium => &self.medium,
            SeverityTier::High => &self.high,
        }
    }
}

/// Complete static triage configuration shipped with the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageProtocol {
    pub questionnaire: Questionnaire,
    pub outcomes: OutcomeTable,
}

impl TriageProtocol {
    pub fn standard() -> Self {
        Self {
            questionnaire: Questionnaire::standard(),
            outcomes: OutcomeTable::standard(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        let protocol: TriageProtocol = serde_json::from_str(json)?;
        protocol.questionnaire.validate()?;
        Ok(protocol)
    }

    /// Load a replacement protocol from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let protocol = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            questions = protocol.questionnaire.len(),
            "Loaded triage protocol"
        );
        Ok(protocol)
    }
}

impl Default for TriageProtocol {
    fn default() -> Self {
        Self::standard()
    }
}
