//! Symptom checker session: answer accumulation and question flow.
//!
//! A [`TriageSession`] walks the questionnaire one position at a time. Answers
//! never move the session; the caller decides when to [`advance`] (immediately
//! after a single-choice answer, or on an explicit "next" for multi-select).
//! Advancing past the last question completes the session and computes the
//! assessment exactly once.
//!
//! [`advance`]: TriageSession::advance

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::engine::questions::{
    Outcome, Question, QuestionId, QuestionKind, Questionnaire, SeverityTier, TriageProtocol,
};
use crate::engine::severity::{compute_severity, SeverityRule};
use crate::error::{InvalidInput, TriageError};

/// A single selected value or a set of selected values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl Answer {
    pub fn single(value: impl Into<String>) -> Self {
        Answer::Single(value.into())
    }

    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multiple(values.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Answer::Single(_) => QuestionKind::Single,
            Answer::Multiple(_) => QuestionKind::Multiple,
        }
    }

    fn values(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        match self {
            Answer::Single(value) => Box::new(std::iter::once(value)),
            Answer::Multiple(values) => Box::new(values.iter()),
        }
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<QuestionId, Answer>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Answer> {
        self.0.get(&id)
    }

    pub fn insert(&mut self, id: QuestionId, answer: Answer) -> Option<Answer> {
        self.0.insert(id, answer)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, QuestionId, Answer> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Insert `value` into a multi-select answer, or remove it if present.
    fn toggle(&mut self, id: QuestionId, value: &str) {
        let entry = self
            .0
            .entry(id)
            .or_insert_with(|| Answer::Multiple(BTreeSet::new()));

        match entry {
            Answer::Multiple(values) => {
                if !values.remove(value) {
                    values.insert(value.to_string());
                }
            }
            other => *other = Answer::multiple([value]),
        }
    }
}

impl FromIterator<(QuestionId, Answer)> for ResponseSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Answer)>>(iter: T) -> Self {
        ResponseSet(iter.into_iter().collect())
    }
}

/// Severity tier with the outcome shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub tier: SeverityTier,
    pub rule: SeverityRule,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the question at this 1-based position.
    Answering { position: usize },
    Complete(Assessment),
}

/// Classify `responses` and look up the matching outcome.
#[instrument(skip_all, fields(answers = responses.len()))]
pub fn assess(protocol: &TriageProtocol, responses: &ResponseSet) -> Assessment {
    let classification = compute_severity(&protocol.questionnaire, responses);
    info!(tier = %classification.tier, rule = ?classification.rule, "Triage assessment complete");

    Assessment {
        tier: classification.tier,
        rule: classification.rule,
        outcome: protocol.outcomes.for_tier(classification.tier).clone(),
    }
}

/// Check that every answer refers to a known question and option and has the
/// question's shape.
pub fn validate_responses(
    questionnaire: &Questionnaire,
    responses: &ResponseSet,
) -> Result<(), InvalidInput> {
    for (&id, answer) in responses.iter() {
        let question = questionnaire
            .question(id)
            .ok_or(InvalidInput::UnknownQuestion(id))?;

        if answer.kind() != question.kind {
            return Err(InvalidInput::AnswerKindMismatch {
                question: id,
                expected: question.kind,
            });
        }

        if let Some(value) = answer.values().find(|v| question.option(v).is_none()) {
            return Err(InvalidInput::UnknownOption {
                question: id,
                value: value.clone(),
            });
        }
    }

    Ok(())
}

/// One pass through the symptom checker. The protocol is borrowed; the
/// session itself is owned by whoever drives the flow.
#[derive(Debug, Clone)]
pub struct TriageSession<'p> {
    protocol: &'p TriageProtocol,
    state: SessionState,
    responses: ResponseSet,
}

impl<'p> TriageSession<'p> {
    pub fn new(protocol: &'p TriageProtocol) -> Self {
        Self {
            protocol,
            state: SessionState::Answering { position: 1 },
            responses: ResponseSet::new(),
        }
    }

    /// Record an answer without moving through the flow.
    ///
    /// Single-choice answers replace any earlier value; multi-select answers
    /// toggle `value` in the selection.
    pub fn submit_answer(&mut self, question_id: QuestionId, value: &str) -> Result<(), TriageError> {
        if self.is_complete() {
            return Err(TriageError::SessionComplete);
        }

        let question = self
            .protocol
            .questionnaire
            .question(question_id)
            .ok_or(InvalidInput::UnknownQuestion(question_id))?;

        if question.option(value).is_none() {
            return Err(InvalidInput::UnknownOption {
                question: question_id,
                value: value.to_string(),
            }
            .into());
        }

        match question.kind {
            QuestionKind::Single => {
                self.responses.insert(question_id, Answer::single(value));
            }
            QuestionKind::Multiple => self.responses.toggle(question_id, value),
        }

        debug!(question = question_id, value, "Recorded triage answer");
        Ok(())
    }

    /// Move to the next question, or complete the session from the last one.
    pub fn advance(&mut self) -> &SessionState {
        if let SessionState::Answering { position } = self.state {
            if position < self.protocol.questionnaire.len() {
                self.state = SessionState::Answering {
                    position: position + 1,
                };
            } else {
                self.state = SessionState::Complete(assess(self.protocol, &self.responses));
            }
        }

        &self.state
    }

    /// Step back one question. No-op on the first question and once complete.
    pub fn go_back(&mut self) -> &SessionState {
        if let SessionState::Answering { position } = self.state {
            if position > 1 {
                self.state = SessionState::Answering {
                    position: position - 1,
                };
            }
        }

        &self.state
    }

    pub fn reset(&mut self) {
        self.responses.clear();
        self.state = SessionState::Answering { position: 1 };
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn position(&self) -> Option<usize> {
        match self.state {
            SessionState::Answering { position } => Some(position),
            SessionState::Complete(_) => None,
        }
    }

    pub fn current_question(&self) -> Option<&'p Question> {
        self.position()
            .and_then(|position| self.protocol.questionnaire.at(position))
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.state {
            SessionState::Complete(assessment) => Some(assessment),
            SessionState::Answering { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete(_))
    }

    /// Fraction of the flow reached, for the progress bar.
    pub fn progress(&self) -> f32 {
        let total = self.protocol.questionnaire.len();
        match self.position() {
            Some(position) if total > 0 => position as f32 / total as f32,
            _ => 1.0,
        }
    }
}
