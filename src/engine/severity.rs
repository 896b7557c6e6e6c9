//! Rule-based severity classification of a completed response set.
//!
//! Rules are evaluated in a fixed order and the first match wins, so a
//! response set that satisfies both a `High` and a `Medium` rule is `High`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::questions::{AnswerOption, QuestionId, Questionnaire, SeverityTier};
use crate::engine::triage::{Answer, ResponseSet};

/// The rule that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityRule {
    /// Main symptom is itself a high-severity symptom.
    HighRiskSymptom,
    HighFever,
    /// Additional symptoms include a high-severity one (breathing difficulty).
    RedFlagSymptom,
    ModerateFever,
    /// More than one additional symptom, not counting "none".
    MultipleSymptoms,
    NoRiskFactors,
}

impl SeverityRule {
    pub fn tier(self) -> SeverityTier {
        match self {
            SeverityRule::HighRiskSymptom | SeverityRule::HighFever | SeverityRule::RedFlagSymptom => {
                SeverityTier::High
            }
            SeverityRule::ModerateFever | SeverityRule::MultipleSymptoms => SeverityTier::Medium,
            SeverityRule::NoRiskFactors => SeverityTier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub tier: SeverityTier,
    pub rule: SeverityRule,
}

impl From<SeverityRule> for Classification {
    fn from(rule: SeverityRule) -> Self {
        Self {
            tier: rule.tier(),
            rule,
        }
    }
}

/// Classify a response set. Unanswered questions and values the
/// questionnaire does not define match no rule.
pub fn compute_severity(questionnaire: &Questionnaire, responses: &ResponseSet) -> Classification {
    let roles = questionnaire.roles;
    let main_symptom = single_hint(questionnaire, responses, roles.main_symptom);
    let fever = single_hint(questionnaire, responses, roles.fever);
    let additional = selected_options(questionnaire, responses, roles.additional_symptoms);

    let rule = if main_symptom == Some(SeverityTier::High) {
        SeverityRule::HighRiskSymptom
    } else if fever == Some(SeverityTier::High) {
        SeverityRule::HighFever
    } else if additional
        .iter()
        .any(|o| o.severity_hint == Some(SeverityTier::High))
    {
        SeverityRule::RedFlagSymptom
    } else if fever == Some(SeverityTier::Medium) {
        SeverityRule::ModerateFever
    } else if additional.iter().filter(|o| !o.none_option).count() > 1 {
        SeverityRule::MultipleSymptoms
    } else {
        SeverityRule::NoRiskFactors
    };

    debug!(?rule, tier = %rule.tier(), "Computed triage severity");
    rule.into()
}

fn single_hint(
    questionnaire: &Questionnaire,
    responses: &ResponseSet,
    id: QuestionId,
) -> Option<SeverityTier> {
    let question = questionnaire.question(id)?;
    match responses.get(id)? {
        Answer::Single(value) => question.option(value)?.severity_hint,
        Answer::Multiple(_) => None,
    }
}

fn selected_options<'q>(
    questionnaire: &'q Questionnaire,
    responses: &ResponseSet,
    id: QuestionId,
) -> Vec<&'q AnswerOption> {
    let (Some(question), Some(Answer::Multiple(values))) =
        (questionnaire.question(id), responses.get(id))
    else {
        return Vec::new();
    };

    values.iter().filter_map(|v| question.option(v)).collect()
}
