use careportal::engine::{SessionState, SeverityRule, SeverityTier, TriageProtocol};
use careportal::TriageSession;

/// Drive the session the way the symptom checker does: single-choice
/// questions advance right after the answer, the multi-select waits for "next".
fn run(protocol: &TriageProtocol, singles: [&str; 4], extras: &[&str]) -> SessionState {
    let mut session = TriageSession::new(protocol);

    for (id, value) in (1..=4).zip(singles) {
        session.submit_answer(id, value).unwrap();
        session.advance();
    }
    for value in extras {
        session.submit_answer(5, value).unwrap();
    }
    session.advance().clone()
}

#[test]
fn breathing_with_moderate_fever_is_high() {
    let protocol = TriageProtocol::standard();
    let SessionState::Complete(assessment) =
        run(&protocol, ["self", "breathing", "hours", "moderate"], &[])
    else {
        panic!("session did not complete");
    };

    assert_eq!(assessment.tier, SeverityTier::High);
    assert_eq!(assessment.rule, SeverityRule::HighRiskSymptom);
}

#[test]
fn identical_answers_give_identical_outcomes() {
    let protocol = TriageProtocol::standard();
    let answers = ["elderly", "headache", "week", "low"];

    let first = run(&protocol, answers, &["nausea", "body_aches"]);
    let second = run(&protocol, answers, &["nausea", "body_aches"]);

    assert_eq!(first, second);
    match first {
        SessionState::Complete(assessment) => {
            assert_eq!(assessment.tier, SeverityTier::Medium);
            assert_eq!(assessment.outcome, protocol.outcomes.medium);
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn deselecting_a_symptom_lowers_the_tier() {
    let protocol = TriageProtocol::standard();

    let state = run(
        &protocol,
        ["self", "cough", "days", "none"],
        &["fatigue", "sore_throat", "fatigue"],
    );
    let SessionState::Complete(assessment) = state else {
        panic!("session did not complete");
    };

    assert_eq!(assessment.tier, SeverityTier::Low);
}
