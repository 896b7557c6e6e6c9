//! Error types for the triage engine, protocol loading and the HTTP API.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::engine::questions::{QuestionId, QuestionKind};

/// A reference to a question or option that the active questionnaire does not define.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("unknown question id {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {question} has no option '{value}'")]
    UnknownOption { question: QuestionId, value: String },

    #[error("question {question} expects a {expected} answer")]
    AnswerKindMismatch {
        question: QuestionId,
        expected: QuestionKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("triage session is complete; reset it before answering again")]
    SessionComplete,
}

/// Static triage configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("questionnaire has no questions")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question {question} defines option '{value}' more than once")]
    DuplicateOption { question: QuestionId, value: String },

    #[error("{role} question {id} is not part of the questionnaire")]
    MissingRole { role: &'static str, id: QuestionId },

    #[error("{role} question {id} must be a {expected} question")]
    RoleKind {
        role: &'static str,
        id: QuestionId,
        expected: QuestionKind,
    },

    #[error("failed to read triage protocol: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse triage protocol: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the HTTP handlers. Every variant is a client error
/// rendered as `{ "error", "message" }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("request validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("malformed request body: {0}")]
    Payload(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Timestamp(_) => "invalid_timestamp",
            ApiError::Payload(_) => "invalid_payload",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        })
    }
}
