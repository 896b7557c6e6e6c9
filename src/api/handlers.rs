//! Request handlers for the triage and appointment endpoints.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use validator::Validate;

use super::AppState;
use crate::engine::appointments::{self, Categorized, CategoryCounts};
use crate::engine::triage::{self, ResponseSet};
use crate::error::ApiError;
use crate::models::appointment::Appointment;

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub responses: ResponseSet,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategorizeRequest {
    pub appointments: Vec<Appointment>,
    /// ISO 8601 reference time, same formats as `appointment_datetime`;
    /// defaults to the server clock.
    #[serde(default)]
    pub now: Option<String>,
    /// Applied before categorizing, like the search box above the tabs.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub query: String,
}

#[derive(Debug, Serialize)]
struct CategorizeResponse<'a> {
    now: DateTime<Utc>,
    counts: CategoryCounts,
    #[serde(flatten)]
    buckets: Categorized<'a>,
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    total: usize,
    appointments: Vec<&'a Appointment>,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn questionnaire(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.protocol.questionnaire)
}

#[instrument(skip_all, fields(answers = body.responses.len()))]
pub async fn create_assessment(
    state: web::Data<AppState>,
    body: web::Json<AssessmentRequest>,
) -> Result<HttpResponse, ApiError> {
    triage::validate_responses(&state.protocol.questionnaire, &body.responses)?;

    let assessment = triage::assess(&state.protocol, &body.responses);
    Ok(HttpResponse::Ok().json(assessment))
}

pub async fn statuses() -> HttpResponse {
    HttpResponse::Ok().json(appointments::status_catalog())
}

#[instrument(skip_all, fields(appointments = body.appointments.len()))]
pub async fn categorize(body: web::Json<CategorizeRequest>) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let now = match body.now.as_deref() {
        Some(value) => parse_now(value)?,
        None => Utc::now(),
    };

    let query = body.query.as_deref().unwrap_or_default();
    let matching: Vec<Appointment> = appointments::filter_by_search(&body.appointments, query)
        .into_iter()
        .cloned()
        .collect();

    let buckets = appointments::categorize(&matching, now);
    if !buckets.warnings.is_empty() {
        info!(warnings = buckets.warnings.len(), "Categorized with malformed records");
    }

    Ok(HttpResponse::Ok().json(CategorizeResponse {
        now,
        counts: buckets.counts(),
        buckets,
    }))
}

pub async fn search(body: web::Json<SearchRequest>) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let found = appointments::filter_by_search(&body.appointments, &body.query);
    Ok(HttpResponse::Ok().json(SearchResponse {
        total: found.len(),
        appointments: found,
    }))
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, ApiError> {
    appointments::parse_datetime(value).ok_or_else(|| ApiError::Timestamp(value.to_string()))
}
