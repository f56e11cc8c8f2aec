use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchReport, Pair};

/// Response for the make matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMatchesResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub pairs: Vec<Pair>,
    pub diagnostics: Vec<String>,
    pub attempts: usize,
    #[serde(rename = "budgetExhausted")]
    pub budget_exhausted: bool,
}

impl MakeMatchesResponse {
    pub fn from_report(report: MatchReport) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now(),
            pairs: report.pairs,
            diagnostics: report.diagnostics,
            attempts: report.attempts,
            budget_exhausted: report.budget_exhausted,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
