use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::Matchmaker;
use crate::error::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MakeMatchesRequest, MakeMatchesResponse};

/// Application state shared across all handlers
///
/// Holds only the default parameters; every request brings its own tables.
#[derive(Clone, Default)]
pub struct AppState {
    pub matchmaker: Matchmaker,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::post().to(make_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn error_status(err: &MatchError) -> StatusCode {
    match err {
        MatchError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Make matches endpoint
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "registrations": [{"firstName": "string", "lastName": "string", "gender": "male|female"}],
///   "history": [{"date": "string", "maleFirstName": "string", "maleLastName": "string",
///                "femaleFirstName": "string", "femaleLastName": "string"}],
///   "denyList": [{"firstName": "string", "lastName": "string", "gender": "male|female"}],
///   "maxIterations": 100,
///   "threshold": 1.0,
///   "seed": 42
/// }
/// ```
async fn make_matches(
    state: web::Data<AppState>,
    req: web::Json<MakeMatchesRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for make_matches request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let matchmaker = Matchmaker::new(req.params(state.matchmaker.params()));

    tracing::info!(
        "Making matches for {} registrations against {} history records",
        req.registrations.len(),
        req.history.len()
    );

    match matchmaker.make_matches(&req.registrations, &req.history, req.deny_list.as_deref()) {
        Ok(report) => {
            let response = MakeMatchesResponse::from_report(report);
            tracing::info!(
                "Returning {} pairs for run {} after {} attempts",
                response.pairs.len(),
                response.run_id,
                response.attempts
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            let status = error_status(&e);
            tracing::info!("Matchmaking failed: {}", e);
            HttpResponse::build(status).json(ErrorResponse {
                error: "Matchmaking failed".to_string(),
                message: e.to_string(),
                status_code: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn test_error_status() {
        assert_eq!(error_status(&MatchError::InvalidParameter("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&MatchError::InsufficientParticipants { side: Gender::Male }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
