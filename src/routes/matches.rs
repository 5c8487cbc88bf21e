use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{
    apply_suggestion, evaluate_suggestion, generate_participants, generate_random_preferences,
    run_gale_shapley, MatchingError, StableMatcher,
};
use crate::models::{
    ApplySuggestionRequest, ApplySuggestionResponse, ErrorResponse, HealthResponse,
    RandomPreferencesRequest, RandomPreferencesResponse, SolveRequest, SolveResponse,
};

/// Application state shared across all handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    pub matcher: StableMatcher,
    pub limits: MatchingSettings,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/preferences/random", web::post().to(random_preferences))
        .route("/matching/solve", web::post().to(solve))
        .route("/suggestions/apply", web::post().to(apply))
        .route("/suggestions/evaluate", web::post().to(evaluate));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Generate participants with random preferences
///
/// POST /api/v1/preferences/random
///
/// Request body:
/// ```json
/// { "size": 5 }
/// ```
async fn random_preferences(
    state: web::Data<AppState>,
    req: web::Json<RandomPreferencesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors.to_string());
    }

    let size = req.size.unwrap_or(state.limits.default_group_size);
    if size > state.limits.max_group_size {
        return validation_failed(format!(
            "size must be at most {}",
            state.limits.max_group_size
        ));
    }

    let participants = generate_participants(size);
    let (prefs_a, prefs_b) =
        generate_random_preferences(&participants.group_a, &participants.group_b);

    tracing::info!("Generated random preferences for {} participants per group", size);

    HttpResponse::Ok().json(RandomPreferencesResponse {
        group_a: participants.group_a,
        group_b: participants.group_b,
        prefs_a,
        prefs_b,
    })
}

/// Run a full matching pass
///
/// POST /api/v1/matching/solve
///
/// Request body:
/// ```json
/// {
///   "prefsA": { "A1": ["B1", "B2"], "A2": ["B2", "B1"] },
///   "prefsB": { "B1": ["A2", "A1"], "B2": ["A1", "A2"] }
/// }
/// ```
async fn solve(state: web::Data<AppState>, req: web::Json<SolveRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors.to_string());
    }

    match state.matcher.run(&req.prefs_a, &req.prefs_b) {
        Ok(run) => {
            tracing::info!(
                "Solved {}x{} instance: stability {:.3}, {} suggestions",
                req.prefs_a.len(),
                req.prefs_b.len(),
                run.metrics.stability_score,
                run.suggestions.len()
            );
            HttpResponse::Ok().json(SolveResponse {
                run_id: uuid::Uuid::new_v4(),
                computed_at: chrono::Utc::now(),
                run,
            })
        }
        Err(e) => matching_failed(e),
    }
}

/// Apply a suggestion, returning edited copies of both tables
///
/// POST /api/v1/suggestions/apply
async fn apply(req: web::Json<ApplySuggestionRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors.to_string());
    }

    match apply_suggestion(&req.suggestion, &req.prefs_a, &req.prefs_b) {
        Ok((prefs_a, prefs_b)) => HttpResponse::Ok().json(ApplySuggestionResponse { prefs_a, prefs_b }),
        Err(e) => matching_failed(e),
    }
}

/// Measure a suggestion by re-solving the edited tables
///
/// POST /api/v1/suggestions/evaluate
async fn evaluate(req: web::Json<ApplySuggestionRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors.to_string());
    }

    let matching = match &req.matching {
        Some(matching) => matching.clone(),
        None => match run_gale_shapley(&req.prefs_a, &req.prefs_b) {
            Ok(outcome) => outcome.matching,
            Err(e) => return matching_failed(e),
        },
    };

    match evaluate_suggestion(&req.suggestion, &matching, &req.prefs_a, &req.prefs_b) {
        Ok(impact) => HttpResponse::Ok().json(impact),
        Err(e) => matching_failed(e),
    }
}

fn validation_failed(message: String) -> HttpResponse {
    tracing::info!("Validation failed: {}", message);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn matching_failed(err: MatchingError) -> HttpResponse {
    tracing::warn!("Rejected matching input: {}", err);
    let error = match &err {
        MatchingError::EmptyInput => "Empty input",
        MatchingError::MalformedPreferences(_) => "Malformed preferences",
        MatchingError::UnknownParticipant(_) => "Unknown participant",
        MatchingError::SwapOutOfRange { .. } => "Swap out of range",
    };
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: 400,
    })
}
