use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AuthMiddleware, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{HistoryParams, StartQuizRequest, SubmitAnswerRequest},
        response::SubmitAnswerResponse,
    },
};

/// Mounts the learner-facing quiz endpoints under `/api/quiz`, all behind
/// bearer authentication.
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/quiz")
            .wrap(AuthMiddleware)
            .service(start_quiz)
            .service(submit_answer)
            .service(get_progress)
            .service(abandon_quiz)
            .service(get_history),
    );
}

#[post("/start")]
async fn start_quiz(
    state: web::Data<AppState>,
    request: web::Json<StartQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let response = state
        .quiz_service
        .start_quiz(auth.subject_id(), &request.lesson_id)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/answer")]
async fn submit_answer(
    state: web::Data<AppState>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let subject_id = auth.subject_id();

    let outcome = state
        .quiz_service
        .submit_answer(subject_id, &request.question_id, &request.option_id)
        .await;

    let response = match outcome {
        Ok(response) => response,
        // The quiz is already scored and evicted; only storing the result failed.
        Err(AppError::PersistenceFailure {
            message,
            pending: Some(pending),
        }) => {
            log::warn!(
                "Retrying result persistence for user {} after: {}",
                subject_id,
                message
            );
            let result = state.quiz_service.persist_result(*pending).await?;
            let is_correct = result
                .detailed_results
                .iter()
                .find(|review| review.question_id == request.question_id)
                .is_some_and(|review| review.is_correct);
            SubmitAnswerResponse::Completed { is_correct, result }
        }
        Err(err) => return Err(err),
    };

    if response.accepted() {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::Conflict().json(response))
    }
}

#[get("/progress")]
async fn get_progress(state: web::Data<AppState>, auth: AuthenticatedUser) -> HttpResponse {
    let response = state.quiz_service.get_progress(auth.subject_id()).await;
    HttpResponse::Ok().json(response)
}

#[delete("/session")]
async fn abandon_quiz(state: web::Data<AppState>, auth: AuthenticatedUser) -> HttpResponse {
    let response = state.quiz_service.abandon_quiz(auth.subject_id()).await;
    HttpResponse::Ok().json(response)
}

#[get("/history")]
async fn get_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let limit = query.limit_or(state.config.quiz_history_limit);
    let history = state
        .quiz_service
        .get_history(auth.subject_id(), limit)
        .await?;
    Ok(HttpResponse::Ok().json(history))
}
