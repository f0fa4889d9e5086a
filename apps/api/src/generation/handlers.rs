//! Axum route handler for question generation.

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::generation::generator::{
    generate_questions, GeneratedQuestion, GenerationParams, DEFAULT_COUNT, MAX_COUNT,
    MIN_KEYWORDS,
};
use crate::questions::store;
use crate::state::AppState;

const DEFAULT_QUESTION_TYPE: &str = "what";

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuery {
    /// Comma-separated.
    pub keywords: Option<String>,
    pub question_type: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub question_type: String,
    pub keywords: Vec<String>,
    pub questions: Vec<GeneratedQuestion>,
}

/// Checks the query before any database work.
pub fn parse_generate_query(query: GenerateQuery) -> Result<GenerationParams, AppError> {
    let keywords: Vec<String> = query
        .keywords
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keywords.len() < MIN_KEYWORDS {
        return Err(AppError::Validation(format!(
            "At least {MIN_KEYWORDS} comma-separated keywords are required"
        )));
    }

    // Oversized requests are clamped rather than refused
    let count = query.count.unwrap_or(DEFAULT_COUNT);
    if count == 0 {
        return Err(AppError::Validation("count must be at least 1".to_string()));
    }
    let count = count.min(MAX_COUNT);

    let question_type = query
        .question_type
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_QUESTION_TYPE.to_string());

    Ok(GenerationParams {
        keywords,
        question_type,
        count,
    })
}

/// GET /api/v1/questions/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<GenerateQuery>,
) -> Result<Json<GenerateResponse>, AppError> {
    let params = parse_generate_query(query)?;

    let corpus = store::all_texts(&state.db).await?;
    if corpus.is_empty() {
        return Err(AppError::Validation(
            "No stored questions available to generate from".to_string(),
        ));
    }

    let embeddings = state.embeddings.clone();
    let job = params.clone();
    let questions = tokio::task::spawn_blocking(move || {
        let mut rng = rand::thread_rng();
        generate_questions(&corpus, &job, &embeddings, &mut rng)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Generation task failed: {e}")))?;

    info!(
        "Generated {} of {} requested '{}' questions",
        questions.len(),
        params.count,
        params.question_type
    );

    let message = questions
        .is_empty()
        .then_some("No questions could be generated with the given keywords.");
    Ok(Json(GenerateResponse {
        message,
        question_type: params.question_type,
        keywords: params.keywords,
        questions,
    }))
}
