//! Axum route handlers for the Questions API.

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::question::{QuestionRow, QuestionSummary};
use crate::questions::extraction::{extract_questions, pdf_to_text};
use crate::questions::ingest::{save_questions, split_lines};
use crate::questions::store;
use crate::similarity::{best_match, SimilarityMethod};
use crate::state::AppState;
use crate::users::session::AdminUser;

const PDF_FIELD: &str = "pdf";
const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitQuestionsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuestionsResponse {
    pub message: String,
    pub questions: Vec<QuestionRow>,
}

#[derive(Debug, Serialize)]
pub struct ExtractedQuestion {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPdfResponse {
    pub questions: Vec<ExtractedQuestion>,
    pub incomplete: Vec<String>,
    pub undetected: Vec<String>,
    pub source_key: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckPlagiarismRequest {
    pub text: String,
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPlagiarismResponse {
    pub message: &'static str,
    pub plagiarism_score: f64,
    pub most_similar_question: Option<String>,
    pub is_plagiarized: bool,
    pub method: SimilarityMethod,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    pub questions: Vec<QuestionSummary>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Object key for an archived upload: `uploads/<uuid>-<sanitized name>`.
pub fn archive_key(id: Uuid, filename: Option<&str>) -> String {
    let name: String = filename
        .and_then(|f| f.rsplit(|c| c == '/' || c == '\\').next())
        .unwrap_or("upload.pdf")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.trim_matches('_').is_empty() {
        "upload.pdf".to_string()
    } else {
        name
    };
    format!("uploads/{id}-{name}")
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
    }
}

pub fn paginate(params: &PageQuery) -> Result<(i64, i64), AppError> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 || !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "page must be at least 1 and limit between 1 and {MAX_LIMIT}"
        )));
    }
    Ok((page, limit))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/questions
///
/// Stores each non-blank line as a question, annotated with its plagiarism
/// score against everything stored so far.
pub async fn handle_submit_questions(
    State(state): State<AppState>,
    AppJson(req): AppJson<SubmitQuestionsRequest>,
) -> Result<(StatusCode, Json<SubmitQuestionsResponse>), AppError> {
    let lines = split_lines(&req.text)?;
    let saved = save_questions(&state.db, lines, state.scorer.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitQuestionsResponse {
            message: format!("{} question(s) saved successfully", saved.len()),
            questions: saved,
        }),
    ))
}

/// POST /api/v1/questions/upload-pdf
///
/// Archives the PDF in object storage and returns the questions found in it
/// for review. Nothing is stored in the question bank.
pub async fn handle_upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadPdfResponse>, AppError> {
    let mut upload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("No PDF file uploaded".to_string()))?;
    if !bytes.starts_with(b"%PDF") {
        return Err(AppError::Validation("Uploaded file is not a PDF".to_string()));
    }

    let source_key = archive_key(Uuid::new_v4(), filename.as_deref());
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&source_key)
        .body(ByteStream::from(bytes.clone()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("PDF upload failed: {e}")))?;
    info!(
        "Archived {} byte PDF to s3://{}/{}",
        bytes.len(),
        state.config.s3_bucket,
        source_key
    );

    let extracted = tokio::task::spawn_blocking(move || {
        pdf_to_text(&bytes).map(|text| extract_questions(&text))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
    .map_err(|e| {
        warn!("Could not read uploaded PDF {source_key}: {e:?}");
        AppError::Validation("Could not extract text from the PDF".to_string())
    })?;

    info!(
        "Extracted {} complete, {} incomplete, {} undetected lines from {}",
        extracted.complete.len(),
        extracted.incomplete.len(),
        extracted.undetected.len(),
        source_key
    );

    Ok(Json(UploadPdfResponse {
        questions: extracted
            .complete
            .into_iter()
            .map(|text| ExtractedQuestion { text })
            .collect(),
        incomplete: extracted.incomplete,
        undetected: extracted.undetected,
        source_key,
    }))
}

/// POST /api/v1/questions/check-plagiarism
pub async fn handle_check_plagiarism(
    State(state): State<AppState>,
    AppJson(req): AppJson<CheckPlagiarismRequest>,
) -> Result<Json<CheckPlagiarismResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    let method = match req.method.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        None => SimilarityMethod::TokenOverlap,
        Some(raw) => raw.parse().map_err(AppError::Validation)?,
    };
    let scorer = if state.scorer.method() == method {
        state.scorer.clone()
    } else {
        method.scorer()
    };

    let corpus = store::all_texts(&state.db).await?;
    let found = best_match(text, corpus.iter().map(String::as_str), scorer.as_ref());

    Ok(Json(CheckPlagiarismResponse {
        message: "Plagiarism check completed",
        plagiarism_score: found.score,
        is_plagiarized: found.is_plagiarized(),
        most_similar_question: found.most_similar,
        method,
    }))
}

/// GET /api/v1/questions/uploaded-questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageQuery>,
) -> Result<Json<QuestionPage>, AppError> {
    let (page, limit) = paginate(&params)?;
    let (questions, total) = store::list_page(&state.db, page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(QuestionPage {
        questions,
        total,
        page,
        total_pages,
        has_more: page < total_pages,
    }))
}

/// GET /api/v1/questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionRow>, AppError> {
    store::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

/// DELETE /api/v1/questions/:id
pub async fn handle_delete_question(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !store::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Question {id} not found")));
    }
    info!("Question {id} deleted by admin {}", admin.user.id);
    Ok(Json(json!({ "message": "Question deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_key_sanitizes_filename() {
        let id = Uuid::nil();
        assert_eq!(
            archive_key(id, Some("Final Exam (2024).pdf")),
            format!("uploads/{id}-Final_Exam__2024_.pdf")
        );
        assert_eq!(
            archive_key(id, Some("../../etc/passwd")),
            format!("uploads/{id}-passwd")
        );
        assert_eq!(archive_key(id, None), format!("uploads/{id}-upload.pdf"));
        assert_eq!(archive_key(id, Some("???")), format!("uploads/{id}-upload.pdf"));
    }

    #[test]
    fn test_paginate_defaults_and_bounds() {
        assert_eq!(paginate(&PageQuery::default()).unwrap(), (1, 10));
        let bad = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(paginate(&bad).is_err());
        let too_many = PageQuery {
            page: Some(1),
            limit: Some(500),
        };
        assert!(paginate(&too_many).is_err());
    }
}
