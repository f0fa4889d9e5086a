use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::question::{QuestionRow, QuestionSummary};

pub struct NewQuestion {
    pub text: String,
    pub topics: Vec<String>,
    pub is_plagiarized: bool,
    pub plagiarism_score: f64,
    pub most_similar_question: Option<String>,
}

pub async fn insert_question(pool: &PgPool, new: NewQuestion) -> Result<QuestionRow> {
    sqlx::query_as::<_, QuestionRow>(
        r#"
        INSERT INTO questions (id, text, topics, is_plagiarized, plagiarism_score, most_similar_question)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.text)
    .bind(new.topics)
    .bind(new.is_plagiarized)
    .bind(new.plagiarism_score)
    .bind(new.most_similar_question)
    .fetch_one(pool)
    .await
    .context("Failed to insert question")
}

/// Every stored question text, oldest first. This is the plagiarism and generation corpus.
pub async fn all_texts(pool: &PgPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT text FROM questions ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .context("Failed to load question corpus")
}

/// Newest-first page of questions plus the total row count.
pub async fn list_page(pool: &PgPool, page: i64, limit: i64) -> Result<(Vec<QuestionSummary>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
        .context("Failed to count questions")?;

    let rows = sqlx::query_as::<_, QuestionSummary>(
        r#"
        SELECT id, text, topics, created_at, plagiarism_score
        FROM questions
        ORDER BY created_at DESC, id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await
    .context("Failed to list questions")?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<QuestionRow>> {
    sqlx::query_as::<_, QuestionRow>("SELECT * FROM questions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to load question")
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete question")?;
    Ok(result.rows_affected() > 0)
}
