use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub id: Uuid,
    pub text: String,
    pub topics: Vec<String>,
    pub is_plagiarized: bool,
    pub plagiarism_score: Option<f64>,
    pub most_similar_question: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Projection returned by the paginated listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: Uuid,
    pub text: String,
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub plagiarism_score: Option<f64>,
}
