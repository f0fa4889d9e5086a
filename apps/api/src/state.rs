use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::generation::embeddings::EmbeddingTable;
use crate::similarity::SimilarityScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Revoked session ids.
    pub redis: RedisClient,
    pub s3: S3Client,
    pub config: Config,
    /// Loaded once at startup; empty when no embeddings file is configured.
    pub embeddings: Arc<EmbeddingTable>,
    /// Scorer used to annotate stored questions. Default: DiceScorer.
    pub scorer: Arc<dyn SimilarityScorer>,
}
