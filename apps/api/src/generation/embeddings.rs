//! Static word embeddings (GloVe text format) and nearest-word lookup.
//!
//! The table is loaded once at startup and shared read-only through `AppState`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct EmbeddingTable {
    dims: usize,
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    index: HashMap<String, usize>,
}

/// Counters reported after parsing an embeddings file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
}

impl EmbeddingTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads a GloVe-format file: `word v1 v2 ... vn` per line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read embeddings file {}", path.display()))?;
        let (table, stats) = Self::parse(&raw);
        info!(
            "Loaded {} embeddings ({} dims) from {}",
            stats.loaded,
            table.dims,
            path.display()
        );
        if stats.skipped > 0 {
            warn!("Skipped {} malformed embedding lines", stats.skipped);
        }
        Ok(table)
    }

    /// Parses embeddings from text. Malformed lines, lines with non-finite
    /// components and lines whose dimension differs from the first vector are
    /// skipped.
    pub fn parse(raw: &str) -> (Self, LoadStats) {
        let mut table = EmbeddingTable::default();
        let mut stats = LoadStats::default();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let vector: Result<Vec<f32>, _> = parts.map(str::parse::<f32>).collect();
            let vector = match vector {
                Ok(v) if !v.is_empty() && v.iter().all(|x| x.is_finite()) => v,
                _ => {
                    stats.skipped += 1;
                    continue;
                }
            };
            if table.dims == 0 {
                table.dims = vector.len();
            } else if vector.len() != table.dims {
                stats.skipped += 1;
                continue;
            }
            table.insert(word.to_lowercase(), vector);
            stats.loaded += 1;
        }

        (table, stats)
    }

    fn insert(&mut self, word: String, vector: Vec<f32>) {
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if let Some(&existing) = self.index.get(&word) {
            self.vectors[existing] = vector;
            self.norms[existing] = norm;
            return;
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
        self.norms.push(norm);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Vocabulary word (other than `word` itself) with the highest cosine
    /// similarity to `word`. Returns `word` unchanged when it is out of vocabulary.
    pub fn nearest(&self, word: &str) -> String {
        let key = word.to_lowercase();
        let Some(&query) = self.index.get(&key) else {
            return word.to_string();
        };
        let query_norm = self.norms[query];
        if query_norm == 0.0 {
            return word.to_string();
        }
        let query_vec = &self.vectors[query];

        let mut best: Option<(usize, f32)> = None;
        for (i, (vector, &norm)) in self.vectors.iter().zip(&self.norms).enumerate() {
            if i == query || norm == 0.0 {
                continue;
            }
            let dot: f32 = query_vec.iter().zip(vector).map(|(a, b)| a * b).sum();
            let similarity = dot / (query_norm * norm);
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((i, similarity));
            }
        }

        match best {
            Some((i, _)) => self.words[i].clone(),
            None => word.to_string(),
        }
    }
}
