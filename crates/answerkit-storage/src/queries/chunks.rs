// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunk storage and in-process cosine similarity search.
//!
//! Embeddings are stored as little-endian f32 BLOBs. Search is an exact scan
//! over one bot's chunks; corpora are small enough per tenant that an index
//! structure is not worth the write-path complexity.

use chrono::Utc;
use rusqlite::params;

use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, RetrievedChunk};

use crate::database::{Database, map_tr_err};
use crate::queries::to_ts;

/// Serialize an embedding vector to a little-endian f32 BLOB.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vec.len() * 4);
    for v in vec {
        blob.extend_from_slice(&v.to_le_bytes());
    }
    blob
}

/// Deserialize a little-endian f32 BLOB back into an embedding vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Cosine similarity of two vectors. Zero when either is empty, zero-length,
/// or the dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Insert one chunk with its embedding, returning the assigned id.
pub async fn insert_chunk(
    db: &Database,
    bot_id: &BotId,
    heading: Option<&str>,
    excerpt: &str,
    embedding: &[f32],
) -> Result<String, AnswerkitError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let bot_id = bot_id.0.clone();
    let heading = heading.map(str::to_string);
    let excerpt = excerpt.to_string();
    let blob = vec_to_blob(embedding);
    let now = to_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chunks (id, bot_id, heading, excerpt, embedding, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![row_id, bot_id, heading, excerpt, blob, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

/// Exact cosine search over one bot's chunks.
///
/// Results are ordered by descending score, filtered to `score >= threshold`,
/// capped at `limit`. Other tenants' chunks are never scanned.
pub async fn search_similar(
    db: &Database,
    bot_id: &BotId,
    query_embedding: &[f32],
    threshold: f32,
    limit: usize,
) -> Result<Vec<RetrievedChunk>, AnswerkitError> {
    let bot_id = bot_id.0.clone();
    let query = query_embedding.to_vec();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, heading, excerpt, embedding FROM chunks WHERE bot_id = ?1",
            )?;
            let rows = stmt.query_map(params![bot_id], |row| {
                let id: String = row.get(0)?;
                let heading: Option<String> = row.get(1)?;
                let excerpt: String = row.get(2)?;
                let blob: Vec<u8> = row.get(3)?;
                Ok((id, heading, excerpt, blob))
            })?;

            let mut scored = Vec::new();
            for row in rows {
                let (id, heading, excerpt, blob) = row?;
                let embedding = blob_to_vec(&blob);
                let score = cosine_similarity(&query, &embedding);
                if score >= threshold {
                    scored.push(RetrievedChunk {
                        id,
                        heading,
                        excerpt,
                        score,
                    });
                }
            }
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(limit);
            Ok(scored)
        })
        .await
        .map_err(map_tr_err)
}
