// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit-sink trait.

use async_trait::async_trait;

use crate::error::AnswerkitError;
use crate::types::QueryRecord;

/// Append-only sink for answered-query audit rows.
///
/// Writes are fire-and-forget from the pipeline's perspective: the
/// orchestrator logs failures but never fails the response over them.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record, returning its assigned id.
    async fn append(&self, record: &QueryRecord) -> Result<String, AnswerkitError>;
}
