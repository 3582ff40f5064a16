// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query pipeline: rate limit, authorize, quota, retrieve, generate, log.
//!
//! Stages run strictly in order and any failure terminates the request; the
//! only retries anywhere are the within-stage provider fallbacks. The audit
//! write is best-effort and never rolls back an answered request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use answerkit_core::AnswerkitError;
use answerkit_core::traits::{AuditSink, CompletionProvider};
use answerkit_core::types::{
    Citation, QueryAnswer, QueryRecord, SessionId, WidgetQueryRequest,
};

use crate::authorizer::TokenAuthorizer;
use crate::quota::QuotaGuard;
use crate::ratelimit::RateLimiter;
use crate::retrieval::RetrievalEngine;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the provided context to \
                                     answer. If unsure, say you don't know.";
const CONTEXT_PREVIEW_CHARS: usize = 1000;
const SUMMARY_CHARS: usize = 2000;
const FALLBACK_SESSION: &str = "server-session";

pub struct QueryPipeline {
    limiter: Arc<RateLimiter>,
    authorizer: TokenAuthorizer,
    quota: Arc<QuotaGuard>,
    retrieval: RetrievalEngine,
    completer: Arc<dyn CompletionProvider>,
    audit: Arc<dyn AuditSink>,
}

impl QueryPipeline {
    pub fn new(
        limiter: Arc<RateLimiter>,
        authorizer: TokenAuthorizer,
        quota: Arc<QuotaGuard>,
        retrieval: RetrievalEngine,
        completer: Arc<dyn CompletionProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            limiter,
            authorizer,
            quota,
            retrieval,
            completer,
            audit,
        }
    }

    /// Run one widget query through every stage.
    pub async fn handle(&self, request: WidgetQueryRequest) -> Result<QueryAnswer, AnswerkitError> {
        if !self.limiter.allow(&request.fingerprint) {
            return Err(AnswerkitError::RateLimited);
        }

        let ctx = self
            .authorizer
            .validate(request.raw_token.as_deref(), request.origin.as_deref())
            .await?;
        if ctx.bot_id != request.bot_id {
            warn!(
                token_bot = %ctx.bot_id.0,
                request_bot = %request.bot_id.0,
                "token is bound to a different bot"
            );
            return Err(AnswerkitError::Unauthorized);
        }

        self.quota.check_query_quota(&request.bot_id).await?;

        let started = Instant::now();
        let chunks = self
            .retrieval
            .retrieve(
                &request.bot_id,
                &request.query_text,
                request.top_k,
                request.min_score,
            )
            .await?;

        let context = chunks
            .iter()
            .map(|c| c.excerpt.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let citations: Vec<Citation> = chunks.iter().map(Citation::from).collect();

        let prompt = format!(
            "System prompt: {DEFAULT_SYSTEM_PROMPT}\n\n\
             Context:\n{context}\n\n\
             User question: {}\n\n\
             Answer concisely and cite sources by heading if helpful.",
            request.query_text
        );

        let completion = self.completer.complete(&prompt).await?;
        let latency_ms = started.elapsed().as_millis() as u64;
        info!(
            bot_id = %request.bot_id.0,
            citations = citations.len(),
            provider = completion.provider,
            latency_ms,
            "query answered"
        );

        let answer = QueryAnswer {
            answer: completion.text.clone(),
            citations: citations.clone(),
            context_preview: truncate_chars(&context, CONTEXT_PREVIEW_CHARS),
        };

        let record = QueryRecord {
            bot_id: request.bot_id.clone(),
            session_id: request
                .session_id
                .unwrap_or_else(|| SessionId(FALLBACK_SESSION.to_string())),
            query_text: request.query_text,
            page_url: request.page_url,
            returned_sources: citations,
            response_summary: truncate_chars(&completion.text, SUMMARY_CHARS),
            usage: completion.usage,
            confidence: None,
            latency_ms,
        };
        if let Err(e) = self.audit.append(&record).await {
            warn!(bot_id = %record.bot_id.0, error = %e, "failed to write audit row");
        }

        Ok(answer)
    }
}

/// Character-boundary-safe truncation.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
