// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget-token validation.
//!
//! Every failure path converges to `AnswerkitError::Unauthorized`. The
//! specific cause (missing token, unknown hash, expiry, origin mismatch) is
//! logged at warn level and must never reach the caller; differentiated
//! responses would allow token and domain enumeration.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use answerkit_core::AnswerkitError;
use answerkit_core::traits::TokenStore;
use answerkit_core::types::{TokenContext, WidgetToken};

use crate::secrets::hash_token;

pub struct TokenAuthorizer {
    store: Arc<dyn TokenStore>,
    /// Relaxed (development) mode tolerates a missing request origin.
    relaxed: bool,
}

impl TokenAuthorizer {
    pub fn new(store: Arc<dyn TokenStore>, relaxed: bool) -> Self {
        Self { store, relaxed }
    }

    /// Validate a raw token against the store and the origin policy.
    ///
    /// `origin` must already be normalized to scheme + host.
    pub async fn validate(
        &self,
        raw_token: Option<&str>,
        origin: Option<&str>,
    ) -> Result<TokenContext, AnswerkitError> {
        let Some(raw) = raw_token.filter(|t| !t.is_empty()) else {
            warn!("token validation failed: no token presented");
            return Err(AnswerkitError::Unauthorized);
        };

        let hash = hash_token(raw);
        let Some(token) = self.store.find_by_hash(&hash).await? else {
            warn!("token validation failed: unknown token");
            return Err(AnswerkitError::Unauthorized);
        };

        if let Some(expires_at) = token.expires_at {
            if expires_at <= Utc::now() {
                warn!(token_id = %token.id.0, "token validation failed: expired");
                return Err(AnswerkitError::Unauthorized);
            }
        }

        self.check_origin(&token, origin)?;

        // Best-effort usage stamp; a write failure must not fail the
        // authorization decision.
        let store = self.store.clone();
        let token_id = token.id.clone();
        tokio::spawn(async move {
            if let Err(e) = store.touch_last_used(&token_id).await {
                warn!(token_id = %token_id.0, error = %e, "failed to touch token last_used");
            }
        });

        debug!(token_id = %token.id.0, bot_id = %token.bot_id.0, "token validated");
        Ok(TokenContext {
            token_id: token.id,
            bot_id: token.bot_id,
        })
    }

    fn check_origin(
        &self,
        token: &WidgetToken,
        origin: Option<&str>,
    ) -> Result<(), AnswerkitError> {
        let Some(origin) = origin.filter(|o| !o.is_empty()) else {
            if self.relaxed {
                debug!(token_id = %token.id.0, "missing origin tolerated in relaxed mode");
                return Ok(());
            }
            warn!(token_id = %token.id.0, "token validation failed: no origin presented");
            return Err(AnswerkitError::Unauthorized);
        };

        // An empty allow-list places no origin restriction.
        if token.allowed_origins.is_empty() {
            return Ok(());
        }

        let origin_scheme = scheme_of(origin);
        let origin_host = host_of(origin);
        let matched = token.allowed_origins.iter().any(|allowed| {
            let allowed_host = host_of(allowed);
            if allowed_host.is_empty() || !origin_matches(origin_host, allowed_host) {
                return false;
            }
            // An allowed entry that pins a scheme must see that scheme; an
            // https entry never admits the http downgrade. Host-only entries
            // match on host alone.
            match scheme_of(allowed) {
                Some(allowed_scheme) => {
                    origin_scheme.is_some_and(|s| s.eq_ignore_ascii_case(allowed_scheme))
                }
                None => true,
            }
        });
        if matched {
            Ok(())
        } else {
            warn!(token_id = %token.id.0, origin, "token validation failed: origin not allowed");
            Err(AnswerkitError::Unauthorized)
        }
    }
}

/// Scheme component of an origin, or `None` for a bare domain.
fn scheme_of(origin: &str) -> Option<&str> {
    origin.split_once("://").map(|(scheme, _)| scheme)
}

/// Host component of an origin or bare domain, lowercased, port stripped.
fn host_of(origin: &str) -> &str {
    let rest = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin);
    let rest = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    rest.split(':').next().unwrap_or(rest)
}

/// Exact host match or dot-boundary subdomain match.
///
/// `sub.a.com` matches allowed `a.com`; `a.com.evil.com` does not. A plain
/// prefix rule is deliberately not used.
fn origin_matches(origin_host: &str, allowed_host: &str) -> bool {
    origin_host.eq_ignore_ascii_case(allowed_host)
        || origin_host
            .to_ascii_lowercase()
            .ends_with(&format!(".{}", allowed_host.to_ascii_lowercase()))
}
