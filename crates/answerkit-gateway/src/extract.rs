// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential, origin, and fingerprint extraction from HTTP requests.

use axum::http::HeaderMap;

/// User-agent characters folded into the client fingerprint.
const UA_FINGERPRINT_LEN: usize = 50;

/// Pull the raw widget token from the Authorization header ("Bearer" or
/// "Token" scheme) or, failing that, a `token` query parameter.
pub fn extract_token(headers: &HeaderMap, query_token: Option<&str>) -> Option<String> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let value = value.trim();
        for scheme in ["Bearer ", "Token "] {
            if let Some(rest) = value.strip_prefix(scheme) {
                let rest = rest.trim();
                if !rest.is_empty() {
                    return Some(rest.to_string());
                }
            }
        }
    }
    query_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Caller origin normalized to scheme + host: the Origin header if present,
/// otherwise the Referer reduced to its scheme + host.
pub fn extract_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers.get("origin").and_then(|v| v.to_str().ok()) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && origin != "null" {
            return Some(origin.to_string());
        }
    }
    let referer = headers.get("referer").and_then(|v| v.to_str().ok())?;
    normalize_to_origin(referer.trim())
}

/// Reduce a URL to scheme + host, dropping path, query, and port-less
/// trailing slash.
fn normalize_to_origin(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next()?;
    if host.is_empty() {
        return None;
    }
    Some(format!("{scheme}://{host}"))
}

/// Client fingerprint for rate limiting: network address plus the leading
/// characters of the user agent.
pub fn fingerprint(client_addr: &str, headers: &HeaderMap) -> String {
    let ua: String = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .chars()
        .take(UA_FINGERPRINT_LEN)
        .collect();
    format!("{client_addr}:{ua}")
}
