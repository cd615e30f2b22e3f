//! Mapping of transport failures onto the probe taxonomy.
//!
//! Precedence is fixed: a TLS failure wins over a timeout, a timeout over a
//! connect failure, and anything unrecognised is `UnknownError`.

use std::error::Error as StdError;
use vigil_types::ProbeStatus;

const TLS_MARKERS: &[&str] = &[
    "certificate",
    "tls",
    "ssl",
    "handshake",
    "rustls",
    "corrupt message",
];

const DETAIL_LIMIT: usize = 100;

pub fn classify_error(err: &reqwest::Error) -> ProbeStatus {
    if source_chain(err).iter().any(|msg| looks_like_tls_failure(msg)) {
        ProbeStatus::SslError
    } else if err.is_timeout() {
        ProbeStatus::Timeout
    } else if err.is_connect() {
        ProbeStatus::ConnectionError
    } else {
        ProbeStatus::UnknownError
    }
}

// The top-level reqwest message embeds the URL, so only causes are inspected.
fn source_chain(err: &reqwest::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages
}

pub fn looks_like_tls_failure(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TLS_MARKERS.iter().any(|marker| lowered.contains(marker))
}

pub fn error_detail(err: &reqwest::Error) -> String {
    let full = match source_chain(err).last() {
        Some(root) => format!("{}: {}", err, root),
        None => err.to_string(),
    };
    truncate(&full, DETAIL_LIMIT)
}

pub fn truncate(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        return message.to_string();
    }
    let cut: String = message.chars().take(limit).collect();
    format!("{}...", cut)
}
