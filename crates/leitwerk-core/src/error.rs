// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Leitwerk.

use thiserror::Error;

/// Top-level error type for all Leitwerk operations.
#[derive(Debug, Error)]
pub enum LeitwerkError {
    // -- Host-reported failures --
    #[error("host reported failure: {0}")]
    Host(serde_json::Value),

    // -- Bridge transport --
    #[error("bridge entry point rejected message: {0}")]
    Post(String),

    #[error("response channel dropped before the host answered")]
    ResponseDropped,

    // -- Event relay --
    #[error("unusable subscription acknowledgement: {0}")]
    Subscription(String),

    // -- Serialization / persistence --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeitwerkError>;
