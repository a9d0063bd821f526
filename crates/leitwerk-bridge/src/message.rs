// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound message shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use leitwerk_core::error::{LeitwerkError, Result};
use leitwerk_core::types::CallbackId;

/// One command crossing the bridge: `{ cmd, callback, error, ...args }`.
///
/// `callback` and `error` are fire-once ids the host invokes with the
/// success or failure payload; the remaining argument fields are flattened
/// next to them, matching the wire shape the host expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Command name dispatched by the host.
    pub cmd: String,
    /// Fire-once id invoked with the success payload.
    pub callback: CallbackId,
    /// Fire-once id invoked with the failure payload.
    pub error: CallbackId,
    /// Command arguments, flattened into the top-level object.
    #[serde(flatten)]
    pub args: Map<String, Value>,
}

/// Serialize `value` into the flattened argument map of a descriptor.
///
/// The value must serialize to a JSON object (or null, which becomes an
/// empty map) — anything else cannot be flattened next to `cmd`.
pub fn args_from<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LeitwerkError::Post(format!(
            "command arguments must be a JSON object, got {other}"
        ))),
    }
}
