// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// File name used when persisting the configuration to a data directory.
const CONFIG_FILE: &str = "bridge.json";

/// Names the host-side entry points the bridge client talks to.
///
/// The defaults match the reference host; embedders with a different command
/// routing scheme override the fields before constructing the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Command name reserved for routing module messages (event traffic)
    /// to the host runtime.
    pub runtime_command: String,
    /// Module namespace the host dispatches event sub-commands under.
    pub event_module: String,
    /// Well-known event name the single-hook adapter subscribes to.
    pub hook_event: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            runtime_command: "runtime".to_owned(),
            event_module: "Event".to_owned(),
            hook_event: "host-event".to_owned(),
        }
    }
}

impl BridgeConfig {
    /// Load a persisted configuration from `data_dir`, or `None` if the file
    /// is missing or unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(data_dir.join(CONFIG_FILE)).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Write the configuration to `data_dir` as pretty-printed JSON.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}
