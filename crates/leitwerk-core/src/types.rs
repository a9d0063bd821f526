// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core wire types for the Leitwerk bridge.

use serde::{Deserialize, Serialize};

/// Integer handle naming a registered callback for one-time or repeated
/// invocation by the host.
///
/// Ids are drawn from a cryptographically sound source so that a freshly
/// registered callback cannot collide with one that is concurrently live.
/// On the wire this is a bare unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(pub u32);

impl std::fmt::Display for CallbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-assigned identifier for a live event subscription, used later to
/// cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label of the UI window an event is scoped to. An absent label means the
/// event is broadcast to every window.
pub type WindowLabel = String;
