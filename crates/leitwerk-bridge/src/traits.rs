// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-side entry point abstraction.
//
// The native host owns command dispatch: it reads a descriptor's command
// name, runs the command on its own schedule, and answers by invoking one of
// the callback ids carried in the descriptor through the client's
// `CallbackRegistry`. This crate never specifies that dispatch logic, only
// the shape handed across the boundary.

use leitwerk_core::error::Result;

use crate::message::CommandDescriptor;

/// Entry point through which all outbound commands cross the process
/// boundary.
///
/// `post` hands a message off and returns; it must not block waiting for the
/// host's answer. A host that accepts a message and never answers it is
/// legal — the pending invocation simply stays pending.
pub trait HostBridge: Send + Sync {
    /// Human-readable name of the host side (e.g. "webview ipc", "stub").
    fn name(&self) -> &str;

    /// Deliver one command descriptor to the host.
    fn post(&self, message: CommandDescriptor) -> Result<()>;
}
