// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leitwerk — Event relay layered on the command invoker.
//
// Subscribe, subscribe-once, and publish are each a structured command sent
// through the bridge to the host's reserved event module. The host pushes
// deliveries back through the callback registry.

pub mod protocol;
pub mod relay;

pub use protocol::Event;
pub use relay::{EventRelay, Subscription};
