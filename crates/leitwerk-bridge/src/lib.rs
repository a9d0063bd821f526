// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leitwerk — Host bridge abstractions.
//
// This crate owns the outbound half of the bridge (the `HostBridge` trait
// and the command invoker) and the inbound half (the callback registry the
// host answers through). The native side implementing the bridge lives
// outside this workspace; `StubHost` stands in for it on desktop and CI.

pub mod invoker;
pub mod message;
pub mod registry;
pub mod stub;
pub mod traits;

pub use invoker::BridgeClient;
pub use message::{CommandDescriptor, args_from};
pub use registry::{Callback, CallbackRegistry};
pub use stub::{StubHost, StubReply};
pub use traits::HostBridge;
