// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted host for desktop and CI builds where no native side exists.
//
// The real host lives on the other side of the process boundary and is not
// part of this workspace. `StubHost` records every posted descriptor and
// answers each one from a scripted reply queue, which is all the tests and
// a host-less desktop build need.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use serde_json::Value;
use tracing::warn;

use leitwerk_core::error::Result;

use crate::invoker::BridgeClient;
use crate::message::CommandDescriptor;
use crate::registry::CallbackRegistry;
use crate::traits::HostBridge;

/// How the stub answers the next posted command.
pub enum StubReply {
    /// Invoke the descriptor's success callback with this payload.
    Success(Value),
    /// Invoke the descriptor's failure callback with this payload.
    Failure(Value),
    /// Record the message and never answer it.
    Ignore,
}

#[derive(Default)]
struct StubState {
    posted: Vec<CommandDescriptor>,
    replies: VecDeque<StubReply>,
}

/// In-process stand-in for the native host.
///
/// Replies are dispatched synchronously inside `post`, through the registry
/// of the client this stub was connected to. An exhausted (or empty) script
/// behaves like a silent host: the message is recorded and the invocation
/// stays pending.
pub struct StubHost {
    registry: OnceLock<CallbackRegistry>,
    state: Mutex<StubState>,
}

impl StubHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registry: OnceLock::new(),
            state: Mutex::new(StubState::default()),
        })
    }

    /// Wire the stub to `client`'s registry so scripted replies can reach
    /// the registered callbacks. Call once, right after building the client.
    pub fn connect(&self, client: &BridgeClient) {
        let _ = self.registry.set(client.registry().clone());
    }

    /// Queue the reply for the next unanswered `post`.
    pub fn script(&self, reply: StubReply) {
        self.state
            .lock()
            .expect("stub state poisoned")
            .replies
            .push_back(reply);
    }

    /// All descriptors posted so far, oldest first.
    pub fn posted(&self) -> Vec<CommandDescriptor> {
        self.state.lock().expect("stub state poisoned").posted.clone()
    }

    /// The most recently posted descriptor.
    pub fn last_posted(&self) -> Option<CommandDescriptor> {
        self.state
            .lock()
            .expect("stub state poisoned")
            .posted
            .last()
            .cloned()
    }
}

impl HostBridge for StubHost {
    fn name(&self) -> &str {
        "stub"
    }

    fn post(&self, message: CommandDescriptor) -> Result<()> {
        let reply = {
            let mut state = self.state.lock().expect("stub state poisoned");
            state.posted.push(message.clone());
            state.replies.pop_front()
        };

        let Some(reply) = reply else {
            return Ok(()); // silent host
        };
        let Some(registry) = self.registry.get() else {
            warn!("stub host has a scripted reply but no connected registry");
            return Ok(());
        };

        match reply {
            StubReply::Success(payload) => {
                registry.dispatch(message.callback, payload);
            }
            StubReply::Failure(payload) => {
                registry.dispatch(message.error, payload);
            }
            StubReply::Ignore => {}
        }
        Ok(())
    }
}
