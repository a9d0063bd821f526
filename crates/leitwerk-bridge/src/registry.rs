// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback registry — the inbound half of the bridge.
//
// Every function the host may call back into is registered here under a
// random integer id. The host answers a command (or delivers an event) by
// invoking that id with a JSON payload through `dispatch`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ring::rand::{SecureRandom, SystemRandom};
use serde_json::Value;
use tracing::{debug, warn};

use leitwerk_core::types::CallbackId;

/// A registered inbound callback.
///
/// `OnceOnly` entries are removed from the table before their function runs,
/// so duplicate or re-entrant delivery from the host observes the handler at
/// most once. `Persistent` entries stay until explicitly removed; the caller
/// is responsible for also issuing the matching host-side cancellation.
pub enum Callback {
    /// Stays registered until `remove` is called.
    Persistent(Arc<dyn Fn(Value) + Send + Sync>),
    /// Self-removes on first invocation.
    OnceOnly(Box<dyn FnOnce(Value) + Send>),
}

/// What `dispatch` pulled out of the table, moved outside the lock before
/// the function runs so handlers may re-enter the registry.
enum Dispatched {
    Persistent(Arc<dyn Fn(Value) + Send + Sync>),
    Once(Box<dyn FnOnce(Value) + Send>),
}

/// Table of host-invokable callbacks, keyed by random id.
///
/// Cheaply cloneable — clones share one table. The bridge client holds a
/// clone for registration; whatever receives inbound host calls holds
/// another and routes them through `dispatch`.
#[derive(Clone)]
pub struct CallbackRegistry {
    slots: Arc<Mutex<HashMap<CallbackId, Callback>>>,
    rng: Arc<SystemRandom>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            rng: Arc::new(SystemRandom::new()),
        }
    }

    /// Register a callback and return its freshly drawn id.
    ///
    /// Registration cannot fail. Ids are random 32-bit integers re-drawn
    /// until they miss every currently live registration.
    pub fn register(&self, callback: Callback) -> CallbackId {
        let mut slots = self.slots.lock().expect("registry lock poisoned");
        let id = loop {
            let candidate = CallbackId(self.random_u32());
            if !slots.contains_key(&candidate) {
                break candidate;
            }
        };
        slots.insert(id, callback);
        debug!(%id, live = slots.len(), "callback registered");
        id
    }

    /// Register a callback that self-removes on first invocation.
    pub fn register_once(&self, f: impl FnOnce(Value) + Send + 'static) -> CallbackId {
        self.register(Callback::OnceOnly(Box::new(f)))
    }

    /// Register a callback that stays until explicitly removed.
    pub fn register_persistent(
        &self,
        f: impl Fn(Value) + Send + Sync + 'static,
    ) -> CallbackId {
        self.register(Callback::Persistent(Arc::new(f)))
    }

    /// Remove a registration. Returns `false` if the id was not live (fired
    /// fire-once entries count as not live).
    pub fn remove(&self, id: CallbackId) -> bool {
        let removed = self
            .slots
            .lock()
            .expect("registry lock poisoned")
            .remove(&id)
            .is_some();
        if removed {
            debug!(%id, "callback removed");
        }
        removed
    }

    /// Invoke the callback registered under `id` with `payload`.
    ///
    /// Fire-once entries leave the table before their function runs, so a
    /// duplicate delivery finds a vacant slot and returns `false`. An
    /// unknown id is logged and ignored — whether the host should have known
    /// better is the host's problem.
    pub fn dispatch(&self, id: CallbackId, payload: Value) -> bool {
        let dispatched = {
            let mut slots = self.slots.lock().expect("registry lock poisoned");
            match slots.remove(&id) {
                Some(Callback::Persistent(f)) => {
                    // Persistent entries stay in the table; only a clone of
                    // the function leaves the lock.
                    let call = Arc::clone(&f);
                    slots.insert(id, Callback::Persistent(f));
                    Dispatched::Persistent(call)
                }
                Some(Callback::OnceOnly(f)) => Dispatched::Once(f),
                None => {
                    warn!(%id, "host invoked unknown callback id");
                    return false;
                }
            }
        };

        // The lock is released here: handlers are free to register, remove,
        // or dispatch further callbacks.
        match dispatched {
            Dispatched::Persistent(f) => f(payload),
            Dispatched::Once(f) => f(payload),
        }
        true
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.slots.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn random_u32(&self) -> u32 {
        let mut bytes = [0u8; 4];
        // The system RNG only fails if the OS entropy source is unusable,
        // in which case nothing in this process can be trusted anyway.
        self.rng
            .fill(&mut bytes)
            .expect("system RNG unavailable");
        u32::from_le_bytes(bytes)
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
