// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-hook adapter.
//
// Bridges the relay to application code that wants exactly one forwarding
// callback for one well-known event name. The hook slot is re-read on every
// delivery, so the application can swap its callback without touching the
// underlying subscription.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info};

use leitwerk_core::error::Result;
use leitwerk_events::protocol::Event;
use leitwerk_events::relay::{EventRelay, Subscription};

type HookFn = Box<dyn Fn(Value) + Send + Sync>;

/// One externally-settable forwarding function plus at most one underlying
/// subscription.
///
/// State machine: UNSUBSCRIBED --set--> ACTIVE(hook) --set--> ACTIVE(hook')
/// --clear--> UNSUBSCRIBED. `set` while active replaces the hook in place
/// and never creates a second subscription. Deliveries that find an empty
/// slot are dropped, not buffered.
pub struct EventHook {
    relay: EventRelay,
    event: String,
    hook: Arc<Mutex<Option<HookFn>>>,
    // Held across the listen/unlisten awaits, hence the async mutex.
    subscription: tokio::sync::Mutex<Option<Subscription>>,
}

impl EventHook {
    /// Adapter for the well-known hook event named in the relay's config.
    pub fn new(relay: EventRelay) -> Self {
        let event = relay.config().hook_event.clone();
        Self::with_event(relay, event)
    }

    /// Adapter for an explicitly chosen event name.
    pub fn with_event(relay: EventRelay, event: impl Into<String>) -> Self {
        Self {
            relay,
            event: event.into(),
            hook: Arc::new(Mutex::new(None)),
            subscription: tokio::sync::Mutex::new(None),
        }
    }

    /// Install `callback` as the forwarding target, subscribing on first
    /// use.
    ///
    /// If the subscription cannot be established the callback is not
    /// installed and the error propagates. While already subscribed, the
    /// hook is replaced in place — subsequent deliveries reach only the
    /// newest callback.
    pub async fn set(&self, callback: impl Fn(Value) + Send + Sync + 'static) -> Result<()> {
        let mut active = self.subscription.lock().await;
        if active.is_none() {
            let hook = Arc::clone(&self.hook);
            let sub = self
                .relay
                .listen(&self.event, None, move |envelope: Event<Value>| {
                    // Re-read the slot on every delivery; an empty slot
                    // means the payload is dropped.
                    if let Some(f) = hook.lock().expect("hook slot poisoned").as_ref() {
                        f(envelope.payload);
                    }
                })
                .await?;
            info!(event = %self.event, id = %sub.id(), "hook subscription established");
            *active = Some(sub);
        }
        *self.hook.lock().expect("hook slot poisoned") = Some(Box::new(callback));
        Ok(())
    }

    /// Drop the forwarding callback and cancel the subscription if one
    /// exists.
    pub async fn clear(&self) -> Result<()> {
        self.hook.lock().expect("hook slot poisoned").take();
        if let Some(sub) = self.subscription.lock().await.take() {
            debug!(event = %self.event, "hook subscription cancelled");
            sub.unlisten().await?;
        }
        Ok(())
    }

    /// Whether a forwarding callback is currently installed.
    pub fn is_set(&self) -> bool {
        self.hook.lock().expect("hook slot poisoned").is_some()
    }

    /// Whether the underlying subscription exists.
    pub async fn is_active(&self) -> bool {
        self.subscription.lock().await.is_some()
    }
}
