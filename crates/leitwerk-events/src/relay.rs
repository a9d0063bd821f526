// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event relay — subscribe / subscribe-once / publish, each a structured
// command sent through the invoker to the host's event module.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use leitwerk_bridge::invoker::BridgeClient;
use leitwerk_bridge::message::args_from;
use leitwerk_core::config::BridgeConfig;
use leitwerk_core::error::{LeitwerkError, Result};
use leitwerk_core::types::{CallbackId, EventId};

use crate::protocol::{Event, EventCommand, ModuleMessage};

/// Relays named events between application handlers and the host.
///
/// Cheaply cloneable; clones share the underlying client.
#[derive(Clone)]
pub struct EventRelay {
    client: BridgeClient,
    config: BridgeConfig,
}

/// Live registration for a named event, cancelable via the host-assigned id.
///
/// Dropping a `Subscription` does NOT cancel it — the host keeps delivering
/// and the handler stays registered until `unlisten` is called. Calling
/// `unlisten` twice for the same host-side id is the caller's mistake;
/// whether the host tolerates an unknown id is its own affair.
pub struct Subscription {
    relay: EventRelay,
    event: String,
    id: EventId,
    handler: CallbackId,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

impl EventRelay {
    pub fn new(client: BridgeClient, config: BridgeConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &BridgeClient {
        &self.client
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Subscribe to `event`, optionally scoped to one window label.
    ///
    /// `handler` runs on every delivery until the returned subscription is
    /// cancelled. The host acknowledges the subscription with the id used
    /// later to unlisten.
    pub async fn listen<F>(
        &self,
        event: &str,
        window_label: Option<&str>,
        handler: F,
    ) -> Result<Subscription>
    where
        F: Fn(Event<Value>) + Send + Sync + 'static,
    {
        let registry = self.client.registry().clone();
        let event_name = event.to_owned();
        let handler_id = registry.register_persistent(move |value| {
            match serde_json::from_value::<Event<Value>>(value) {
                Ok(envelope) => handler(envelope),
                Err(e) => warn!(event = %event_name, "discarding malformed event envelope: {e}"),
            }
        });

        let args = self.module_args(EventCommand::Listen {
            event,
            window_label,
            handler: handler_id,
        })?;
        let ack = match self.client.invoke(&self.config.runtime_command, args).await {
            Ok(ack) => ack,
            Err(e) => {
                registry.remove(handler_id);
                return Err(e);
            }
        };

        let id: EventId = serde_json::from_value(ack).map_err(|e| {
            registry.remove(handler_id);
            LeitwerkError::Subscription(format!("listen acknowledged without an event id: {e}"))
        })?;
        debug!(event, %id, "subscribed");

        Ok(Subscription {
            relay: self.clone(),
            event: event.to_owned(),
            id,
            handler: handler_id,
        })
    }

    /// Subscribe to a single delivery of `event`.
    ///
    /// The real handler runs at most once even if the host delivers again
    /// before processing the cancellation; after the first delivery a
    /// detached unlisten is issued whose failure is swallowed.
    pub async fn once<F>(
        &self,
        event: &str,
        window_label: Option<&str>,
        handler: F,
    ) -> Result<Subscription>
    where
        F: FnOnce(Event<Value>) + Send + 'static,
    {
        let relay = self.clone();
        let event_owned = event.to_owned();
        let slot = Mutex::new(Some(handler));
        self.listen(event, window_label, move |envelope: Event<Value>| {
            // Taking the handler out first makes a duplicate delivery a
            // no-op regardless of when the host processes the unlisten.
            let Some(f) = slot.lock().expect("once handler poisoned").take() else {
                return;
            };
            let id = envelope.id;
            f(envelope);
            if let Err(e) = relay.unlisten_detached(&event_owned, id) {
                debug!(event = %event_owned, "one-shot unlisten not sent: {e}");
            }
        })
        .await
    }

    /// Publish `payload` under `event`, optionally scoped to one window.
    ///
    /// The host always receives a string payload: a textual value passes
    /// through unchanged, anything else is JSON-encoded.
    pub async fn emit(
        &self,
        event: &str,
        window_label: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        let payload = match payload {
            None => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(serde_json::to_string(&other)?),
        };
        let args = self.module_args(EventCommand::Emit {
            event,
            window_label,
            payload,
        })?;
        self.client.invoke(&self.config.runtime_command, args).await?;
        Ok(())
    }

    /// Fire-and-forget cancellation; the host's answer, success or failure,
    /// is logged and otherwise dropped.
    pub fn unlisten_detached(&self, event: &str, id: EventId) -> Result<()> {
        let args = self.module_args(EventCommand::Unlisten { event, event_id: id })?;
        self.client.invoke_detached(&self.config.runtime_command, args)
    }

    fn module_args(&self, message: EventCommand<'_>) -> Result<Map<String, Value>> {
        args_from(&ModuleMessage {
            module: &self.config.event_module,
            message,
        })
    }
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The host-assigned subscription id.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Cancel on the host side and drop the local handler registration.
    ///
    /// The local registration goes first, so no delivery is observable past
    /// this call even if the host's cancellation fails — that failure still
    /// propagates to the caller.
    pub async fn unlisten(self) -> Result<()> {
        self.relay.client.registry().remove(self.handler);
        let args = self.relay.module_args(EventCommand::Unlisten {
            event: &self.event,
            event_id: self.id,
        })?;
        self.relay
            .client
            .invoke(&self.relay.config.runtime_command, args)
            .await?;
        debug!(event = %self.event, id = %self.id, "unsubscribed");
        Ok(())
    }
}
