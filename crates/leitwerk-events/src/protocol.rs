// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire shapes of the host's event module.

use serde::{Deserialize, Serialize};

use leitwerk_core::types::{CallbackId, EventId, WindowLabel};

/// Inbound delivery handed to a registered event handler.
///
/// The host invokes the handler's callback id with this envelope; `id` is
/// the subscription the delivery belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<T> {
    /// Event name.
    pub event: String,
    /// Label of the window that emitted this event.
    pub window_label: WindowLabel,
    /// Subscription identifier, used to unlisten.
    pub id: EventId,
    /// Caller-defined payload.
    pub payload: T,
}

/// Sub-commands understood by the host's event module.
///
/// Event names must contain only alphanumeric characters, `-`, `/`, `:`
/// and `_`; that contract is the caller's to uphold, not validated here.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub(crate) enum EventCommand<'a> {
    #[serde(rename_all = "camelCase")]
    Listen {
        event: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        window_label: Option<&'a str>,
        handler: CallbackId,
    },
    #[serde(rename_all = "camelCase")]
    Unlisten { event: &'a str, event_id: EventId },
    #[serde(rename_all = "camelCase")]
    Emit {
        event: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        window_label: Option<&'a str>,
        /// Always textual by the time it crosses the bridge.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<String>,
    },
}

/// Wrapper routing an event sub-command to the host's module dispatcher.
#[derive(Debug, Serialize)]
pub(crate) struct ModuleMessage<'a> {
    #[serde(rename = "__module")]
    pub module: &'a str,
    pub message: EventCommand<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listen_command_serializes_camel_case() {
        let wire = serde_json::to_value(EventCommand::Listen {
            event: "state-changed",
            window_label: Some("main"),
            handler: CallbackId(9),
        })
        .unwrap();
        assert_eq!(
            wire,
            json!({
                "cmd": "listen",
                "event": "state-changed",
                "windowLabel": "main",
                "handler": 9
            })
        );
    }

    #[test]
    fn absent_options_are_omitted() {
        let wire = serde_json::to_value(EventCommand::Emit {
            event: "ping",
            window_label: None,
            payload: None,
        })
        .unwrap();
        assert_eq!(wire, json!({ "cmd": "emit", "event": "ping" }));
    }

    #[test]
    fn envelope_round_trips_from_host_shape() {
        let envelope: Event<serde_json::Value> = serde_json::from_value(json!({
            "event": "host-event",
            "windowLabel": "main",
            "id": 3,
            "payload": { "type": "hello" }
        }))
        .unwrap();

        assert_eq!(envelope.event, "host-event");
        assert_eq!(envelope.window_label, "main");
        assert_eq!(envelope.id, EventId(3));
        assert_eq!(envelope.payload, json!({ "type": "hello" }));
    }
}
