// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command invoker — pairs every outbound command with a fire-once
// success/failure callback pair and settles exactly one of them.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::{debug, instrument};

use leitwerk_core::error::{LeitwerkError, Result};
use leitwerk_core::types::CallbackId;

use crate::message::CommandDescriptor;
use crate::registry::CallbackRegistry;
use crate::traits::HostBridge;

/// Client half of the bridge: one host entry point plus the callback
/// registry used to route the host's answers back.
///
/// Cheaply cloneable; clones share the host handle and the registry.
#[derive(Clone)]
pub struct BridgeClient {
    host: Arc<dyn HostBridge>,
    registry: CallbackRegistry,
}

/// Sibling callback ids of one pending invocation, shared by both fire-once
/// closures so whichever fires can release the other.
type SiblingIds = Arc<Mutex<(CallbackId, CallbackId)>>;

impl BridgeClient {
    pub fn new(host: Arc<dyn HostBridge>) -> Self {
        Self {
            host,
            registry: CallbackRegistry::new(),
        }
    }

    /// Registry handle for the inbound direction. Host implementations
    /// deliver answers and events by dispatching callback ids through this.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Issue one command and wait for the host's answer.
    ///
    /// Registers a fire-once success and failure callback, posts the
    /// descriptor, and resolves with exactly the payload the host delivered
    /// to whichever callback fired first. The sibling id is released at that
    /// moment, so at most one of success/failure is ever observed.
    ///
    /// No timeout is imposed: a command the host never answers leaves this
    /// future pending and both ids registered. Callers that need a deadline
    /// wrap the call themselves.
    #[instrument(skip(self, args), fields(host = self.host.name()))]
    pub async fn invoke(&self, cmd: &str, args: Map<String, Value>) -> Result<Value> {
        let (tx, rx) = oneshot::channel::<std::result::Result<Value, Value>>();
        let tx = Arc::new(Mutex::new(Some(tx)));

        // The closures are registered before their ids exist, so each side
        // learns its sibling through a shared cell filled in afterwards.
        let ids: SiblingIds = Arc::new(Mutex::new((CallbackId(0), CallbackId(0))));

        let callback = self.registry.register_once({
            let tx = Arc::clone(&tx);
            let ids = Arc::clone(&ids);
            let registry = self.registry.clone();
            move |payload| {
                let (_, error_id) = *ids.lock().expect("pending ids poisoned");
                registry.remove(error_id);
                if let Some(tx) = tx.lock().expect("pending sender poisoned").take() {
                    let _ = tx.send(Ok(payload));
                }
            }
        });
        let error = self.registry.register_once({
            let tx = Arc::clone(&tx);
            let ids = Arc::clone(&ids);
            let registry = self.registry.clone();
            move |payload| {
                let (callback_id, _) = *ids.lock().expect("pending ids poisoned");
                registry.remove(callback_id);
                if let Some(tx) = tx.lock().expect("pending sender poisoned").take() {
                    let _ = tx.send(Err(payload));
                }
            }
        });
        *ids.lock().expect("pending ids poisoned") = (callback, error);

        let descriptor = CommandDescriptor {
            cmd: cmd.to_owned(),
            callback,
            error,
            args,
        };
        debug!(%cmd, %callback, %error, "posting command");
        if let Err(e) = self.host.post(descriptor) {
            // The host never saw the message; nothing can fire these.
            self.registry.remove(callback);
            self.registry.remove(error);
            return Err(e);
        }

        match rx.await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(payload)) => Err(LeitwerkError::Host(payload)),
            Err(_) => Err(LeitwerkError::ResponseDropped),
        }
    }

    /// Issue a command without waiting for the answer.
    ///
    /// Both response callbacks only release each other and log the outcome;
    /// used where the caller has nowhere to surface the host's answer (the
    /// one-shot listener's self-cancellation path).
    pub fn invoke_detached(&self, cmd: &str, args: Map<String, Value>) -> Result<()> {
        let ids: SiblingIds = Arc::new(Mutex::new((CallbackId(0), CallbackId(0))));

        let cmd_owned = cmd.to_owned();
        let callback = self.registry.register_once({
            let ids = Arc::clone(&ids);
            let registry = self.registry.clone();
            let cmd = cmd_owned.clone();
            move |_| {
                let (_, error_id) = *ids.lock().expect("pending ids poisoned");
                registry.remove(error_id);
                debug!(%cmd, "detached command succeeded");
            }
        });
        let error = self.registry.register_once({
            let ids = Arc::clone(&ids);
            let registry = self.registry.clone();
            let cmd = cmd_owned;
            move |payload| {
                let (callback_id, _) = *ids.lock().expect("pending ids poisoned");
                registry.remove(callback_id);
                debug!(%cmd, %payload, "detached command failed");
            }
        });
        *ids.lock().expect("pending ids poisoned") = (callback, error);

        let descriptor = CommandDescriptor {
            cmd: cmd.to_owned(),
            callback,
            error,
            args,
        };
        if let Err(e) = self.host.post(descriptor) {
            self.registry.remove(callback);
            self.registry.remove(error);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{StubHost, StubReply};
    use serde_json::json;

    fn client_with_stub() -> (BridgeClient, Arc<StubHost>) {
        let stub = StubHost::new();
        let client = BridgeClient::new(stub.clone());
        stub.connect(&client);
        (client, stub)
    }

    #[tokio::test]
    async fn success_resolves_with_exact_payload() {
        let (client, stub) = client_with_stub();
        let payload = json!({ "name": "richcao", "age": 32 });
        stub.script(StubReply::Success(payload.clone()));

        let result = client.invoke("getUser", Map::new()).await.expect("success");
        assert_eq!(result, payload);

        // Both callback ids were released when the success side fired.
        assert!(client.registry().is_empty());
    }

    #[tokio::test]
    async fn failure_rejects_with_exact_payload() {
        let (client, stub) = client_with_stub();
        stub.script(StubReply::Failure(json!("name should not contain spaces")));

        let err = client
            .invoke("hello", Map::new())
            .await
            .expect_err("failure");
        match err {
            LeitwerkError::Host(payload) => {
                assert_eq!(payload, json!("name should not contain spaces"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(client.registry().is_empty());
    }

    #[tokio::test]
    async fn late_failure_after_success_is_a_no_op() {
        let (client, stub) = client_with_stub();
        stub.script(StubReply::Success(json!("ok")));

        let result = client.invoke("cmd", Map::new()).await.expect("success");
        assert_eq!(result, json!("ok"));

        // A duplicate or contradictory delivery finds no live callback.
        let posted = stub.last_posted().expect("descriptor recorded");
        assert!(!client.registry().dispatch(posted.error, json!("too late")));
        assert!(!client.registry().dispatch(posted.callback, json!("again")));
    }

    #[tokio::test]
    async fn post_failure_releases_both_ids() {
        struct DeadHost;
        impl HostBridge for DeadHost {
            fn name(&self) -> &str {
                "dead"
            }
            fn post(&self, _message: CommandDescriptor) -> Result<()> {
                Err(LeitwerkError::Post("bridge gone".to_owned()))
            }
        }

        let client = BridgeClient::new(Arc::new(DeadHost));
        let err = client.invoke("cmd", Map::new()).await.expect_err("post fails");
        assert!(matches!(err, LeitwerkError::Post(_)));
        assert!(client.registry().is_empty());
    }

    #[tokio::test]
    async fn descriptor_carries_cmd_both_ids_and_flattened_args() {
        let (client, stub) = client_with_stub();
        stub.script(StubReply::Success(json!(null)));

        let mut args = Map::new();
        args.insert("name".to_owned(), json!("world"));
        client.invoke("hello", args).await.expect("success");

        let posted = stub.last_posted().expect("descriptor recorded");
        assert_eq!(posted.cmd, "hello");
        assert_ne!(posted.callback, posted.error);

        let wire = serde_json::to_value(&posted).unwrap();
        assert_eq!(wire.get("name"), Some(&json!("world")));
        assert!(wire.get("args").is_none());
    }

    #[tokio::test]
    async fn detached_invoke_cleans_up_after_either_answer() {
        let (client, stub) = client_with_stub();

        client
            .invoke_detached("unlisten", Map::new())
            .expect("posted");
        let first = stub.last_posted().expect("recorded");
        assert!(client.registry().dispatch(first.error, json!("failed")));
        assert!(client.registry().is_empty());

        client
            .invoke_detached("unlisten", Map::new())
            .expect("posted");
        let second = stub.last_posted().expect("recorded");
        assert!(client.registry().dispatch(second.callback, json!(null)));
        assert!(client.registry().is_empty());
    }
}
