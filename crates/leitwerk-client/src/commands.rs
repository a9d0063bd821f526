// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed single-shot commands layered on the invoker.
//
// Representative of arbitrary application commands: each is one `invoke`
// with its arguments serialized into the descriptor and its success payload
// deserialized into a typed record. Host-side rejection surfaces as
// `LeitwerkError::Host` carrying the host's payload untouched.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use leitwerk_bridge::invoker::BridgeClient;
use leitwerk_bridge::message::args_from;
use leitwerk_core::error::Result;

/// A user's home address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub at: f64,
    pub lo: f64,
    pub desc: String,
}

/// User record returned by the host's `getUser` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: u8,
    pub address: Option<Home>,
}

/// Fetch the current user record from the host. Takes no arguments.
pub async fn get_user(bridge: &BridgeClient) -> Result<User> {
    let payload = bridge.invoke("getUser", Map::new()).await?;
    Ok(serde_json::from_value(payload)?)
}

/// Ask the host for a greeting. The host rejects names containing spaces.
pub async fn hello(bridge: &BridgeClient, name: &str) -> Result<String> {
    #[derive(Serialize)]
    struct Args<'a> {
        name: &'a str,
    }

    let payload = bridge.invoke("hello", args_from(&Args { name })?).await?;
    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leitwerk_bridge::stub::{StubHost, StubReply};
    use leitwerk_core::error::LeitwerkError;
    use serde_json::json;
    use std::sync::Arc;

    fn client_with_stub() -> (BridgeClient, Arc<StubHost>) {
        let stub = StubHost::new();
        let client = BridgeClient::new(stub.clone());
        stub.connect(&client);
        (client, stub)
    }

    #[tokio::test]
    async fn get_user_deserializes_the_success_payload() {
        let (client, stub) = client_with_stub();
        stub.script(StubReply::Success(json!({
            "name": "richcao",
            "age": 32,
            "address": { "at": 12312.1, "lo": 1243342.1, "desc": "home" }
        })));

        let user = get_user(&client).await.expect("get_user");
        assert_eq!(user.name, "richcao");
        assert_eq!(user.age, 32);
        assert_eq!(user.address.expect("address").desc, "home");

        let posted = stub.last_posted().expect("recorded");
        assert_eq!(posted.cmd, "getUser");
        assert!(posted.args.is_empty());
    }

    #[tokio::test]
    async fn hello_carries_its_argument_and_surfaces_rejection() {
        let (client, stub) = client_with_stub();
        stub.script(StubReply::Success(json!("Hello, world")));

        let greeting = hello(&client, "world").await.expect("hello");
        assert_eq!(greeting, "Hello, world");
        assert_eq!(
            stub.last_posted().expect("recorded").args["name"],
            json!("world")
        );

        stub.script(StubReply::Failure(json!("Name should not contain spaces")));
        let err = hello(&client, "two words").await.expect_err("rejected");
        match err {
            LeitwerkError::Host(payload) => {
                assert_eq!(payload, json!("Name should not contain spaces"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
