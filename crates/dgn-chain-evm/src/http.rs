use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use dgn_chain_client::ListenerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::Eip1193Transport;

/// JSON-RPC transport for a node reached over HTTP.
///
/// Reads `DGN_RPC_URL` from environment at construction time
/// (default: `http://localhost:8545`). The node must manage the signing
/// accounts itself, as a local dev chain does.
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    next_id: Cell<u64>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpTransport {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("DGN_RPC_URL").ok())
            .unwrap_or_else(|| "http://localhost:8545".to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            next_id: Cell::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[async_trait(?Send)]
impl Eip1193Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{method} HTTP {status}: {text}");
        }

        let body: RpcResponse = response
            .json()
            .await
            .with_context(|| format!("{method} parse"))?;

        if let Some(err) = body.error {
            bail!("{method} failed ({}): {}", err.code, err.message);
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn on(&self, event: &str, _listener: Rc<dyn Fn(Value)>) -> Result<ListenerId> {
        bail!("{event} events are not delivered over HTTP")
    }

    fn remove_listener(&self, _event: &str, _id: ListenerId) -> Result<()> {
        Ok(())
    }
}
