//! EIP-1193 transport over the wallet extension's `window.ethereum`.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dgn_chain_client::ListenerId;
use dgn_chain_evm::Eip1193Transport;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

type EventClosure = Closure<dyn FnMut(JsValue)>;

pub struct InjectedTransport {
    ethereum: JsValue,
    listeners: RefCell<HashMap<u64, EventClosure>>,
    next_listener: Cell<u64>,
}

impl InjectedTransport {
    /// Returns `None` when no wallet extension injected a provider.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self {
            ethereum,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(1),
        })
    }

    fn method(&self, name: &str) -> Result<Function> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))
            .map_err(|err| js_error(&err))?
            .dyn_into::<Function>()
            .map_err(|_| anyhow!("window.ethereum.{name} is not a function"))
    }
}

/// Best-effort text for a rejected promise or thrown JS value.
fn js_error(value: &JsValue) -> anyhow::Error {
    if let Some(text) = value.as_string() {
        return anyhow!(text);
    }
    let message = Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string());
    let code = Reflect::get(value, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    match (message, code) {
        (Some(message), Some(code)) => anyhow!("{message} (code {code})"),
        (Some(message), None) => anyhow!(message),
        _ => anyhow!("{value:?}"),
    }
}

#[async_trait(?Send)]
impl Eip1193Transport for InjectedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| anyhow!("{method} arguments: {err}"))?;

        let promise: Promise = self
            .method("request")?
            .call1(&self.ethereum, &args)
            .map_err(|err| js_error(&err))?
            .dyn_into()
            .map_err(|_| anyhow!("{method} did not return a promise"))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|err| js_error(&err).context(format!("{method} rejected")))?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result)
            .map_err(|err| anyhow!("{method} returned unexpected data: {err}"))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    fn on(&self, event: &str, listener: Rc<dyn Fn(Value)>) -> Result<ListenerId> {
        let name = event.to_owned();
        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            match serde_wasm_bindgen::from_value::<Value>(payload) {
                Ok(value) => listener(value),
                Err(err) => warn!("unreadable {} payload: {}", name, err),
            }
        }) as Box<dyn FnMut(JsValue)>);

        self.method("on")?
            .call2(
                &self.ethereum,
                &JsValue::from_str(event),
                closure.as_ref().unchecked_ref(),
            )
            .map_err(|err| js_error(&err))?;

        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().insert(id, closure);
        Ok(ListenerId(id))
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> Result<()> {
        let Some(closure) = self.listeners.borrow_mut().remove(&id.0) else {
            return Ok(());
        };
        self.method("removeListener")?
            .call2(
                &self.ethereum,
                &JsValue::from_str(event),
                closure.as_ref().unchecked_ref(),
            )
            .map_err(|err| js_error(&err))?;
        Ok(())
    }
}
