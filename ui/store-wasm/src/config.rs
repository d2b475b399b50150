//! Loads `config/store.json` next to the page.

use anyhow::{Result, anyhow, bail};
use dgn_store_core::StoreConfig;
use gloo_net::http::Request;

pub const CONFIG_URL: &str = "config/store.json";

pub async fn load() -> Result<StoreConfig> {
    let response = Request::get(CONFIG_URL)
        .send()
        .await
        .map_err(|err| anyhow!("fetch {CONFIG_URL}: {err}"))?;

    if !response.ok() {
        bail!("fetch {CONFIG_URL}: HTTP {}", response.status());
    }

    let text = response
        .text()
        .await
        .map_err(|err| anyhow!("read {CONFIG_URL}: {err}"))?;
    StoreConfig::from_json(&text)
}
