//! DGN Kitty Store WASM front-end.
//!
//! Connects to the injected wallet, renders the store contract's state and
//! forwards form actions to the `dgn-store-core` controller.

pub mod config;
pub mod dom;
pub mod events;
pub mod logging;
pub mod notify;
pub mod provider;
pub mod render;
pub mod state;

use dgn_chain_evm::EvmWallet;
use dgn_store_core::{StoreConfig, StoreController};
use std::rc::Rc;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let (config, config_err) = match config::load().await {
        Ok(config) => (config, None),
        Err(err) => (StoreConfig::default(), Some(err)),
    };
    logging::init(&config.log_level);
    if let Some(err) = config_err {
        warn!("using default store config: {:#}", err);
    }

    let els = dom::Elements::bind()?;

    let provider = detect_wallet(&config);
    if provider.is_none() {
        info!("no injected wallet found");
    }
    let controller = Rc::new(StoreController::new(
        provider,
        config,
        Rc::new(notify::AlertNotifier),
    ));
    state::install(Rc::clone(&controller));

    events::bind_events(&els);
    render::render(&els, &controller.view());

    if let Err(err) = controller.start().await {
        error!("wallet connection failed: {:#}", err);
    }
    events::subscribe_accounts(&els, &controller);
    render::render(&els, &controller.view());

    Ok(())
}

fn detect_wallet(config: &StoreConfig) -> Option<EvmWallet<provider::InjectedTransport>> {
    provider::InjectedTransport::detect().map(|transport| {
        EvmWallet::new(transport).with_receipt_poll_interval(config.receipt_poll_interval())
    })
}
