//! Event binding.
//!
//! Every action follows the same sequence: copy the form fields into the
//! controller, prepare (which clears the submitted inputs), redraw the
//! inputs, then wait for the transaction and redraw everything.

use dgn_api_types::Address;
use dgn_store_core::ActionError;
use std::rc::Rc;
use tracing::{error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{self, Elements};
use crate::render;
use crate::state::{self, Controller, Prepared};

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        if let Err(err) = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        {
            warn!("click binding failed: {:?}", err);
        }
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    on_click_async!(els.toggle_store_btn, els, on_toggle_store);
    on_click_async!(els.mint_btn, els, on_mint);
    on_click_async!(els.burn_btn, els, on_burn);
    on_click_async!(els.transfer_btn, els, on_transfer);
    on_click_async!(els.create_nft_btn, els, on_create_nft);

    bind_buy_clicks(els);

    let cb = Closure::wrap(Box::new(move |event: web_sys::PageTransitionEvent| {
        if let Some(controller) = state::controller() {
            if let Err(err) = controller.on_page_hidden(event.persisted()) {
                warn!("failed to remove accountsChanged listener: {:#}", err);
            }
        }
    }) as Box<dyn FnMut(_)>);
    if let Err(err) = gloo_utils::window()
        .add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref())
    {
        warn!("pagehide binding failed: {:?}", err);
    }
    cb.forget();
}

/// One click listener on the catalog container serves every Buy button the
/// renders put inside it.
fn bind_buy_clicks(els: &Elements) {
    let els2 = els.clone();
    let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        let Some(name) = buy_target_name(&event) else {
            return;
        };
        let els3 = els2.clone();
        wasm_bindgen_futures::spawn_local(async move {
            on_buy(&els3, &name).await;
        });
    }) as Box<dyn FnMut(_)>);
    if let Err(err) = els
        .catalog_list
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
    {
        warn!("buy binding failed: {:?}", err);
    }
    cb.forget();
}

fn buy_target_name(event: &web_sys::MouseEvent) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest(".buy-btn").ok()??;
    button.get_attribute("data-name")
}

/// Registers the single account-change listener. Each event re-bootstraps
/// the session and redraws.
pub fn subscribe_accounts(els: &Elements, controller: &Controller) {
    let els = els.clone();
    let listener = Rc::new(move |accounts: Vec<Address>| {
        let els = els.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(controller) = state::controller() else {
                return;
            };
            if let Err(err) = controller.on_accounts_changed(accounts).await {
                error!("wallet re-connection failed: {:#}", err);
            }
            render::render(&els, &controller.view());
        });
    });
    if let Err(err) = controller.subscribe(listener) {
        warn!("accountsChanged unavailable: {:#}", err);
    }
}

fn capture_inputs(els: &Elements, controller: &Controller) {
    controller.inputs_mut(|inputs| {
        inputs.mint_amount = dom::get_input_value(&els.mint_amount);
        inputs.burn_amount = dom::get_input_value(&els.burn_amount);
        inputs.transfer.recipient = dom::get_input_value(&els.transfer_recipient);
        inputs.transfer.amount = dom::get_input_value(&els.transfer_amount);
        inputs.new_nft.name = dom::get_input_value(&els.nft_name);
        inputs.new_nft.url = dom::get_input_value(&els.nft_url);
        inputs.new_nft.price = dom::get_input_value(&els.nft_price);
    });
}

async fn run_action(
    els: &Elements,
    prepare: impl FnOnce(&Controller) -> Result<Prepared, ActionError>,
) {
    let Some(controller) = state::controller() else {
        return;
    };
    capture_inputs(els, &controller);
    let prepared = prepare(&controller);
    render::render_inputs(els, &controller.inputs());

    controller.run(prepared).await;
    render::render(els, &controller.view());
}

async fn on_toggle_store(els: &Elements) {
    run_action(els, |c| c.prepare_toggle()).await;
}

async fn on_mint(els: &Elements) {
    run_action(els, |c| c.prepare_mint()).await;
}

async fn on_burn(els: &Elements) {
    run_action(els, |c| c.prepare_burn()).await;
}

async fn on_transfer(els: &Elements) {
    run_action(els, |c| c.prepare_transfer()).await;
}

async fn on_create_nft(els: &Elements) {
    run_action(els, |c| c.prepare_create_nft()).await;
}

async fn on_buy(els: &Elements, name: &str) {
    run_action(els, |c| c.prepare_buy(name)).await;
}
