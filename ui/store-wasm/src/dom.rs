//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlInputElement};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

// ── Elements struct ──

/// All DOM element references used by the store page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub user_address: Element,
    pub contract_address: Element,
    pub balance: Element,

    // Owner: store flag
    pub owner_store: Element,
    pub store_status: Element,
    pub toggle_store_btn: HtmlElement,

    // Owner: mint
    pub owner_mint: Element,
    pub mint_amount: HtmlInputElement,
    pub mint_btn: HtmlElement,

    // Burn
    pub burn_amount: HtmlInputElement,
    pub burn_btn: HtmlElement,

    // Transfer
    pub transfer_recipient: HtmlInputElement,
    pub transfer_amount: HtmlInputElement,
    pub transfer_btn: HtmlElement,

    // Owner: create NFT
    pub owner_create: Element,
    pub nft_name: HtmlInputElement,
    pub nft_url: HtmlInputElement,
    pub nft_price: HtmlInputElement,
    pub create_nft_btn: HtmlElement,

    // NFT grids
    pub catalog_list: Element,
    pub owned_list: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            user_address: get_el!("userAddress"),
            contract_address: get_el!("contractAddress"),
            balance: get_el!("balance"),

            owner_store: get_el!("ownerStore"),
            store_status: get_el!("storeStatus"),
            toggle_store_btn: get_html!("toggleStoreBtn"),

            owner_mint: get_el!("ownerMint"),
            mint_amount: get_input!("mintAmount"),
            mint_btn: get_html!("mintBtn"),

            burn_amount: get_input!("burnAmount"),
            burn_btn: get_html!("burnBtn"),

            transfer_recipient: get_input!("transferRecipient"),
            transfer_amount: get_input!("transferAmount"),
            transfer_btn: get_html!("transferBtn"),

            owner_create: get_el!("ownerCreate"),
            nft_name: get_input!("nftName"),
            nft_url: get_input!("nftUrl"),
            nft_price: get_input!("nftPrice"),
            create_nft_btn: get_html!("createNftBtn"),

            catalog_list: get_el!("catalogList"),
            owned_list: get_el!("ownedList"),
        })
    }
}
