//! Draws a `StoreView` into the page.
//!
//! Every render replaces the NFT grids wholesale. Buy clicks are handled by
//! one listener on the catalog container, bound in `events::bind_events`.

use dgn_api_types::{NftRecord, display_address};
use dgn_store_core::{PendingInputs, StoreView};

use crate::dom::{self, Elements};

pub fn render(els: &Elements, view: &StoreView) {
    let account = view.account.as_ref().map(display_address).unwrap_or_default();
    dom::set_text(&els.user_address, &account);
    dom::set_text(&els.contract_address, &display_address(&view.contract_address));
    dom::set_text(&els.balance, &view.balance_text());

    for section in [&els.owner_store, &els.owner_mint, &els.owner_create] {
        dom::toggle_class(section, "hidden", !view.is_owner);
    }

    let flag = &view.snapshot.store_flag;
    els.toggle_store_btn
        .set_text_content(Some(flag.toggle_label()));
    dom::set_text(&els.store_status, &store_status_text(view));

    render_catalog(els, view);
    render_owned(els, view);
}

/// Mirrors the controller's pending inputs back into the form fields.
pub fn render_inputs(els: &Elements, inputs: &PendingInputs) {
    dom::set_input_value(&els.mint_amount, &inputs.mint_amount);
    dom::set_input_value(&els.burn_amount, &inputs.burn_amount);
    dom::set_input_value(&els.transfer_recipient, &inputs.transfer.recipient);
    dom::set_input_value(&els.transfer_amount, &inputs.transfer.amount);
    dom::set_input_value(&els.nft_name, &inputs.new_nft.name);
    dom::set_input_value(&els.nft_url, &inputs.new_nft.url);
    dom::set_input_value(&els.nft_price, &inputs.new_nft.price);
}

fn store_status_text(view: &StoreView) -> String {
    let mut text = format!("Status: {}", view.snapshot.store_flag.status_label());
    if view.store_flag_provisional {
        text.push_str(" (pending)");
    }
    text
}

fn render_catalog(els: &Elements, view: &StoreView) {
    let container = &els.catalog_list;
    if view.snapshot.catalog.is_empty() {
        dom::set_inner_html(container, r#"<p class="nft-empty">No NFTs available.</p>"#);
        return;
    }

    let cards: String = view
        .snapshot
        .catalog
        .iter()
        .map(|nft| nft_card_html(nft, &view.price_text(nft.price), true))
        .collect();
    dom::set_inner_html(container, &format!(r#"<div class="nft-list">{cards}</div>"#));
}

fn render_owned(els: &Elements, view: &StoreView) {
    let container = &els.owned_list;
    if view.snapshot.owned.is_empty() {
        dom::set_inner_html(container, r#"<p class="nft-empty">No NFTs owned.</p>"#);
        return;
    }

    let cards: String = view
        .snapshot
        .owned
        .iter()
        .map(|nft| nft_card_html(nft, &view.price_text(nft.price), false))
        .collect();
    dom::set_inner_html(container, &format!(r#"<div class="nft-list">{cards}</div>"#));
}

/// One grid card. The Buy button is offered only in the catalog and only
/// while the NFT is available.
fn nft_card_html(nft: &NftRecord, price: &str, purchasable: bool) -> String {
    let name = escape_html(&nft.name);
    let buy = if purchasable && nft.is_available {
        format!(r#"<button class="buy-btn" data-name="{name}">Buy</button>"#)
    } else {
        String::new()
    };
    format!(
        r#"<div class="nft-item">
  <img src="{url}" alt="{name}" />
  <p>Name: {name}</p>
  <p>Price: {price}</p>
  {buy}
</div>"#,
        url = escape_html(&nft.url),
        price = escape_html(price),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
