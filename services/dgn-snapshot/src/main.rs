//! Prints the store state of the node's first account as JSON.
//!
//! Talks to a node over HTTP (`DGN_RPC_URL`) that manages its own accounts,
//! such as a local dev chain. Store settings come from the `DGN_*` variables.

use anyhow::{Result, bail};
use dgn_api_types::{Address, NftRecord, display_address, format_units};
use dgn_chain_evm::{EvmWallet, HttpTransport};
use dgn_store_core::reconcile::reconcile;
use dgn_store_core::session::bootstrap;
use dgn_store_core::{Bootstrap, Snapshot, StoreConfig};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct SnapshotSummary {
    account: String,
    contract: String,
    is_owner: bool,
    balance: String,
    store_open: bool,
    catalog: Vec<RecordSummary>,
    owned: Vec<RecordSummary>,
}

#[derive(Debug, Serialize)]
struct RecordSummary {
    name: String,
    url: String,
    price: String,
    is_available: bool,
}

fn record_summary(record: &NftRecord, config: &StoreConfig) -> RecordSummary {
    RecordSummary {
        name: record.name.clone(),
        url: record.url.clone(),
        price: format!(
            "{} {}",
            format_units(record.price, config.decimals),
            config.token_symbol
        ),
        is_available: record.is_available,
    }
}

fn summary(
    config: &StoreConfig,
    account: &Address,
    is_owner: bool,
    snapshot: &Snapshot,
) -> SnapshotSummary {
    SnapshotSummary {
        account: display_address(account),
        contract: display_address(&config.contract_address),
        is_owner,
        balance: format!(
            "{} {}",
            format_units(snapshot.balance, config.decimals),
            config.token_symbol
        ),
        store_open: snapshot.store_flag.is_open(),
        catalog: snapshot
            .catalog
            .iter()
            .map(|r| record_summary(r, config))
            .collect(),
        owned: snapshot
            .owned
            .iter()
            .map(|r| record_summary(r, config))
            .collect(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StoreConfig::from_env()?;
    let transport = HttpTransport::default();
    info!(
        "dgn-snapshot reading {} via {}",
        display_address(&config.contract_address),
        transport.endpoint()
    );

    let wallet =
        EvmWallet::new(transport).with_receipt_poll_interval(config.receipt_poll_interval());
    let session = match bootstrap(Some(&wallet), &config).await? {
        Bootstrap::Connected(session) => session,
        Bootstrap::NoAccount | Bootstrap::Unavailable => bail!("node exposes no accounts"),
    };

    let snapshot = reconcile(session.contract.as_ref(), session.account).await;
    let summary = summary(&config, &session.account, session.is_owner, &snapshot);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
