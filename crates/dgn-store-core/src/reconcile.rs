//! Full re-read of the store state for one account.
//!
//! Every read is guarded on its own: a failure is logged and that field
//! falls back to its empty value while the other reads still run.

use anyhow::Result;
use dgn_api_types::{Address, NftRecord, StoreFlag, U256};
use dgn_chain_client::StoreContract;
use futures::future::try_join_all;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub balance: U256,
    pub store_flag: StoreFlag,
    pub catalog: Vec<NftRecord>,
    pub owned: Vec<NftRecord>,
}

pub async fn reconcile<C: StoreContract + ?Sized>(contract: &C, account: Address) -> Snapshot {
    let balance = contract.balance_of(account).await.unwrap_or_else(|err| {
        warn!("failed to fetch balance: {:#}", err);
        U256::ZERO
    });

    let store_flag = match contract.store_address().await {
        Ok(address) => StoreFlag(address),
        Err(err) => {
            warn!("failed to fetch store address: {:#}", err);
            StoreFlag::CLOSED
        }
    };

    let catalog = load_catalog(contract).await.unwrap_or_else(|err| {
        warn!("failed to fetch NFTs: {:#}", err);
        Vec::new()
    });

    let owned = load_owned(contract).await.unwrap_or_else(|err| {
        warn!("failed to fetch user NFTs: {:#}", err);
        Vec::new()
    });

    Snapshot {
        balance,
        store_flag,
        catalog,
        owned,
    }
}

async fn load_catalog<C: StoreContract + ?Sized>(contract: &C) -> Result<Vec<NftRecord>> {
    let names = contract.all_nft_names().await?;
    fetch_records(contract, &names).await
}

async fn load_owned<C: StoreContract + ?Sized>(contract: &C) -> Result<Vec<NftRecord>> {
    let names = contract.user_nft_names().await?;
    fetch_records(contract, &names).await
}

/// Looks up every name concurrently.
///
/// Output follows the order of `names`; names whose lookup returned no
/// record are dropped. Any lookup error fails the whole collection.
pub async fn fetch_records<C: StoreContract + ?Sized>(
    contract: &C,
    names: &[String],
) -> Result<Vec<NftRecord>> {
    let lookups = names.iter().map(|name| contract.nft(name));
    let records = try_join_all(lookups).await?;
    Ok(records.into_iter().flatten().collect())
}
