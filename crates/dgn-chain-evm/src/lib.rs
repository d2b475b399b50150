mod abi;
#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use alloy_primitives::{Address, Bytes, U64, U256};
use alloy_sol_types::SolCall;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use dgn_api_types::NftRecord;
use dgn_chain_client::{
    AccountsListener, ListenerId, StoreCall, StoreContract, TxHash, TxReceipt, TxStatus,
    WalletProvider,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

pub const ACCOUNTS_CHANGED: &str = "accountsChanged";

/// ethers' default polling interval for browser providers.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// EIP-1193 style request/event interface.
///
/// Implemented by the injected browser provider and by [`HttpTransport`] for
/// native use against a JSON-RPC node.
#[async_trait(?Send)]
pub trait Eip1193Transport {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
    async fn sleep(&self, duration: Duration);
    fn on(&self, event: &str, listener: Rc<dyn Fn(Value)>) -> Result<ListenerId>;
    fn remove_listener(&self, event: &str, id: ListenerId) -> Result<()>;
}

pub struct EvmWallet<T> {
    transport: Rc<T>,
    receipt_poll_interval: Duration,
}

impl<T> EvmWallet<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Rc::new(transport),
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport + 'static> WalletProvider for EvmWallet<T> {
    type Contract = EvmStoreContract<T>;

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let raw = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await
            .context("eth_requestAccounts")?;
        serde_json::from_value(raw).context("eth_requestAccounts returned invalid addresses")
    }

    fn bind_contract(&self, contract: Address, signer: Address) -> EvmStoreContract<T> {
        EvmStoreContract {
            transport: Rc::clone(&self.transport),
            address: contract,
            signer,
            receipt_poll_interval: self.receipt_poll_interval,
        }
    }

    fn subscribe_accounts_changed(&self, listener: AccountsListener) -> Result<ListenerId> {
        self.transport.on(
            ACCOUNTS_CHANGED,
            Rc::new(move |payload: Value| {
                match serde_json::from_value::<Vec<Address>>(payload) {
                    Ok(accounts) => listener(accounts),
                    Err(err) => warn!("ignoring malformed {} payload: {}", ACCOUNTS_CHANGED, err),
                }
            }),
        )
    }

    fn unsubscribe_accounts_changed(&self, id: ListenerId) -> Result<()> {
        self.transport.remove_listener(ACCOUNTS_CHANGED, id)
    }
}

/// Store contract reached through JSON-RPC, signing with `signer`.
pub struct EvmStoreContract<T> {
    transport: Rc<T>,
    address: Address,
    signer: Address,
    receipt_poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    #[serde(default)]
    status: Option<U64>,
    #[serde(default)]
    block_number: Option<U64>,
}

impl<T: Eip1193Transport> EvmStoreContract<T> {
    /// `eth_call` from the signer. Empty return data yields `None`.
    async fn read<C: SolCall>(&self, call: &C) -> Result<Option<C::Return>> {
        let params = json!([
            {
                "from": self.signer,
                "to": self.address,
                "data": Bytes::from(call.abi_encode()),
            },
            "latest",
        ]);

        let raw = self
            .transport
            .request("eth_call", params)
            .await
            .with_context(|| format!("eth_call {}", C::SIGNATURE))?;
        let data: Bytes = serde_json::from_value(raw)
            .with_context(|| format!("{} returned non-hex data", C::SIGNATURE))?;

        if data.is_empty() {
            return Ok(None);
        }

        let decoded = C::abi_decode_returns(&data, true)
            .with_context(|| format!("decode {} result", C::SIGNATURE))?;
        Ok(Some(decoded))
    }

    async fn read_required<C: SolCall>(&self, call: &C) -> Result<C::Return> {
        self.read(call)
            .await?
            .ok_or_else(|| anyhow!("{} returned no data", C::SIGNATURE))
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> StoreContract for EvmStoreContract<T> {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        Ok(self.read_required(&abi::balanceOfCall { account }).await?._0)
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.read_required(&abi::ownerCall {}).await?._0)
    }

    async fn store_address(&self) -> Result<Address> {
        Ok(self.read_required(&abi::storeAddressCall {}).await?._0)
    }

    async fn all_nft_names(&self) -> Result<Vec<String>> {
        Ok(self.read_required(&abi::getAllNFTsCall {}).await?._0)
    }

    async fn user_nft_names(&self) -> Result<Vec<String>> {
        Ok(self.read_required(&abi::getUserNFTsCall {}).await?._0)
    }

    async fn nft(&self, name: &str) -> Result<Option<NftRecord>> {
        let call = abi::NFTsCall {
            name: name.to_owned(),
        };
        let Some(entry) = self.read(&call).await? else {
            return Ok(None);
        };

        Ok(Some(NftRecord {
            name: name.to_owned(),
            url: entry.url,
            price: entry.price,
            is_available: entry.isAvailable,
        }))
    }

    async fn submit(&self, call: StoreCall) -> Result<TxHash> {
        let params = json!([{
            "from": self.signer,
            "to": self.address,
            "data": Bytes::from(encode_call(&call)),
        }]);

        let raw = self
            .transport
            .request("eth_sendTransaction", params)
            .await
            .with_context(|| format!("eth_sendTransaction {}", call.method()))?;
        let tx_hash: TxHash =
            serde_json::from_value(raw).context("eth_sendTransaction returned an invalid hash")?;

        debug!("submitted {} as {}", call.method(), tx_hash);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        loop {
            let raw = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await
                .context("eth_getTransactionReceipt")?;

            if raw.is_null() {
                debug!("{} not mined yet", tx_hash);
                self.transport.sleep(self.receipt_poll_interval).await;
                continue;
            }

            let receipt: RawReceipt =
                serde_json::from_value(raw).context("invalid transaction receipt")?;
            // Receipts without a status field are treated like a revert.
            let status = if receipt.status == Some(U64::from(1u64)) {
                TxStatus::Success
            } else {
                TxStatus::Failed
            };

            return Ok(TxReceipt {
                tx_hash,
                status,
                block_number: receipt.block_number.map(|n| n.to::<u64>()),
            });
        }
    }
}

fn encode_call(call: &StoreCall) -> Vec<u8> {
    match call {
        StoreCall::Mint { to, amount } => abi::mintCall {
            to: *to,
            amount: *amount,
        }
        .abi_encode(),
        StoreCall::Burn { amount } => abi::burnCall { amount: *amount }.abi_encode(),
        StoreCall::Transfer { to, amount } => abi::transferCall {
            to: *to,
            amount: *amount,
        }
        .abi_encode(),
        StoreCall::GenerateNft { name, url, price } => abi::generateNFTCall {
            name: name.clone(),
            url: url.clone(),
            price: *price,
        }
        .abi_encode(),
        StoreCall::Redeem { name } => abi::redeemCall { name: name.clone() }.abi_encode(),
        StoreCall::SetStoreAddress { store } => {
            abi::setStoreAddressCall { store: *store }.abi_encode()
        }
    }
}
