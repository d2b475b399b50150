use alloy_primitives::{Address, B256, U256};
use anyhow::Result;
use async_trait::async_trait;
use dgn_api_types::NftRecord;
use std::rc::Rc;

pub type TxHash = B256;

/// A state-changing call on the store contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Mint { to: Address, amount: U256 },
    Burn { amount: U256 },
    Transfer { to: Address, amount: U256 },
    GenerateNft { name: String, url: String, price: U256 },
    Redeem { name: String },
    SetStoreAddress { store: Address },
}

impl StoreCall {
    /// Contract method name, used in logs.
    pub fn method(&self) -> &'static str {
        match self {
            StoreCall::Mint { .. } => "mint",
            StoreCall::Burn { .. } => "burn",
            StoreCall::Transfer { .. } => "transfer",
            StoreCall::GenerateNft { .. } => "generateNFT",
            StoreCall::Redeem { .. } => "redeem",
            StoreCall::SetStoreAddress { .. } => "setStoreAddress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub status: TxStatus,
    pub block_number: Option<u64>,
}

/// Contract handle bound to a signer.
///
/// Reads return `Err` when the call itself fails (missing method, revert,
/// transport error). `nft` returns `Ok(None)` when the lookup produced no data.
#[async_trait(?Send)]
pub trait StoreContract {
    fn address(&self) -> Address;
    async fn balance_of(&self, account: Address) -> Result<U256>;
    async fn owner(&self) -> Result<Address>;
    async fn store_address(&self) -> Result<Address>;
    async fn all_nft_names(&self) -> Result<Vec<String>>;
    /// Names owned by the bound signer.
    async fn user_nft_names(&self) -> Result<Vec<String>>;
    async fn nft(&self, name: &str) -> Result<Option<NftRecord>>;
    async fn submit(&self, call: StoreCall) -> Result<TxHash>;
    /// Suspends until the transaction is mined. No timeout is applied.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type AccountsListener = Rc<dyn Fn(Vec<Address>)>;

/// Wallet capable of authorizing accounts and signing contract calls.
#[async_trait(?Send)]
pub trait WalletProvider {
    type Contract: StoreContract;

    async fn request_accounts(&self) -> Result<Vec<Address>>;
    fn bind_contract(&self, contract: Address, signer: Address) -> Self::Contract;
    fn subscribe_accounts_changed(&self, listener: AccountsListener) -> Result<ListenerId>;
    fn unsubscribe_accounts_changed(&self, id: ListenerId) -> Result<()>;
}
