//! In-memory store contract and wallet used by the unit tests.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use dgn_api_types::{Address, NftRecord, U256, parse_units};
use dgn_chain_client::{
    AccountsListener, ListenerId, StoreCall, StoreContract, TxHash, TxReceipt, TxStatus,
    WalletProvider,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::dispatch::{Notice, Notifier};

pub const OWNER: Address = Address::new([0x11; 20]);
pub const VISITOR: Address = Address::new([0x22; 20]);

/// Record priced in whole tokens, with a deterministic image url.
pub fn record(name: &str, price: u64, is_available: bool) -> NftRecord {
    NftRecord {
        name: name.to_owned(),
        url: format!("https://cats.example/{name}.png"),
        price: parse_units(&price.to_string(), 18).unwrap(),
        is_available,
    }
}

struct ChainState {
    accounts: Vec<Address>,
    owner: Address,
    store: Address,
    balances: HashMap<Address, U256>,
    names: Vec<String>,
    records: HashMap<String, NftRecord>,
    holdings: HashMap<Address, Vec<String>>,
    lookup_delays: HashMap<String, u32>,
    confirmation_delay: u32,
    failing: HashSet<String>,
    receipt_status: TxStatus,
    submit_error: Option<String>,
    submitted: Vec<StoreCall>,
    reads: HashMap<String, usize>,
    next_tx: u8,
}

#[derive(Clone)]
pub struct FakeChain(Rc<RefCell<ChainState>>);

impl FakeChain {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ChainState {
            accounts: vec![OWNER],
            owner: OWNER,
            store: Address::ZERO,
            balances: HashMap::new(),
            names: Vec::new(),
            records: HashMap::new(),
            holdings: HashMap::new(),
            lookup_delays: HashMap::new(),
            confirmation_delay: 0,
            failing: HashSet::new(),
            receipt_status: TxStatus::Success,
            submit_error: None,
            submitted: Vec::new(),
            reads: HashMap::new(),
            next_tx: 0,
        })))
    }

    pub fn contract_for(&self, signer: Address) -> FakeContract {
        FakeContract {
            chain: self.clone(),
            address: Address::ZERO,
            signer,
        }
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.0.borrow_mut().accounts = accounts;
    }

    pub fn set_balance(&self, account: Address, balance: U256) {
        self.0.borrow_mut().balances.insert(account, balance);
    }

    pub fn set_store(&self, store: Address) {
        self.0.borrow_mut().store = store;
    }

    pub fn add_nft(&self, record: NftRecord) {
        let mut state = self.0.borrow_mut();
        state.names.push(record.name.clone());
        state.records.insert(record.name.clone(), record);
    }

    /// Listed by name but without a record behind it.
    pub fn add_missing_name(&self, name: &str) {
        self.0.borrow_mut().names.push(name.to_owned());
    }

    pub fn give_nft(&self, account: Address, name: &str) {
        self.0
            .borrow_mut()
            .holdings
            .entry(account)
            .or_default()
            .push(name.to_owned());
    }

    /// Number of scheduler yields before each named lookup resolves.
    pub fn set_lookup_delays(&self, delays: &[(&str, u32)]) {
        let mut state = self.0.borrow_mut();
        for (name, yields) in delays {
            state.lookup_delays.insert((*name).to_owned(), *yields);
        }
    }

    /// Number of scheduler yields before a receipt is returned.
    pub fn set_confirmation_delay(&self, yields: u32) {
        self.0.borrow_mut().confirmation_delay = yields;
    }

    pub fn balance(&self, account: Address) -> U256 {
        self.0.borrow().balances.get(&account).copied().unwrap_or_default()
    }

    pub fn fail_reads(&self, methods: &[&str]) {
        let mut state = self.0.borrow_mut();
        state.failing.extend(methods.iter().map(|m| (*m).to_owned()));
    }

    pub fn set_receipt_status(&self, status: TxStatus) {
        self.0.borrow_mut().receipt_status = status;
    }

    pub fn reject_submissions(&self, reason: &str) {
        self.0.borrow_mut().submit_error = Some(reason.to_owned());
    }

    pub fn submitted(&self) -> Vec<StoreCall> {
        self.0.borrow().submitted.clone()
    }

    pub fn read_count(&self, method: &str) -> usize {
        self.0.borrow().reads.get(method).copied().unwrap_or(0)
    }

    fn read(&self, method: &str) -> Result<()> {
        let mut state = self.0.borrow_mut();
        *state.reads.entry(method.to_owned()).or_default() += 1;
        if state.failing.contains(method) {
            bail!("{method} reverted");
        }
        Ok(())
    }

    fn apply(&self, signer: Address, call: &StoreCall) {
        let mut state = self.0.borrow_mut();
        match call {
            StoreCall::Mint { to, amount } => {
                *state.balances.entry(*to).or_default() += *amount;
            }
            StoreCall::Burn { amount } => {
                let balance = state.balances.entry(signer).or_default();
                *balance = balance.saturating_sub(*amount);
            }
            StoreCall::Transfer { to, amount } => {
                let from = state.balances.entry(signer).or_default();
                *from = from.saturating_sub(*amount);
                *state.balances.entry(*to).or_default() += *amount;
            }
            StoreCall::GenerateNft { name, url, price } => {
                state.names.push(name.clone());
                state.records.insert(
                    name.clone(),
                    NftRecord {
                        name: name.clone(),
                        url: url.clone(),
                        price: *price,
                        is_available: true,
                    },
                );
            }
            StoreCall::Redeem { name } => {
                let Some(record) = state.records.get_mut(name) else {
                    return;
                };
                record.is_available = false;
                let price = record.price;
                let balance = state.balances.entry(signer).or_default();
                *balance = balance.saturating_sub(price);
                state.holdings.entry(signer).or_default().push(name.clone());
            }
            StoreCall::SetStoreAddress { store } => state.store = *store,
        }
    }
}

pub struct FakeContract {
    chain: FakeChain,
    address: Address,
    signer: Address,
}

#[async_trait(?Send)]
impl StoreContract for FakeContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        self.chain.read("balance_of")?;
        let state = self.chain.0.borrow();
        Ok(state.balances.get(&account).copied().unwrap_or_default())
    }

    async fn owner(&self) -> Result<Address> {
        self.chain.read("owner")?;
        Ok(self.chain.0.borrow().owner)
    }

    async fn store_address(&self) -> Result<Address> {
        self.chain.read("store_address")?;
        Ok(self.chain.0.borrow().store)
    }

    async fn all_nft_names(&self) -> Result<Vec<String>> {
        self.chain.read("all_nft_names")?;
        Ok(self.chain.0.borrow().names.clone())
    }

    async fn user_nft_names(&self) -> Result<Vec<String>> {
        self.chain.read("user_nft_names")?;
        let state = self.chain.0.borrow();
        Ok(state.holdings.get(&self.signer).cloned().unwrap_or_default())
    }

    async fn nft(&self, name: &str) -> Result<Option<NftRecord>> {
        self.chain.read("nft")?;
        let yields = self
            .chain
            .0
            .borrow()
            .lookup_delays
            .get(name)
            .copied()
            .unwrap_or(0);
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        Ok(self.chain.0.borrow().records.get(name).cloned())
    }

    async fn submit(&self, call: StoreCall) -> Result<TxHash> {
        let (status, hash) = {
            let mut state = self.chain.0.borrow_mut();
            if let Some(reason) = &state.submit_error {
                return Err(anyhow!("{reason}"));
            }
            state.submitted.push(call.clone());
            state.next_tx += 1;
            (state.receipt_status, TxHash::with_last_byte(state.next_tx))
        };
        if status == TxStatus::Success {
            self.chain.apply(self.signer, &call);
        }
        Ok(hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let yields = self.chain.0.borrow().confirmation_delay;
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        Ok(TxReceipt {
            tx_hash,
            status: self.chain.0.borrow().receipt_status,
            block_number: Some(1),
        })
    }
}

#[derive(Clone)]
pub struct FakeWallet {
    chain: FakeChain,
    listeners: Rc<RefCell<Vec<(ListenerId, AccountsListener)>>>,
    next_listener: Rc<Cell<u64>>,
}

impl FakeWallet {
    pub fn new() -> Self {
        Self::with_chain(FakeChain::new())
    }

    pub fn with_chain(chain: FakeChain) -> Self {
        Self {
            chain,
            listeners: Rc::default(),
            next_listener: Rc::default(),
        }
    }

    pub fn chain(&self) -> &FakeChain {
        &self.chain
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Switches the authorized accounts and notifies every listener.
    pub fn emit_accounts_changed(&self, accounts: Vec<Address>) {
        self.chain.set_accounts(accounts.clone());
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(accounts.clone());
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    type Contract = FakeContract;

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.chain.read("request_accounts")?;
        Ok(self.chain.0.borrow().accounts.clone())
    }

    fn bind_contract(&self, contract: Address, signer: Address) -> FakeContract {
        FakeContract {
            chain: self.chain.clone(),
            address: contract,
            signer,
        }
    }

    fn subscribe_accounts_changed(&self, listener: AccountsListener) -> Result<ListenerId> {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn unsubscribe_accounts_changed(&self, id: ListenerId) -> Result<()> {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier(Rc<RefCell<Vec<Notice>>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.0.borrow().iter().map(|n| n.message().to_owned()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.0.borrow_mut().push(notice.clone());
    }
}
