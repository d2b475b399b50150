use anyhow::Result;
use dgn_api_types::{
    Address, AddressError, StoreFlag, U256, UnitsError, format_units, parse_address, parse_units,
};
use dgn_chain_client::{AccountsListener, ListenerId, StoreCall, WalletProvider};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::dispatch::{DispatchOutcome, Notice, Notifier, dispatch};
use crate::forms::PendingInputs;
use crate::reconcile::{Snapshot, reconcile as read_snapshot};
use crate::session::{Bootstrap, Session, bootstrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Starting,
    Unavailable,
    NoAccount,
    /// The wallet refused or failed the account request.
    Rejected,
    Connected,
}

/// Everything the front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreView {
    pub status: SessionStatus,
    pub account: Option<Address>,
    pub contract_address: Address,
    pub is_owner: bool,
    pub snapshot: Snapshot,
    /// The store flag was set locally after an unconfirmed toggle and has
    /// not been re-read from the contract yet.
    pub store_flag_provisional: bool,
    pub token_symbol: String,
    pub decimals: u8,
}

impl StoreView {
    pub fn balance_text(&self) -> String {
        format!(
            "{} {}",
            format_units(self.snapshot.balance, self.decimals),
            self.token_symbol
        )
    }

    pub fn price_text(&self, price: U256) -> String {
        format!("{} {}", format_units(price, self.decimals), self.token_symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Mint,
    Burn,
    Transfer,
    CreateNft,
    Buy,
    ToggleStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0:?} requires a connected wallet")]
    NoSession(ActionKind),
    #[error("only the contract owner may mint")]
    NotOwner,
    #[error("invalid amount: {0}")]
    Amount(#[from] UnitsError),
    #[error("invalid recipient: {0}")]
    Recipient(#[from] AddressError),
}

impl ActionError {
    fn notice(&self) -> Notice {
        match self {
            ActionError::NoSession(ActionKind::ToggleStore) => Notice::ToggleFailed,
            _ => Notice::Failed,
        }
    }
}

/// A validated call, ready to be submitted with the session it was built for.
pub struct PreparedAction<C> {
    pub kind: ActionKind,
    pub call: StoreCall,
    pub success_message: String,
    account: Address,
    contract: Rc<C>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mint attempted without the owner flag. Nothing happens.
    Skipped,
    Rejected(ActionError),
    Dispatched(DispatchOutcome),
}

/// Owns the wallet session, the last snapshot and the pending inputs.
///
/// Methods take `&self`; interior state lives in `Cell`/`RefCell` and no
/// borrow is held across an await.
pub struct StoreController<P: WalletProvider> {
    provider: Option<P>,
    config: StoreConfig,
    notifier: Rc<dyn Notifier>,
    status: Cell<SessionStatus>,
    session: RefCell<Option<Session<P::Contract>>>,
    snapshot: RefCell<Snapshot>,
    store_flag_provisional: Cell<bool>,
    inputs: RefCell<PendingInputs>,
    subscription: Cell<Option<ListenerId>>,
}

impl<P: WalletProvider> StoreController<P> {
    pub fn new(provider: Option<P>, config: StoreConfig, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            provider,
            config,
            notifier,
            status: Cell::new(SessionStatus::Starting),
            session: RefCell::new(None),
            snapshot: RefCell::new(Snapshot::default()),
            store_flag_provisional: Cell::new(false),
            inputs: RefCell::new(PendingInputs::default()),
            subscription: Cell::new(None),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Bootstraps the session and loads the initial snapshot.
    pub async fn start(&self) -> Result<()> {
        self.rebootstrap().await
    }

    /// Re-run on every account change. The previous session and snapshot are
    /// discarded before the new session is read.
    pub async fn on_accounts_changed(&self, accounts: Vec<Address>) -> Result<()> {
        info!("wallet accounts changed: {} account(s)", accounts.len());
        self.rebootstrap().await
    }

    async fn rebootstrap(&self) -> Result<()> {
        let outcome = bootstrap(self.provider.as_ref(), &self.config).await;

        self.snapshot.replace(Snapshot::default());
        self.store_flag_provisional.set(false);

        match outcome {
            Ok(Bootstrap::Unavailable) => {
                self.session.replace(None);
                self.status.set(SessionStatus::Unavailable);
                Ok(())
            }
            Ok(Bootstrap::NoAccount) => {
                self.session.replace(None);
                self.status.set(SessionStatus::NoAccount);
                Ok(())
            }
            Ok(Bootstrap::Connected(session)) => {
                self.session.replace(Some(session));
                self.status.set(SessionStatus::Connected);
                self.reconcile().await;
                Ok(())
            }
            Err(err) => {
                self.session.replace(None);
                self.status.set(SessionStatus::Rejected);
                Err(err)
            }
        }
    }

    /// Re-reads the whole snapshot for the current session.
    pub async fn reconcile(&self) {
        let Some(session) = self.session() else {
            return;
        };

        let snapshot = read_snapshot(session.contract.as_ref(), session.account).await;

        if self.current_account() != Some(session.account) {
            debug!("dropping snapshot for replaced account {}", session.account);
            return;
        }
        self.snapshot.replace(snapshot);
        self.store_flag_provisional.set(false);
    }

    /// Registers `listener` for wallet account changes. Only one listener is
    /// kept per controller; later calls are no-ops until `unsubscribe`.
    pub fn subscribe(&self, listener: AccountsListener) -> Result<()> {
        if self.subscription.get().is_some() {
            debug!("accountsChanged listener already registered");
            return Ok(());
        }
        let Some(provider) = &self.provider else {
            return Ok(());
        };
        let id = provider.subscribe_accounts_changed(listener)?;
        self.subscription.set(Some(id));
        Ok(())
    }

    pub fn unsubscribe(&self) -> Result<()> {
        if let (Some(id), Some(provider)) = (self.subscription.take(), &self.provider) {
            provider.unsubscribe_accounts_changed(id)?;
        }
        Ok(())
    }

    /// Page is being hidden. A page kept in the back/forward cache
    /// (`persisted`) will be shown again, so its listener stays registered.
    pub fn on_page_hidden(&self, persisted: bool) -> Result<()> {
        if persisted {
            debug!("page cached; keeping accountsChanged listener");
            return Ok(());
        }
        self.unsubscribe()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.get().is_some()
    }

    pub fn view(&self) -> StoreView {
        let session = self.session.borrow();
        StoreView {
            status: self.status.get(),
            account: session.as_ref().map(|s| s.account),
            contract_address: self.config.contract_address,
            is_owner: session.as_ref().is_some_and(|s| s.is_owner),
            snapshot: self.snapshot.borrow().clone(),
            store_flag_provisional: self.store_flag_provisional.get(),
            token_symbol: self.config.token_symbol.clone(),
            decimals: self.config.decimals,
        }
    }

    pub fn inputs(&self) -> PendingInputs {
        self.inputs.borrow().clone()
    }

    pub fn inputs_mut<R>(&self, edit: impl FnOnce(&mut PendingInputs) -> R) -> R {
        edit(&mut self.inputs.borrow_mut())
    }

    pub fn prepare_mint(&self) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self
            .session()
            .filter(|s| s.is_owner)
            .ok_or(ActionError::NotOwner)?;
        let text = self.inputs.borrow_mut().take_mint();
        let amount = parse_units(&text, self.config.decimals)?;
        let to = session.account;
        Ok(self.prepared(
            session,
            ActionKind::Mint,
            StoreCall::Mint { to, amount },
            format!("{} minted successfully!", self.config.token_symbol),
        ))
    }

    pub fn prepare_burn(&self) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self.require_session(ActionKind::Burn)?;
        let text = self.inputs.borrow_mut().take_burn();
        let amount = parse_units(&text, self.config.decimals)?;
        Ok(self.prepared(
            session,
            ActionKind::Burn,
            StoreCall::Burn { amount },
            format!("{} burned successfully!", self.config.token_symbol),
        ))
    }

    pub fn prepare_transfer(&self) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self.require_session(ActionKind::Transfer)?;
        let form = self.inputs.borrow_mut().take_transfer();
        let to = parse_address(&form.recipient)?;
        let amount = parse_units(&form.amount, self.config.decimals)?;
        Ok(self.prepared(
            session,
            ActionKind::Transfer,
            StoreCall::Transfer { to, amount },
            format!("{} transferred successfully!", self.config.token_symbol),
        ))
    }

    pub fn prepare_create_nft(&self) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self.require_session(ActionKind::CreateNft)?;
        let form = self.inputs.borrow_mut().take_new_nft();
        let price = parse_units(&form.price, self.config.decimals)?;
        Ok(self.prepared(
            session,
            ActionKind::CreateNft,
            StoreCall::GenerateNft {
                name: form.name,
                url: form.url,
                price,
            },
            "NFT created successfully!".to_owned(),
        ))
    }

    pub fn prepare_buy(&self, name: &str) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self.require_session(ActionKind::Buy)?;
        Ok(self.prepared(
            session,
            ActionKind::Buy,
            StoreCall::Redeem {
                name: name.to_owned(),
            },
            "NFT purchased successfully!".to_owned(),
        ))
    }

    pub fn prepare_toggle(&self) -> Result<PreparedAction<P::Contract>, ActionError> {
        let session = self.require_session(ActionKind::ToggleStore)?;
        let next = self.snapshot.borrow().store_flag.toggled(session.account);
        let message = if next.is_open() {
            "Store opened!"
        } else {
            "Store closed!"
        };
        Ok(self.prepared(
            session,
            ActionKind::ToggleStore,
            StoreCall::SetStoreAddress { store: next.0 },
            message.to_owned(),
        ))
    }

    /// Executes a prepared action, or reports why preparation failed.
    pub async fn run(
        &self,
        prepared: Result<PreparedAction<P::Contract>, ActionError>,
    ) -> ActionOutcome {
        match prepared {
            Ok(action) => ActionOutcome::Dispatched(self.execute(action).await),
            Err(ActionError::NotOwner) => {
                debug!("mint ignored: session is not the contract owner");
                ActionOutcome::Skipped
            }
            Err(err) => {
                self.report(&err);
                ActionOutcome::Rejected(err)
            }
        }
    }

    pub async fn execute(&self, action: PreparedAction<P::Contract>) -> DispatchOutcome {
        let PreparedAction {
            kind,
            call,
            success_message,
            account,
            contract,
        } = action;

        let new_flag = match &call {
            StoreCall::SetStoreAddress { store } => Some(StoreFlag(*store)),
            _ => None,
        };

        let outcome = dispatch(
            contract.as_ref(),
            call,
            &success_message,
            self.notifier.as_ref(),
        )
        .await;

        if outcome.is_confirmed() {
            self.reconcile().await;
        } else if let Some(flag) = new_flag {
            self.apply_provisional_flag(account, flag);
        }
        debug!("{:?} finished: confirmed={}", kind, outcome.is_confirmed());
        outcome
    }

    pub fn report(&self, err: &ActionError) {
        warn!("action rejected: {}", err);
        self.notifier.notify(&err.notice());
    }

    pub async fn mint(&self) -> ActionOutcome {
        self.run(self.prepare_mint()).await
    }

    pub async fn burn(&self) -> ActionOutcome {
        self.run(self.prepare_burn()).await
    }

    pub async fn transfer(&self) -> ActionOutcome {
        self.run(self.prepare_transfer()).await
    }

    pub async fn create_nft(&self) -> ActionOutcome {
        self.run(self.prepare_create_nft()).await
    }

    pub async fn buy(&self, name: &str) -> ActionOutcome {
        self.run(self.prepare_buy(name)).await
    }

    pub async fn toggle_store(&self) -> ActionOutcome {
        self.run(self.prepare_toggle()).await
    }

    fn session(&self) -> Option<Session<P::Contract>> {
        self.session.borrow().clone()
    }

    fn current_account(&self) -> Option<Address> {
        self.session.borrow().as_ref().map(|s| s.account)
    }

    fn require_session(&self, kind: ActionKind) -> Result<Session<P::Contract>, ActionError> {
        self.session().ok_or(ActionError::NoSession(kind))
    }

    fn prepared(
        &self,
        session: Session<P::Contract>,
        kind: ActionKind,
        call: StoreCall,
        success_message: String,
    ) -> PreparedAction<P::Contract> {
        PreparedAction {
            kind,
            call,
            success_message,
            account: session.account,
            contract: session.contract,
        }
    }

    fn apply_provisional_flag(&self, account: Address, flag: StoreFlag) {
        if self.current_account() != Some(account) {
            debug!("store flag update dropped: session changed during toggle");
            return;
        }
        self.snapshot.borrow_mut().store_flag = flag;
        self.store_flag_provisional.set(true);
    }
}
