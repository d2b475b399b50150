//! Wallet session bootstrap.
//!
//! The injected provider is passed in explicitly; its absence is a normal
//! outcome (`Bootstrap::Unavailable`), not an error.

use anyhow::{Context, Result};
use dgn_api_types::Address;
use dgn_chain_client::{StoreContract, WalletProvider};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;

pub struct Session<C> {
    pub account: Address,
    pub is_owner: bool,
    pub contract: Rc<C>,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            account: self.account,
            is_owner: self.is_owner,
            contract: Rc::clone(&self.contract),
        }
    }
}

pub enum Bootstrap<C> {
    /// No injected wallet provider in this environment.
    Unavailable,
    /// The wallet authorized no account.
    NoAccount,
    Connected(Session<C>),
}

/// Owner check on canonical 20-byte addresses, independent of hex casing.
pub fn is_owner(account: Address, owner: Address) -> bool {
    account == owner
}

pub async fn bootstrap<P: WalletProvider>(
    provider: Option<&P>,
    config: &StoreConfig,
) -> Result<Bootstrap<P::Contract>> {
    let Some(provider) = provider else {
        debug!("no injected wallet provider; rendering without a session");
        return Ok(Bootstrap::Unavailable);
    };

    let accounts = provider
        .request_accounts()
        .await
        .context("request wallet accounts")?;
    let Some(account) = accounts.first().copied() else {
        info!("wallet authorized no accounts");
        return Ok(Bootstrap::NoAccount);
    };

    let contract = provider.bind_contract(config.contract_address, account);

    let is_owner = match contract.owner().await {
        Ok(owner) => is_owner(account, owner),
        Err(err) => {
            warn!("failed to fetch contract owner: {:#}", err);
            false
        }
    };

    info!("wallet session connected: account={} owner={}", account, is_owner);

    Ok(Bootstrap::Connected(Session {
        account,
        is_owner,
        contract: Rc::new(contract),
    }))
}
