//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! The controller is installed once at startup and handed out as `Rc` so
//! no borrow of the cell outlives a call.

use dgn_chain_evm::{EvmStoreContract, EvmWallet};
use dgn_store_core::{PreparedAction, StoreController};
use std::cell::RefCell;
use std::rc::Rc;

use crate::provider::InjectedTransport;

pub type Controller = StoreController<EvmWallet<InjectedTransport>>;
pub type Prepared = PreparedAction<EvmStoreContract<InjectedTransport>>;

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<Controller>>> = const { RefCell::new(None) };
}

pub fn install(controller: Rc<Controller>) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(controller));
}

pub fn controller() -> Option<Rc<Controller>> {
    CONTROLLER.with(|c| c.borrow().clone())
}
