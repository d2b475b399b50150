pub mod config;
pub mod controller;
pub mod dispatch;
pub mod forms;
pub mod reconcile;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::StoreConfig;
pub use controller::{
    ActionError, ActionKind, ActionOutcome, PreparedAction, SessionStatus, StoreController,
    StoreView,
};
pub use dispatch::{DispatchOutcome, Notice, Notifier};
pub use forms::{NftForm, PendingInputs, TransferForm};
pub use reconcile::Snapshot;
pub use session::{Bootstrap, Session};
