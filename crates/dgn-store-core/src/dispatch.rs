use dgn_chain_client::{StoreCall, StoreContract, TxReceipt, TxStatus};
use tracing::{error, info};

/// User-facing message produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    /// Mined with a non-success status.
    Reverted,
    /// Submission, confirmation or input conversion failed.
    Failed,
    ToggleFailed,
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) => message,
            Notice::Reverted => "Transaction failed!",
            Notice::Failed => "Transaction failed.",
            Notice::ToggleFailed => "Failed to toggle store address.",
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Confirmed(TxReceipt),
    Reverted(TxReceipt),
    Errored,
}

impl DispatchOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, DispatchOutcome::Confirmed(_))
    }
}

/// Submits `call`, waits for it to be mined and reports the result.
///
/// Nothing is retried. Reconciliation after a confirmed transaction is the
/// caller's job.
pub async fn dispatch<C: StoreContract + ?Sized>(
    contract: &C,
    call: StoreCall,
    success_message: &str,
    notifier: &dyn Notifier,
) -> DispatchOutcome {
    let method = call.method();

    let tx_hash = match contract.submit(call).await {
        Ok(tx_hash) => tx_hash,
        Err(err) => {
            error!("{} submission failed: {:#}", method, err);
            notifier.notify(&Notice::Failed);
            return DispatchOutcome::Errored;
        }
    };
    info!("{} submitted: tx={}", method, tx_hash);

    let receipt = match contract.wait_for_receipt(tx_hash).await {
        Ok(receipt) => receipt,
        Err(err) => {
            error!("{} confirmation failed: tx={} {:#}", method, tx_hash, err);
            notifier.notify(&Notice::Failed);
            return DispatchOutcome::Errored;
        }
    };

    match receipt.status {
        TxStatus::Success => {
            info!("{} confirmed: tx={} block={:?}", method, tx_hash, receipt.block_number);
            notifier.notify(&Notice::Success(success_message.to_owned()));
            DispatchOutcome::Confirmed(receipt)
        }
        TxStatus::Failed => {
            info!("{} reverted: tx={}", method, tx_hash);
            notifier.notify(&Notice::Reverted);
            DispatchOutcome::Reverted(receipt)
        }
    }
}
