//! Pending form inputs, kept as the raw text the user typed.

use std::mem;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftForm {
    pub name: String,
    pub url: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInputs {
    pub mint_amount: String,
    pub burn_amount: String,
    pub transfer: TransferForm,
    pub new_nft: NftForm,
}

impl PendingInputs {
    pub fn take_mint(&mut self) -> String {
        mem::take(&mut self.mint_amount)
    }

    pub fn take_burn(&mut self) -> String {
        mem::take(&mut self.burn_amount)
    }

    pub fn take_transfer(&mut self) -> TransferForm {
        mem::take(&mut self.transfer)
    }

    pub fn take_new_nft(&mut self) -> NftForm {
        mem::take(&mut self.new_nft)
    }
}
