pub mod units;

pub use alloy_primitives::{Address, U256};
pub use units::{TOKEN_DECIMALS, UnitsError, format_units, parse_units};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is required")]
    Empty,
    #[error("invalid address: {0}")]
    Invalid(String),
}

/// Parses a hex address in any letter case.
///
/// The result is the canonical 20-byte form, so two spellings of the same
/// account compare equal regardless of checksum casing.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    trimmed
        .parse::<Address>()
        .map_err(|_| AddressError::Invalid(trimmed.to_owned()))
}

/// EIP-55 checksummed rendering used everywhere an address is displayed.
pub fn display_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Contract-held store address used as an open/closed switch.
///
/// The zero address means closed; any other value means open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFlag(pub Address);

impl StoreFlag {
    pub const CLOSED: StoreFlag = StoreFlag(Address::ZERO);

    pub fn is_open(&self) -> bool {
        self.0 != Address::ZERO
    }

    /// Value to submit when the owner flips the switch from `session`.
    pub fn toggled(&self, session: Address) -> StoreFlag {
        if self.is_open() {
            StoreFlag::CLOSED
        } else {
            StoreFlag(session)
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_open() { "Store open" } else { "Store closed" }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.is_open() {
            "Reset Store Address"
        } else {
            "Set Store Address"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftRecord {
    pub name: String,
    pub url: String,
    pub price: U256,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0x22aF7a9CDD4CB0762D206e5B664F4feB7086C56D";
    const LOWER: &str = "0x22af7a9cdd4cb0762d206e5b664f4feb7086c56d";

    #[test]
    fn address_case_does_not_matter() {
        let mixed = parse_address(MIXED).unwrap();
        let lower = parse_address(LOWER).unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(display_address(&lower), MIXED);
    }

    #[test]
    fn rejects_bad_addresses() {
        assert_eq!(parse_address("  "), Err(AddressError::Empty));
        assert!(matches!(
            parse_address("0x1234"),
            Err(AddressError::Invalid(_))
        ));
        assert!(matches!(
            parse_address("kitty.eth"),
            Err(AddressError::Invalid(_))
        ));
    }

    #[test]
    fn store_flag_toggles_between_zero_and_session() {
        let session = parse_address(MIXED).unwrap();

        let closed = StoreFlag::default();
        assert!(!closed.is_open());
        assert_eq!(closed.status_label(), "Store closed");
        assert_eq!(closed.toggle_label(), "Set Store Address");

        let opened = closed.toggled(session);
        assert_eq!(opened, StoreFlag(session));
        assert!(opened.is_open());
        assert_eq!(opened.status_label(), "Store open");
        assert_eq!(opened.toggle_label(), "Reset Store Address");

        assert_eq!(opened.toggled(session), StoreFlag::CLOSED);
    }
}
