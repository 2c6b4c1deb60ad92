//! Domain module
//!
//! Core domain types: balances, decimal parsing and account addresses.

pub mod address;
pub mod amount;

pub use address::{address_to_key_id, key_id_to_address, AddressDecoder, ChecksumAddress};
pub use amount::{parse_decimal, parse_exact_decimal, AmountError, Balance, DecimalParseError};
