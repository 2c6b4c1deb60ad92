//! Key record
//!
//! A key is one account inside one ecosystem: its address, public key and
//! spending policy (payment cap, disable flags). Balances are not stored on
//! the row; they are resolved from unspent outputs by the resolver.

use rust_decimal::Decimal;
use std::sync::OnceLock;

use crate::domain::{parse_decimal, AddressDecoder, Balance};

/// Ecosystem used when none has been set.
pub const CANONICAL_ECOSYSTEM: i64 = 1;

/// Map an unset (zero) ecosystem to the canonical one.
pub fn normalize_ecosystem(ecosystem: i64) -> i64 {
    if ecosystem == 0 {
        CANONICAL_ECOSYSTEM
    } else {
        ecosystem
    }
}

/// Name of the per-ecosystem key table.
pub fn key_table_name(prefix: i64) -> String {
    format!("{}_keys", prefix)
}

/// Key record
#[derive(Debug, Clone, Default)]
pub struct Key {
    ecosystem: i64,

    /// Numeric key ID derived from `account`, computed on first use
    account_key_id: OnceLock<i64>,

    pub id: i64,

    /// String-encoded address
    pub account: String,

    pub public_key: Vec<u8>,

    /// Resolved balance; `None` until the resolver has aggregated outputs
    balance: Option<Balance>,

    /// Payment cap as a decimal string; empty means no cap
    pub max_pay: String,

    pub deleted: i64,
    pub blocked: i64,
}

impl Key {
    /// Create a key row with no resolved balance.
    pub fn new(id: i64, account: impl Into<String>, public_key: Vec<u8>) -> Self {
        Self {
            id,
            account: account.into(),
            public_key,
            ..Self::default()
        }
    }

    pub fn with_max_pay(mut self, max_pay: impl Into<String>) -> Self {
        self.max_pay = max_pay.into();
        self
    }

    pub fn with_flags(mut self, deleted: i64, blocked: i64) -> Self {
        self.deleted = deleted;
        self.blocked = blocked;
        self
    }

    /// Set the ecosystem this key is scoped to.
    pub fn set_ecosystem(&mut self, prefix: i64) -> &mut Self {
        self.ecosystem = prefix;
        self
    }

    /// Ecosystem of this key, with the unset value mapped to the canonical one.
    pub fn ecosystem(&self) -> i64 {
        normalize_ecosystem(self.ecosystem)
    }

    /// Table holding key rows. All ecosystems share the canonical table and
    /// are told apart by its `ecosystem` column.
    pub fn table_name() -> String {
        key_table_name(CANONICAL_ECOSYSTEM)
    }

    /// True if the key is deleted or blocked. Spend authorization must reject
    /// disabled keys; this only reports the flags.
    pub fn disabled(&self) -> bool {
        self.deleted != 0 || self.blocked != 0
    }

    pub fn balance(&self) -> Option<Balance> {
        self.balance
    }

    pub fn is_resolved(&self) -> bool {
        self.balance.is_some()
    }

    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = Some(balance);
    }

    /// The payment cap, if `max_pay` parses to a positive value.
    pub fn max_pay_limit(&self) -> Option<Decimal> {
        parse_decimal(&self.max_pay).filter(|cap| *cap > Decimal::ZERO)
    }

    /// Amount this key may spend: its balance, capped by `max_pay`.
    ///
    /// The balance must have been resolved first. Calling this on an
    /// unresolved key is a caller bug; release builds then compute from a
    /// zero balance, which says nothing about the account's real funds.
    /// Use [`Key::try_capable_amount`] when resolution is not guaranteed.
    pub fn capable_amount(&self) -> Decimal {
        debug_assert!(
            self.balance.is_some(),
            "capable_amount called before balance was resolved"
        );
        Self::cap_amount(self.balance.unwrap_or_default().value(), self.max_pay_limit())
    }

    /// Like [`Key::capable_amount`], but `None` while the balance is unresolved.
    pub fn try_capable_amount(&self) -> Option<Decimal> {
        self.balance
            .map(|balance| Self::cap_amount(balance.value(), self.max_pay_limit()))
    }

    fn cap_amount(balance: Decimal, cap: Option<Decimal>) -> Decimal {
        let amount = balance.max(Decimal::ZERO);
        match cap {
            Some(cap) => amount.min(cap),
            None => amount,
        }
    }

    /// Numeric key ID of `account`, decoded once per instance.
    pub fn account_key_id<D>(&self, decoder: &D) -> i64
    where
        D: AddressDecoder + ?Sized,
    {
        *self
            .account_key_id
            .get_or_init(|| decoder.decode(&self.account))
    }
}
