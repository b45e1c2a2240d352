//! Token balance ledger
//!
//! Minimal bank module: per-(address, denom) balances with checked credit
//! and debit. Deposits and limit-order placements escrow funds out of
//! here; withdrawals, fills, refunds, and cancellations flow back in.

use dex_types::errors::DexError;
use dex_types::ids::Address;
use dex_types::numeric::Amount;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bank {
    balances: BTreeMap<(Address, String), Amount>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, address: &Address, denom: &str) -> Amount {
        self.balances
            .get(&(address.clone(), denom.to_string()))
            .copied()
            .unwrap_or(Amount::zero())
    }

    pub fn credit(
        &mut self,
        address: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        let slot = self
            .balances
            .entry((address.clone(), denom.to_string()))
            .or_insert(Amount::zero());
        *slot = slot.checked_add(amount).ok_or(DexError::AmountOverflow)?;
        Ok(())
    }

    pub fn debit(
        &mut self,
        address: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(address, denom);
        let remaining = available
            .checked_sub(amount)
            .ok_or(DexError::InsufficientBalance {
                denom: denom.to_string(),
                required: amount,
                available,
            })?;
        self.balances
            .insert((address.clone(), denom.to_string()), remaining);
        Ok(())
    }

    /// Sum of all balances in one denom. Test/diagnostic helper for
    /// conservation checks.
    pub fn total_supply(&self, denom: &str) -> Amount {
        self.balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .fold(Amount::zero(), |acc, (_, v)| acc + *v)
    }
}
