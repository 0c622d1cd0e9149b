//! Token custody seen from the pool
//!
//! The pool computes exact amounts owed and due, the vault moves the balances.
use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use std::collections::HashMap;

/// A single balance movement between an account and pool custody
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Pull `amount` of `token` from `from` into the pool
    Deposit {
        token: Pubkey,
        from: Pubkey,
        amount: u64,
    },
    /// Pay `amount` of `token` out of the pool to `to`. With `unwrap` the tokens leave the
    /// vault's internal balances instead of being credited to one
    Withdraw {
        token: Pubkey,
        to: Pubkey,
        amount: u64,
        unwrap: bool,
    },
}

pub trait Vault {
    /// Applies every transfer or none of them
    fn settle(&mut self, transfers: &[Transfer]) -> Result<()>;
}

/// Vault keeping balances in memory
///
/// Every owner has an internal balance per token, from which deposits are drawn and to
/// which plain withdrawals are credited. Unwrapped withdrawals land in a separate book.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryVault {
    balances: HashMap<(Pubkey, Pubkey), u64>,
    unwrapped: HashMap<(Pubkey, Pubkey), u64>,
    custody: HashMap<Pubkey, u64>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits an internal balance, e.g. when funds enter the vault from outside
    pub fn credit(&mut self, owner: Pubkey, token: Pubkey, amount: u64) -> Result<()> {
        let balance = self.balances.entry((owner, token)).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        Ok(())
    }

    pub fn balance(&self, owner: Pubkey, token: Pubkey) -> u64 {
        self.balances.get(&(owner, token)).copied().unwrap_or_default()
    }

    pub fn unwrapped_balance(&self, owner: Pubkey, token: Pubkey) -> u64 {
        self.unwrapped
            .get(&(owner, token))
            .copied()
            .unwrap_or_default()
    }

    /// Tokens held on behalf of pools
    pub fn custody(&self, token: Pubkey) -> u64 {
        self.custody.get(&token).copied().unwrap_or_default()
    }

    fn apply(&mut self, transfer: &Transfer) -> Result<()> {
        match *transfer {
            Transfer::Deposit {
                token,
                from,
                amount,
            } => {
                let balance = self.balances.entry((from, token)).or_default();
                *balance = balance
                    .checked_sub(amount)
                    .ok_or(ErrorCode::InsufficientBalance)?;
                let custody = self.custody.entry(token).or_default();
                *custody = custody
                    .checked_add(amount)
                    .ok_or(ErrorCode::TokenAmountOverflow)?;
            }
            Transfer::Withdraw {
                token,
                to,
                amount,
                unwrap,
            } => {
                let custody = self.custody.entry(token).or_default();
                *custody = custody
                    .checked_sub(amount)
                    .ok_or(ErrorCode::InsufficientBalance)?;
                let book = if unwrap {
                    &mut self.unwrapped
                } else {
                    &mut self.balances
                };
                let balance = book.entry((to, token)).or_default();
                *balance = balance
                    .checked_add(amount)
                    .ok_or(ErrorCode::TokenAmountOverflow)?;
            }
        }
        Ok(())
    }
}

impl Vault for MemoryVault {
    fn settle(&mut self, transfers: &[Transfer]) -> Result<()> {
        let mut next = self.clone();
        for transfer in transfers {
            next.apply(transfer)?;
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn deposit_then_withdraw() {
        let (alice, bob, token) = (key(1), key(2), key(3));
        let mut vault = MemoryVault::new();
        vault.credit(alice, token, 100).unwrap();

        vault
            .settle(&[
                Transfer::Deposit {
                    token,
                    from: alice,
                    amount: 60,
                },
                Transfer::Withdraw {
                    token,
                    to: bob,
                    amount: 20,
                    unwrap: false,
                },
                Transfer::Withdraw {
                    token,
                    to: bob,
                    amount: 30,
                    unwrap: true,
                },
            ])
            .unwrap();

        assert_eq!(vault.balance(alice, token), 40);
        assert_eq!(vault.balance(bob, token), 20);
        assert_eq!(vault.unwrapped_balance(bob, token), 30);
        assert_eq!(vault.custody(token), 10);
    }

    #[test]
    fn failed_settlement_applies_nothing() {
        let (alice, token) = (key(1), key(3));
        let mut vault = MemoryVault::new();
        vault.credit(alice, token, 100).unwrap();
        let before = vault.clone();

        let result = vault.settle(&[
            Transfer::Deposit {
                token,
                from: alice,
                amount: 100,
            },
            Transfer::Withdraw {
                token,
                to: alice,
                amount: 101,
                unwrap: false,
            },
        ]);
        assert_eq!(result.unwrap_err(), ErrorCode::InsufficientBalance.into());
        assert_eq!(vault, before);
    }
}
