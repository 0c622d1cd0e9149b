//! A pool shared across threads
use crate::context::*;
use crate::error::ErrorCode;
use crate::pool::Pool;
use crate::vault::Vault;
use anchor_lang::prelude::*;
use std::sync::{Arc, Mutex};

/// Handle to a pool behind a lock
///
/// Every operation holds the lock until it has committed or failed, so operations on one
/// pool never interleave.
///
#[derive(Clone, Debug)]
pub struct SharedPool {
    inner: Arc<Mutex<Pool>>,
}

impl SharedPool {
    pub fn new(pool: Pool) -> Self {
        SharedPool {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Runs `f` with exclusive access to the pool
    pub fn with<T>(&self, f: impl FnOnce(&mut Pool) -> Result<T>) -> Result<T> {
        let mut pool = match self.inner.lock() {
            Ok(pool) => pool,
            Err(_) => {
                msg!("pool lock poisoned");
                return err!(ErrorCode::Locked);
            }
        };
        f(&mut *pool)
    }

    pub fn swap<V: Vault>(&self, vault: &mut V, sender: Pubkey, params: SwapParams) -> Result<u64> {
        self.with(|pool| pool.swap(vault, sender, params))
    }

    pub fn mint<V: Vault>(&self, vault: &mut V, sender: Pubkey, params: MintParams) -> Result<MintResult> {
        self.with(|pool| pool.mint(vault, sender, params))
    }

    pub fn burn<V: Vault>(&self, vault: &mut V, sender: Pubkey, params: BurnParams) -> Result<(u64, u64)> {
        self.with(|pool| pool.burn(vault, sender, params))
    }

    pub fn collect<V: Vault>(&self, vault: &mut V, sender: Pubkey, params: CollectParams) -> Result<(u64, u64)> {
        self.with(|pool| pool.collect(vault, sender, params))
    }

    /// A copy of the pool as of now
    pub fn snapshot(&self) -> Result<Pool> {
        self.with(|pool| Ok(pool.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::vault::MemoryVault;
    use std::thread;

    #[test]
    fn concurrent_swaps_serialize() {
        let (pool, vault) = pool_with_range(-1_200, 1_260, 100_000_000);
        let mut expected = pool.clone();
        let mut expected_vault = vault.clone();
        let shared = SharedPool::new(pool);
        let vault = Arc::new(Mutex::new(vault));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                let vault = Arc::clone(&vault);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let mut vault = vault.lock().unwrap();
                        shared
                            .swap(
                                &mut *vault,
                                alice(),
                                SwapParams {
                                    zero_for_one: true,
                                    amount_in: 1_000,
                                    recipient: alice(),
                                    unwrap_output: false,
                                },
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // same inputs in one direction, so the order of the threads does not matter
        for _ in 0..100 {
            expected
                .swap(
                    &mut expected_vault,
                    alice(),
                    SwapParams {
                        zero_for_one: true,
                        amount_in: 1_000,
                        recipient: alice(),
                        unwrap_output: false,
                    },
                )
                .unwrap();
        }
        assert_eq!(shared.snapshot().unwrap(), expected);
        assert_eq!(*vault.lock().unwrap(), expected_vault);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared = SharedPool::new(standard_pool());
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            poisoner
                .with(|_| -> Result<()> { panic!("abort while holding the pool") })
                .ok();
        })
        .join();

        let mut vault = MemoryVault::new();
        assert_eq!(
            shared
                .swap(
                    &mut vault,
                    alice(),
                    SwapParams {
                        zero_for_one: true,
                        amount_in: 1,
                        recipient: alice(),
                        unwrap_output: false,
                    },
                )
                .unwrap_err(),
            ErrorCode::Locked.into()
        );
        assert_eq!(shared.snapshot().unwrap_err(), ErrorCode::Locked.into());
    }
}
