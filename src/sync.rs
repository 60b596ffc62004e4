//! Synchronization shim.
//!
//! Under `--cfg loom` the crate's atomics and mutex come from `loom`, so the
//! double-checked publication protocol can be model-checked. Otherwise they
//! are the `std` types.

#[cfg(loom)]
pub(crate) use loom::sync::{
    atomic::{AtomicPtr, Ordering},
    Mutex, MutexGuard,
};

#[cfg(not(loom))]
pub(crate) use std::sync::{
    atomic::{AtomicPtr, Ordering},
    Mutex, MutexGuard,
};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// The guarded section never publishes partial state, so a poisoned lock
/// carries no broken invariant.
#[inline]
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
