//! `DoubleChecked` — lazy initialization by double-checked locking.
//!
//! The cell holds a pointer to a heap-allocated value. Readers take a single
//! `Acquire` load; only while the pointer is still null do callers contend on
//! the mutex, re-check under it, and construct. The value is published with a
//! `Release` store after construction has finished, so no reader can observe
//! a partially built value.

use core::convert::Infallible;
use core::fmt;
use core::marker::PhantomData;
use core::ptr;

use crate::sync::{lock_unpoisoned, AtomicPtr, Mutex, Ordering};
use crate::trace::{debug_event, trace_event};

/// A thread-safe cell that is written at most once, guarded by a
/// double-checked lock.
///
/// This is the hand-rolled counterpart of `std::sync::OnceLock`: the fast
/// path is one atomic load, the slow path serializes initializers on a
/// `Mutex` that is only touched while the cell is empty.
///
/// # Example
///
/// ```rust
/// use sole::DoubleChecked;
///
/// static CONFIG: DoubleChecked<String> = DoubleChecked::new();
///
/// let first = CONFIG.get_or_init(|| "ready".to_owned());
/// let second = CONFIG.get_or_init(|| unreachable!());
/// assert!(std::ptr::eq(first, second));
/// ```
pub struct DoubleChecked<T> {
    value: AtomicPtr<T>,
    lock: Mutex<()>,
    _owns: PhantomData<Box<T>>,
}

// SAFETY: the cell owns a `T` that may be dropped on another thread.
unsafe impl<T: Send> Send for DoubleChecked<T> {}
// SAFETY: shared access hands out `&T` to many threads, and whichever thread
// wins the race constructs the `T` that another thread later drops.
unsafe impl<T: Send + Sync> Sync for DoubleChecked<T> {}

impl<T> DoubleChecked<T> {
    /// Creates a new empty cell.
    #[cfg(not(loom))]
    #[inline]
    pub const fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
            lock: Mutex::new(()),
            _owns: PhantomData,
        }
    }

    /// Creates a new empty cell.
    #[cfg(loom)]
    pub fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
            lock: Mutex::new(()),
            _owns: PhantomData,
        }
    }

    /// Returns `true` once a value has been published.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.value.load(Ordering::Acquire).is_null()
    }

    /// Returns the value if it has been initialized. Never blocks.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        let raw = self.value.load(Ordering::Acquire);
        // SAFETY: a non-null pointer was stored with `Release` after the
        // pointee was fully constructed, and it stays alive until `&mut self`
        // access (`take`, `drop`) which cannot overlap this borrow.
        unsafe { raw.as_ref() }
    }

    /// Returns a mutable reference to the value if initialized.
    ///
    /// `&mut self` rules out concurrent readers, so no locking is needed.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        let raw = self.value.load(Ordering::Relaxed);
        // SAFETY: exclusive access; see `get`.
        unsafe { raw.as_mut() }
    }

    /// Gets the value, running `f` to construct it if the cell is empty.
    ///
    /// Of all concurrent callers exactly one runs its initializer; the others
    /// block on the lock and then observe the published value.
    ///
    /// If `f` panics the panic propagates, the cell stays empty and a later
    /// call may try again.
    ///
    /// Calling `get_or_init` on the same cell from inside `f` deadlocks.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Gets the value, running the fallible `f` to construct it if the cell
    /// is empty.
    ///
    /// An error from `f` is returned to the caller that ran it and nothing is
    /// published, so the next call retries construction.
    ///
    /// ```rust
    /// use sole::DoubleChecked;
    ///
    /// let cell = DoubleChecked::new();
    /// assert_eq!(cell.get_or_try_init(|| "42x".parse::<u32>()).ok(), None);
    /// assert!(!cell.is_initialized());
    /// assert_eq!(cell.get_or_try_init(|| "42".parse::<u32>()), Ok(&42));
    /// ```
    #[inline]
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        self.initialize(f)
    }

    #[cold]
    fn initialize<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let _guard = lock_unpoisoned(&self.lock);

        // Second check: another caller may have published while we waited.
        if let Some(value) = self.get() {
            trace_event!(ty = core::any::type_name::<T>(), "lost initialization race");
            return Ok(value);
        }

        let value = f().map_err(|err| {
            trace_event!(ty = core::any::type_name::<T>(), "initializer failed; cell left empty");
            err
        })?;
        Ok(self.publish(value))
    }

    /// Stores `value` and returns a reference to it. Caller holds the lock
    /// and has observed the cell empty.
    fn publish(&self, value: T) -> &T {
        let raw = Box::into_raw(Box::new(value));
        self.value.store(raw, Ordering::Release);
        debug_event!(ty = core::any::type_name::<T>(), "value constructed and published");
        // SAFETY: `raw` came from `Box::into_raw` just above and is only
        // freed through `&mut self`.
        unsafe { &*raw }
    }

    /// Sets the value if the cell is empty.
    ///
    /// Returns `Err(value)` when the cell was already initialized.
    pub fn set(&self, value: T) -> Result<(), T> {
        if self.is_initialized() {
            return Err(value);
        }
        let _guard = lock_unpoisoned(&self.lock);
        if self.is_initialized() {
            return Err(value);
        }
        self.publish(value);
        Ok(())
    }

    /// Takes the value out, leaving the cell empty.
    pub fn take(&mut self) -> Option<T> {
        let raw = self.value.swap(ptr::null_mut(), Ordering::AcqRel);
        if raw.is_null() {
            None
        } else {
            // SAFETY: non-null pointers always originate from `Box::into_raw`
            // in `publish`; swapping in null gives up the cell's ownership.
            Some(*unsafe { Box::from_raw(raw) })
        }
    }

    /// Consumes the cell, returning the value if it was initialized.
    #[inline]
    pub fn into_inner(mut self) -> Option<T> {
        self.take()
    }
}

impl<T> Default for DoubleChecked<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DoubleChecked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("DoubleChecked");
        match self.get() {
            Some(value) => d.field(value),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

impl<T> Drop for DoubleChecked<T> {
    fn drop(&mut self) {
        drop(self.take());
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_empty_cell() {
        let cell: DoubleChecked<u32> = DoubleChecked::new();
        assert!(!cell.is_initialized());
        assert_eq!(cell.get(), None);
        assert_eq!(format!("{cell:?}"), "DoubleChecked(<uninit>)");
    }

    #[test]
    fn test_get_or_init_runs_once() {
        let calls = AtomicUsize::new(0);
        let cell = DoubleChecked::new();
        let first = cell.get_or_init(|| {
            calls.fetch_add(1, AtomicOrdering::SeqCst);
            7
        });
        let second = cell.get_or_init(|| {
            calls.fetch_add(1, AtomicOrdering::SeqCst);
            8
        });
        assert_eq!(*first, 7);
        assert!(ptr::eq(first, second));
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(format!("{cell:?}"), "DoubleChecked(7)");
    }

    #[test]
    fn test_set_then_set_again() {
        let cell = DoubleChecked::new();
        assert_eq!(cell.set(1), Ok(()));
        assert_eq!(cell.set(2), Err(2));
        assert_eq!(cell.get(), Some(&1));
    }

    #[test]
    fn test_take_and_reinitialize() {
        let mut cell = DoubleChecked::new();
        cell.get_or_init(|| String::from("a"));
        cell.get_mut().unwrap().push('b');
        assert_eq!(cell.take().as_deref(), Some("ab"));
        assert!(!cell.is_initialized());
        assert_eq!(cell.get_or_init(|| String::from("c")), "c");
        assert_eq!(cell.into_inner().as_deref(), Some("c"));
    }

    #[test]
    fn test_panicking_initializer_allows_retry() {
        let cell = Arc::new(DoubleChecked::<u8>::new());
        let c = Arc::clone(&cell);
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            c.get_or_init(|| panic!("boom"));
        }));
        assert!(result.is_err());
        assert!(!cell.is_initialized());
        assert_eq!(*cell.get_or_init(|| 3), 3);
    }

    #[test]
    fn test_drop_releases_value() {
        struct Counted(Arc<AtomicUsize>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.fetch_add(1, AtomicOrdering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        {
            let cell = DoubleChecked::new();
            cell.get_or_init(|| Counted(Arc::clone(&drops)));
            assert_eq!(drops.load(AtomicOrdering::SeqCst), 0);
        }
        assert_eq!(drops.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_initializers_construct_once() {
        let cell = Arc::new(DoubleChecked::<usize>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cell = Arc::clone(&cell);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let value = cell.get_or_init(|| {
                        calls.fetch_add(1, AtomicOrdering::SeqCst);
                        i
                    });
                    (value as *const usize) as usize
                })
            })
            .collect();

        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }
}
