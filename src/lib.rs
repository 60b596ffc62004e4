//! # `sole` - Lazy, Thread-Safe Singletons
//!
//! Exactly-once initialization of process-wide values, shown three ways.
//!
//! ## Guarantees
//!
//! - **At most one construction**: whichever caller wins the first-access
//!   race constructs the value; every other caller, on any thread, receives
//!   a reference to that same value.
//! - **Deferred**: nothing is built until the first `get_instance()`.
//! - **No torn reads**: a value is published only after its constructor has
//!   returned (`Release` store, `Acquire` load), so no thread can observe a
//!   partially constructed instance.
//! - **Retry after failure**: a constructor that errors or panics leaves the
//!   cell empty; the next caller tries again.
//!
//! ## Strategies
//!
//! 1. **Double-checked locking** ([`DoubleChecked`], [`checked`]):
//!    one atomic load on the hot path; a mutex, a second check, and the
//!    constructor on the cold path.
//! 2. **Deferred static holder** ([`Holder`], [`holder`], [`singleton!`]):
//!    a `static` initialized on first read by a parameterless constructor,
//!    with `OnceLock` providing the exactly-once guarantee.
//! 3. **Single-case enum** ([`enumerated`]): a compile-time constant that
//!    cannot be built outside this crate and resolves back to itself after a
//!    serde round-trip.
//!
//! ## Example
//!
//! ```rust
//! use sole::{checked, enumerated, holder};
//!
//! let a = checked::Singleton::get_instance();
//! let b = checked::Singleton::get_instance();
//! assert!(std::ptr::eq(a, b));
//!
//! holder::Singleton::get_instance().whatever_method();
//! enumerated::Singleton::get_instance().whatever_method();
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events when a value is constructed, when an
//!   initializer fails, and when a caller loses the initialization race.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod sync;
mod trace;

pub mod cell;
pub mod concurrency;
#[cfg(not(loom))]
pub mod patterns;

pub use cell::Holder;
pub use concurrency::DoubleChecked;
#[cfg(not(loom))]
pub use patterns::{checked, enumerated, holder};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // One published pointer plus the mutex; the value itself lives on the heap.
    #[cfg(not(loom))]
    assert!(mem::size_of::<DoubleChecked<[u64; 64]>>() <= mem::size_of::<usize>() * 4);

    // The enum singleton carries no data.
    #[cfg(not(loom))]
    assert!(mem::size_of::<patterns::enumerated::Singleton>() == 0);
};
