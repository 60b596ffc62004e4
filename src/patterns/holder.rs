//! Singleton held by a deferred static holder.
//!
//! [`Singleton::get_instance`] owns a nested `static` [`Holder`](crate::Holder);
//! the holder's first read runs the private constructor. Thread safety comes
//! from `OnceLock`, not from code in this module.
//!
//! ```compile_fail
//! use sole::holder::Singleton;
//!
//! let second = Singleton::new();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// Process-wide instance initialized through a static holder.
#[derive(Debug)]
pub struct Singleton {
    _sealed: (),
}

impl Singleton {
    fn new() -> Self {
        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Singleton { _sealed: () }
    }

    /// Number of times the constructor has run in this process.
    pub fn construction_count() -> usize {
        CONSTRUCTIONS.load(Ordering::SeqCst)
    }

    /// Placeholder operation; does nothing.
    pub fn whatever_method(&self) {}
}

crate::singleton!(Singleton, Singleton::new);
