//! Singleton guarded by double-checked locking.
//!
//! The instance lives in a private `static` [`DoubleChecked`] cell. Callers
//! reach it only through [`Singleton::get_instance`]; the constructor is
//! private to this module.
//!
//! ```compile_fail
//! use sole::checked::Singleton;
//!
//! // The constructor is not visible outside the module.
//! let second = Singleton::new();
//! ```
//!
//! ```compile_fail
//! use sole::checked::Singleton;
//!
//! // Neither is the struct literal.
//! let second = Singleton { _sealed: () };
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::concurrency::DoubleChecked;

static INSTANCE: DoubleChecked<Singleton> = DoubleChecked::new();
static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// Process-wide instance initialized by double-checked locking.
#[derive(Debug)]
pub struct Singleton {
    _sealed: (),
}

impl Singleton {
    fn new() -> Self {
        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Singleton { _sealed: () }
    }

    /// Returns the shared instance, constructing it on the first call.
    #[inline]
    pub fn get_instance() -> &'static Singleton {
        INSTANCE.get_or_init(Singleton::new)
    }

    /// Returns `true` once some caller has triggered construction.
    pub fn is_initialized() -> bool {
        INSTANCE.is_initialized()
    }

    /// Number of times the constructor has run in this process.
    pub fn construction_count() -> usize {
        CONSTRUCTIONS.load(Ordering::SeqCst)
    }

    /// Placeholder operation; does nothing.
    pub fn whatever_method(&self) {}
}
