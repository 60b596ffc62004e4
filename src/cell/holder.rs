//! `Holder` — a static value built on first use by a parameterless
//! constructor.
//!
//! The holder defers to `std::sync::OnceLock` for its exactly-once,
//! thread-safe initialization, so it carries no locking logic of its own.
//! Because the constructor is a plain `fn() -> T`, the holder can live in a
//! `static` and needs no per-call construction arguments.

use core::fmt;
use core::ops::Deref;
use std::sync::OnceLock;

use crate::trace::debug_event;

/// A lazily constructed value owned by a `static`.
///
/// # Example
///
/// ```rust
/// use sole::Holder;
///
/// fn build() -> Vec<&'static str> {
///     vec!["alpha", "beta"]
/// }
///
/// static NAMES: Holder<Vec<&'static str>> = Holder::new(build);
///
/// assert!(!NAMES.is_initialized());
/// assert_eq!(NAMES.len(), 2);
/// assert!(NAMES.is_initialized());
/// ```
pub struct Holder<T> {
    cell: OnceLock<T>,
    init: fn() -> T,
}

impl<T> Holder<T> {
    /// Creates a holder that will run `init` the first time it is read.
    #[inline]
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            cell: OnceLock::new(),
            init,
        }
    }

    /// Returns the value, constructing it on first access.
    #[inline]
    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| {
            let value = (self.init)();
            debug_event!(ty = core::any::type_name::<T>(), "holder value constructed");
            value
        })
    }

    /// Returns `true` once the value has been constructed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Deref for Holder<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("Holder");
        match self.cell.get() {
            Some(value) => d.field(value),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

/// Declares a holder-backed `get_instance()` accessor for a type.
///
/// The holder is a `static` nested inside the accessor, so it is not
/// reachable from anywhere else and is initialized on the first call.
///
/// ```rust
/// pub struct Registry {
///     entries: Vec<u32>,
/// }
///
/// impl Registry {
///     fn new() -> Self {
///         Registry { entries: vec![1, 2, 3] }
///     }
/// }
///
/// sole::singleton!(Registry, Registry::new);
///
/// let a = Registry::get_instance();
/// let b = Registry::get_instance();
/// assert!(std::ptr::eq(a, b));
/// assert_eq!(a.entries.len(), 3);
/// ```
#[macro_export]
macro_rules! singleton {
    ($ty:ty, $init:expr) => {
        impl $ty {
            /// Returns the process-wide instance, constructing it on first use.
            pub fn get_instance() -> &'static $ty {
                static INSTANCE: $crate::Holder<$ty> = $crate::Holder::new($init);
                INSTANCE.get()
            }
        }
    };
}
