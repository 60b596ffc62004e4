//! Three singletons, one per initialization strategy.
//!
//! - [`checked`]: double-checked locking over [`DoubleChecked`](crate::DoubleChecked).
//! - [`holder`]: a deferred static [`Holder`](crate::Holder).
//! - [`enumerated`]: a one-case enum with no run-time initialization at all.
//!
//! Each exposes `get_instance() -> &'static Singleton` and the empty
//! `whatever_method`.

pub mod checked;
pub mod enumerated;
pub mod holder;
