//! Lock-based lazy initialization.
//!
//! [`DoubleChecked`] publishes a value through an atomic pointer and only
//! falls back to its mutex while the value is missing.

pub mod double_checked;

pub use double_checked::DoubleChecked;
