//! Static cells initialized on first use.

pub mod holder;

pub use holder::Holder;
