//! # Tutorial stores
//!
//! Five self-contained stores, each demonstrating one pattern on top of
//! `lode-core`:
//!
//! - [`basic`] — plain counters with explicit next-state updates.
//! - [`roster`] — a collection edited draft-style, with counts derived on
//!   every read.
//! - [`settings`] — preferences persisted through a [`Storage`] under a
//!   fixed key, with a declared persisted subset.
//! - [`catalog`] — remote data behind an injectable API collaborator, with
//!   busy/error tracking on every operation.
//! - [`tasks`] — a store factory plus provisioning scopes, so several
//!   isolated task lists can coexist.
//!
//! [`Storage`]: lode_core::persist::Storage

pub mod basic;
pub mod catalog;
mod clock;
pub mod roster;
pub mod settings;
pub mod tasks;

pub use basic::*;
pub use catalog::*;
pub use roster::*;
pub use settings::*;
pub use tasks::*;

#[cfg(test)]
mod tests;
