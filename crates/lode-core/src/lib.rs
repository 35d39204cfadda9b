//! # Stores, Scopes, and Tracked Operations
//!
//! Lode is a small state-container runtime. There are four main pieces:
//!
//! - [`Store<S>`] — an owned unit of state with subscribers, updated by
//!   explicit next-state construction.
//! - [`StoreFactory`] / [`StoreScope`] — per-region store instances instead
//!   of process-wide singletons.
//! - [`run_tracked`] — the busy/error contract for asynchronous updates.
//! - [`persisted`] — write-through persistence for a declared subset of
//!   fields.
//!
//! ## Stores
//!
//! `Store<S>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use lode_core::Store;
//!
//! let count = Store::new(0i32);
//! count.replace(1);
//! count.update(|n| n + 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! `produce` gives the draft-editing style for record states: the closure
//! edits a clone, and the finished draft is swapped in atomically.
//!
//! ```rust
//! use lode_core::Store;
//!
//! #[derive(Clone, Default)]
//! struct Prefs { dark: bool, volume: u8 }
//!
//! let prefs = Store::new(Prefs::default());
//! prefs.produce(|p| {
//!     p.dark = true;
//!     p.volume = 7;
//! });
//! assert!(prefs.select(|p| p.dark));
//! ```
//!
//! ## Scoped instances
//!
//! A [`StoreFactory`] yields an independent store per call. A [`StoreScope`]
//! invokes it once, on first entry, and provides the instance to lookups from
//! inside the scope. Lookups outside any scope are an error, never a default:
//!
//! ```rust
//! use lode_core::{Store, StoreFactory, StoreScope, scope};
//!
//! let factory = StoreFactory::new(|| Store::new(Vec::<String>::new()));
//! let region = StoreScope::new(factory);
//!
//! region.enter(|| {
//!     let items = scope::current::<Vec<String>>().unwrap();
//!     items.update(|v| {
//!         let mut next = v.clone();
//!         next.push("first".into());
//!         next
//!     });
//! });
//!
//! assert!(scope::current::<Vec<String>>().is_err());
//! ```
//!
//! ## Tracked async updates
//!
//! [`run_tracked`] marks the state busy before the effect starts, and on
//! settlement either applies the result or records the failure message —
//! `busy` is never left set. See [`AsyncStatus`] for the allowed transitions.

pub mod error;
pub mod persist;
pub mod scope;
pub mod store;
pub mod task;
pub mod time;

pub use error::*;
pub use persist::*;
pub use scope::{StoreFactory, StoreScope};
pub use store::*;
pub use task::*;
pub use time::*;
