//! Wavecrest Core -- the permanent-progression engine of a wave-survival game.
//!
//! Players spend skill points to unlock nodes in a connected skill graph.
//! Unlocked nodes contribute stat modifiers and behavior flags that combat
//! systems read once per tick, and any unlock set can be shared as a short
//! build code.
//!
//! # Components
//!
//! - [`catalog::Catalog`] -- immutable node definitions, validated once by
//!   [`catalog::CatalogBuilder`].
//! - [`adjacency::AdjacencyIndex`] -- symmetric neighbor map derived from the
//!   catalog's declared connections.
//! - [`compose::compose`] -- pure function from an active set to
//!   [`compose::ComputedModifiers`].
//! - [`session::Session`] -- owned mutable state (active set + balance) that
//!   enforces reachability and affordability and notifies listeners.
//! - [`build_code`] -- encode/decode between an active set and a string,
//!   re-validating connectivity on decode.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = Session::new(Arc::new(catalog), SessionConfig::default());
//! session.add_skill_points(3);
//! if session.activate("sharpened_edge") {
//!     let dmg = session.modifiers().damage;
//! }
//! let code = session.export_code();
//! ```
//!
//! Everything here is synchronous and single-threaded. No operation performs
//! I/O; loading catalogs from files lives in `wavecrest-data`.

pub mod active;
pub mod adjacency;
pub mod behavior;
pub mod build_code;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod event;
pub mod fixed;
pub mod id;
pub mod session;
pub mod stat;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
