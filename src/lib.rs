//! Umbrella crate re-exporting the SLIM protocol server's building blocks.
//!
//! The binary in `node/` is the intended entry point; this crate exists so
//! the pieces can also be pulled together and exercised from a single
//! `Cargo.toml` dependency, the way `neo-rs` aggregates the `neo-*` crates.

pub use slim_codec as codec;
pub use slim_context as context;
pub use slim_engine as engine;
pub use slim_fixtures as fixtures;
pub use slim_server as server;
pub use slim_session as session;
pub use slim_values as values;
