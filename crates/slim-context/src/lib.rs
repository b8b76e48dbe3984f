//! Per-session execution state: the class registry, instance table, symbol
//! table, and method-name aliasing that a connection's instructions run
//! against.

mod alias;
mod context;
mod error;

pub use alias::{lower_camel, pythonic, upper_camel, AliasMap};
pub use context::{CallError, ExecutionContext, InstanceRef};
pub use error::ContextError;
