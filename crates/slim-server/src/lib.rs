//! TCP listener for the SLIM protocol: accepts connections and spawns one
//! isolated session per connection (spec.md §4.7, §5).

mod config;
mod error;
mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::Server;
