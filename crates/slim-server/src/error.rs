use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to accept a connection: {0}")]
    Accept(#[source] std::io::Error),
}
