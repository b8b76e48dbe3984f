/// The server's configuration surface, matching spec.md §6 exactly: listen
/// host, listen port, keep-alive, and the comma-separated fixture search
/// paths seeded into every session's [`slim_context::ExecutionContext`].
///
/// `verbose` and the logging configuration file path are also part of the
/// spec's configuration surface, but they govern `tracing` setup in the
/// `node` binary before the server ever starts, so they are not modeled
/// here — this struct only carries what the accept loop itself needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub keepalive: bool,
    pub fixture_paths: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
            keepalive: true,
            fixture_paths: Vec::new(),
        }
    }
}
