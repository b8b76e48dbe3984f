use tokio::net::TcpListener;
use tracing::{error, info, warn};

use slim_context::ExecutionContext;
use slim_session::Session;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Accepts SLIM connections and dispatches one [`Session`] per connection,
/// each with its own freshly built `ExecutionContext` (spec.md §5: sessions
/// never share mutable state beyond the listener itself).
///
/// Mirrors the teacher's `TaskManager::start_connection_acceptor` accept
/// loop, but scoped down to a single listener with no peer table — a SLIM
/// server has no peer-to-peer mesh to track, just independent client
/// sessions.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.socket_addr_string();
        let listener =
            TcpListener::bind(&addr)
                .await
                .map_err(|source| ServerError::Listen {
                    addr: addr.clone(),
                    source,
                })?;
        info!(%addr, "slim server listening");
        Ok(Self { listener, config })
    }

    /// Serves connections until shutdown. With `keepalive` the accept loop
    /// runs indefinitely, spawning one task per connection; without it,
    /// exactly one connection is accepted and awaited in-line, and the
    /// server returns once that session completes (spec.md §4.7).
    pub async fn serve(self) -> Result<(), ServerError> {
        let Server { listener, config } = self;

        if !config.keepalive {
            let (stream, peer) = listener.accept().await.map_err(ServerError::Accept)?;
            info!(%peer, "accepted connection (keepalive disabled; serving one session)");
            run_session(stream, build_context(&config)).await;
            return Ok(());
        }

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "accepted connection");
                    let ctx = build_context(&config);
                    tokio::spawn(async move {
                        run_session(stream, ctx).await;
                    });
                }
                Err(err) => {
                    error!(error = %err, "failed to accept connection");
                }
            }
        }
    }
}

async fn run_session(stream: tokio::net::TcpStream, ctx: ExecutionContext) {
    if let Err(err) = Session::with_context(stream, ctx).run().await {
        warn!(error = %err, "session ended with an error");
    }
}

fn build_context(config: &ServerConfig) -> ExecutionContext {
    let mut ctx = ExecutionContext::new();
    for path in &config.fixture_paths {
        ctx.add_import_path(path);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use slim_codec::SlimValue;
    use slim_fixtures::{ClassDescriptor, FixtureCatalog};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn register_echo() {
        struct Echo;
        let descriptor = ClassDescriptor::new(
            "Echo",
            Arc::new(|_args| Ok(Box::new(Echo) as Box<dyn slim_fixtures::FixtureInstance>)),
        )
        .with_method(
            "echo",
            Arc::new(|_instance, args| {
                Ok(slim_values::Value::Str(
                    args.first()
                        .and_then(SlimValue::as_str)
                        .unwrap_or_default()
                        .to_string(),
                ))
            }),
        );
        FixtureCatalog::global().register("server_test.echo", vec![descriptor]);
    }

    #[tokio::test]
    async fn non_keepalive_server_serves_exactly_one_session() {
        register_echo();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            keepalive: false,
            fixture_paths: vec!["server_test.echo".to_string()],
        };
        // port 0 means "pick any free port"; bind first, then read back the
        // assigned port before handing the config to the server.
        let listener = tokio::net::TcpListener::bind(format!("{}:0", config.host))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let server = Server::bind(ServerConfig {
            port: addr.port(),
            ..config
        })
        .await
        .unwrap();
        let handle = tokio::spawn(server.serve());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut banner = [0u8; 13];
        stream.read_exact(&mut banner).await.unwrap();
        assert_eq!(&banner, b"Slim -- V0.0\n");

        stream.write_all(b"000003:bye").await.unwrap();
        drop(stream);

        handle.await.unwrap().unwrap();
    }
}
