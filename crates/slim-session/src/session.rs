use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use slim_context::ExecutionContext;

use crate::error::SessionError;

/// `NNNNNN:` — a six-digit zero-padded decimal length followed by a
/// literal `:`. spec.md's Design Notes resolve the "exact six-digit width"
/// open question by treating six as a protocol constant: anything else is a
/// framing error, not a width to negotiate.
const HEADER_DIGITS: usize = 6;
const HEADER_WIDTH: usize = HEADER_DIGITS + 1;
const BANNER: &[u8] = b"Slim -- V0.0\n";
const BYE: &str = "bye";

/// Drives one TCP (or test in-memory) connection through the SLIM
/// ack-and-loop protocol: banner, then repeated read-frame / execute /
/// write-frame cycles until `bye` or a fatal I/O or framing error.
///
/// Generic over `AsyncRead + AsyncWrite` so the same state machine runs
/// against a real `TcpStream` in production and a `tokio::io::duplex` pair
/// in tests, mirroring how the teacher's `PeerConnection` wraps a stream
/// rather than hard-coding `TcpStream` into the read/write methods.
pub struct Session<S> {
    stream: S,
    ctx: ExecutionContext,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    pub fn new(stream: S) -> Self {
        Self::with_context(stream, ExecutionContext::new())
    }

    pub fn with_context(stream: S, ctx: ExecutionContext) -> Self {
        Self { stream, ctx }
    }

    /// Runs the session to completion: sends the banner, then loops reading
    /// a framed payload, executing it, and writing back the framed results,
    /// until the client sends `bye` or a fatal error occurs.
    pub async fn run(mut self) -> Result<(), SessionError> {
        self.stream.write_all(BANNER).await?;
        self.stream.flush().await?;

        loop {
            let body = match self.read_frame().await {
                Ok(body) => body,
                Err(err) if is_clean_eof(&err) => {
                    debug!("session closed before next frame header");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            if body == BYE {
                debug!("received bye; closing session");
                return Ok(());
            }

            let decoded = slim_codec::unpack(&body)?;
            let rows = slim_engine::execute_batch(&decoded, &mut self.ctx);
            let packed = slim_codec::pack(&rows);
            self.write_frame(&packed).await?;
        }
    }

    async fn read_frame(&mut self) -> Result<String, SessionError> {
        let mut header = [0u8; HEADER_WIDTH];
        self.stream.read_exact(&mut header).await?;

        if header[HEADER_DIGITS] != b':' {
            return Err(SessionError::InvalidHeader(
                "missing ':' after length header".to_string(),
            ));
        }
        let digits = &header[..HEADER_DIGITS];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(SessionError::InvalidHeader(
                "length header is not six decimal digits".to_string(),
            ));
        }
        let len: usize = std::str::from_utf8(digits)
            .expect("ascii digits are valid utf-8")
            .parse()
            .map_err(|_| SessionError::InvalidHeader("length header overflowed".to_string()))?;

        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await?;
        String::from_utf8(body).map_err(|_| SessionError::InvalidUtf8)
    }

    async fn write_frame(&mut self, payload: &str) -> Result<(), SessionError> {
        let header = format!("{:0width$}:", payload.len(), width = HEADER_DIGITS);
        self.stream.write_all(header.as_bytes()).await?;
        self.stream.write_all(payload.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

/// A peer that closes its write half cleanly right before the next header
/// (0 bytes read) is a graceful disconnect, not a framing error — only a
/// short read *into* a header is malformed per spec.md §4.6.
fn is_clean_eof(err: &SessionError) -> bool {
    matches!(
        err,
        SessionError::Io(io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slim_codec::SlimValue;
    use slim_fixtures::{ClassDescriptor, FixtureCatalog};
    use std::sync::Arc;
    use tokio::io::{duplex, AsyncReadExt as _, AsyncWriteExt as _};

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
        FixtureCatalog::global().register("session_test.echo", vec![descriptor]);
    }

    fn frame(payload: &str) -> Vec<u8> {
        format!("{:06}:{}", payload.len(), payload).into_bytes()
    }

    #[tokio::test]
    async fn sends_banner_then_echoes_a_call() {
        register_echo();
        let mut ctx = ExecutionContext::new();
        ctx.add_type_prefix("session_test.echo");

        let (mut client, server) = duplex(4096);
        let session = Session::with_context(server, ctx);
        let handle = tokio::spawn(session.run());

        let mut banner = [0u8; BANNER.len()];
        client.read_exact(&mut banner).await.unwrap();
        assert_eq!(&banner, BANNER);

        let make = slim_codec::pack(&[SlimValue::List(vec![
            SlimValue::str("make_0"),
            SlimValue::str("make"),
            SlimValue::str("eh"),
            SlimValue::str("Echo"),
        ])]);
        client.write_all(&frame(&make)).await.unwrap();

        let mut header = [0u8; HEADER_WIDTH];
        client.read_exact(&mut header).await.unwrap();
        let len: usize = std::str::from_utf8(&header[..HEADER_DIGITS])
            .unwrap()
            .parse()
            .unwrap();
        let mut body = vec![0u8; len];
        client.read_exact(&mut body).await.unwrap();
        let response = String::from_utf8(body).unwrap();
        let decoded = slim_codec::unpack(&response).unwrap();
        assert_eq!(
            decoded,
            vec![SlimValue::List(vec![
                SlimValue::str("make_0"),
                SlimValue::str("OK")
            ])]
        );

        client.write_all(&frame(BYE)).await.unwrap();
        drop(client);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn malformed_header_is_a_fatal_session_error() {
        let ctx = ExecutionContext::new();
        let (mut client, server) = duplex(4096);
        let session = Session::with_context(server, ctx);
        let handle = tokio::spawn(session.run());

        let mut banner = [0u8; BANNER.len()];
        client.read_exact(&mut banner).await.unwrap();
        client.write_all(b"XXXXXX:").await.unwrap();
        drop(client);

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(SessionError::InvalidHeader(_))));
    }
}
