//! TCP connection server.
//!
//! # Threading
//!
//! ```text
//! accept loop (caller's thread)
//!   └─ per connection: named OS thread running `serve_lines`
//!        read line → CommandProcessor::process → write line
//! ```
//!
//! The accept loop never does per-client work.  Each handler thread owns
//! its socket and buffers; they are dropped when the thread returns, on
//! any exit path.  An I/O error or idle timeout ends that one connection
//! and nothing else.
//!
//! # Framing
//!
//! Requests and responses are single `\n`-terminated lines.  Trailing `\r`
//! and `\n` are stripped from requests; every response gets exactly one
//! `\n`.  A final request without a terminator before EOF is still served.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, info_span, warn};

use fb_spatial::Router;

use crate::{CommandProcessor, ListenConfig, ServerResult};

/// Answer to a request longer than the configured line limit.
pub const TOO_LONG_RESPONSE: &str = "ERROR|request too long";

// ── Per-connection options ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Close a connection after this long without a complete request.
    pub idle_timeout:   Option<Duration>,
    /// Longest accepted request, excluding the line terminator.
    pub max_line_bytes: usize,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self::from(&ListenConfig::default())
    }
}

impl From<&ListenConfig> for ConnectionOptions {
    fn from(listen: &ListenConfig) -> Self {
        Self {
            idle_timeout:   listen.idle_timeout(),
            max_line_bytes: listen.max_line_bytes,
        }
    }
}

// ── Request loop ──────────────────────────────────────────────────────────────

/// Serve requests from `input` until EOF, writing one response per request.
///
/// A request longer than `max_line_bytes` is answered with
/// [`TOO_LONG_RESPONSE`] and the rest of that line is discarded unread
/// into memory; the connection stays usable.
///
/// Generic over the byte streams so it can run over a socket or an
/// in-memory buffer.
pub fn serve_lines<R, I, O>(
    mut input:      I,
    mut output:     O,
    processor:      &CommandProcessor<R>,
    max_line_bytes: usize,
) -> io::Result<()>
where
    R: Router,
    I: BufRead,
    O: Write,
{
    // Room for the request plus a `\r\n` terminator.
    let limit = max_line_bytes as u64 + 2;
    let mut buf = Vec::with_capacity(128);

    loop {
        buf.clear();
        let n = input.by_ref().take(limit).read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(());
        }

        let terminated = buf.last() == Some(&b'\n');
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        let response = if buf.len() > max_line_bytes || (!terminated && n as u64 == limit) {
            if !terminated {
                discard_line(&mut input)?;
            }
            warn!(limit = max_line_bytes, "request too long");
            TOO_LONG_RESPONSE.to_string()
        } else {
            processor.process(&String::from_utf8_lossy(&buf))
        };

        output.write_all(response.as_bytes())?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
}

/// Skip input up to and including the next `\n` (or EOF).
fn discard_line<I: BufRead>(input: &mut I) -> io::Result<()> {
    loop {
        let available = input.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                input.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                input.consume(len);
            }
        }
    }
}

fn handle_client<R: Router>(
    stream:    TcpStream,
    processor: &CommandProcessor<R>,
    client_id: u64,
    options:   &ConnectionOptions,
) {
    let _span = info_span!("client", client_id).entered();
    let peer = stream.peer_addr().ok();
    info!(?peer, "client connected");

    let outcome = stream
        .set_read_timeout(options.idle_timeout)
        .and_then(|()| stream.try_clone())
        .and_then(|read_half| {
            serve_lines(BufReader::new(read_half), &stream, processor, options.max_line_bytes)
        });

    match outcome {
        Ok(()) => info!("client disconnected"),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
            info!("idle timeout, closing connection");
        }
        Err(e) => warn!(error = %e, "connection error"),
    }
}

// ── ConnectionServer ──────────────────────────────────────────────────────────

/// Accepts TCP connections and serves each on its own thread.
pub struct ConnectionServer<R: Router + 'static> {
    listener:  TcpListener,
    processor: Arc<CommandProcessor<R>>,
    options:   ConnectionOptions,
    shutdown:  Arc<AtomicBool>,
}

impl<R: Router + 'static> ConnectionServer<R> {
    /// Bind the listening socket.  Use port 0 to let the OS pick one.
    pub fn bind(
        addr:      impl ToSocketAddrs,
        processor: Arc<CommandProcessor<R>>,
        options:   ConnectionOptions,
    ) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            processor,
            options,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that can stop [`run`](Self::run) from another thread.
    pub fn handle(&self) -> ServerResult<ServerHandle> {
        Ok(ServerHandle {
            addr:     self.local_addr()?,
            shutdown: Arc::clone(&self.shutdown),
        })
    }

    /// Accept connections until [`ServerHandle::shutdown`] is called.
    ///
    /// Accept failures and thread-spawn failures are logged and skipped; a
    /// bad connection never stops the loop.
    pub fn run(self) -> ServerResult<()> {
        let mut next_client: u64 = 0;

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };

            next_client += 1;
            let client_id = next_client;
            let processor = Arc::clone(&self.processor);
            let options   = self.options.clone();

            let spawned = thread::Builder::new()
                .name(format!("fb-client-{client_id}"))
                .spawn(move || handle_client(stream, &processor, client_id, &options));
            if let Err(e) = spawned {
                warn!(client_id, error = %e, "could not spawn connection handler");
            }
        }

        info!("accept loop stopped");
        Ok(())
    }

    /// Run the accept loop on a background thread.
    pub fn spawn(self) -> ServerResult<(ServerHandle, JoinHandle<ServerResult<()>>)> {
        let handle = self.handle()?;
        let join = thread::Builder::new()
            .name("fb-accept".to_string())
            .spawn(move || self.run())?;
        Ok((handle, join))
    }
}

// ── ServerHandle ──────────────────────────────────────────────────────────────

/// Stops a running accept loop.  Connections already being served run to
/// completion on their own threads.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    addr:     SocketAddr,
    shutdown: Arc<AtomicBool>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        // Wake the blocking accept() with a throwaway connection.
        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            wake.set_ip(match wake {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            });
        }
        if let Err(e) = TcpStream::connect_timeout(&wake, Duration::from_secs(1)) {
            debug!(error = %e, "shutdown wake-up connect failed");
        }
    }
}
