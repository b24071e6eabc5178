//! The accept loop: binds the listener, configures each accepted socket,
//! and spawns one worker thread per connection. Does nothing else — pairing
//! and forwarding decisions live entirely in [`crate::worker`].

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use socket2::{Socket, TcpKeepalive};

use crate::error::Result;
use crate::table::ConnectionTable;
use crate::worker;

const KEEPALIVE_IDLE: Duration = Duration::from_secs(30);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(5);
const KEEPALIVE_RETRIES: u32 = 3;
const SOCKET_BUFFER_BYTES: usize = 512 * 1024;
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Runs the accept loop until `shutdown` is set, spawning a detached worker
/// thread per connection. Returns once the listener stops accepting; does
/// not itself wait for in-flight workers to drain (the caller does that).
pub fn run(
    listener: TcpListener,
    table: Arc<ConnectionTable>,
    idle_deadline: Duration,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    run_with_capacity(listener, table, idle_deadline, shutdown, u32::MAX)
}

/// As [`run`], but rejects new connections once `max_connections` are
/// already tracked in `table`.
pub fn run_with_capacity(
    listener: TcpListener,
    table: Arc<ConnectionTable>,
    idle_deadline: Duration,
    shutdown: Arc<AtomicBool>,
    max_connections: u32,
) -> Result<()> {
    listener.set_nonblocking(true)?;

    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, addr)) => {
                if table.len() as u32 >= max_connections {
                    tracing::warn!(event = "ERROR", %addr, "connection table at capacity, rejecting");
                    let _ = stream.shutdown(std::net::Shutdown::Both);
                    continue;
                }
                spawn_connection(stream, addr, &table, idle_deadline, &shutdown);
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL_INTERVAL),
            Err(e) => tracing::warn!(event = "ERROR", error = %e, "accept failed"),
        }
    }
    Ok(())
}

fn spawn_connection(
    stream: std::net::TcpStream,
    addr: SocketAddr,
    table: &Arc<ConnectionTable>,
    idle_deadline: Duration,
    shutdown: &Arc<AtomicBool>,
) {
    if let Err(e) = tune_socket(&stream) {
        tracing::warn!(event = "ERROR", %addr, error = %e, "failed to tune accepted socket");
    }
    let Ok(write_half) = stream.try_clone() else {
        tracing::warn!(event = "ERROR", %addr, "failed to clone accepted socket");
        return;
    };

    let conn = table.insert(write_half);
    let table = table.clone();
    let shutdown = shutdown.clone();
    tracing::info!(event = "CONNECT", %addr, connection = conn.id, "accepted");

    thread::spawn(move || {
        worker::run_connection(&table, &conn, &stream, idle_deadline, &shutdown);
    });
}

fn tune_socket(stream: &std::net::TcpStream) -> std::io::Result<()> {
    stream.set_nodelay(true)?;
    let socket = Socket::from(stream.try_clone()?);
    let keepalive =
        TcpKeepalive::new().with_time(KEEPALIVE_IDLE).with_interval(KEEPALIVE_INTERVAL).with_retries(KEEPALIVE_RETRIES);
    socket.set_tcp_keepalive(&keepalive)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_BYTES)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_BYTES)?;
    Ok(())
}
