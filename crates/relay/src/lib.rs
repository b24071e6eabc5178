//! Pairing and opaque-forwarding relay server: accepts TCP connections,
//! registers clients by numeric id, pairs two registered clients on
//! request, and forwards `MSG_DATA` between a paired pair without ever
//! inspecting its contents.

mod accept;
mod connection;
mod error;
mod lock;
mod message;
mod table;
mod worker;

pub use connection::ConnState;
pub use error::{RelayError, Result};
pub use lock::{default_lock_path, InstanceLock};
pub use table::ConnectionTable;

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use config::RelaySettings;

/// Owns the accept loop's lifetime. `shutdown()` asks the accept loop to
/// stop taking new connections; in-flight workers drain independently as
/// their sockets close.
pub struct RelayHandle {
    shutdown: Arc<AtomicBool>,
}

impl RelayHandle {
    #[must_use]
    pub fn new() -> Self {
        Self { shutdown: Arc::new(AtomicBool::new(false)) }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }
}

impl Default for RelayHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Binds `settings.relay_listen_port` on `settings.bind_address` and runs
/// the accept loop until `handle` is asked to shut down. Blocks the calling
/// thread.
pub fn run(settings: &RelaySettings, handle: &RelayHandle) -> Result<()> {
    let table = Arc::new(ConnectionTable::new());
    let listener = TcpListener::bind((settings.bind_address, settings.relay_listen_port))?;
    tracing::info!(
        event = "START",
        address = %settings.bind_address,
        port = settings.relay_listen_port,
        "relay listening"
    );

    let idle_deadline = Duration::from_millis(u64::from(settings.inactivity_timeout_millis));
    accept::run_with_capacity(listener, table, idle_deadline, handle.shutdown_flag(), settings.max_connections_per_relay)
}

#[cfg(test)]
mod tests {
    use std::net::TcpStream;
    use std::thread;
    use std::time::Duration;

    use wire::{
        read_relay_frame, write_relay_frame, RelayFrame, CancelToken, RELAY_DEFAULT_MAX_PAYLOAD,
        RELAY_IDLE_DEADLINE, RELAY_MSG_CONNECT_REQUEST, RELAY_MSG_CONNECT_RESPONSE, RELAY_MSG_DATA,
        RELAY_MSG_PARTNER_CONNECTED, RELAY_MSG_REGISTER, RELAY_MSG_REGISTER_RESPONSE, CONNECT_STATUS_OK,
        REGISTER_STATUS_OK,
    };

    use super::*;
    use crate::message;

    fn start_relay() -> (std::net::SocketAddr, RelayHandle, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let table = Arc::new(ConnectionTable::new());
        let handle = RelayHandle::new();
        let shutdown = handle.shutdown_flag();
        let join = thread::spawn(move || {
            accept::run(listener, table, Duration::from_secs(5), shutdown).unwrap();
        });
        (addr, handle, join)
    }

    fn connect(addr: std::net::SocketAddr) -> TcpStream {
        TcpStream::connect(addr).unwrap()
    }

    fn send(stream: &TcpStream, kind: u8, payload: Vec<u8>) {
        write_relay_frame(stream, RelayFrame::new(kind, payload), None, &CancelToken::new()).unwrap();
    }

    fn recv(stream: &TcpStream) -> RelayFrame {
        read_relay_frame(stream, RELAY_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE, None, &CancelToken::new()).unwrap()
    }

    #[test]
    fn register_then_connect_then_forward_data() {
        let (addr, handle, _join) = start_relay();

        let controller = connect(addr);
        send(&controller, RELAY_MSG_REGISTER, message::encode_register(1));
        let ack = recv(&controller);
        assert_eq!(ack.message_kind, RELAY_MSG_REGISTER_RESPONSE);
        assert_eq!(message::decode_status(&ack.payload).unwrap(), REGISTER_STATUS_OK);

        let host = connect(addr);
        send(&host, RELAY_MSG_REGISTER, message::encode_register(2));
        recv(&host);

        let req = message::ConnectRequest { partner_id: 2, password: Vec::new() };
        send(&controller, RELAY_MSG_CONNECT_REQUEST, message::encode_connect_request(&req));
        let response = recv(&controller);
        assert_eq!(response.message_kind, RELAY_MSG_CONNECT_RESPONSE);
        assert_eq!(message::decode_status(&response.payload).unwrap(), CONNECT_STATUS_OK);

        let partner_connected = recv(&host);
        assert_eq!(partner_connected.message_kind, RELAY_MSG_PARTNER_CONNECTED);
        assert_eq!(message::decode_partner_connected(&partner_connected.payload).unwrap(), 1);

        send(&controller, RELAY_MSG_DATA, b"opaque bytes".to_vec());
        let forwarded = recv(&host);
        assert_eq!(forwarded.message_kind, RELAY_MSG_DATA);
        assert_eq!(forwarded.payload, b"opaque bytes");

        handle.shutdown();
    }

    #[test]
    fn duplicate_registration_while_paired_is_rejected() {
        let (addr, handle, _join) = start_relay();

        let controller = connect(addr);
        send(&controller, RELAY_MSG_REGISTER, message::encode_register(1));
        recv(&controller);
        let host = connect(addr);
        send(&host, RELAY_MSG_REGISTER, message::encode_register(2));
        recv(&host);
        send(&controller, RELAY_MSG_CONNECT_REQUEST, message::encode_connect_request(&message::ConnectRequest { partner_id: 2, password: Vec::new() }));
        recv(&controller);
        recv(&host);

        let impostor = connect(addr);
        send(&impostor, RELAY_MSG_REGISTER, message::encode_register(1));
        let rejection = recv(&impostor);
        assert_eq!(rejection.message_kind, RELAY_MSG_REGISTER_RESPONSE);
        assert_eq!(message::decode_status(&rejection.payload).unwrap(), wire::REGISTER_STATUS_DUPLICATE);

        handle.shutdown();
    }
}
