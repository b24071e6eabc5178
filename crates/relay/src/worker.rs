//! Per-connection worker: reads frames from one socket, updates the
//! connection table, and forwards or replies as the relay protocol
//! requires. Table access is limited to brief lookups; forwarding writes
//! go straight to the target connection's own write-half mutex.

use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wire::{
    CancelToken, RelayFrame, RELAY_DEFAULT_MAX_PAYLOAD, RELAY_MSG_CONNECT_REQUEST, RELAY_MSG_CONNECT_RESPONSE,
    RELAY_MSG_DATA, RELAY_MSG_DISCONNECT, RELAY_MSG_PARTNER_CONNECTED, RELAY_MSG_PARTNER_DISCONNECTED,
    RELAY_MSG_PING, RELAY_MSG_PONG, RELAY_MSG_REGISTER, RELAY_MSG_REGISTER_RESPONSE, CONNECT_STATUS_ERR_CONNECT,
    CONNECT_STATUS_OK, DISCONNECT_REASON_ERROR, DISCONNECT_REASON_NORMAL, DISCONNECT_REASON_TIMEOUT,
    REGISTER_STATUS_DUPLICATE, REGISTER_STATUS_OK, WireError,
};

use crate::connection::{ConnState, Connection};
use crate::message;
use crate::table::ConnectionTable;

const DUPLICATE_GRACE: Duration = Duration::from_secs(5);

enum Flow {
    Continue,
    Stop,
}

/// Drives one accepted connection until it disconnects, times out, or the
/// relay is shutting down.
pub fn run_connection(
    table: &ConnectionTable,
    conn: &Arc<Connection>,
    read_stream: &TcpStream,
    idle_deadline: Duration,
    shutdown: &AtomicBool,
) {
    let cancel = CancelToken::new();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            notify_partner(table, conn, wire::DISCONNECT_REASON_SERVER_STOP);
            break;
        }
        match wire::read_relay_frame(read_stream, RELAY_DEFAULT_MAX_PAYLOAD, idle_deadline, None, &cancel) {
            Ok(frame) => {
                conn.touch();
                match handle_frame(table, conn, &frame, &cancel) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Stop) => break,
                    Err(err) => {
                        tracing::warn!(event = "ERROR", connection = conn.id, error = %err, "worker error");
                        break;
                    }
                }
            }
            Err(WireError::Timeout) => {
                tracing::info!(event = "TIMEOUT", connection = conn.id, "inactivity timeout");
                notify_partner(table, conn, DISCONNECT_REASON_TIMEOUT);
                break;
            }
            Err(WireError::ConnectionClosed) => {
                notify_partner(table, conn, DISCONNECT_REASON_ERROR);
                break;
            }
            Err(err) => {
                tracing::warn!(event = "ERROR", connection = conn.id, error = %err, "read failed");
                notify_partner(table, conn, DISCONNECT_REASON_ERROR);
                break;
            }
        }
    }
    table.remove(conn.id);
    conn.set_state(ConnState::Disconnected);
    conn.shutdown();
}

fn handle_frame(
    table: &ConnectionTable,
    conn: &Arc<Connection>,
    frame: &RelayFrame,
    cancel: &CancelToken,
) -> wire::Result<Flow> {
    match frame.message_kind {
        RELAY_MSG_REGISTER => handle_register(table, conn, &frame.payload, cancel),
        RELAY_MSG_CONNECT_REQUEST => handle_connect_request(table, conn, &frame.payload, cancel),
        RELAY_MSG_DATA => {
            forward_data(table, conn, &frame.payload, cancel);
            Ok(Flow::Continue)
        }
        RELAY_MSG_DISCONNECT => {
            tracing::info!(event = "DISCONNECT", connection = conn.id, "graceful disconnect");
            notify_partner(table, conn, DISCONNECT_REASON_NORMAL);
            Ok(Flow::Stop)
        }
        RELAY_MSG_PING => {
            conn.send(RelayFrame::new(RELAY_MSG_PONG, Vec::new()), cancel)?;
            Ok(Flow::Continue)
        }
        RELAY_MSG_PONG => Ok(Flow::Continue),
        _ => Err(WireError::Protocol("unrecognized relay message kind")),
    }
}

fn handle_register(
    table: &ConnectionTable,
    conn: &Arc<Connection>,
    payload: &[u8],
    cancel: &CancelToken,
) -> wire::Result<Flow> {
    let client_id =
        message::decode_register(payload).map_err(|_| WireError::Protocol("malformed REGISTER payload"))?;

    if let Some(other) = table.find_by_client_id(client_id, conn.id) {
        let protect = match other.state() {
            ConnState::Paired => true,
            ConnState::Registered => other.idle_for() < DUPLICATE_GRACE,
            ConnState::Connected | ConnState::Disconnected => false,
        };
        if protect {
            tracing::info!(event = "PROTECT", client_id, connection = conn.id, "duplicate registration rejected");
            conn.send(RelayFrame::new(RELAY_MSG_REGISTER_RESPONSE, message::encode_status(REGISTER_STATUS_DUPLICATE)), cancel)?;
            return Ok(Flow::Stop);
        }
        tracing::info!(event = "CLEANUP", client_id, stale_connection = other.id, "stale registration reclaimed");
        table.remove(other.id);
        other.set_state(ConnState::Disconnected);
        other.shutdown();
    }

    conn.set_registered_id(Some(client_id));
    conn.set_state(ConnState::Registered);
    tracing::info!(event = "REGISTER", client_id, connection = conn.id, "registered");
    conn.send(RelayFrame::new(RELAY_MSG_REGISTER_RESPONSE, message::encode_status(REGISTER_STATUS_OK)), cancel)?;
    Ok(Flow::Continue)
}

fn handle_connect_request(
    table: &ConnectionTable,
    conn: &Arc<Connection>,
    payload: &[u8],
    cancel: &CancelToken,
) -> wire::Result<Flow> {
    if conn.state() != ConnState::Registered {
        return Err(WireError::Protocol("CONNECT_REQUEST from an unregistered connection"));
    }
    let request = message::decode_connect_request(payload)
        .map_err(|_| WireError::Protocol("malformed CONNECT_REQUEST payload"))?;

    let partner = table.find_by_client_id(request.partner_id, conn.id).filter(|p| p.state() != ConnState::Disconnected);
    let Some(partner) = partner else {
        tracing::info!(event = "CONNECT", partner_id = request.partner_id, connection = conn.id, result = "not_found");
        conn.send(RelayFrame::new(RELAY_MSG_CONNECT_RESPONSE, message::encode_status(CONNECT_STATUS_ERR_CONNECT)), cancel)?;
        return Ok(Flow::Continue);
    };
    if partner.state() != ConnState::Registered {
        tracing::info!(event = "CONNECT", partner_id = request.partner_id, connection = conn.id, result = "busy");
        conn.send(RelayFrame::new(RELAY_MSG_CONNECT_RESPONSE, message::encode_status(CONNECT_STATUS_ERR_CONNECT)), cancel)?;
        return Ok(Flow::Continue);
    }

    conn.set_state(ConnState::Paired);
    conn.set_partner(Some(partner.id));
    partner.set_state(ConnState::Paired);
    partner.set_partner(Some(conn.id));
    conn.touch();
    partner.touch();

    tracing::info!(event = "CONNECT", partner_id = request.partner_id, connection = conn.id, result = "ok");
    conn.send(RelayFrame::new(RELAY_MSG_CONNECT_RESPONSE, message::encode_status(CONNECT_STATUS_OK)), cancel)?;
    let initiator_id = conn.registered_id().unwrap_or(0);
    partner.send(RelayFrame::new(RELAY_MSG_PARTNER_CONNECTED, message::encode_partner_connected(initiator_id)), cancel)?;
    Ok(Flow::Continue)
}

fn forward_data(table: &ConnectionTable, conn: &Arc<Connection>, payload: &[u8], cancel: &CancelToken) {
    if conn.state() != ConnState::Paired {
        return;
    }
    let Some(partner_id) = conn.partner() else { return };
    let Some(partner) = table.get(partner_id) else { return };
    conn.touch();
    partner.touch();
    let _ = partner.send(RelayFrame::new(RELAY_MSG_DATA, payload.to_vec()), cancel);
}

fn notify_partner(table: &ConnectionTable, conn: &Arc<Connection>, reason: u32) {
    if let Some(partner_id) = conn.partner() {
        if let Some(partner) = table.get(partner_id) {
            partner.set_state(ConnState::Disconnected);
            partner.set_partner(None);
            let own_id = conn.registered_id().unwrap_or(0);
            let _ = partner.send(
                RelayFrame::new(RELAY_MSG_PARTNER_DISCONNECTED, message::encode_partner_disconnected(reason, own_id)),
                &CancelToken::new(),
            );
        }
    }
    conn.set_partner(None);
}
