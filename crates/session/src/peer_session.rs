//! Top-level peer session: owns the socket, drives the handshake, and
//! exposes send helpers plus a `receive_next` step that decodes and
//! classifies one inbound frame. The caller supplies the loop (thread,
//! event loop, whatever fits its runtime) and acts on each `SessionEvent`.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use platform::FrameBuffer;
use wire::{
    read_peer_frame, write_peer_frame, CancelToken, PeerFrame, BULK_IDLE_DEADLINE, CONTROL_IDLE_DEADLINE,
    MSG_CLIPBOARD_REQ, MSG_DISCONNECT, MSG_FILE_REQ, MSG_FULL_SCREEN_REQ, MSG_KEYBOARD_EVENT, MSG_MOUSE_EVENT,
    MSG_PING, MSG_PONG, MSG_SCREEN_UPDATE, PEER_DEFAULT_MAX_PAYLOAD,
};

use crate::clipboard_message::{self, ClipboardPayload};
use crate::dispatch::dispatch_incoming;
use crate::error::Result;
use crate::event::SessionEvent;
use crate::handshake::{self, Handshake};
use crate::input_message;
use crate::input_queue::InputQueue;
use crate::relay_client;
use crate::screen_message;
use crate::state::{Role, SessionPhase, SessionState};

/// Where a session's peer frames actually travel: a bare socket, or tunneled
/// one-for-one inside relay `MSG_DATA` frames over the same socket (the
/// relay is the peer's only reachable endpoint in that case).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Direct,
    Relayed,
}

pub struct PeerSession {
    stream: TcpStream,
    transport: Transport,
    state: SessionState,
    cancel: CancelToken,
    remote_width: u16,
    remote_height: u16,
    previous_frame: Option<FrameBuffer>,
    pub input_queue: Arc<InputQueue>,
}

impl PeerSession {
    /// Controller path: connect has already produced `stream`; perform the
    /// handshake and, on success, land in `Connected`.
    pub fn connect(stream: TcpStream, outbound: Handshake) -> Result<Self> {
        Self::connect_with_transport(stream, outbound, Transport::Direct)
    }

    /// Controller path over a relay: `stream` is already registered and
    /// paired (see `session::register`/`session::request_connect`); the
    /// handshake itself travels tunneled inside `MSG_DATA` frames.
    pub fn connect_relayed(stream: TcpStream, outbound: Handshake) -> Result<Self> {
        Self::connect_with_transport(stream, outbound, Transport::Relayed)
    }

    fn connect_with_transport(stream: TcpStream, outbound: Handshake, transport: Transport) -> Result<Self> {
        let cancel = CancelToken::new();
        let mut state = SessionState::new();
        state.transition(SessionPhase::Connecting, Some(Role::Controller));
        state.transition(SessionPhase::Handshaking, None);

        let ack = handshake::controller_perform(&stream, &outbound, transport == Transport::Relayed, &cancel)?;
        state.transition(SessionPhase::Connected, None);

        Ok(Self {
            stream,
            transport,
            state,
            cancel,
            remote_width: ack.screen_width,
            remote_height: ack.screen_height,
            previous_frame: None,
            input_queue: Arc::new(InputQueue::new()),
        })
    }

    /// Host path: `stream` was just accepted; perform the handshake with
    /// `active_password` and, on success, land in `Connected`.
    pub fn accept(stream: TcpStream, local: &Handshake, active_password: u32) -> Result<Self> {
        Self::accept_with_transport(stream, local, active_password, Transport::Direct)
    }

    /// Host path over a relay: `stream` is already registered and has just
    /// received `MSG_PARTNER_CONNECTED` (see `session::await_partner_connected`);
    /// the handshake itself travels tunneled inside `MSG_DATA` frames.
    pub fn accept_relayed(stream: TcpStream, local: &Handshake, active_password: u32) -> Result<Self> {
        Self::accept_with_transport(stream, local, active_password, Transport::Relayed)
    }

    fn accept_with_transport(stream: TcpStream, local: &Handshake, active_password: u32, transport: Transport) -> Result<Self> {
        let cancel = CancelToken::new();
        let mut state = SessionState::new();
        state.transition(SessionPhase::Listening, Some(Role::Host));
        state.transition(SessionPhase::Handshaking, None);

        let incoming =
            handshake::host_accept(&stream, local, active_password, transport == Transport::Relayed, &cancel)?;
        state.transition(SessionPhase::Connected, None);

        Ok(Self {
            stream,
            transport,
            state,
            cancel,
            remote_width: incoming.screen_width,
            remote_height: incoming.screen_height,
            previous_frame: Some(FrameBuffer::blank(u32::from(local.screen_width), u32::from(local.screen_height))),
            input_queue: Arc::new(InputQueue::new()),
        })
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Sends one already-built frame, respecting the session's transport.
    /// The chokepoint every higher-level send helper (and the transfer
    /// driver) ultimately goes through.
    pub fn send_raw_frame(&self, frame: PeerFrame) -> Result<()> {
        self.write_frame(frame)
    }

    fn write_frame(&self, frame: PeerFrame) -> Result<()> {
        match self.transport {
            Transport::Direct => Ok(write_peer_frame(&self.stream, &frame, &self.cancel)?),
            Transport::Relayed => relay_client::send_tunneled(&self.stream, &frame, &self.cancel),
        }
    }

    fn read_frame(&self, idle_deadline: Duration) -> Result<PeerFrame> {
        match self.transport {
            Transport::Direct => Ok(read_peer_frame(&self.stream, PEER_DEFAULT_MAX_PAYLOAD, idle_deadline, &self.cancel)?),
            Transport::Relayed => relay_client::recv_tunneled(&self.stream, PEER_DEFAULT_MAX_PAYLOAD, idle_deadline, &self.cancel),
        }
    }

    /// Blocks for the next frame, decodes and classifies it. `MSG_PING` and
    /// `MSG_DISCONNECT` are partially handled here (reply with pong;
    /// transition to `Closing`) since every caller needs that regardless of
    /// how it otherwise reacts to events.
    pub fn receive_next(&mut self) -> Result<SessionEvent> {
        let frame = self.read_frame(BULK_IDLE_DEADLINE)?;

        let event = dispatch_incoming(&frame, self.previous_frame.as_mut(), self.remote_width, self.remote_height)?;

        match &event {
            SessionEvent::Ping => self.send_pong()?,
            SessionEvent::Input(input) => self.input_queue.push(*input),
            SessionEvent::PeerDisconnected => {
                self.state.transition(SessionPhase::Closing, None);
            }
            _ => {}
        }
        Ok(event)
    }

    pub fn send_screen_updates(&self, previous: &FrameBuffer, current: &FrameBuffer, rect_cap: usize) -> Result<()> {
        for payload in screen_message::build_update_payloads(previous, current, rect_cap) {
            self.write_frame(PeerFrame::new(MSG_SCREEN_UPDATE, 0, payload))?;
        }
        Ok(())
    }

    pub fn send_full_screen_request(&self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_FULL_SCREEN_REQ, 0, Vec::new()))
    }

    pub fn send_mouse_move(&self, x: i32, y: i32) -> Result<()> {
        let payload = input_message::encode_mouse(platform::InputEvent::MouseMove { x, y }).to_vec();
        self.write_frame(PeerFrame::new(MSG_MOUSE_EVENT, 0, payload))
    }

    pub fn send_mouse_button(&self, button: platform::MouseButton, down: bool) -> Result<()> {
        let payload = input_message::encode_mouse(platform::InputEvent::MouseButton { button, down }).to_vec();
        self.write_frame(PeerFrame::new(MSG_MOUSE_EVENT, 0, payload))
    }

    pub fn send_key(&self, virtual_key: u16, scan_code: u16, down: bool, extended: bool) -> Result<()> {
        let payload = input_message::encode_key(virtual_key, scan_code, down, extended).to_vec();
        self.write_frame(PeerFrame::new(MSG_KEYBOARD_EVENT, 0, payload))
    }

    pub fn send_clipboard(&self, payload: &ClipboardPayload) -> Result<()> {
        let message_kind = match payload {
            ClipboardPayload::Text(_) => wire::MSG_CLIPBOARD_TEXT,
            ClipboardPayload::FilePaths(_) => wire::MSG_CLIPBOARD_FILES,
        };
        self.write_frame(PeerFrame::new(message_kind, 0, clipboard_message::encode(payload)))
    }

    pub fn send_clipboard_request(&self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_CLIPBOARD_REQ, 0, Vec::new()))
    }

    pub fn send_file_request(&self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_FILE_REQ, 0, Vec::new()))
    }

    fn send_pong(&self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_PONG, 0, Vec::new()))
    }

    pub fn send_ping(&self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_PING, 0, Vec::new()))
    }

    /// Graceful local-initiated close: send `MSG_DISCONNECT` and transition
    /// to `Closing`. The socket itself is closed by `Drop`.
    pub fn disconnect(&mut self) -> Result<()> {
        self.write_frame(PeerFrame::new(MSG_DISCONNECT, 0, Vec::new()))?;
        self.state.transition(SessionPhase::Closing, None);
        Ok(())
    }

    #[must_use]
    pub fn try_clone_stream(&self) -> std::io::Result<TcpStream> {
        self.stream.try_clone()
    }
}
