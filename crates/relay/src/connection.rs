//! A single accepted relay connection: its write-half socket handle and the
//! mutable registration/pairing state the connection table and workers
//! share.

use std::net::TcpStream;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use wire::{CancelToken, RelayFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connected,
    Registered,
    Paired,
    Disconnected,
}

pub struct Connection {
    pub id: u64,
    write_half: Mutex<TcpStream>,
    registered_id: Mutex<Option<u32>>,
    state: Mutex<ConnState>,
    partner: Mutex<Option<u64>>,
    last_activity: Mutex<Instant>,
}

impl Connection {
    pub fn new(id: u64, write_half: TcpStream) -> Self {
        Self {
            id,
            write_half: Mutex::new(write_half),
            registered_id: Mutex::new(None),
            state: Mutex::new(ConnState::Connected),
            partner: Mutex::new(None),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    pub fn touch(&self) {
        *lock(&self.last_activity) = Instant::now();
    }

    #[must_use]
    pub fn idle_for(&self) -> Duration {
        lock(&self.last_activity).elapsed()
    }

    #[must_use]
    pub fn state(&self) -> ConnState {
        *lock(&self.state)
    }

    pub fn set_state(&self, state: ConnState) {
        *lock(&self.state) = state;
    }

    #[must_use]
    pub fn registered_id(&self) -> Option<u32> {
        *lock(&self.registered_id)
    }

    pub fn set_registered_id(&self, id: Option<u32>) {
        *lock(&self.registered_id) = id;
    }

    #[must_use]
    pub fn partner(&self) -> Option<u64> {
        *lock(&self.partner)
    }

    pub fn set_partner(&self, partner: Option<u64>) {
        *lock(&self.partner) = partner;
    }

    /// Writes a frame to this connection's socket. Shared between the
    /// connection's own worker (replies) and any other worker forwarding a
    /// partner's frame, so the write half is behind its own mutex.
    pub fn send(&self, frame: RelayFrame, cancel: &CancelToken) -> wire::Result<()> {
        let stream = lock(&self.write_half);
        wire::write_relay_frame(&stream, frame, None, cancel)
    }

    pub fn shutdown(&self) {
        let stream = lock(&self.write_half);
        let _ = stream.shutdown(std::net::Shutdown::Both);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
