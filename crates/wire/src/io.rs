//! Exact-length read/write over a [`TcpStream`] with idle-deadline timeouts
//! and cooperative cancellation, tolerant of TCP fragmentation and spurious
//! wake-ups.

use crate::cancel::CancelToken;
use crate::error::{Result, WireError};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

/// Each read/write attempt is bounded by this poll timeout so the loop can
/// re-check the cancel flag and the overall idle deadline regularly instead
/// of blocking indefinitely inside a single syscall.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Reads exactly `buf.len()` bytes, looping across short reads. Progress
/// (any bytes received) resets the idle clock; `idle_deadline` bounds how
/// long the call may go *without* progress, not the call's total duration.
pub fn exact_read(
    stream: &TcpStream,
    buf: &mut [u8],
    idle_deadline: Duration,
    cancel: &CancelToken,
) -> Result<()> {
    let mut filled = 0;
    let mut idle_since = Instant::now();
    let mut source = stream;

    while filled < buf.len() {
        if cancel.is_cancelled() {
            return Err(WireError::Cancelled);
        }
        stream
            .set_read_timeout(Some(POLL_INTERVAL.min(idle_deadline)))
            .map_err(WireError::ConnectionLost)?;

        match source.read(&mut buf[filled..]) {
            Ok(0) => return Err(WireError::ConnectionClosed),
            Ok(n) => {
                filled += n;
                idle_since = Instant::now();
            }
            Err(e) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {
                if idle_since.elapsed() >= idle_deadline {
                    return Err(WireError::Timeout);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(WireError::ConnectionLost(e)),
        }
    }
    Ok(())
}

/// Writes exactly `buf` to `stream`, looping across short/partial writes and
/// checking `cancel` between chunks.
pub fn exact_write(stream: &TcpStream, buf: &[u8], cancel: &CancelToken) -> Result<()> {
    let mut written = 0;
    let mut source = stream;
    while written < buf.len() {
        if cancel.is_cancelled() {
            return Err(WireError::Cancelled);
        }
        match source.write(&buf[written..]) {
            Ok(0) => return Err(WireError::ConnectionClosed),
            Ok(n) => written += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(WireError::ConnectionLost(e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn exact_read_reassembles_fragmented_segments() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let writer = thread::spawn(move || {
            let mut client = TcpStream::connect(addr).unwrap();
            for chunk in [b"ab".as_slice(), b"cd", b"ef"] {
                client.write_all(chunk).unwrap();
                thread::sleep(Duration::from_millis(20));
            }
        });
        let (server, _) = listener.accept().unwrap();
        let mut buf = [0u8; 6];
        exact_read(&server, &mut buf, Duration::from_secs(5), &CancelToken::new()).unwrap();
        assert_eq!(&buf, b"abcdef");
        writer.join().unwrap();
    }

    #[test]
    fn exact_read_reports_connection_closed_on_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let writer = thread::spawn(move || {
            let _client = TcpStream::connect(addr).unwrap();
        });
        let (server, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4];
        let err = exact_read(&server, &mut buf, Duration::from_secs(5), &CancelToken::new());
        assert!(matches!(err, Err(WireError::ConnectionClosed)));
        writer.join().unwrap();
    }

    #[test]
    fn exact_read_honors_cancel_token() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let _writer = thread::spawn(move || {
            let client = TcpStream::connect(addr).unwrap();
            thread::sleep(Duration::from_secs(5));
            drop(client);
        });
        let (server, _) = listener.accept().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut buf = [0u8; 4];
        let err = exact_read(&server, &mut buf, Duration::from_secs(5), &cancel);
        assert!(matches!(err, Err(WireError::Cancelled)));
    }
}
