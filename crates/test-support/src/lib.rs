//! Shared test scaffolding: loopback TCP pairs and scratch directories.

use std::net::{TcpListener, TcpStream};

/// Opens a loopback `TcpListener` on an OS-assigned port and connects a
/// second socket to it, returning `(server, client)`.
pub fn loopback_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("local addr");
    let client = TcpStream::connect(addr).expect("connect loopback client");
    let (server, _) = listener.accept().expect("accept loopback connection");
    (server, client)
}

/// Creates a fresh temporary directory that is removed when the returned
/// guard drops.
#[must_use]
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create scratch directory")
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn loopback_pair_exchanges_bytes() {
        let (mut server, mut client) = loopback_pair();
        client.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
    }
}
