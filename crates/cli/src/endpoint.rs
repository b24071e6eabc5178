//! Parses the textual forms a user may type for a direct-connect target:
//! `host:port`, or a Server-ID as defined by the cipher crate.

use std::net::{SocketAddr, ToSocketAddrs};

use cipher::{decode_server_id, validate_server_id_format, DEFAULT_KEY};

use crate::error::CliError;

pub fn parse_target(input: &str) -> Result<SocketAddr, CliError> {
    if validate_server_id_format(input) {
        let (ip, port) = decode_server_id(input, &DEFAULT_KEY)
            .map_err(|_| CliError::InvalidArgument(format!("invalid server id: {input}")))?;
        return Ok(SocketAddr::from((ip, port)));
    }
    input
        .to_socket_addrs()
        .map_err(|_| CliError::InvalidArgument(format!("unreachable host:port: {input}")))?
        .next()
        .ok_or_else(|| CliError::InvalidArgument(format!("no address resolved for: {input}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_server_id() {
        let id = cipher::encode_server_id([127, 0, 0, 1], 5901, &DEFAULT_KEY);
        let addr = parse_target(&id).unwrap();
        assert_eq!(addr.port(), 5901);
    }

    #[test]
    fn parses_a_loopback_host_port() {
        let addr = parse_target("127.0.0.1:5901").unwrap();
        assert_eq!(addr.port(), 5901);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_target("not-an-address").is_err());
    }
}
