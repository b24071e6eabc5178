use std::net::{Ipv4Addr, UdpSocket};
use std::time::Duration;

use crate::error::{PlatformError, Result};

const OPENDNS_RESOLVER: &str = "208.67.222.222:53";
const QUERY_NAME: &str = "myip.opendns.com";
const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Determines the caller's public IPv4 address by asking OpenDNS to resolve
/// `myip.opendns.com`, a name OpenDNS's resolver answers with the querying
/// client's own address. Used only to populate a Server-ID when the relay
/// is bound to `0.0.0.0`.
pub trait PublicAddressProbe: Send {
    fn probe(&self) -> Result<Ipv4Addr>;
}

pub struct OpenDnsProbe;

impl PublicAddressProbe for OpenDnsProbe {
    fn probe(&self) -> Result<Ipv4Addr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(Some(QUERY_TIMEOUT))?;
        socket.connect(OPENDNS_RESOLVER)?;

        let query = build_query(QUERY_NAME);
        socket.send(&query)?;

        let mut buf = [0u8; 512];
        let len = socket.recv(&mut buf)?;
        parse_a_record(&buf[..len]).ok_or(PlatformError::NotAvailable)
    }
}

fn build_query(name: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(32);
    packet.extend_from_slice(&[0x12, 0x34]); // transaction id
    packet.extend_from_slice(&[0x01, 0x00]); // flags: standard query, recursion desired
    packet.extend_from_slice(&[0x00, 0x01]); // qdcount
    packet.extend_from_slice(&[0x00, 0x00]); // ancount
    packet.extend_from_slice(&[0x00, 0x00]); // nscount
    packet.extend_from_slice(&[0x00, 0x00]); // arcount

    for label in name.split('.') {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0); // root label
    packet.extend_from_slice(&[0x00, 0x01]); // qtype A
    packet.extend_from_slice(&[0x00, 0x01]); // qclass IN
    packet
}

fn parse_a_record(response: &[u8]) -> Option<Ipv4Addr> {
    if response.len() < 12 {
        return None;
    }
    let ancount = u16::from_be_bytes([response[6], response[7]]);
    let mut offset = 12;

    offset = skip_name(response, offset)?;
    offset += 4; // qtype + qclass

    for _ in 0..ancount {
        offset = skip_name(response, offset)?;
        if offset + 10 > response.len() {
            return None;
        }
        let rtype = u16::from_be_bytes([response[offset], response[offset + 1]]);
        let rdlength = u16::from_be_bytes([response[offset + 8], response[offset + 9]]) as usize;
        offset += 10;
        if rtype == 1 && rdlength == 4 && offset + 4 <= response.len() {
            return Some(Ipv4Addr::new(response[offset], response[offset + 1], response[offset + 2], response[offset + 3]));
        }
        offset += rdlength;
    }
    None
}

fn skip_name(data: &[u8], mut offset: usize) -> Option<usize> {
    loop {
        let len = *data.get(offset)?;
        if len == 0 {
            return Some(offset + 1);
        }
        if len & 0xC0 == 0xC0 {
            return Some(offset + 2);
        }
        offset += 1 + len as usize;
        if offset > data.len() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_well_formed_query() {
        let query = build_query(QUERY_NAME);
        assert_eq!(&query[0..2], &[0x12, 0x34]);
        assert_eq!(query.last(), Some(&0x01));
    }

    #[test]
    fn parses_a_minimal_a_record_response() {
        let mut response = Vec::new();
        response.extend_from_slice(&[0x12, 0x34, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        response.push(3);
        response.extend_from_slice(b"foo");
        response.push(0);
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        response.extend_from_slice(&[0xC0, 0x0C]);
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x3C]);
        response.extend_from_slice(&[0x00, 0x04]);
        response.extend_from_slice(&[203, 0, 113, 9]);

        assert_eq!(parse_a_record(&response), Some(Ipv4Addr::new(203, 0, 113, 9)));
    }
}
