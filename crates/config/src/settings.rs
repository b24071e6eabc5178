use std::net::Ipv4Addr;

/// Core configuration options recognized by the peer session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSettings {
    pub listen_port: u16,
    pub password: Option<String>,
    pub max_file_size: u64,
    pub chunk_size: u32,
    pub reconnect_attempts: u32,
    pub reconnect_delay_millis: u32,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            listen_port: 5901,
            password: None,
            max_file_size: 100 * 1024 * 1024 * 1024,
            chunk_size: 32768,
            reconnect_attempts: 5,
            reconnect_delay_millis: 2000,
        }
    }
}

/// Core configuration options recognized by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub relay_listen_port: u16,
    pub bind_address: Ipv4Addr,
    pub display_advertised_address: Option<Ipv4Addr>,
    pub max_connections_per_relay: u32,
    pub inactivity_timeout_millis: u32,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            relay_listen_port: 5000,
            bind_address: Ipv4Addr::UNSPECIFIED,
            display_advertised_address: None,
            max_connections_per_relay: 1024,
            inactivity_timeout_millis: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_defaults_match_documented_values() {
        let defaults = PeerSettings::default();
        assert_eq!(defaults.listen_port, 5901);
        assert_eq!(defaults.chunk_size, 32768);
        assert_eq!(defaults.max_file_size, 100 * 1024 * 1024 * 1024);
    }

    #[test]
    fn relay_defaults_match_documented_values() {
        let defaults = RelaySettings::default();
        assert_eq!(defaults.relay_listen_port, 5000);
        assert_eq!(defaults.inactivity_timeout_millis, 5000);
        assert_eq!(defaults.max_connections_per_relay, 1024);
    }
}
