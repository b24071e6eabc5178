//! Runtime settings and persisted, non-secret state for the peer and relay.

mod error;
mod ini;
mod peer;
mod relay;
mod settings;

pub use error::{ConfigError, Result};
pub use ini::Document;
pub use peer::{default_peer_config_path, PeerState};
pub use relay::{default_relay_config_path, RelayState};
pub use settings::{PeerSettings, RelaySettings};
