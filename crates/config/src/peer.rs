use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ini::Document;

const SECTION: &str = "peer";

/// Persisted, non-secret peer-side state: the client never writes a
/// password or session key to disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PeerState {
    pub last_server_id: Option<String>,
    pub last_relay_partner_id: Option<String>,
    pub last_direct_partner_id: Option<String>,
}

impl PeerState {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self {
            last_server_id: doc.get(SECTION, "lastServerId").map(str::to_owned),
            last_relay_partner_id: doc.get(SECTION, "lastRelayPartnerId").map(str::to_owned),
            last_direct_partner_id: doc.get(SECTION, "lastDirectPartnerId").map(str::to_owned),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut doc = Document::new();
        if let Some(v) = &self.last_server_id {
            doc.set(SECTION, "lastServerId", v.clone());
        }
        if let Some(v) = &self.last_relay_partner_id {
            doc.set(SECTION, "lastRelayPartnerId", v.clone());
        }
        if let Some(v) = &self.last_direct_partner_id {
            doc.set(SECTION, "lastDirectPartnerId", v.clone());
        }
        doc.save(path)
    }
}

/// Default per-user config path: `$XDG_CONFIG_HOME/meshdesk/peer.ini`,
/// falling back to `$HOME/.config/meshdesk/peer.ini`.
#[must_use]
pub fn default_peer_config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("meshdesk").join("peer.ini")
}
