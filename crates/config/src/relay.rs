use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ini::Document;

const SECTION: &str = "relay";

/// Persisted relay state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayState {
    pub bound_ip: Ipv4Addr,
    pub port: u16,
    pub last_generated_server_id: Option<String>,
}

impl Default for RelayState {
    fn default() -> Self {
        Self { bound_ip: Ipv4Addr::UNSPECIFIED, port: 5000, last_generated_server_id: None }
    }
}

impl RelayState {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        let default = Self::default();
        let bound_ip = doc
            .get(SECTION, "boundIp")
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.bound_ip);
        let port = doc.get(SECTION, "port").and_then(|s| s.parse().ok()).unwrap_or(default.port);
        Ok(Self {
            bound_ip,
            port,
            last_generated_server_id: doc.get(SECTION, "lastGeneratedServerId").map(str::to_owned),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut doc = Document::new();
        doc.set(SECTION, "boundIp", self.bound_ip.to_string());
        doc.set(SECTION, "port", self.port.to_string());
        if let Some(v) = &self.last_generated_server_id {
            doc.set(SECTION, "lastGeneratedServerId", v.clone());
        }
        doc.save(path)
    }
}

#[must_use]
pub fn default_relay_config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("meshdesk").join("relay.ini")
}
