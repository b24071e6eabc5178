use std::net::Ipv4Addr;

use clap::Parser;

/// Registration and pairing relay: accepts peer connections, pairs them by
/// numeric id, and forwards opaque `MSG_DATA` between a paired pair.
#[derive(Debug, Parser)]
#[command(name = "meshdesk-relayd", version = branding::build_revision())]
pub struct RelayArgs {
    /// Port to listen on.
    #[arg(long, default_value_t = branding::DEFAULT_RELAY_PORT)]
    pub port: u16,

    /// Address to bind the listener to.
    #[arg(long, default_value_t = Ipv4Addr::UNSPECIFIED)]
    pub bind_address: Ipv4Addr,

    /// Overrides the address advertised in a generated Server-ID when bound
    /// to `0.0.0.0`. Probed via OpenDNS when omitted.
    #[arg(long)]
    pub display_advertised_address: Option<Ipv4Addr>,

    /// Maximum number of simultaneously tracked connections.
    #[arg(long, default_value_t = 1024)]
    pub max_connections: u32,

    /// Inactivity timeout, in milliseconds, before an idle connection is
    /// reaped.
    #[arg(long, default_value_t = 5000)]
    pub inactivity_timeout_millis: u32,

    #[command(flatten)]
    pub verbosity: crate::peer_args::VerbosityArgs,
}
