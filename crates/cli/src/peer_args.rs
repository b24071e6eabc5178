use clap::Parser;

/// Headless peer: hosts a session awaiting a controller, or connects to one
/// already listening. Screen capture and input injection are supplied by
/// platform adapters outside this binary's scope.
#[derive(Debug, Parser)]
#[command(name = "meshdesk", version = branding::build_revision())]
pub struct PeerArgs {
    /// `host:port` or Server-ID to connect to as controller. Omit to host.
    /// Ignored when `--relay` is given.
    #[arg(long)]
    pub connect: Option<String>,

    /// Port to listen on when hosting.
    #[arg(long, default_value_t = branding::DEFAULT_PEER_PORT)]
    pub listen_port: u16,

    /// `host:port` or Server-ID of a relay to pair through instead of
    /// connecting or listening directly. Requires `--peer-id`.
    #[arg(long)]
    pub relay: Option<String>,

    /// This peer's own Peer ID, registered with `--relay`
    /// (`192 168 001 100` form; separators `.`/`-`/space all accepted).
    #[arg(long)]
    pub peer_id: Option<String>,

    /// The partner's Peer ID to request pairing with via `--relay`. Omit to
    /// wait as the host side of the pairing instead.
    #[arg(long)]
    pub partner_id: Option<String>,

    /// Numeric password required of an incoming controller. A random
    /// 5-digit password is generated and printed when omitted.
    #[arg(long)]
    pub password: Option<u32>,

    /// Advertised screen width reported during the handshake.
    #[arg(long, default_value_t = 1920)]
    pub screen_width: u16,

    /// Advertised screen height reported during the handshake.
    #[arg(long, default_value_t = 1080)]
    pub screen_height: u16,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

#[derive(Debug, Parser)]
pub struct VerbosityArgs {
    /// Increases log verbosity; repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
