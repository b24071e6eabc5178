//! Argument parsing and top-level orchestration shared by the peer and
//! relay binaries.

mod endpoint;
mod error;
mod peer_args;
mod relay_args;

pub use error::CliError;
pub use peer_args::PeerArgs;
pub use relay_args::RelayArgs;
pub use relay::RelayHandle;

use std::process::ExitCode;

use config::{RelaySettings, RelayState};
use rand::Rng;

/// Maps a verbosity occurrence count to a `tracing` level and installs the
/// global subscriber, honoring `RUST_LOG` when set.
pub fn init_logging(verbose_occurrences: u8) {
    logging::init(logging::Verbosity::from_occurrences(verbose_occurrences));
}

/// Runs the relay with `args`, blocking until `handle` is asked to shut
/// down or `relay::run` returns an error. Exit codes follow the relay CLI
/// table: 0 normal, 1 initialization failure, 2 invalid argument.
pub fn run_relay(args: RelayArgs, handle: &RelayHandle) -> ExitCode {
    init_logging(args.verbosity.verbose);

    if args.max_connections == 0 {
        tracing::error!("max-connections must be at least 1");
        return ExitCode::from(2);
    }

    let settings = RelaySettings {
        relay_listen_port: args.port,
        bind_address: args.bind_address,
        display_advertised_address: args.display_advertised_address,
        max_connections_per_relay: args.max_connections,
        inactivity_timeout_millis: args.inactivity_timeout_millis,
    };

    let lock_path = relay::default_lock_path();
    let _lock = match relay::InstanceLock::acquire(&lock_path) {
        Ok(lock) => lock,
        Err(err) => {
            tracing::error!(error = %err, "failed to acquire single-instance lock");
            return ExitCode::from(1);
        }
    };

    persist_server_id(&settings);

    match relay::run(&settings, handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "relay terminated with an error");
            ExitCode::from(1)
        }
    }
}

fn persist_server_id(settings: &RelaySettings) {
    let advertised = settings.display_advertised_address.unwrap_or(settings.bind_address);
    let server_id = cipher::encode_server_id(advertised.octets(), settings.relay_listen_port, &cipher::DEFAULT_KEY);
    let state = RelayState {
        bound_ip: settings.bind_address,
        port: settings.relay_listen_port,
        last_generated_server_id: Some(server_id.clone()),
    };
    let path = config::default_relay_config_path();
    if let Err(err) = state.save(&path) {
        tracing::warn!(error = %err, "failed to persist relay state");
    }
    tracing::info!(server_id = %server_id, "relay server id");
}

/// Generates a random 5-digit numeric password, as used when a peer host is
/// started without an explicit `--password`.
#[must_use]
pub fn generate_password() -> u32 {
    rand::rng().random_range(10_000..100_000)
}

/// Resolves the effective numeric password for a hosting peer: the
/// explicit `--password`, or a freshly generated one (printed to the
/// caller via the returned flag so the UI can surface it).
#[must_use]
pub fn resolve_password(explicit: Option<u32>) -> (u32, bool) {
    match explicit {
        Some(p) => (p, false),
        None => (generate_password(), true),
    }
}

pub use endpoint::parse_target;

/// Runs a headless peer: hosts a session awaiting one controller, or
/// connects to one already listening. Screen capture and input injection
/// are left to platform adapters outside this binary's scope; events are
/// simply logged as they arrive.
pub fn run_peer(args: PeerArgs) -> ExitCode {
    init_logging(args.verbosity.verbose);

    let (password, generated) = resolve_password(args.password);
    if generated {
        tracing::info!(password, "generated a password for this session");
    }

    let result = match &args.relay {
        Some(relay_target) => run_via_relay(&args, relay_target, password),
        None => {
            let own_id: u32 = rand::rng().random();
            match &args.connect {
                Some(target) => run_controller(&args, target, own_id, password),
                None => run_host(&args, own_id, password),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "session ended with an error");
            ExitCode::FAILURE
        }
    }
}

fn run_controller(args: &PeerArgs, target: &str, own_id: u32, password: u32) -> Result<(), CliError> {
    let addr = parse_target(target)?;
    let stream = std::net::TcpStream::connect(addr).map_err(|e| CliError::InitFailed(e.to_string()))?;
    let outbound = session::Handshake::new(own_id, password, args.screen_width, args.screen_height, wire::COMPRESSION_RLE);
    let mut peer_session = session::PeerSession::connect(stream, outbound)?;
    tracing::info!(%addr, "connected");
    drain_events(&mut peer_session)
}

fn run_host(args: &PeerArgs, own_id: u32, password: u32) -> Result<(), CliError> {
    let listener = std::net::TcpListener::bind(("0.0.0.0", args.listen_port))
        .map_err(|e| CliError::InitFailed(e.to_string()))?;
    tracing::info!(port = args.listen_port, "listening");
    let (stream, addr) = listener.accept().map_err(|e| CliError::InitFailed(e.to_string()))?;
    tracing::info!(%addr, "controller connected");

    let local = session::Handshake::new(own_id, 0, args.screen_width, args.screen_height, wire::COMPRESSION_RLE);
    let mut peer_session = session::PeerSession::accept(stream, &local, password)?;
    drain_events(&mut peer_session)
}

fn parse_peer_id_arg(text: &str) -> Result<u32, CliError> {
    let ip = cipher::parse_peer_id(text).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    Ok(cipher::encrypt_peer_id(ip, &cipher::DEFAULT_KEY))
}

/// Pairs through a relay instead of connecting or listening directly:
/// registers `--peer-id` with the relay at `relay_target`, then either
/// issues a `CONNECT_REQUEST` for `--partner-id` (controller side) or waits
/// for one to arrive (host side), before running the same tunneled
/// handshake and event loop as the direct path.
fn run_via_relay(args: &PeerArgs, relay_target: &str, password: u32) -> Result<(), CliError> {
    let relay_addr = parse_target(relay_target)?;
    let peer_id_text = args
        .peer_id
        .as_deref()
        .ok_or_else(|| CliError::InvalidArgument("--peer-id is required with --relay".to_owned()))?;
    let own_id = parse_peer_id_arg(peer_id_text)?;

    let stream = std::net::TcpStream::connect(relay_addr).map_err(|e| CliError::InitFailed(e.to_string()))?;
    let cancel = wire::CancelToken::new();
    session::register(&stream, own_id, &cancel)?;
    tracing::info!(%relay_addr, own_id, "registered with relay");

    match &args.partner_id {
        Some(partner_id_text) => {
            let partner_id = parse_peer_id_arg(partner_id_text)?;
            session::request_connect(&stream, partner_id, &[], &cancel)?;
            tracing::info!(partner_id, "paired via relay");
            let outbound =
                session::Handshake::new(own_id, password, args.screen_width, args.screen_height, wire::COMPRESSION_RLE);
            let mut peer_session = session::PeerSession::connect_relayed(stream, outbound)?;
            drain_events(&mut peer_session)
        }
        None => {
            let partner_id = session::await_partner_connected(&stream, &cancel)?;
            tracing::info!(partner_id, "controller paired via relay");
            let local = session::Handshake::new(own_id, 0, args.screen_width, args.screen_height, wire::COMPRESSION_RLE);
            let mut peer_session = session::PeerSession::accept_relayed(stream, &local, password)?;
            drain_events(&mut peer_session)
        }
    }
}

fn drain_events(peer_session: &mut session::PeerSession) -> Result<(), CliError> {
    loop {
        match peer_session.receive_next()? {
            session::SessionEvent::PeerDisconnected => {
                tracing::info!("peer disconnected");
                return Ok(());
            }
            event => tracing::debug!(?event, "session event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_is_always_five_digits() {
        for _ in 0..64 {
            let p = generate_password();
            assert!((10_000..100_000).contains(&p));
        }
    }

    #[test]
    fn explicit_password_is_used_verbatim() {
        assert_eq!(resolve_password(Some(42)), (42, false));
    }
}
