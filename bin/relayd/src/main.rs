#![deny(unsafe_code)]

use std::{env, process::ExitCode};

use clap::Parser;
use cli::{RelayArgs, RelayHandle};

fn main() -> ExitCode {
    let args = RelayArgs::parse_from(env::args_os());
    let handle = RelayHandle::new();

    let flag = handle.shutdown_flag();
    for sig in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        if let Err(err) = signal_hook::flag::register(sig, flag.clone()) {
            tracing::warn!(error = %err, signal = sig, "failed to register signal handler");
        }
    }

    cli::run_relay(args, &handle)
}
