#![deny(unsafe_code)]

use std::{env, process::ExitCode};

use clap::Parser;
use cli::PeerArgs;

fn main() -> ExitCode {
    let args = PeerArgs::parse_from(env::args_os());
    cli::run_peer(args)
}
