use clap::Parser;
use std::process::ExitCode;

use moodtrack_lib::presentation::{self, cli::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    presentation::run(Cli::parse()).await
}
