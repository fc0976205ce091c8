use clap::Parser;
use holdfast::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
