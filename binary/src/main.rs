//! Command line tool for drawing quantity net snapshots with Graphviz

mod cli;
mod logging;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();

    if let Err(e) = logging::init_logging(args.log_level.as_deref()) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    let stdout = std::io::stdout();
    if let Err(e) = cli::run(args, &mut stdout.lock()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
