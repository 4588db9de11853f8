use clap::Parser;
use term_profiles::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    // Routes all log::info!() etc. to <temp>/term_profiles_debug.log.
    // --log-level takes precedence over RUST_LOG.
    term_profiles::debug::init_log_bridge(cli.log_level);

    log::info!("term-profiles {}", term_profiles::VERSION);

    if let Err(e) = cli::run(cli) {
        log::error!("{e:#}");
        eprintln!("term-profiles: error: {e:#}");
        std::process::exit(1);
    }
}
