//! gridflip - command-line front end for the FLIP layout animation engine.

use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG wins; stay quiet otherwise so table output is readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = gridflip::cli::run() {
        eprintln!("gridflip: {err}");
        std::process::exit(1);
    }
}
