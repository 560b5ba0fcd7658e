// Entrypoint for the CLI application.
// - Keeps `main` small: resolve config, create the two clients and hand
//   them to the UI loop.
// - The realtime handle is owned here so the best-effort disconnect runs
//   on every exit path, interrupt included, with exit code 0.

use notifdiag_cli::{api::ApiClient, config::Config, realtime::RealtimeClient, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Transport-level logging goes to stderr and stays quiet unless
    // RUST_LOG is set; user-facing output is plain stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let api = ApiClient::new(&config)?;
    let mut realtime = RealtimeClient::new();

    let outcome = main_menu(&config, &api, &mut realtime);
    realtime.disconnect();

    if let Err(e) = outcome {
        // Ctrl-C during a prompt surfaces as an input error; either way
        // the disconnect already ran and we exit cleanly.
        eprintln!("Interrupted: {}", e);
    }
    Ok(())
}
