//! retos · terminal client for the challenges tracking API
//!
//! - One-shot subcommands (list/create/set-state/delete/refs/ping)
//! - Interactive `shell` keeping the local cache across actions
//!
//! Important env variables:
//!   RETOS_API_URL      : backend base URL (default "http://localhost:5000")
//!   RETOS_CONFIG_PATH  : path to TOML config (api_url, timeout_secs, notification_ttl_ms)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use clap::Parser;
use tracing::info;

use retos_client::app::App;
use retos_client::cli::{run_once, run_shell, Cli, Commands};
use retos_client::config::load_config_from_env;
use retos_client::telemetry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cli = Cli::parse();
  let mut cfg = load_config_from_env();
  if let Some(url) = &cli.api_url {
    cfg = cfg.with_api_url(url);
  }
  info!(target: "retos_client", api_url = %cfg.api_url, "Client configured");

  // The client is single-threaded: actions run one after another.
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()?;

  runtime.block_on(async {
    let mut app = App::new(&cfg)?;
    match cli.command {
      Commands::Shell => run_shell(&mut app).await?,
      Commands::Action(action) => {
        let view = run_once(&mut app, action).await;
        println!("{}", view.trim_end());
      }
    }
    Ok::<(), Box<dyn std::error::Error>>(())
  })
}
