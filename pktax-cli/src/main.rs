use std::io;

use clap::Parser;
use tracing::debug;

use pktax_cli::cmd::{Cli, Session};
use pktax_cli::config::AppConfig;
use pktax_cli::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "starting");

    let session = Session::new(config)?;
    let stdout = io::stdout();
    cli.command.exec(&session, &mut stdout.lock())
}
