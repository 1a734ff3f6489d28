//! `carbon` entry-point: loads settings, wires adapters and runs one command.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use carbon_client::config::ClientSettings;
use carbon_client::domain::ports::{InMemoryLocalStorage, LocalStorage};
use carbon_client::inbound::cli::{Cli, HttpApp};
use carbon_client::outbound::storage::FileLocalStorage;
use carbon_client::telemetry;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    telemetry::init();

    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("carbon")])
        .wrap_err("loading CARBON_* settings")?
        .resolve()
        .wrap_err("invalid configuration")?;

    let storage: Arc<dyn LocalStorage> = if cli.ephemeral {
        Arc::new(InMemoryLocalStorage::new())
    } else {
        Arc::new(
            FileLocalStorage::open(&settings.state_dir)
                .wrap_err_with(|| format!("opening state directory {}", settings.state_dir))?,
        )
    };

    let mut app = HttpApp::connect(&settings, storage).wrap_err("building HTTP client")?;
    let output = app.run(cli.command).await?;

    writeln!(io::stdout().lock(), "{output}")?;
    Ok(())
}
