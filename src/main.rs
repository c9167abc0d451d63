// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

use clap::Parser;
use debpin::{
    bootstrap::{Bootstrap, BootstrapConfig},
    command::SystemRunner,
    logging::configure_tracing,
};
use tracing::info;

/// Create an initial Debian packaging repository for an upstream project
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository URL
    url: String,

    /// Debian source package name
    #[arg(long)]
    pkg_name: Option<String>,

    /// Debug mode
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    configure_tracing(cli.debug)?;

    let config = BootstrapConfig {
        debug: cli.debug,
        ..Default::default()
    };
    let bootstrap = Bootstrap::new(config, SystemRunner)?;
    let pkg_dir = bootstrap.run(&cli.url, cli.pkg_name.as_deref()).await?;

    info!("Package skeleton ready in {}", pkg_dir.display());
    Ok(())
}
