// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::Path;

use clap::Parser;
use debpin::{bootstrap::write_watch_file, logging::configure_tracing, watch::WatchSynthesizer};
use tracing::info;

/// Generate a debian/watch file from a project's hosting URL
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project URL
    url: String,

    /// Debian source package name
    #[arg(long)]
    pkg_name: Option<String>,

    /// Print the detection result instead of writing debian/watch
    #[arg(long)]
    dry_run: bool,

    /// Debug mode
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    configure_tracing(cli.debug)?;

    let synth = WatchSynthesizer::new()?;
    let detection = synth.detect_hosting_service(&cli.url, cli.pkg_name.as_deref())?;

    if cli.dry_run {
        let c = colored_json::to_colored_json_auto(&detection)?;
        println!("{}", c);
        return Ok(());
    }

    let path = write_watch_file(Path::new("."), &detection.watch).await?;
    info!("Wrote {}", path.display());
    Ok(())
}
