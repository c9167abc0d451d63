// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Tracing setup shared by the binaries.

use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Configures the tracing infrastructure with appropriate formatting and filtering
///
/// Sets up tracing with ANSI colors, uptime timer, and target information.
/// `RUST_LOG` takes precedence; otherwise logs at `info`, or `debug` when
/// `debug` is set.
pub fn configure_tracing(debug: bool) -> color_eyre::Result<()> {
    let f = Format::default()
        .with_ansi(true)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_file(false)
        .with_line_number(false)
        .with_target(debug)
        .with_thread_ids(false);

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().event_format(f).with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
