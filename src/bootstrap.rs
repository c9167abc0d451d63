// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Packaging skeleton bootstrap.
//!
//! Creates a package repository, writes its `debian/watch` and drives the
//! Debian tooling that imports the upstream tarball and generates the rest
//! of the packaging.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::command::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use crate::watch::{WatchError, WatchSynthesizer};

/// Location of the watch file relative to the package directory
pub const WATCH_FILE: &str = "debian/watch";

/// Placeholder version for the temporary changelog
const DUMMY_VERSION: &str = "0.0.0-1";

/// Errors that abort a bootstrap run
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// An external tool could not be started or exited unsuccessfully
    #[error("`{command}` failed with {}: {}", exit_status(.code), .stderr.trim())]
    ExternalCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The package name cannot be used as a directory name
    #[error("`{0}` is not a usable package directory name")]
    InvalidPackageName(String),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

/// Paths of the external tools
#[derive(Debug, Clone)]
pub struct Tools {
    /// Used for `git init`, resolved through `PATH`
    pub git_init: String,
    pub git: String,
    pub dch: String,
    pub uscan: String,
    pub debdry: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            git_init: "git".to_string(),
            git: "/usr/bin/git".to_string(),
            dch: "/usr/bin/dch".to_string(),
            uscan: "/usr/bin/uscan".to_string(),
            debdry: "/usr/bin/debdry".to_string(),
        }
    }
}

/// Bootstrap settings
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory the package directory is created in
    pub base_dir: PathBuf,
    /// Dump the watch file and run `uscan --report`
    pub debug: bool,
    pub tools: Tools,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            debug: false,
            tools: Tools::default(),
        }
    }
}

/// Writes `contents` to `debian/watch` below `pkg_dir`
pub async fn write_watch_file(pkg_dir: &Path, contents: &str) -> Result<PathBuf, BootstrapError> {
    let path = pkg_dir.join(WATCH_FILE);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| BootstrapError::Io {
            context: format!("failed to write {}", path.display()),
            source,
        })?;
    Ok(path)
}

/// Drives the bootstrap sequence with an injected command runner
pub struct Bootstrap<R> {
    config: BootstrapConfig,
    runner: R,
    synth: WatchSynthesizer,
}

impl<R: CommandRunner> Bootstrap<R> {
    pub fn new(config: BootstrapConfig, runner: R) -> Result<Self, BootstrapError> {
        Ok(Self {
            config,
            runner,
            synth: WatchSynthesizer::new()?,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Bootstraps the package for `url`, returning the package directory
    ///
    /// The package directory is named after `pkg_name`, or the project name
    /// proposed by the URL when no name is given. Any failing step aborts
    /// the run, nothing is rolled back.
    pub async fn run(&self, url: &str, pkg_name: Option<&str>) -> Result<PathBuf, BootstrapError> {
        let detection = self.synth.detect_hosting_service(url, pkg_name)?;
        let pkgname = pkg_name
            .filter(|name| !name.is_empty())
            .unwrap_or(&detection.proposed_name)
            .to_string();
        if matches!(pkgname.as_str(), "." | "..") || pkgname.contains(['/', '\0']) {
            return Err(BootstrapError::InvalidPackageName(pkgname));
        }
        let tools = &self.config.tools;

        info!("Creating Git repository");
        let pkg_dir = self.config.base_dir.join(&pkgname);
        create_dir(&pkg_dir).await?;
        self.run_cmd(CommandSpec::new(&tools.git_init, ["init", "."]), &pkg_dir)
            .await?;

        debug!("Creating debian directory");
        create_dir(&pkg_dir.join("debian")).await?;

        info!("Generating watch file");
        write_watch_file(&pkg_dir, &detection.watch).await?;
        if self.config.debug {
            debug!("{}", "-".repeat(10));
            for line in detection.watch.lines() {
                debug!("{}", line.trim_end());
            }
            debug!("{}", "-".repeat(10));
        }

        debug!("Generating temporary changelog file");
        self.run_cmd(
            CommandSpec::new(
                &tools.dch,
                ["--create", "--package", pkgname.as_str(), "--empty", "-v", DUMMY_VERSION],
            ),
            &pkg_dir,
        )
        .await?;

        if self.config.debug {
            debug!("Running uscan test");
            self.run_cmd(CommandSpec::new(&tools.uscan, ["--report"]), &pkg_dir)
                .await?;
        }

        info!("Importing tarball using uscan");
        self.run_cmd(
            CommandSpec::new(&tools.git, ["import-orig", "--uscan", "-v", "--no-interactive"]),
            &pkg_dir,
        )
        .await?;

        debug!("Deleting temporary changelog");
        let changelog = pkg_dir.join("debian/changelog");
        tokio::fs::remove_file(&changelog)
            .await
            .map_err(|source| BootstrapError::Io {
                context: format!("failed to remove {}", changelog.display()),
                source,
            })?;

        info!("Running debdry");
        self.run_cmd(CommandSpec::new(&tools.debdry, ["-v"]), &pkg_dir)
            .await?;

        debug!("Adding debian directory to Git");
        self.run_cmd(CommandSpec::new(&tools.git, ["add", "debian"]), &pkg_dir)
            .await?;

        Ok(pkg_dir)
    }

    async fn run_cmd(
        &self,
        spec: CommandSpec,
        dir: &Path,
    ) -> Result<CommandOutput, BootstrapError> {
        let spec = spec.current_dir(dir);
        debug!("$ {}", spec);

        let output = self.runner.run(&spec).await.map_err(|e| match e {
            CommandError::Spawn { command, source } => BootstrapError::ExternalCommand {
                command,
                code: None,
                stderr: source.to_string(),
            },
        })?;
        for line in output.stdout.lines().chain(output.stderr.lines()) {
            debug!("  {}", line);
        }

        if !output.success() {
            return Err(BootstrapError::ExternalCommand {
                command: spec.to_string(),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

async fn create_dir(path: &Path) -> Result<(), BootstrapError> {
    tokio::fs::create_dir(path)
        .await
        .map_err(|source| BootstrapError::Io {
            context: format!("failed to create directory {}", path.display()),
            source,
        })
}
