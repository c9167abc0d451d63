// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Bootstraps Debian source packages for projects on well-known forges.

pub mod bootstrap;
pub mod command;
pub mod logging;
pub mod watch;
