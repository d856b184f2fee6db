// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Blackbox Charm Entry Point
//!
//! Sets up logging, maps the command line into a [`Config`], routes to the
//! command and turns any error into a non-zero exit code, which Juju reports
//! as a failed hook.

mod commands;
mod terminal;

use std::process::ExitCode;

use blackbox_common::{config::Config, error};

use crate::{
    commands::{CommandLine, Commands, hook, inventory},
    terminal::logging,
};

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.verbosity);

    let cfg = Config::from(&commands);

    let result = match &commands.command {
        Commands::Hook { name } => hook::hook(name.as_deref(), &cfg),
        Commands::Inventory => inventory::inventory(&cfg),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    }
}
