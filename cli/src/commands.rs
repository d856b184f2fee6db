// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! Juju runs hooks as executables named after the hook, so the binary is
//! normally symlinked into `hooks/` and invoked as e.g.
//! `hooks/blackbox-peer-relation-changed`. In that case the program name *is*
//! the hook name and no subcommand is given. Invoked under its own name, the
//! binary takes an explicit subcommand instead.
//!
//! `From<&CommandLine> for Config` keeps the core crates unaware of `clap`.

pub mod hook;
pub mod inventory;

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use blackbox_common::config::Config;
use clap::{ArgAction, Parser, Subcommand};

pub const BINARY_NAME: &str = "blackbox-charm";

#[derive(Parser, Debug)]
#[command(name = "blackbox-charm")]
#[command(about = "Juju charm hooks for the Prometheus blackbox exporter.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Charm root directory (defaults to $CHARM_DIR)
    #[arg(long = "charm-dir", global = true, value_name = "DIR")]
    pub charm_dir: Option<PathBuf>,

    /// Increase logging detail (-v: per-peer details, -vv: relation traffic)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run a hook (defaults to $JUJU_HOOK_NAME)
    #[command(alias = "h")]
    Hook {
        #[arg(value_name = "HOOK")]
        name: Option<String>,
    },

    /// Show what this unit would announce to its peers
    #[command(alias = "i")]
    Inventory,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse_from_argv(env::args_os())
    }

    /// Parses `argv`, treating a program name other than [`BINARY_NAME`] as
    /// the hook to run.
    pub fn parse_from_argv<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv: Vec<OsString> = argv.into_iter().collect();
        let program = argv
            .first()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map(|name| name.to_string_lossy().into_owned());

        if let Some(hook) = program
            && hook != BINARY_NAME
        {
            argv.splice(1..1, [OsString::from("hook"), OsString::from(hook)]);
        }

        Self::parse_from(argv)
    }
}

impl From<&CommandLine> for Config {
    fn from(cmd: &CommandLine) -> Self {
        let charm_dir = cmd
            .charm_dir
            .clone()
            .or_else(|| env::var_os("CHARM_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            charm_dir,
            verbosity: cmd.verbosity,
        }
    }
}
