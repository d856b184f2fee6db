// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use blackbox_common::config::Config;
use blackbox_common::{info, success};
use blackbox_core::dispatch::{DispatchTable, Environment, HookContext};
use blackbox_core::hookenv::JujuHookTools;
use blackbox_core::lifecycle::{CONF_FILE_PATH, FileStateStore};
use blackbox_core::services::{AptInstaller, BlackboxConfigRenderer, Systemd};
use blackbox_core::system::SystemRepo;

pub fn hook(name: Option<&str>, cfg: &Config) -> anyhow::Result<()> {
    let hook_name = match name {
        Some(name) => name.to_string(),
        None => env::var("JUJU_HOOK_NAME").context("no hook given and JUJU_HOOK_NAME is unset")?,
    };

    let tools = JujuHookTools;
    let host = SystemRepo::default();
    let state = FileStateStore::new(&cfg.charm_dir);

    let env = Environment {
        relations: &tools,
        unit: &tools,
        host: &host,
        installer: &AptInstaller,
        services: &Systemd,
        renderer: &BlackboxConfigRenderer,
        state: &state,
        conf_path: PathBuf::from(CONF_FILE_PATH),
    };

    let mut ctx = HookContext::new(&env);
    DispatchTable::default().run(&hook_name, &mut ctx)?;

    match ctx.published {
        Some(count) => success!("{hook_name}: published to {count} consumer relation(s)"),
        None => info!("{hook_name}: nothing published"),
    }
    Ok(())
}
