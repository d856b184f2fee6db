// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Host-side collaborators: apt, systemd and the exporter config file.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_yaml::{Mapping, Value};

use blackbox_common::error::CharmError;
use blackbox_common::system::{ConfigRenderer, PackageInstaller, ServiceController};

use crate::hookenv::run_tool;

pub struct AptInstaller;

impl PackageInstaller for AptInstaller {
    fn install(&self, package: &str) -> anyhow::Result<()> {
        run_tool(
            "apt-get",
            &["install", "--yes", "--option=Dpkg::Options::=--force-confold", package],
        )?;
        Ok(())
    }

    fn grant_raw_socket(&self, executable: &Path) -> anyhow::Result<()> {
        let executable = executable.to_string_lossy();
        run_tool("setcap", &["cap_net_raw+ep", &executable])?;
        Ok(())
    }
}

pub struct Systemd;

impl ServiceController for Systemd {
    fn is_running(&self, service: &str) -> bool {
        Command::new("systemctl")
            .args(["is-active", "--quiet", service])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn start(&self, service: &str) -> anyhow::Result<()> {
        run_tool("systemctl", &["start", service])?;
        Ok(())
    }

    fn restart(&self, service: &str) -> anyhow::Result<()> {
        run_tool("systemctl", &["restart", service])?;
        Ok(())
    }
}

/// Writes `blackbox.yml` as a single `modules:` mapping.
pub struct BlackboxConfigRenderer;

impl BlackboxConfigRenderer {
    pub fn document(modules: &Mapping) -> anyhow::Result<String> {
        let mut root = Mapping::new();
        root.insert(Value::from("modules"), Value::Mapping(modules.clone()));
        serde_yaml::to_string(&root).map_err(|e| CharmError::State(e.to_string()).into())
    }
}

impl ConfigRenderer for BlackboxConfigRenderer {
    fn render(&self, target: &Path, modules: &Mapping) -> anyhow::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(CharmError::Io)?;
        }
        fs::write(target, Self::document(modules)?).map_err(CharmError::Io)?;
        Ok(())
    }
}
