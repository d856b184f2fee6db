// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Exporter Lifecycle
//!
//! Installs the exporter, keeps its config in line with the charm options and
//! (re)starts it when that config changes.
//!
//! Progress survives between hooks in a small JSON record, see
//! [`FileStateStore`]. Every hook calls [`Lifecycle::reconcile`]; when nothing
//! changed it is a no-op apart from reading the record and the options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use blackbox_common::error::CharmError;
use blackbox_common::models::publication::EXPORTER_PORT;
use blackbox_common::system::{ConfigRenderer, PackageInstaller, ServiceController, UnitEnvironment};
use blackbox_common::{info, success};

pub const APT_PKG_NAME: &str = "prometheus-blackbox-exporter";
pub const SVC_NAME: &str = "prometheus-blackbox-exporter";
pub const EXECUTABLE: &str = "/usr/bin/prometheus-blackbox-exporter";
pub const CONF_FILE_PATH: &str = "/etc/prometheus/blackbox.yml";
pub const STATE_FILE_NAME: &str = ".blackbox-state.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    #[default]
    Uninstalled,
    Installed,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifecycleRecord {
    pub state: LifecycleState,
    /// Fingerprint of the options the running config was rendered from.
    pub config_fingerprint: Option<String>,
}

pub trait StateStore {
    fn load(&self) -> anyhow::Result<LifecycleRecord>;
    fn save(&self, record: &LifecycleRecord) -> anyhow::Result<()>;
}

/// Keeps the record as JSON inside the charm directory.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(charm_dir: &Path) -> Self {
        Self {
            path: charm_dir.join(STATE_FILE_NAME),
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> anyhow::Result<LifecycleRecord> {
        if !self.path.exists() {
            return Ok(LifecycleRecord::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(CharmError::Io)?;
        serde_json::from_str(&raw)
            .map_err(|e| CharmError::State(format!("{}: {e}", self.path.display())).into())
    }

    fn save(&self, record: &LifecycleRecord) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(record)
            .map_err(|e| CharmError::State(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(CharmError::Io)?;
        fs::rename(&tmp, &self.path).map_err(CharmError::Io)?;
        Ok(())
    }
}

pub struct Lifecycle<'a> {
    pub unit: &'a dyn UnitEnvironment,
    pub installer: &'a dyn PackageInstaller,
    pub services: &'a dyn ServiceController,
    pub renderer: &'a dyn ConfigRenderer,
    pub state: &'a dyn StateStore,
    pub conf_path: PathBuf,
}

impl Lifecycle<'_> {
    pub fn reconcile(&self) -> anyhow::Result<LifecycleState> {
        let mut record = self.state.load()?;

        if record.state == LifecycleState::Uninstalled {
            self.install()?;
            record.state = LifecycleState::Installed;
            self.state.save(&record)?;
        }

        let config = self.unit.config()?;
        let fingerprint = config.fingerprint();
        let config_changed = record.config_fingerprint.as_deref() != Some(fingerprint.as_str());

        if record.state != LifecycleState::Running || config_changed {
            info!("Rendering {}", self.conf_path.display());
            self.renderer.render(&self.conf_path, &config.probe_modules())?;
            self.unit.open_port(EXPORTER_PORT)?;
            self.restart()?;

            record.state = LifecycleState::Running;
            record.config_fingerprint = Some(fingerprint);
            self.state.save(&record)?;
        }

        Ok(record.state)
    }

    fn install(&self) -> anyhow::Result<()> {
        self.unit.status_set("maintenance", "Installing software")?;
        self.installer.install(APT_PKG_NAME)?;
        self.installer.grant_raw_socket(Path::new(EXECUTABLE))?;
        success!("Installed {APT_PKG_NAME}");
        Ok(())
    }

    fn restart(&self) -> anyhow::Result<()> {
        if self.services.is_running(SVC_NAME) {
            info!("Restarting {SVC_NAME}, config file changed...");
            self.services.restart(SVC_NAME)?;
        } else {
            info!("Starting {SVC_NAME}...");
            self.services.start(SVC_NAME)?;
        }
        self.unit.status_set("active", "Ready")
    }
}
