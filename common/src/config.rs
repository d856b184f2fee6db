// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::debug;

/// Process-level options for a single hook invocation.
///
/// Built from the command line in the CLI crate, with the environment Juju
/// provides (`CHARM_DIR`) as fallback.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Root of the deployed charm. The lifecycle state file lives here.
    pub charm_dir: PathBuf,

    /// Controls how chatty the hook log is.
    ///
    /// # Levels
    /// * **0** (Default): Lifecycle transitions and publications only.
    /// * **1**: Per-peer ingestion details.
    /// * **2**: Every relation read and write.
    pub verbosity: u8,
}

/// The charm options as returned by `config-get --format=json`.
///
/// Unknown keys are ignored. Missing keys fall back to the defaults the charm
/// ships with, so a half-configured model still yields a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CharmConfig {
    /// Raw YAML describing blackbox exporter probe modules.
    pub modules: String,

    /// Passed through to consumers as `scrape_interval`.
    pub scrape_interval: String,

    /// Probe module announced to consumers. Always `icmp` unless overridden.
    pub probe_module: String,

    /// Publish a TCP probe for every port a reachable peer listens on.
    pub tcp_probes: bool,
}

impl Default for CharmConfig {
    fn default() -> Self {
        Self {
            modules: String::new(),
            scrape_interval: "60s".to_string(),
            probe_module: "icmp".to_string(),
            tcp_probes: false,
        }
    }
}

impl CharmConfig {
    /// Unset options come back as `null`; those fall back to their defaults.
    pub fn from_json(value: serde_json::Value) -> anyhow::Result<Self> {
        let value = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(options) => serde_json::Value::Object(
                options.into_iter().filter(|(_, v)| !v.is_null()).collect(),
            ),
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    /// A stable textual form of the options, used to detect config changes
    /// between hook invocations.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses the `modules` option into the mapping rendered into the exporter
    /// config.
    ///
    /// Accepts both a bare mapping of modules and a document wrapped in a
    /// top-level `modules:` key. Anything unparsable is treated as "no modules".
    pub fn probe_modules(&self) -> Mapping {
        let parsed: Value = match serde_yaml::from_str(&self.modules) {
            Ok(value) => value,
            Err(e) => {
                debug!("Ignoring malformed modules option: {e}");
                return Mapping::new();
            }
        };

        let Value::Mapping(mut document) = parsed else {
            return Mapping::new();
        };

        match document.remove("modules") {
            Some(Value::Mapping(inner)) => inner,
            Some(_) => Mapping::new(),
            None => document,
        }
    }
}
