// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::RelationSettings;
use crate::models::target::{ProbeTarget, TcpProbe};

/// The port the exporter listens on.
pub const EXPORTER_PORT: u16 = 9115;

/// Everything a consumer receives in one go.
///
/// Always rebuilt from scratch and written as a whole; consumers never see a
/// mix of two publications.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationPublication {
    pub targets: Vec<ProbeTarget>,
    pub networks: BTreeSet<String>,
    pub ip_address: String,
    pub port: u16,
    pub job_name: String,
    pub module: String,
    pub scrape_interval: String,
    pub tcp_probes: Vec<TcpProbe>,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

impl RelationPublication {
    pub fn to_settings(&self) -> RelationSettings {
        let mut settings = RelationSettings::new();
        settings.insert("targets".into(), to_json(&self.targets));
        settings.insert("networks".into(), to_json(&self.networks));
        settings.insert("ip_address".into(), self.ip_address.clone());
        settings.insert("port".into(), self.port.to_string());
        settings.insert("job_name".into(), self.job_name.clone());
        settings.insert("module".into(), self.module.clone());
        settings.insert("scrape_interval".into(), self.scrape_interval.clone());
        settings.insert("tcp_probes".into(), to_json(&self.tcp_probes));
        settings
    }
}
