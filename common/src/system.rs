// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Collaborator Contracts
//!
//! Everything the charm needs from the outside world, as traits.
//!
//! The core never shells out or touches the host directly; it goes through
//! these. Concrete implementations live in `blackbox_core::hookenv` and
//! `blackbox_core::system`, and tests substitute in-memory fakes.

use std::collections::BTreeSet;
use std::path::Path;

use serde_yaml::Mapping;

use crate::config::CharmConfig;
use crate::models::RelationSettings;
use crate::models::network::UnitNetwork;

/// Read and write access to relation data.
pub trait RelationAccessor {
    /// Ids of every established relation with the given endpoint name.
    fn relation_ids(&self, endpoint: &str) -> anyhow::Result<Vec<String>>;

    /// Remote units currently participating in a relation.
    fn related_units(&self, relation_id: &str) -> anyhow::Result<Vec<String>>;

    /// The full bag `unit` has published on `relation_id`.
    fn relation_get(&self, relation_id: &str, unit: &str) -> anyhow::Result<RelationSettings>;

    /// Writes the local unit's bag. Keys missing from `settings` are untouched.
    fn relation_set(&self, relation_id: &str, settings: &RelationSettings) -> anyhow::Result<()>;
}

/// Facts about, and actions on, the unit the hook runs for.
pub trait UnitEnvironment {
    fn local_unit(&self) -> anyhow::Result<String>;

    /// The monitored unit this subordinate is attached to.
    fn principal_unit(&self) -> anyhow::Result<String>;

    /// The remote unit the current relation hook fires for, if any.
    fn remote_unit(&self) -> Option<String>;

    fn private_address(&self) -> anyhow::Result<String>;

    fn config(&self) -> anyhow::Result<CharmConfig>;

    fn open_port(&self, port: u16) -> anyhow::Result<()>;

    /// Reports workload status (`maintenance`, `active`, `blocked`, ...).
    fn status_set(&self, status: &str, message: &str) -> anyhow::Result<()>;
}

/// Defines the contract for reading OS-level network state.
pub trait HostInventory {
    /// Non-loopback IPv4 addresses of the host with their networks.
    fn local_networks(&self) -> anyhow::Result<Vec<UnitNetwork>>;

    /// TCP ports in LISTEN state. Never fails; unknown means empty.
    fn local_open_ports(&self) -> BTreeSet<u16>;

    fn hostname(&self) -> String;

    fn availability_zone(&self) -> Option<String>;
}

pub trait PackageInstaller {
    fn install(&self, package: &str) -> anyhow::Result<()>;

    /// Grants `cap_net_raw` so the exporter can send ICMP without root.
    fn grant_raw_socket(&self, executable: &Path) -> anyhow::Result<()>;
}

pub trait ServiceController {
    fn is_running(&self, service: &str) -> bool;
    fn start(&self, service: &str) -> anyhow::Result<()>;
    fn restart(&self, service: &str) -> anyhow::Result<()>;
}

/// Writes the exporter's configuration file.
pub trait ConfigRenderer {
    fn render(&self, target: &Path, modules: &Mapping) -> anyhow::Result<()>;
}
