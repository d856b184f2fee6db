// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Local Inventory Service
//!
//! Gathers what this unit would announce to its peers, without touching any
//! relation. Backs the `inventory` command, which is handy when debugging a
//! unit from `juju ssh`.

use std::collections::BTreeSet;

use blackbox_common::models::network::UnitNetwork;
use blackbox_common::system::HostInventory;

pub struct InfoService {
    host: Box<dyn HostInventory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInventory {
    pub hostname: String,
    pub az: Option<String>,
    pub networks: Vec<UnitNetwork>,
    pub ports: BTreeSet<u16>,
}

impl InfoService {
    pub fn new(host: Box<dyn HostInventory>) -> Self {
        Self { host }
    }

    pub fn get_local_inventory(&self) -> anyhow::Result<LocalInventory> {
        Ok(LocalInventory {
            hostname: self.host.hostname(),
            az: self.host.availability_zone(),
            networks: self.host.local_networks()?,
            ports: self.host.local_open_ports(),
        })
    }
}
