// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for the hook environment, shared by the unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use blackbox_common::config::CharmConfig;
use blackbox_common::models::RelationSettings;
use blackbox_common::models::network::{self, UnitNetwork};
use blackbox_common::models::snapshot::{KEY_PRINCIPAL_UNIT, KEY_UNIT_NETWORKS};
use blackbox_common::system::{HostInventory, RelationAccessor, UnitEnvironment};

pub struct FakeModel {
    pub local_unit: String,
    pub principal_unit: String,
    pub private_address: String,
    pub remote_unit: Option<String>,
    pub config: CharmConfig,
    /// relation id -> unit -> bag
    pub relations: RefCell<BTreeMap<String, BTreeMap<String, RelationSettings>>>,
    /// Every `relation_set` in call order.
    pub writes: RefCell<Vec<(String, RelationSettings)>>,
    pub networks: Vec<UnitNetwork>,
    pub ports: BTreeSet<u16>,
}

impl Default for FakeModel {
    fn default() -> Self {
        Self {
            local_unit: "blackbox/0".into(),
            principal_unit: "app/0".into(),
            private_address: "10.0.0.5".into(),
            remote_unit: None,
            config: CharmConfig::default(),
            relations: RefCell::new(BTreeMap::new()),
            writes: RefCell::new(Vec::new()),
            networks: vec![UnitNetwork::new("eth0", Ipv4Addr::new(10, 0, 0, 5), "10.0.0.0/24")],
            ports: BTreeSet::new(),
        }
    }
}

impl FakeModel {
    pub fn add_relation(&self, relation_id: &str) {
        self.relations
            .borrow_mut()
            .entry(relation_id.to_string())
            .or_default();
    }

    pub fn set_unit_bag(&self, relation_id: &str, unit: &str, bag: RelationSettings) {
        self.relations
            .borrow_mut()
            .entry(relation_id.to_string())
            .or_default()
            .insert(unit.to_string(), bag);
    }

    /// Publishes a peer with the given networks, as a remote unit would.
    pub fn add_peer(&self, relation_id: &str, unit: &str, principal: &str, networks: &[UnitNetwork]) {
        let mut bag = RelationSettings::new();
        bag.insert(KEY_PRINCIPAL_UNIT.into(), principal.into());
        bag.insert(KEY_UNIT_NETWORKS.into(), network::encode_networks(networks));
        self.set_unit_bag(relation_id, unit, bag);
    }

    pub fn bag(&self, relation_id: &str, unit: &str) -> RelationSettings {
        self.relations
            .borrow()
            .get(relation_id)
            .and_then(|units| units.get(unit))
            .cloned()
            .unwrap_or_default()
    }

    pub fn local_bag(&self, relation_id: &str) -> RelationSettings {
        self.bag(relation_id, &self.local_unit)
    }
}

impl RelationAccessor for FakeModel {
    fn relation_ids(&self, endpoint: &str) -> anyhow::Result<Vec<String>> {
        let prefix = format!("{endpoint}:");
        Ok(self
            .relations
            .borrow()
            .keys()
            .filter(|rid| rid.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn related_units(&self, relation_id: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .relations
            .borrow()
            .get(relation_id)
            .map(|units| {
                units
                    .keys()
                    .filter(|unit| **unit != self.local_unit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn relation_get(&self, relation_id: &str, unit: &str) -> anyhow::Result<RelationSettings> {
        Ok(self.bag(relation_id, unit))
    }

    fn relation_set(&self, relation_id: &str, settings: &RelationSettings) -> anyhow::Result<()> {
        self.writes
            .borrow_mut()
            .push((relation_id.to_string(), settings.clone()));
        self.relations
            .borrow_mut()
            .entry(relation_id.to_string())
            .or_default()
            .entry(self.local_unit.clone())
            .or_default()
            .extend(settings.clone());
        Ok(())
    }
}

impl UnitEnvironment for FakeModel {
    fn local_unit(&self) -> anyhow::Result<String> {
        Ok(self.local_unit.clone())
    }

    fn principal_unit(&self) -> anyhow::Result<String> {
        Ok(self.principal_unit.clone())
    }

    fn remote_unit(&self) -> Option<String> {
        self.remote_unit.clone()
    }

    fn private_address(&self) -> anyhow::Result<String> {
        Ok(self.private_address.clone())
    }

    fn config(&self) -> anyhow::Result<CharmConfig> {
        Ok(self.config.clone())
    }

    fn open_port(&self, _port: u16) -> anyhow::Result<()> {
        Ok(())
    }

    fn status_set(&self, _status: &str, _message: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

impl HostInventory for FakeModel {
    fn local_networks(&self) -> anyhow::Result<Vec<UnitNetwork>> {
        Ok(self.networks.clone())
    }

    fn local_open_ports(&self) -> BTreeSet<u16> {
        self.ports.clone()
    }

    fn hostname(&self) -> String {
        "juju-machine-0".into()
    }

    fn availability_zone(&self) -> Option<String> {
        None
    }
}
