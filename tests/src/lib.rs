// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.


pub mod utils {
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, BTreeSet};
    use std::net::Ipv4Addr;
    use std::path::{Path, PathBuf};

    use blackbox_common::config::CharmConfig;
    use blackbox_common::models::network::{self, UnitNetwork};
    use blackbox_common::models::snapshot::{KEY_PRINCIPAL_UNIT, KEY_UNIT_NETWORKS};
    use blackbox_common::models::RelationSettings;
    use blackbox_common::system::{
        ConfigRenderer, HostInventory, PackageInstaller, RelationAccessor, ServiceController,
        UnitEnvironment,
    };
    use blackbox_core::dispatch::{DispatchTable, Environment, HookContext};
    use blackbox_core::lifecycle::{LifecycleRecord, StateStore};
    use serde_yaml::Mapping;

    /// A single simulated unit: its view of the model, its host and its
    /// machine-level side effects.
    pub struct FakeUnit {
        pub name: String,
        pub principal: String,
        pub address: String,
        pub remote: RefCell<Option<String>>,
        pub config: RefCell<CharmConfig>,
        /// relation id -> unit -> bag
        pub relations: RefCell<BTreeMap<String, BTreeMap<String, RelationSettings>>>,
        /// Relation ids written to, in order.
        pub writes: RefCell<Vec<String>>,
        pub networks: Vec<UnitNetwork>,
        pub ports: BTreeSet<u16>,
        /// Installs, renders, service actions and status changes, in order.
        pub actions: RefCell<Vec<String>>,
        pub running: Cell<bool>,
        pub record: RefCell<LifecycleRecord>,
    }

    impl FakeUnit {
        pub fn new(name: &str, principal: &str, ip: Ipv4Addr, net: &str) -> Self {
            Self {
                name: name.to_string(),
                principal: principal.to_string(),
                address: ip.to_string(),
                remote: RefCell::new(None),
                config: RefCell::new(CharmConfig::default()),
                relations: RefCell::new(BTreeMap::new()),
                writes: RefCell::new(Vec::new()),
                networks: vec![UnitNetwork::new("eth0", ip, net)],
                ports: BTreeSet::new(),
                actions: RefCell::new(Vec::new()),
                running: Cell::new(false),
                record: RefCell::new(LifecycleRecord::default()),
            }
        }

        pub fn add_relation(&self, relation_id: &str) {
            self.relations
                .borrow_mut()
                .entry(relation_id.to_string())
                .or_default();
        }

        pub fn set_remote_bag(&self, relation_id: &str, unit: &str, bag: RelationSettings) {
            self.relations
                .borrow_mut()
                .entry(relation_id.to_string())
                .or_default()
                .insert(unit.to_string(), bag);
        }

        pub fn add_peer(&self, relation_id: &str, unit: &str, principal: &str, networks: &[UnitNetwork]) {
            let mut bag = RelationSettings::new();
            bag.insert(KEY_PRINCIPAL_UNIT.into(), principal.into());
            bag.insert(KEY_UNIT_NETWORKS.into(), network::encode_networks(networks));
            self.set_remote_bag(relation_id, unit, bag);
        }

        pub fn remove_unit(&self, relation_id: &str, unit: &str) {
            if let Some(units) = self.relations.borrow_mut().get_mut(relation_id) {
                units.remove(unit);
            }
        }

        pub fn local_bag(&self, relation_id: &str) -> RelationSettings {
            self.relations
                .borrow()
                .get(relation_id)
                .and_then(|units| units.get(&self.name))
                .cloned()
                .unwrap_or_default()
        }

        /// Runs `hook` for this unit with `remote` as `JUJU_REMOTE_UNIT`.
        pub fn fire(&self, hook: &str, remote: Option<&str>) -> anyhow::Result<Option<usize>> {
            *self.remote.borrow_mut() = remote.map(str::to_string);

            let env = Environment {
                relations: self,
                unit: self,
                host: self,
                installer: self,
                services: self,
                renderer: self,
                state: self,
                conf_path: PathBuf::from("/tmp/blackbox.yml"),
            };
            let mut ctx = HookContext::new(&env);
            DispatchTable::default().run(hook, &mut ctx)?;
            Ok(ctx.published)
        }

        fn act(&self, action: String) {
            self.actions.borrow_mut().push(action);
        }
    }

    impl RelationAccessor for FakeUnit {
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
                .map(|units| units.keys().filter(|u| **u != self.name).cloned().collect())
                .unwrap_or_default())
        }

        fn relation_get(&self, relation_id: &str, unit: &str) -> anyhow::Result<RelationSettings> {
            Ok(self
                .relations
                .borrow()
                .get(relation_id)
                .and_then(|units| units.get(unit))
                .cloned()
                .unwrap_or_default())
        }

        fn relation_set(&self, relation_id: &str, settings: &RelationSettings) -> anyhow::Result<()> {
            self.writes.borrow_mut().push(relation_id.to_string());
            self.relations
                .borrow_mut()
                .entry(relation_id.to_string())
                .or_default()
                .entry(self.name.clone())
                .or_default()
                .extend(settings.clone());
            Ok(())
        }
    }

    impl UnitEnvironment for FakeUnit {
        fn local_unit(&self) -> anyhow::Result<String> {
            Ok(self.name.clone())
        }

        fn principal_unit(&self) -> anyhow::Result<String> {
            Ok(self.principal.clone())
        }

        fn remote_unit(&self) -> Option<String> {
            self.remote.borrow().clone()
        }

        fn private_address(&self) -> anyhow::Result<String> {
            Ok(self.address.clone())
        }

        fn config(&self) -> anyhow::Result<CharmConfig> {
            Ok(self.config.borrow().clone())
        }

        fn open_port(&self, port: u16) -> anyhow::Result<()> {
            self.act(format!("open-port {port}"));
            Ok(())
        }

        fn status_set(&self, status: &str, message: &str) -> anyhow::Result<()> {
            self.act(format!("status {status}: {message}"));
            Ok(())
        }
    }

    impl HostInventory for FakeUnit {
        fn local_networks(&self) -> anyhow::Result<Vec<UnitNetwork>> {
            Ok(self.networks.clone())
        }

        fn local_open_ports(&self) -> BTreeSet<u16> {
            self.ports.clone()
        }

        fn hostname(&self) -> String {
            format!("host-{}", self.name.replace('/', "-"))
        }

        fn availability_zone(&self) -> Option<String> {
            None
        }
    }

    impl PackageInstaller for FakeUnit {
        fn install(&self, package: &str) -> anyhow::Result<()> {
            self.act(format!("install {package}"));
            Ok(())
        }

        fn grant_raw_socket(&self, executable: &Path) -> anyhow::Result<()> {
            self.act(format!("setcap {}", executable.display()));
            Ok(())
        }
    }

    impl ServiceController for FakeUnit {
        fn is_running(&self, _service: &str) -> bool {
            self.running.get()
        }

        fn start(&self, service: &str) -> anyhow::Result<()> {
            self.act(format!("start {service}"));
            self.running.set(true);
            Ok(())
        }

        fn restart(&self, service: &str) -> anyhow::Result<()> {
            self.act(format!("restart {service}"));
            Ok(())
        }
    }

    impl ConfigRenderer for FakeUnit {
        fn render(&self, target: &Path, modules: &Mapping) -> anyhow::Result<()> {
            self.act(format!("render {} ({} modules)", target.display(), modules.len()));
            Ok(())
        }
    }

    impl StateStore for FakeUnit {
        fn load(&self) -> anyhow::Result<LifecycleRecord> {
            Ok(self.record.borrow().clone())
        }

        fn save(&self, record: &LifecycleRecord) -> anyhow::Result<()> {
            *self.record.borrow_mut() = record.clone();
            Ok(())
        }
    }
}
