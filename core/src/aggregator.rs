// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Probe Target Aggregation
//!
//! Turns the peer topology into the list consumers scrape.
//!
//! The output is a pure function of the local networks, the store and the
//! metadata: same inputs, same publication. Targets keep store order, then
//! interface order, and are never re-sorted.

use std::collections::HashSet;

use blackbox_common::models::network::UnitNetwork;
use blackbox_common::models::publication::{EXPORTER_PORT, RelationPublication};
use blackbox_common::models::target::{ProbeTarget, TcpProbe};

use crate::store::PeerTopologyStore;

/// The non-topology half of a publication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublicationMeta {
    /// Address consumers reach this exporter on.
    pub ip_address: String,
    pub job_name: String,
    pub module: String,
    pub scrape_interval: String,
    /// Whether to derive TCP probes from peer listening ports.
    pub tcp_probes: bool,
}

pub fn build(
    local: &[UnitNetwork],
    store: &PeerTopologyStore,
    meta: &PublicationMeta,
) -> RelationPublication {
    let networks = store.intersecting_networks(local);

    let mut targets: Vec<ProbeTarget> = Vec::new();
    let mut seen_targets: HashSet<ProbeTarget> = HashSet::new();
    let mut tcp_probes: Vec<TcpProbe> = Vec::new();
    let mut seen_probes: HashSet<TcpProbe> = HashSet::new();

    for snapshot in store.all_snapshots().values() {
        let principal_unit = &snapshot.identity.principal_unit;

        for unit_network in snapshot.networks.iter().filter(|n| networks.contains(&n.net)) {
            let target = ProbeTarget {
                network: unit_network.net.clone(),
                interface: unit_network.iface.clone(),
                ip_address: unit_network.ip,
                principal_unit: principal_unit.clone(),
            };

            if seen_targets.insert(target.clone()) {
                targets.push(target);
            }

            // Peers sharing an address may still listen on different ports.
            if meta.tcp_probes {
                for &port in &snapshot.ports {
                    let probe = TcpProbe {
                        ip_address: unit_network.ip,
                        port,
                        principal_unit: principal_unit.clone(),
                    };
                    if seen_probes.insert(probe.clone()) {
                        tcp_probes.push(probe);
                    }
                }
            }
        }
    }

    RelationPublication {
        targets,
        networks,
        ip_address: meta.ip_address.clone(),
        port: EXPORTER_PORT,
        job_name: meta.job_name.clone(),
        module: meta.module.clone(),
        scrape_interval: meta.scrape_interval.clone(),
        tcp_probes,
    }
}
