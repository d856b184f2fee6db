// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Peer Topology Store
//!
//! Holds the last complete report of every peer seen during this hook.
//!
//! Snapshots are only ever replaced as a whole. A report without networks
//! never reaches the store, so whatever is stored is always usable for
//! matching against the local networks.

use std::collections::{BTreeMap, BTreeSet};

use blackbox_common::models::network::UnitNetwork;
use blackbox_common::models::snapshot::{PeerReport, PeerSnapshot};
use blackbox_common::models::unit::PeerId;

#[derive(Debug, Default)]
pub struct PeerTopologyStore {
    snapshots: BTreeMap<PeerId, PeerSnapshot>,
}

impl PeerTopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot of `peer`.
    ///
    /// Returns `false` and leaves the store untouched when the report has no
    /// networks.
    pub fn update(&mut self, peer: PeerId, report: PeerReport) -> bool {
        match report.into_snapshot() {
            Some(snapshot) => {
                self.snapshots.insert(peer, snapshot);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, peer: &PeerId) -> Option<PeerSnapshot> {
        self.snapshots.remove(peer)
    }

    /// Drops every snapshot a unit left behind, on any peer relation.
    pub fn remove_unit(&mut self, unit: &str) -> usize {
        let before = self.snapshots.len();
        self.snapshots.retain(|peer, _| peer.unit != unit);
        before - self.snapshots.len()
    }

    pub fn all_snapshots(&self) -> &BTreeMap<PeerId, PeerSnapshot> {
        &self.snapshots
    }

    pub fn get(&self, peer: &PeerId) -> Option<&PeerSnapshot> {
        self.snapshots.get(peer)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Networks some peer reports that the local unit is also attached to.
    ///
    /// Networks are compared as strings: `10.0.0.0/24` and `10.0.0.0/16` do
    /// not match even though one contains the other.
    pub fn intersecting_networks(&self, local: &[UnitNetwork]) -> BTreeSet<String> {
        let local_nets: BTreeSet<&str> = local.iter().map(|n| n.net.as_str()).collect();

        self.snapshots
            .values()
            .flat_map(|snapshot| snapshot.networks.iter())
            .filter(|n| local_nets.contains(n.net.as_str()))
            .map(|n| n.net.clone())
            .collect()
    }
}
