// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Peer Reports
//!
//! What a probe unit tells its peers about itself, and the decoding of that
//! bag on the receiving side.
//!
//! A [`PeerReport`] is the decoded bag as-is; its `networks` stay `None` until
//! the peer has published them. Only complete reports become a
//! [`PeerSnapshot`].

use std::collections::BTreeSet;

use crate::error::CharmError;
use crate::models::RelationSettings;
use crate::models::network::{self, UnitNetwork};
use crate::models::unit::UnitIdentity;
use crate::warn;

pub const KEY_PRINCIPAL_UNIT: &str = "principal-unit";
pub const KEY_PRINCIPAL_HOSTNAME: &str = "principal-hostname";
pub const KEY_PRIVATE_ADDRESS: &str = "private-address";
pub const KEY_UNIT_NETWORKS: &str = "unit-networks";
pub const KEY_AZ: &str = "az";
pub const KEY_UNIT_PORTS: &str = "unit-ports";

/// One peer's relation bag, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeerReport {
    pub identity: UnitIdentity,
    /// `None` while the peer has not published `unit-networks`.
    pub networks: Option<Vec<UnitNetwork>>,
    pub ports: BTreeSet<u16>,
}

/// The last complete report received from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSnapshot {
    pub identity: UnitIdentity,
    pub networks: Vec<UnitNetwork>,
    pub ports: BTreeSet<u16>,
}

impl PeerReport {
    /// Decodes the bag `unit` published.
    ///
    /// A malformed `unit-networks` is an error since it decides what the peer
    /// can reach. A malformed `unit-ports` only loses the ports.
    pub fn from_settings(unit: &str, settings: &RelationSettings) -> Result<Self, CharmError> {
        let text = |key: &str| settings.get(key).cloned().unwrap_or_default();

        let networks = match settings.get(KEY_UNIT_NETWORKS).map(|raw| raw.trim()) {
            None | Some("") => None,
            Some(raw) => Some(network::decode_networks(raw).map_err(|source| {
                CharmError::MalformedField {
                    field: KEY_UNIT_NETWORKS,
                    unit: unit.to_string(),
                    source,
                }
            })?),
        };

        let ports = match settings.get(KEY_UNIT_PORTS).map(|raw| raw.trim()) {
            None | Some("") => BTreeSet::new(),
            Some(raw) => network::decode_ports(raw).unwrap_or_else(|e| {
                warn!("Dropping unreadable {KEY_UNIT_PORTS} from {unit}: {e}");
                BTreeSet::new()
            }),
        };

        let az = text(KEY_AZ);
        let identity = UnitIdentity {
            principal_unit: text(KEY_PRINCIPAL_UNIT),
            hostname: text(KEY_PRINCIPAL_HOSTNAME),
            az: (!az.is_empty()).then_some(az),
            private_address: text(KEY_PRIVATE_ADDRESS),
        };

        Ok(Self {
            identity,
            networks,
            ports,
        })
    }

    /// Encodes this report into the keys it owns on the peer relation.
    pub fn to_settings(&self) -> RelationSettings {
        let mut settings = RelationSettings::new();
        settings.insert(KEY_PRINCIPAL_UNIT.into(), self.identity.principal_unit.clone());
        settings.insert(KEY_PRINCIPAL_HOSTNAME.into(), self.identity.hostname.clone());
        settings.insert(KEY_PRIVATE_ADDRESS.into(), self.identity.private_address.clone());
        settings.insert(KEY_AZ.into(), self.identity.az.clone().unwrap_or_default());
        settings.insert(
            KEY_UNIT_NETWORKS.into(),
            network::encode_networks(self.networks.as_deref().unwrap_or_default()),
        );
        settings.insert(KEY_UNIT_PORTS.into(), network::encode_ports(&self.ports));
        settings
    }

    /// Promotes the report to a snapshot, or `None` when networks are missing.
    pub fn into_snapshot(self) -> Option<PeerSnapshot> {
        let networks = self.networks?;
        Some(PeerSnapshot {
            identity: self.identity,
            networks,
            ports: self.ports,
        })
    }
}
