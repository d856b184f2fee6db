// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// One IPv4 address assigned to a unit, together with the network it belongs to.
///
/// Serialized with the short keys peers exchange on the wire:
/// `{"iface": "eth0", "ip": "10.0.0.5", "net": "10.0.0.0/24"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitNetwork {
    pub iface: String,
    pub ip: Ipv4Addr,
    /// CIDR notation of the network. Matched verbatim against other units, never
    /// by subnet containment.
    pub net: String,
}

impl UnitNetwork {
    pub fn new(iface: impl Into<String>, ip: Ipv4Addr, net: impl Into<String>) -> Self {
        Self {
            iface: iface.into(),
            ip,
            net: net.into(),
        }
    }
}

pub fn encode_networks(networks: &[UnitNetwork]) -> String {
    serde_json::to_string(networks).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_networks(raw: &str) -> Result<Vec<UnitNetwork>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Ports travel as strings, but numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortField {
    Number(u16),
    Text(String),
}

pub fn encode_ports(ports: &BTreeSet<u16>) -> String {
    let as_text: Vec<String> = ports.iter().map(u16::to_string).collect();
    serde_json::to_string(&as_text).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_ports(raw: &str) -> Result<BTreeSet<u16>, serde_json::Error> {
    let fields: Vec<PortField> = serde_json::from_str(raw)?;
    fields
        .into_iter()
        .map(|field| match field {
            PortField::Number(port) => Ok(port),
            PortField::Text(text) => text.trim().parse::<u16>().map_err(|e| {
                <serde_json::Error as serde::de::Error>::custom(format!("port '{text}': {e}"))
            }),
        })
        .collect()
}
