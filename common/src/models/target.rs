// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A single address eligible for active probing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeTarget {
    pub network: String,
    pub interface: String,
    pub ip_address: Ipv4Addr,
    pub principal_unit: String,
}

/// A TCP port a reachable peer listens on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TcpProbe {
    pub ip_address: Ipv4Addr,
    pub port: u16,
    pub principal_unit: String,
}
