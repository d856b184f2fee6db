// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::debug;
use crate::models::network::UnitNetwork;

/// Enumerates the host's interfaces and returns every IPv4 address they carry,
/// loopback excluded.
pub fn local_unit_networks() -> Vec<UnitNetwork> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();

    debug!(
        verbosity = 1,
        "Inspecting {} network interface(s) for IPv4 addresses",
        interfaces.len()
    );

    unit_networks(&interfaces)
}

/// Maps interfaces to [`UnitNetwork`]s, one per assigned IPv4 address.
///
/// Interfaces without IPv4 addresses contribute nothing. Order follows the
/// interface list, then address order on each interface.
pub fn unit_networks(interfaces: &[NetworkInterface]) -> Vec<UnitNetwork> {
    interfaces
        .iter()
        .filter(|iface| !is_loopback(iface))
        .flat_map(|iface| {
            iface.ips.iter().filter_map(move |ip| match ip {
                IpNetwork::V4(v4) => Some(UnitNetwork::new(
                    iface.name.clone(),
                    v4.ip(),
                    network_of(v4).to_string(),
                )),
                IpNetwork::V6(_) => None,
            })
        })
        .collect()
}

/// The network an address belongs to, e.g. `10.0.0.5/24` -> `10.0.0.0/24`.
pub fn network_of(addr: &Ipv4Network) -> Ipv4Network {
    // The network address of a valid prefix always forms a valid network.
    Ipv4Network::new(addr.network(), addr.prefix()).unwrap_or(*addr)
}

fn is_loopback(iface: &NetworkInterface) -> bool {
    iface.is_loopback() || iface.name == "lo"
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
