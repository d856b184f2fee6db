// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use blackbox_common::debug;
use blackbox_common::interface;
use blackbox_common::models::network::UnitNetwork;
use blackbox_common::system::HostInventory;

/// Where Juju drops the availability zone of the machine, when known.
pub const AZ_PATH: &str = "/var/lib/juju/az";

pub const SS_BIN: &str = "ss";

pub struct SystemRepo {
    az_path: PathBuf,
    ss_bin: PathBuf,
}

impl Default for SystemRepo {
    fn default() -> Self {
        Self {
            az_path: PathBuf::from(AZ_PATH),
            ss_bin: PathBuf::from(SS_BIN),
        }
    }
}

impl HostInventory for SystemRepo {
    fn local_networks(&self) -> anyhow::Result<Vec<UnitNetwork>> {
        Ok(interface::local_unit_networks())
    }

    fn local_open_ports(&self) -> BTreeSet<u16> {
        let output = Command::new(&self.ss_bin).arg("-ltnH").output();

        match output {
            Ok(o) if o.status.success() => parse_listening_ports(&String::from_utf8_lossy(&o.stdout)),
            Ok(o) => {
                debug!("ss exited with {}, reporting no open ports", o.status);
                BTreeSet::new()
            }
            Err(e) => {
                debug!("ss unavailable ({e}), reporting no open ports");
                BTreeSet::new()
            }
        }
    }

    fn hostname(&self) -> String {
        sys_info::hostname().unwrap_or_default()
    }

    fn availability_zone(&self) -> Option<String> {
        let az = fs::read_to_string(&self.az_path).ok()?;
        let az = az.trim();
        (!az.is_empty()).then(|| az.to_string())
    }
}

/// Extracts the distinct ports of TCP sockets in LISTEN state from `ss` output.
///
/// Works with and without the leading `Netid` column, i.e. both
/// `LISTEN 0 128 0.0.0.0:22 0.0.0.0:*` and `tcp LISTEN 0 128 [::]:22 [::]:*`.
pub fn parse_listening_ports(stdout: &str) -> BTreeSet<u16> {
    let mut ports = BTreeSet::new();

    for line in stdout.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(state_idx) = parts.iter().position(|p| *p == "LISTEN") else {
            continue;
        };

        // State Recv-Q Send-Q Local_Address:Port ...
        let Some(local_addr_port) = parts.get(state_idx + 3) else {
            continue;
        };

        let Some(idx) = local_addr_port.rfind(':') else {
            continue;
        };

        match local_addr_port[idx + 1..].parse::<u16>() {
            Ok(0) | Err(_) => continue,
            Ok(port) => {
                ports.insert(port);
            }
        }
    }

    ports
}
