// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use blackbox_common::config::Config;
use blackbox_core::info::InfoService;
use blackbox_core::system::SystemRepo;

use crate::bprint;
use crate::terminal::print;

const KEY_WIDTH: usize = 10;

pub fn inventory(_cfg: &Config) -> anyhow::Result<()> {
    let service = InfoService::new(Box::new(SystemRepo::default()));
    let inventory = service.get_local_inventory()?;

    print::header("unit inventory");
    print::key_value("hostname", &inventory.hostname, KEY_WIDTH);
    print::key_value("az", inventory.az.as_deref().unwrap_or("-"), KEY_WIDTH);

    let ports: Vec<String> = inventory.ports.iter().map(u16::to_string).collect();
    print::key_value("ports", ports.join(", "), KEY_WIDTH);

    bprint!();
    print::header("networks");
    if inventory.networks.is_empty() {
        bprint!("  (none)");
    }
    for net in &inventory.networks {
        print::key_value(&net.iface, format!("{} in {}", net.ip, net.net), KEY_WIDTH);
    }
    Ok(())
}
