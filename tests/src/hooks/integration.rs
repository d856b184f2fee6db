// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::net::Ipv4Addr;

use blackbox_common::models::network::{encode_networks, UnitNetwork};
use blackbox_common::models::snapshot::KEY_PRINCIPAL_UNIT;
use blackbox_common::models::target::{ProbeTarget, TcpProbe};
use blackbox_common::models::RelationSettings;
use blackbox_core::lifecycle::LifecycleState;

use crate::utils::FakeUnit;

const PEER_RID: &str = "blackbox-peer:3";
const CONSUMER_RID: &str = "blackbox-exporter:8";

fn local_unit() -> FakeUnit {
    let unit = FakeUnit::new(
        "blackbox/0",
        "app/1",
        Ipv4Addr::new(10, 0, 0, 5),
        "10.0.0.0/24",
    );
    unit.add_relation(PEER_RID);
    unit.add_relation(CONSUMER_RID);
    unit
}

fn eth0(ip: [u8; 4], net: &str) -> UnitNetwork {
    UnitNetwork::new("eth0", Ipv4Addr::from(ip), net)
}

fn published_targets(unit: &FakeUnit) -> Vec<ProbeTarget> {
    let bag = unit.local_bag(CONSUMER_RID);
    serde_json::from_str(&bag["targets"]).expect("targets should be JSON")
}

fn published_networks(unit: &FakeUnit) -> Vec<String> {
    let bag = unit.local_bag(CONSUMER_RID);
    serde_json::from_str(&bag["networks"]).expect("networks should be JSON")
}

#[test]
fn test_reachable_peer_becomes_a_target() {
    let unit = local_unit();
    unit.add_peer(PEER_RID, "blackbox/1", "app/0", &[eth0([10, 0, 0, 9], "10.0.0.0/24")]);

    let published = unit
        .fire("blackbox-peer-relation-changed", Some("blackbox/1"))
        .expect("hook should succeed");
    assert_eq!(published, Some(1));

    assert_eq!(published_networks(&unit), vec!["10.0.0.0/24".to_string()]);
    assert_eq!(
        published_targets(&unit),
        vec![ProbeTarget {
            network: "10.0.0.0/24".into(),
            interface: "eth0".into(),
            ip_address: Ipv4Addr::new(10, 0, 0, 9),
            principal_unit: "app/0".into(),
        }]
    );

    let bag = unit.local_bag(CONSUMER_RID);
    assert_eq!(bag["ip_address"], "10.0.0.5");
    assert_eq!(bag["port"], "9115");
    assert_eq!(bag["job_name"], "app/1");
    assert_eq!(bag["module"], "icmp");
}

#[test]
fn test_unreachable_peer_is_left_out() {
    let unit = local_unit();
    unit.add_peer(PEER_RID, "blackbox/1", "app/0", &[eth0([10, 0, 0, 9], "10.0.0.0/24")]);
    unit.add_peer(PEER_RID, "blackbox/2", "app/2", &[eth0([192, 168, 1, 4], "192.168.1.0/24")]);

    unit.fire("blackbox-peer-relation-changed", Some("blackbox/2"))
        .expect("hook should succeed");

    let targets = published_targets(&unit);
    assert_eq!(targets.len(), 1);
    assert!(targets.iter().all(|t| t.principal_unit != "app/2"));
    assert!(!published_networks(&unit).contains(&"192.168.1.0/24".to_string()));
}

#[test]
fn test_identity_reaches_peers_before_consumers() {
    let unit = local_unit();
    unit.add_peer(PEER_RID, "blackbox/1", "app/0", &[eth0([10, 0, 0, 9], "10.0.0.0/24")]);

    unit.fire("blackbox-peer-relation-joined", Some("blackbox/1"))
        .expect("hook should succeed");

    let writes = unit.writes.borrow();
    let first_peer = writes.iter().position(|rid| rid == PEER_RID);
    let first_consumer = writes.iter().position(|rid| rid == CONSUMER_RID);
    assert!(first_peer.is_some() && first_consumer.is_some());
    assert!(first_peer < first_consumer, "writes were {writes:?}");

    assert_eq!(unit.local_bag(PEER_RID)[KEY_PRINCIPAL_UNIT], "app/1");
}

#[test]
fn test_silent_remote_peer_holds_back_publication() {
    let unit = local_unit();
    let mut bag = RelationSettings::new();
    bag.insert(KEY_PRINCIPAL_UNIT.into(), "app/0".into());
    unit.set_remote_bag(PEER_RID, "blackbox/1", bag);

    let published = unit
        .fire("blackbox-peer-relation-changed", Some("blackbox/1"))
        .expect("hook should succeed");

    assert_eq!(published, None);
    assert!(unit.local_bag(CONSUMER_RID).is_empty());
}

#[test]
fn test_departed_peer_is_withdrawn() {
    let unit = local_unit();
    unit.add_peer(PEER_RID, "blackbox/1", "app/0", &[eth0([10, 0, 0, 9], "10.0.0.0/24")]);
    unit.add_peer(PEER_RID, "blackbox/2", "app/2", &[eth0([10, 0, 0, 10], "10.0.0.0/24")]);

    unit.fire("blackbox-peer-relation-changed", Some("blackbox/2"))
        .expect("hook should succeed");
    assert_eq!(published_targets(&unit).len(), 2);

    unit.remove_unit(PEER_RID, "blackbox/2");
    unit.fire("blackbox-peer-relation-departed", Some("blackbox/2"))
        .expect("hook should succeed");

    let targets = published_targets(&unit);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].principal_unit, "app/0");
}

#[test]
fn test_first_hook_installs_and_starts_the_exporter() {
    let unit = local_unit();

    unit.fire("install", None).expect("install should succeed");

    let actions = unit.actions.borrow().clone();
    let position = |needle: &str| actions.iter().position(|a| a.starts_with(needle));
    assert!(position("install ").is_some(), "actions were {actions:?}");
    assert!(position("install ") < position("setcap "));
    assert!(position("setcap ") < position("render "));
    assert!(position("render ") < position("start "));
    assert!(actions.iter().any(|a| a == "open-port 9115"));
    assert_eq!(unit.record.borrow().state, LifecycleState::Running);
}

#[test]
fn test_config_change_restarts_and_republishes() {
    let unit = local_unit();
    unit.add_peer(PEER_RID, "blackbox/1", "app/0", &[eth0([10, 0, 0, 9], "10.0.0.0/24")]);
    unit.fire("install", None).expect("install should succeed");
    unit.actions.borrow_mut().clear();

    unit.config.borrow_mut().probe_module = "http_2xx".into();
    let published = unit
        .fire("config-changed", None)
        .expect("config-changed should succeed");

    assert_eq!(published, Some(1));
    assert!(unit
        .actions
        .borrow()
        .iter()
        .any(|a| a == "restart prometheus-blackbox-exporter"));
    assert_eq!(unit.local_bag(CONSUMER_RID)["module"], "http_2xx");
}

#[test]
fn test_unchanged_config_leaves_the_service_alone() {
    let unit = local_unit();
    unit.fire("install", None).expect("install should succeed");
    unit.actions.borrow_mut().clear();

    unit.fire("update-status", None).expect("update-status should succeed");

    assert!(unit.actions.borrow().is_empty(), "actions were {:?}", unit.actions.borrow());
}

#[test]
fn test_tcp_probes_follow_the_option() {
    let unit = local_unit();
    let mut bag = RelationSettings::new();
    bag.insert(KEY_PRINCIPAL_UNIT.into(), "app/0".into());
    bag.insert(
        "unit-networks".into(),
        encode_networks(&[eth0([10, 0, 0, 9], "10.0.0.0/24")]),
    );
    bag.insert("unit-ports".into(), r#"["22","8080"]"#.into());
    unit.set_remote_bag(PEER_RID, "blackbox/1", bag);

    unit.fire("blackbox-exporter-relation-changed", None)
        .expect("hook should succeed");
    assert_eq!(unit.local_bag(CONSUMER_RID)["tcp_probes"], "[]");

    unit.config.borrow_mut().tcp_probes = true;
    unit.fire("blackbox-exporter-relation-changed", None)
        .expect("hook should succeed");

    let probes: Vec<TcpProbe> = serde_json::from_str(&unit.local_bag(CONSUMER_RID)["tcp_probes"])
        .expect("tcp_probes should be JSON");
    let ports: Vec<u16> = probes.iter().map(|p| p.port).collect();
    assert_eq!(ports, vec![22, 8080]);
    assert!(probes.iter().all(|p| p.ip_address == Ipv4Addr::new(10, 0, 0, 9)));
}
