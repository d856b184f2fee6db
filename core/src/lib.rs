// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Peer topology reconciliation for the blackbox exporter charm.
//!
//! * [`store`] and [`aggregator`] hold and condense what peers report.
//! * [`exchange`] reads and writes relation data around them.
//! * [`lifecycle`] keeps the exporter installed, configured and running.
//! * [`dispatch`] wires hooks to all of the above.
//! * [`hookenv`], [`services`] and [`system`] talk to Juju and the host.

pub mod aggregator;
pub mod dispatch;
pub mod exchange;
pub mod hookenv;
pub mod info;
pub mod lifecycle;
pub mod services;
pub mod store;
pub mod system;

#[cfg(test)]
mod testing;
