// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Topology Models
//!
//! Typed forms of everything the charm reads from or writes to a relation.
//!
//! ## Core Entities
//! * [`network::UnitNetwork`]: One IPv4 address of a unit and the network it sits on.
//! * [`unit::UnitIdentity`]: Who a probe unit is and which principal it watches.
//! * [`snapshot::PeerSnapshot`]: The last complete report received from one peer.
//!
//! ## Derived Values
//! * [`target::ProbeTarget`]: A single address worth probing.
//! * [`publication::RelationPublication`]: The payload handed to consumers.
//!
//! Relation data is a flat string-to-string bag. Nested values travel as JSON
//! and are only ever produced or consumed through the codecs in these modules.

use std::collections::BTreeMap;

pub mod network;
pub mod publication;
pub mod snapshot;
pub mod target;
pub mod unit;

/// The raw key/value bag a unit exposes on one relation.
pub type RelationSettings = BTreeMap<String, String>;
