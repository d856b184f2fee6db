// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Who a probe unit is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitIdentity {
    /// The monitored unit this probe is colocated with (e.g. `app/0`).
    pub principal_unit: String,
    pub hostname: String,
    /// Availability zone, when the machine knows it.
    pub az: Option<String>,
    pub private_address: String,
}

/// Addresses one remote unit on one peer relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId {
    pub relation_id: String,
    pub unit: String,
}

impl PeerId {
    pub fn new(relation_id: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            relation_id: relation_id.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.unit, self.relation_id)
    }
}
