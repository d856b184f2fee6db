// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Relation Exchange
//!
//! Moves topology between units.
//!
//! Inbound, it reads every peer's bag into a [`PeerTopologyStore`]. Outbound,
//! it announces the local unit on the peer relation and hands the aggregated
//! targets to every consumer.
//!
//! ## States
//!
//! ```text
//!            ingest                recompute               flush
//!   Idle ───────────▶ PeerDirty ────────────▶ PublishPending ──────▶ Idle
//!                         │
//!                         └──── discard ────▶ Idle
//! ```
//!
//! Consumers are only written from `PublishPending`, and the local identity is
//! always on the peer relation before that write happens.

use std::fmt;

use anyhow::Context;
use blackbox_common::error::CharmError;
use blackbox_common::models::network::UnitNetwork;
use blackbox_common::models::publication::RelationPublication;
use blackbox_common::models::snapshot::PeerReport;
use blackbox_common::models::unit::{PeerId, UnitIdentity};
use blackbox_common::system::{HostInventory, RelationAccessor, UnitEnvironment};
use blackbox_common::{debug, info, success, warn};

use crate::aggregator::{self, PublicationMeta};
use crate::store::PeerTopologyStore;

pub const PEER_RELATION: &str = "blackbox-peer";
pub const CONSUMER_RELATION: &str = "blackbox-exporter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    PeerDirty,
    PublishPending(RelationPublication),
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Idle => write!(f, "idle"),
            ExchangeState::PeerDirty => write!(f, "peer-dirty"),
            ExchangeState::PublishPending(_) => write!(f, "publish-pending"),
        }
    }
}

/// What caused a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A peer joined or changed its bag.
    PeerChanged { remote: Option<String> },
    /// A peer left; its data must stop counting.
    PeerDeparted { remote: Option<String> },
    /// A consumer appeared or changed, or nothing relation-specific happened.
    Refresh,
}

/// Result of one ingestion pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub updated: usize,
    /// Peers that have not published their networks yet.
    pub incomplete: Vec<String>,
    /// Peers whose networks could not be decoded.
    pub malformed: Vec<String>,
}

pub struct RelationExchange<'a> {
    relations: &'a dyn RelationAccessor,
    unit: &'a dyn UnitEnvironment,
    host: &'a dyn HostInventory,
    store: PeerTopologyStore,
    state: ExchangeState,
    identity_published: bool,
    local_networks: Option<Vec<UnitNetwork>>,
}

impl<'a> RelationExchange<'a> {
    pub fn new(
        relations: &'a dyn RelationAccessor,
        unit: &'a dyn UnitEnvironment,
        host: &'a dyn HostInventory,
    ) -> Self {
        Self {
            relations,
            unit,
            host,
            store: PeerTopologyStore::new(),
            state: ExchangeState::Idle,
            identity_published: false,
            local_networks: None,
        }
    }

    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    pub fn store(&self) -> &PeerTopologyStore {
        &self.store
    }

    /// Local networks, enumerated once per hook.
    fn local_networks(&mut self) -> anyhow::Result<&[UnitNetwork]> {
        if self.local_networks.is_none() {
            self.local_networks = Some(self.host.local_networks()?);
        }
        Ok(self.local_networks.as_deref().unwrap_or_default())
    }

    /// What this unit tells its peers about itself.
    pub fn local_report(&mut self) -> anyhow::Result<PeerReport> {
        let identity = UnitIdentity {
            principal_unit: self.unit.principal_unit()?,
            hostname: self.host.hostname(),
            az: self.host.availability_zone(),
            private_address: self.unit.private_address()?,
        };
        let networks = self.local_networks()?.to_vec();

        Ok(PeerReport {
            identity,
            networks: Some(networks),
            ports: self.host.local_open_ports(),
        })
    }

    /// Writes the local report on every peer relation.
    ///
    /// The existing bag is read first and the report merged over it, so keys
    /// set by Juju itself (`ingress-address`, ...) survive.
    pub fn publish_local_identity(&mut self) -> anyhow::Result<usize> {
        let relation_ids = self.relations.relation_ids(PEER_RELATION)?;
        let local_unit = self.unit.local_unit()?;
        let report = self.local_report()?;

        for relation_id in &relation_ids {
            let mut settings = self
                .relations
                .relation_get(relation_id, &local_unit)
                .with_context(|| format!("reading own settings on {relation_id}"))?;
            settings.extend(report.to_settings());
            self.relations.relation_set(relation_id, &settings)?;
            debug!(verbosity = 2, "Published identity of {local_unit} on {relation_id}");
        }

        self.identity_published = true;
        Ok(relation_ids.len())
    }

    /// Reads every peer bag into the store.
    ///
    /// A peer with undecodable networks is logged and skipped; it never stops
    /// the others from being read. `departed` is dropped from the store.
    pub fn ingest(&mut self, departed: Option<&str>) -> anyhow::Result<IngestOutcome> {
        if matches!(self.state, ExchangeState::PublishPending(_)) {
            return Err(self.invalid("ingest"));
        }

        let mut outcome = IngestOutcome::default();

        for relation_id in self.relations.relation_ids(PEER_RELATION)? {
            for unit in self.relations.related_units(&relation_id)? {
                if departed == Some(unit.as_str()) {
                    continue;
                }

                let settings = self.relations.relation_get(&relation_id, &unit)?;
                let report = match PeerReport::from_settings(&unit, &settings) {
                    Ok(report) => report,
                    Err(e) => {
                        warn!("Skipping peer {unit}: {e}");
                        outcome.malformed.push(unit);
                        continue;
                    }
                };

                let peer = PeerId::new(relation_id.as_str(), unit.as_str());
                if self.store.update(peer, report) {
                    debug!(verbosity = 1, "Ingested topology of {unit} on {relation_id}");
                    outcome.updated += 1;
                } else {
                    debug!(verbosity = 1, "Peer {unit} has not published its networks yet");
                    outcome.incomplete.push(unit);
                }
            }
        }

        if let Some(unit) = departed {
            let removed = self.store.remove_unit(unit);
            info!("Peer {unit} departed, dropped {removed} snapshot(s)");
        }

        self.state = ExchangeState::PeerDirty;
        Ok(outcome)
    }

    /// Builds the publication from the current store.
    pub fn recompute(&mut self, meta: &PublicationMeta) -> anyhow::Result<()> {
        if self.state != ExchangeState::PeerDirty {
            return Err(self.invalid("recompute"));
        }

        let local = self.local_networks()?.to_vec();
        let publication = aggregator::build(&local, &self.store, meta);
        self.state = ExchangeState::PublishPending(publication);
        Ok(())
    }

    /// The publication waiting to be flushed, if any.
    pub fn pending(&self) -> Option<&RelationPublication> {
        match &self.state {
            ExchangeState::PublishPending(publication) => Some(publication),
            _ => None,
        }
    }

    /// Writes the pending publication to every consumer relation.
    pub fn flush(&mut self) -> anyhow::Result<usize> {
        let ExchangeState::PublishPending(publication) = &self.state else {
            return Err(self.invalid("flush"));
        };
        let settings = publication.to_settings();
        let target_count = publication.targets.len();

        if !self.identity_published {
            self.publish_local_identity()?;
        }

        let relation_ids = self.relations.relation_ids(CONSUMER_RELATION)?;
        for relation_id in &relation_ids {
            self.relations.relation_set(relation_id, &settings)?;
        }

        if !relation_ids.is_empty() {
            success!(
                "Published {target_count} probe target(s) to {} consumer relation(s)",
                relation_ids.len()
            );
        }

        self.state = ExchangeState::Idle;
        Ok(relation_ids.len())
    }

    /// Abandons a dirty store without telling consumers anything.
    pub fn discard(&mut self) -> anyhow::Result<()> {
        if self.state != ExchangeState::PeerDirty {
            return Err(self.invalid("discard"));
        }
        self.state = ExchangeState::Idle;
        Ok(())
    }

    /// Metadata for the consumer publication, from config and unit facts.
    pub fn publication_meta(&self) -> anyhow::Result<PublicationMeta> {
        let config = self.unit.config()?;
        Ok(PublicationMeta {
            ip_address: self.unit.private_address()?,
            job_name: self.unit.principal_unit()?,
            module: config.probe_module,
            scrape_interval: config.scrape_interval,
            tcp_probes: config.tcp_probes,
        })
    }

    /// Runs one full ingest, recompute and flush cycle.
    ///
    /// Returns the number of consumer relations written, or `None` when the
    /// triggering peer has not published its networks yet and consumers were
    /// left alone.
    pub fn reconcile(&mut self, trigger: &Trigger) -> anyhow::Result<Option<usize>> {
        let departed = match trigger {
            Trigger::PeerDeparted { remote } => remote.as_deref(),
            _ => None,
        };
        let outcome = self.ingest(departed)?;

        if let Trigger::PeerChanged { remote: Some(remote) } = trigger
            && outcome.incomplete.iter().any(|unit| unit == remote)
        {
            info!("Waiting for {remote} to publish its networks");
            self.discard()?;
            return Ok(None);
        }

        let meta = self.publication_meta()?;
        self.recompute(&meta)?;
        Ok(Some(self.flush()?))
    }

    fn invalid(&self, action: &'static str) -> anyhow::Error {
        CharmError::InvalidTransition {
            from: self.state.to_string(),
            action,
        }
        .into()
    }
}
