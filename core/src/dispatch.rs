// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Hook Dispatch
//!
//! Maps the hook Juju invoked to the handlers that react to it.
//!
//! The table is plain data: an [`EventKind`] resolves to an ordered list of
//! named handler functions, and [`DispatchTable::run`] calls them in order,
//! stopping at the first error. Lifecycle reconciliation is registered first
//! for every kind, so a hook never publishes for an exporter that is not
//! installed and configured.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use blackbox_common::system::{
    ConfigRenderer, HostInventory, PackageInstaller, RelationAccessor, ServiceController,
    UnitEnvironment,
};
use blackbox_common::{debug, info};

use crate::exchange::{CONSUMER_RELATION, PEER_RELATION, RelationExchange, Trigger};
use crate::lifecycle::{Lifecycle, LifecycleState, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    ConfigChanged,
    UpgradeCharm,
    Start,
    UpdateStatus,
    PeerJoined,
    PeerChanged,
    PeerDeparted,
    ConsumerJoined,
    ConsumerChanged,
    Other,
}

impl EventKind {
    pub fn from_hook_name(name: &str) -> Self {
        match name {
            "install" => Self::Install,
            "config-changed" => Self::ConfigChanged,
            "upgrade-charm" => Self::UpgradeCharm,
            "start" => Self::Start,
            "update-status" => Self::UpdateStatus,
            _ => Self::from_relation_hook(name).unwrap_or(Self::Other),
        }
    }

    fn from_relation_hook(name: &str) -> Option<Self> {
        let (endpoint, action) = name.split_once("-relation-")?;
        let kind = match (endpoint, action) {
            (PEER_RELATION, "joined") => Self::PeerJoined,
            (PEER_RELATION, "changed") => Self::PeerChanged,
            (PEER_RELATION, "departed") => Self::PeerDeparted,
            (CONSUMER_RELATION, "joined") => Self::ConsumerJoined,
            (CONSUMER_RELATION, "changed") => Self::ConsumerChanged,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Every collaborator a hook may touch.
pub struct Environment<'a> {
    pub relations: &'a dyn RelationAccessor,
    pub unit: &'a dyn UnitEnvironment,
    pub host: &'a dyn HostInventory,
    pub installer: &'a dyn PackageInstaller,
    pub services: &'a dyn ServiceController,
    pub renderer: &'a dyn ConfigRenderer,
    pub state: &'a dyn StateStore,
    pub conf_path: PathBuf,
}

/// Per-invocation state threaded through the handlers.
pub struct HookContext<'a> {
    pub env: &'a Environment<'a>,
    pub exchange: RelationExchange<'a>,
    pub lifecycle: Option<LifecycleState>,
    /// Consumer relations written during this hook, if a publication happened.
    pub published: Option<usize>,
}

impl<'a> HookContext<'a> {
    pub fn new(env: &'a Environment<'a>) -> Self {
        Self {
            env,
            exchange: RelationExchange::new(env.relations, env.unit, env.host),
            lifecycle: None,
            published: None,
        }
    }
}

pub type Handler = fn(&mut HookContext<'_>) -> anyhow::Result<()>;

pub struct DispatchTable {
    handlers: HashMap<EventKind, Vec<(&'static str, Handler)>>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: EventKind, name: &'static str, handler: Handler) -> &mut Self {
        self.handlers.entry(kind).or_default().push((name, handler));
        self
    }

    pub fn handlers(&self, kind: EventKind) -> Vec<&'static str> {
        self.handlers
            .get(&kind)
            .map(|list| list.iter().map(|(name, _)| *name).collect())
            .unwrap_or_default()
    }

    pub fn run(&self, hook_name: &str, ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
        let kind = EventKind::from_hook_name(hook_name);
        info!("Running hook {hook_name} ({kind})");

        for (name, handler) in self.handlers.get(&kind).into_iter().flatten() {
            debug!(verbosity = 1, "Dispatching {name}");
            handler(&mut *ctx)?;
        }
        Ok(())
    }
}

impl Default for DispatchTable {
    /// The charm's wiring.
    fn default() -> Self {
        use EventKind::*;

        let mut table = Self::empty();
        for kind in [
            Install,
            ConfigChanged,
            UpgradeCharm,
            Start,
            UpdateStatus,
            PeerJoined,
            PeerChanged,
            PeerDeparted,
            ConsumerJoined,
            ConsumerChanged,
            Other,
        ] {
            table.register(kind, "reconcile-lifecycle", reconcile_lifecycle);
        }

        table
            .register(PeerJoined, "publish-identity", publish_identity)
            .register(PeerJoined, "reconcile-peers", reconcile_peers)
            .register(PeerChanged, "reconcile-peers", reconcile_peers)
            .register(PeerDeparted, "publish-identity", publish_identity)
            .register(PeerDeparted, "reconcile-peers", reconcile_departed)
            .register(ConsumerJoined, "reconcile-consumers", reconcile_consumers)
            .register(ConsumerChanged, "reconcile-consumers", reconcile_consumers)
            .register(ConfigChanged, "reconcile-consumers", reconcile_consumers)
            .register(UpgradeCharm, "publish-identity", publish_identity)
            .register(UpgradeCharm, "reconcile-consumers", reconcile_consumers);
        table
    }
}

fn reconcile_lifecycle(ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
    let env = ctx.env;
    let lifecycle = Lifecycle {
        unit: env.unit,
        installer: env.installer,
        services: env.services,
        renderer: env.renderer,
        state: env.state,
        conf_path: env.conf_path.clone(),
    };
    ctx.lifecycle = Some(lifecycle.reconcile()?);
    Ok(())
}

fn publish_identity(ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
    info!("Running blackbox peer relations.");
    ctx.env
        .unit
        .status_set("maintenance", "Configuring blackbox peer relations.")?;
    ctx.exchange.publish_local_identity()?;
    ctx.env.unit.status_set("active", "Ready")
}

fn reconcile_peers(ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
    let trigger = Trigger::PeerChanged {
        remote: ctx.env.unit.remote_unit(),
    };
    ctx.published = ctx.exchange.reconcile(&trigger)?;
    Ok(())
}

fn reconcile_departed(ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
    let trigger = Trigger::PeerDeparted {
        remote: ctx.env.unit.remote_unit(),
    };
    ctx.published = ctx.exchange.reconcile(&trigger)?;
    Ok(())
}

fn reconcile_consumers(ctx: &mut HookContext<'_>) -> anyhow::Result<()> {
    ctx.published = ctx.exchange.reconcile(&Trigger::Refresh)?;
    Ok(())
}
