// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Juju Hook Tools
//!
//! [`RelationAccessor`] and [`UnitEnvironment`] backed by the hook tools Juju
//! puts on `PATH` while a hook runs (`relation-get`, `config-get`, ...).
//!
//! Every call is one synchronous subprocess; a tool that exits non-zero
//! becomes [`CharmError::HookTool`].

use std::collections::BTreeMap;
use std::env;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use blackbox_common::config::CharmConfig;
use blackbox_common::debug;
use blackbox_common::error::CharmError;
use blackbox_common::models::RelationSettings;
use blackbox_common::system::{RelationAccessor, UnitEnvironment};

/// Runs `tool` and returns its stdout.
pub fn run_tool(tool: &str, args: &[&str]) -> anyhow::Result<String> {
    debug!(verbosity = 2, "Running {tool} {}", args.join(" "));
    let output = Command::new(tool).args(args).output()?;
    tool_stdout(tool, output)
}

/// Runs `tool` with `input` on stdin and returns its stdout.
pub fn run_tool_with_input(tool: &str, args: &[&str], input: &str) -> anyhow::Result<String> {
    debug!(verbosity = 2, "Running {tool} {} ({} bytes on stdin)", args.join(" "), input.len());

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    tool_stdout(tool, output)
}

fn tool_stdout(tool: &str, output: Output) -> anyhow::Result<String> {
    if !output.status.success() {
        return Err(CharmError::HookTool {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses `--format=json` output, treating `null` and empty output as absent.
fn parse_json<T: serde::de::DeserializeOwned + Default>(raw: &str) -> anyhow::Result<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    let parsed: Option<T> = serde_json::from_str(raw)?;
    Ok(parsed.unwrap_or_default())
}

/// `relation-get` hands back whatever type each value had; the charm only
/// deals in strings.
fn stringify_settings(raw: BTreeMap<String, serde_json::Value>) -> RelationSettings {
    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}

/// Container-scoped endpoint a subordinate shares with its principal.
pub const PRINCIPAL_RELATION: &str = "juju-info";

/// The first unit on the other side of [`PRINCIPAL_RELATION`], if attached.
pub fn principal_from_relations(relations: &dyn RelationAccessor) -> anyhow::Result<Option<String>> {
    for relation_id in relations.relation_ids(PRINCIPAL_RELATION)? {
        if let Some(unit) = relations.related_units(&relation_id)?.into_iter().next() {
            return Ok(Some(unit));
        }
    }
    Ok(None)
}

/// The YAML mapping `relation-set --file` expects.
fn settings_document(settings: &RelationSettings) -> anyhow::Result<String> {
    serde_yaml::to_string(settings).map_err(|e| CharmError::State(e.to_string()).into())
}

#[derive(Debug, Default)]
pub struct JujuHookTools;

impl RelationAccessor for JujuHookTools {
    fn relation_ids(&self, endpoint: &str) -> anyhow::Result<Vec<String>> {
        parse_json(&run_tool("relation-ids", &["--format=json", endpoint])?)
    }

    fn related_units(&self, relation_id: &str) -> anyhow::Result<Vec<String>> {
        parse_json(&run_tool("relation-list", &["--format=json", "-r", relation_id])?)
    }

    fn relation_get(&self, relation_id: &str, unit: &str) -> anyhow::Result<RelationSettings> {
        let raw = run_tool("relation-get", &["--format=json", "-r", relation_id, "-", unit])?;
        Ok(stringify_settings(parse_json(&raw)?))
    }

    /// Sends the bag as YAML on stdin; `targets` grows with the peer count
    /// and would overflow a single command-line argument.
    fn relation_set(&self, relation_id: &str, settings: &RelationSettings) -> anyhow::Result<()> {
        let document = settings_document(settings)?;
        run_tool_with_input("relation-set", &["-r", relation_id, "--file", "-"], &document)?;
        Ok(())
    }
}

impl UnitEnvironment for JujuHookTools {
    fn local_unit(&self) -> anyhow::Result<String> {
        env::var("JUJU_UNIT_NAME").map_err(|_| anyhow::anyhow!("JUJU_UNIT_NAME is not set"))
    }

    /// `JUJU_PRINCIPAL_UNIT` when Juju sets it, else the remote end of the
    /// container-scoped [`PRINCIPAL_RELATION`], else the local unit.
    fn principal_unit(&self) -> anyhow::Result<String> {
        match env::var("JUJU_PRINCIPAL_UNIT") {
            Ok(unit) if !unit.is_empty() => Ok(unit),
            _ => match principal_from_relations(self)? {
                Some(unit) => Ok(unit),
                None => self.local_unit(),
            },
        }
    }

    fn remote_unit(&self) -> Option<String> {
        env::var("JUJU_REMOTE_UNIT").ok().filter(|unit| !unit.is_empty())
    }

    fn private_address(&self) -> anyhow::Result<String> {
        Ok(run_tool("unit-get", &["private-address"])?.trim().to_string())
    }

    fn config(&self) -> anyhow::Result<CharmConfig> {
        let raw = run_tool("config-get", &["--format=json"])?;
        CharmConfig::from_json(parse_json::<serde_json::Value>(&raw)?)
    }

    fn open_port(&self, port: u16) -> anyhow::Result<()> {
        run_tool("open-port", &[&format!("{port}/tcp")])?;
        Ok(())
    }

    fn status_set(&self, status: &str, message: &str) -> anyhow::Result<()> {
        run_tool("status-set", &[status, message])?;
        Ok(())
    }
}
