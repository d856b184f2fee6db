// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Failures the charm distinguishes between.
///
/// Handlers usually bubble these up as `anyhow::Error`; callers that need to
/// react to a specific case (e.g. skip one malformed peer) match on the
/// variant first.
#[derive(Debug, Error)]
pub enum CharmError {
    /// An external tool (hook tool, package manager, service manager) exited
    /// unsuccessfully.
    #[error("{tool} exited with {status}: {stderr}")]
    HookTool {
        tool: String,
        status: String,
        stderr: String,
    },

    /// A relation field published by another unit could not be decoded.
    #[error("malformed '{field}' from {unit}: {source}")]
    MalformedField {
        field: &'static str,
        unit: String,
        #[source]
        source: serde_json::Error,
    },

    /// A state machine was driven out of order.
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error("state file: {0}")]
    State(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
