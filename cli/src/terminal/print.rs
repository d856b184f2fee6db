// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use colored::*;

/// Prints a line of command output through the logging pipeline, unprefixed.
#[macro_export]
macro_rules! bprint {
    () => {
        $crate::bprint!("");
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: "blackbox::print",
            raw_msg = %format_args!($($arg)*)
        );
    };
}

pub fn header(title: &str) {
    let line = "─".repeat(title.len() + 4);
    crate::bprint!("{}", line.bright_black());
    crate::bprint!("  {}", title.to_uppercase().bold());
    crate::bprint!("{}", line.bright_black());
}

/// Prints a `key: value` row with the key padded to `width`.
pub fn key_value(key: &str, value: impl std::fmt::Display, width: usize) {
    let padded = format!("{key:<width$}");
    crate::bprint!("  {}{} {}", padded.cyan(), ":".bright_black(), value);
}
