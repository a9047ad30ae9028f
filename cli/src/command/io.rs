/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 MetalCloud Authors. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Interactive helpers: the confirmation gate for destructive operations
//! and the polling watch loop.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use clap::{Arg, ArgAction};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::async_write;
use crate::command::{Command, args};
use crate::errors::{CliResult, MetalCliError};

/// Registers the `--autoconfirm` flag used by destructive commands.
pub fn with_confirmation_flags(command: clap::Command) -> clap::Command {
    command.arg(
        Arg::new("autoconfirm")
            .long("autoconfirm")
            .action(ArgAction::SetTrue)
            .help("Skip the confirmation prompt"),
    )
}

/// Gates a destructive operation behind an explicit "yes". With
/// `--autoconfirm` the prompt is skipped entirely and the input stream is
/// never read. The match is exact: trimmed input must equal "yes",
/// case-sensitive, no "y" shorthand.
pub async fn confirm(
    command: &Command<'_>,
    input: &mut Pin<Box<dyn AsyncBufRead>>,
    output: &mut Pin<Box<dyn AsyncWrite>>,
    message: &str,
) -> CliResult<bool> {
    if args::get_bool(command, "autoconfirm") {
        return Ok(true);
    }

    async_write!(output, "{message}")?;
    output.flush().await?;

    let mut answer = String::new();
    let _ = input.read_line(&mut answer).await?;
    Ok(answer.trim() == "yes")
}

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Re-runs `poll` on a fixed interval, redrawing the screen with the
/// refreshed content and a timestamp banner. Returns only when a poll
/// fails; stopping otherwise is up to the user killing the process.
pub async fn watch<F, Fut>(
    output: &mut Pin<Box<dyn AsyncWrite>>,
    interval_spec: &str,
    no_color: bool,
    mut poll: F,
) -> CliResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CliResult<String>>,
{
    let interval = humantime::parse_duration(interval_spec).map_err(|err| {
        MetalCliError::Usage(format!("Invalid watch interval '{interval_spec}': {err}"))
    })?;

    loop {
        let started = Instant::now();
        let content = poll().await?;

        let banner = format!(
            "Refreshed at {} (every {})",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            interval_spec
        );
        let banner = if no_color {
            banner
        } else {
            format!("\x1b[1m{banner}\x1b[0m")
        };

        async_write!(output, "{CLEAR_SCREEN}{content}\n{banner}\n")?;
        output.flush().await?;

        tokio::time::sleep(interval.saturating_sub(started.elapsed())).await;
    }
}
