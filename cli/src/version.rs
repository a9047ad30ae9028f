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

//! The `version` command: CLI and controller versions side by side. One of
//! the subject-only commands (no predicate).

use metalcloud_rpc::Endpoint;
use prettytable::{Table, row};
use serde::Serialize;

use crate::command::runtime::RuntimeContext;
use crate::command::{Command, CommandDescriptor, Handler, HandlerFuture};
use crate::errors::CliResult;
use crate::output::{self, ToTable, cli_output};

pub fn commands() -> Vec<CommandDescriptor> {
    vec![CommandDescriptor {
        subject: "version",
        alt_subject: Some("v"),
        predicate: None,
        alt_predicate: None,
        description: "Show the CLI and controller versions.",
        example: "metalcloud-cli version",
        arg_spec: output::with_format_flag,
        handler: Handler::Modern(version_handler),
        required_permissions: &[],
        endpoint: Endpoint::User,
        admin_endpoint: None,
    }]
}

#[derive(Serialize)]
struct VersionReport {
    cli_version: &'static str,
    controller_version: String,
    controller_application: String,
}

impl ToTable for VersionReport {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row!["COMPONENT", "VERSION"]);
        let _ = table.add_row(row!["metalcloud-cli", self.cli_version]);
        let _ = table.add_row(row![self.controller_application, self.controller_version]);
        table
    }
}

fn version_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_version(ctx, command))
}

async fn handle_version(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let format = output::format_of(command)?;
    let controller = ctx.api_client.controller_version().await?;
    let report = VersionReport {
        cli_version: env!("CARGO_PKG_VERSION"),
        controller_version: controller.version,
        controller_application: if controller.application_name.is_empty() {
            "controller".to_string()
        } else {
            controller.application_name
        },
    };
    cli_output(&report, format)
}
