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

//! Datacenter commands.

use clap::{Arg, ArgAction, value_parser};
use metalcloud_rpc::Endpoint;
use metalcloud_rpc::models::Datacenter;
use prettytable::{Table, row};

use crate::command::runtime::RuntimeContext;
use crate::command::{Command, CommandDescriptor, Handler, HandlerFuture, args, io};
use crate::config::PERMISSION_ADMIN;
use crate::errors::CliResult;
use crate::output::{self, ToTable, cli_output};

pub fn commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            subject: "datacenter",
            alt_subject: Some("dc"),
            predicate: Some("list"),
            alt_predicate: Some("ls"),
            description: "List datacenters.",
            example: "metalcloud-cli datacenter list --format json",
            arg_spec: list_args,
            handler: Handler::Modern(list_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: Some(Endpoint::Admin),
        },
        CommandDescriptor {
            subject: "datacenter",
            alt_subject: Some("dc"),
            predicate: Some("show"),
            alt_predicate: None,
            description: "Show one datacenter in detail.",
            example: "metalcloud-cli datacenter show --datacenter-name us-east-1",
            arg_spec: show_args,
            handler: Handler::Modern(show_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "datacenter",
            alt_subject: Some("dc"),
            predicate: Some("create"),
            alt_predicate: None,
            description: "Create a datacenter from a config document.",
            example: "metalcloud-cli datacenter create --file dc.yaml",
            arg_spec: create_args,
            handler: Handler::Modern(create_handler),
            required_permissions: &[PERMISSION_ADMIN],
            endpoint: Endpoint::Admin,
            admin_endpoint: None,
        },
    ]
}

fn list_args(command: clap::Command) -> clap::Command {
    output::with_format_flag(command)
        .arg(
            Arg::new("show-inactive")
                .long("show-inactive")
                .action(ArgAction::SetTrue)
                .help("Include inactive datacenters"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .value_name("INTERVAL")
                .value_parser(value_parser!(String))
                .help("Refresh the listing on this interval, e.g. 10s"),
        )
}

fn show_args(command: clap::Command) -> clap::Command {
    output::with_format_flag(command).arg(
        Arg::new("datacenter-name")
            .long("datacenter-name")
            .value_name("NAME")
            .value_parser(value_parser!(String))
            .required(true)
            .help("Name of the datacenter to show"),
    )
}

fn create_args(command: clap::Command) -> clap::Command {
    args::with_config_input_flags(command)
}

fn list_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_list(ctx, command))
}

fn show_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_show(ctx, command))
}

fn create_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_create(ctx, command))
}

async fn handle_list(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let format = output::format_of(command)?;
    let only_active = !args::get_bool(command, "show-inactive");

    if let Some(interval) = args::get_string_ok(command, "watch") {
        let RuntimeContext {
            api_client,
            output: out,
            no_color,
            ..
        } = ctx;
        let client = &*api_client;
        io::watch(out, &interval, *no_color, || async move {
            let datacenters = client.datacenters(only_active).await?;
            cli_output(&datacenters, format)
        })
        .await?;
        return Ok(String::new());
    }

    let datacenters = ctx.api_client.datacenters(only_active).await?;
    cli_output(&datacenters, format)
}

async fn handle_show(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let format = output::format_of(command)?;
    let name = args::require_string(command, "datacenter-name")?;
    let datacenter = ctx.api_client.datacenter_get(&name).await?;
    cli_output(&datacenter, format)
}

async fn handle_create(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let RuntimeContext {
        api_client, input, ..
    } = ctx;
    let definition: Datacenter = args::read_config_input(command, input).await?;
    let created = api_client.datacenter_create(&definition).await?;
    Ok(format!(
        "Created datacenter '{}'.\n",
        created.datacenter_name
    ))
}

impl ToTable for Vec<Datacenter> {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row![
            "NAME",
            "DISPLAY NAME",
            "TYPE",
            "MASTER",
            "MAINTENANCE",
            "HIDDEN",
            "CREATED"
        ]);
        for datacenter in self {
            let _ = table.add_row(row![
                datacenter.datacenter_name,
                datacenter.datacenter_display_name,
                datacenter.datacenter_type,
                datacenter.datacenter_is_master,
                datacenter.datacenter_is_maintenance,
                datacenter.datacenter_hidden,
                datacenter.datacenter_created_timestamp
            ]);
        }
        table
    }
}

impl ToTable for Datacenter {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row!["PROPERTY", "VALUE"]);
        let _ = table.add_row(row!["Name", self.datacenter_name]);
        let _ = table.add_row(row!["Display name", self.datacenter_display_name]);
        let _ = table.add_row(row!["Type", self.datacenter_type]);
        let _ = table.add_row(row![
            "Owner",
            self.user_id.map(|id| id.to_string()).unwrap_or_default()
        ]);
        let _ = table.add_row(row!["Master", self.datacenter_is_master]);
        let _ = table.add_row(row!["In maintenance", self.datacenter_is_maintenance]);
        let _ = table.add_row(row!["Hidden", self.datacenter_hidden]);
        let _ = table.add_row(row!["Tags", self.datacenter_tags.join(", ")]);
        let _ = table.add_row(row!["Created", self.datacenter_created_timestamp]);
        let _ = table.add_row(row!["Updated", self.datacenter_updated_timestamp]);
        table
    }
}
