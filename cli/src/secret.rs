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

//! Secret commands. List and create are first-generation handlers driving
//! the raw [`CoreClient`]; delete needs the interactive confirmation gate
//! and therefore runs as a modern handler.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Arg, value_parser};
use metalcloud_rpc::models::Secret;
use metalcloud_rpc::{CoreClient, Endpoint};
use prettytable::{Table, row};
use serde_json::json;

use crate::command::runtime::RuntimeContext;
use crate::command::{Command, CommandDescriptor, Handler, HandlerFuture, args, io};
use crate::errors::{CliResult, MetalCliError};
use crate::output::{self, ToTable, cli_output};

pub fn commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            subject: "secret",
            alt_subject: Some("sec"),
            predicate: Some("list"),
            alt_predicate: Some("ls"),
            description: "List stored secrets.",
            example: "metalcloud-cli secret list --format json",
            arg_spec: list_args,
            handler: Handler::Legacy(list_handler),
            required_permissions: &[],
            endpoint: Endpoint::Extended,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "secret",
            alt_subject: Some("sec"),
            predicate: Some("create"),
            alt_predicate: None,
            description: "Store a secret read from a file.",
            example: "metalcloud-cli secret create --name db-password --file pw.txt",
            arg_spec: create_args,
            handler: Handler::Legacy(create_handler),
            required_permissions: &[],
            endpoint: Endpoint::Extended,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "secret",
            alt_subject: Some("sec"),
            predicate: Some("delete"),
            alt_predicate: Some("rm"),
            description: "Delete a stored secret.",
            example: "metalcloud-cli secret delete --secret-id 7",
            arg_spec: delete_args,
            handler: Handler::Modern(delete_handler),
            required_permissions: &[],
            endpoint: Endpoint::Extended,
            admin_endpoint: None,
        },
    ]
}

fn list_args(command: clap::Command) -> clap::Command {
    output::with_format_flag(command)
}

fn create_args(command: clap::Command) -> clap::Command {
    command
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .value_parser(value_parser!(String))
                .required(true)
                .help("Name the secret is referenced by"),
        )
        .arg(
            Arg::new("usage")
                .long("usage")
                .value_name("USAGE")
                .value_parser(value_parser!(String))
                .help("Free-text usage hint"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_name("PATH")
                .value_parser(value_parser!(String))
                .required(true)
                .help("File holding the secret value"),
        )
}

fn delete_args(command: clap::Command) -> clap::Command {
    io::with_confirmation_flags(command.arg(
        Arg::new("secret-id")
            .long("secret-id")
            .value_name("ID")
            .value_parser(value_parser!(i64))
            .required(true)
            .help("Id of the secret to delete"),
    ))
}

fn list_handler<'a>(command: &'a Command<'a>, client: &'a CoreClient) -> HandlerFuture<'a> {
    Box::pin(handle_list(command, client))
}

fn create_handler<'a>(command: &'a Command<'a>, client: &'a CoreClient) -> HandlerFuture<'a> {
    Box::pin(handle_create(command, client))
}

fn delete_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_delete(ctx, command))
}

async fn handle_list(command: &Command<'_>, client: &CoreClient) -> CliResult<String> {
    let format = output::format_of(command)?;
    let result = client.call("secrets", json!([])).await?;
    let secrets: Vec<Secret> = serde_json::from_value(result)?;
    cli_output(&secrets, format)
}

async fn handle_create(command: &Command<'_>, client: &CoreClient) -> CliResult<String> {
    let name = args::require_string(command, "name")?;
    let usage = args::get_string(command, "usage");
    let path = args::require_string(command, "file")?;
    let value = tokio::fs::read_to_string(&path).await?;

    let secret = Secret {
        secret_name: name,
        secret_usage: usage,
        secret_base64: Some(BASE64.encode(value.trim_end())),
        ..Secret::default()
    };
    let result = client.call("secret_create", json!([secret])).await?;
    let created: Secret = serde_json::from_value(result)?;
    Ok(format!(
        "Created secret #{} ('{}').\n",
        created.secret_id.unwrap_or_default(),
        created.secret_name
    ))
}

async fn handle_delete(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let id = args::require_id(command, "secret-id")?;

    let RuntimeContext { input, output, .. } = ctx;
    let message = format!("Deleting secret #{id}. Are you sure? Type 'yes' to continue: ");
    if !io::confirm(command, input, output, &message).await? {
        return Err(MetalCliError::NotConfirmed);
    }

    let client = ctx.core_client();
    let _ = client.call("secret_delete", json!([id])).await?;
    Ok(format!("Deleted secret #{id}.\n"))
}

impl ToTable for Vec<Secret> {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row!["ID", "NAME", "USAGE", "CREATED", "UPDATED"]);
        for secret in self {
            let _ = table.add_row(row![
                secret.secret_id.map(|id| id.to_string()).unwrap_or_default(),
                secret.secret_name,
                secret.secret_usage,
                secret.secret_created_timestamp.clone().unwrap_or_default(),
                secret.secret_updated_timestamp.clone().unwrap_or_default()
            ]);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metalcloud_rpc::testing::{RecordingTransport, StaticTransport};

    use super::*;
    use crate::build_registry;
    use crate::command::dispatch;
    use crate::command::runtime::test_support::{context_with, output_string};
    use crate::config::CliConfig;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    async fn run_with(
        args: &[&str],
        transport: Arc<RecordingTransport>,
        stdin: &[u8],
    ) -> (CliResult<()>, String) {
        let registry = build_registry().unwrap();
        let (mut ctx, buffer) = context_with(CliConfig::default(), transport, stdin);
        let result = dispatch::execute(&argv(args), &registry, &mut ctx).await;
        (result, output_string(&buffer))
    }

    #[tokio::test]
    async fn list_targets_the_extended_tier() {
        let transport = Arc::new(RecordingTransport::new(StaticTransport::new().with_response(
            "secrets",
            json!([
                {"secret_id": 7, "secret_name": "db-password", "secret_usage": "database"},
                {"secret_id": 9, "secret_name": "api-token"},
            ]),
        )));

        let (result, output) =
            run_with(&["secret", "list", "--format", "json"], transport.clone(), b"").await;
        result.expect("list succeeds");

        assert_eq!(transport.requests()[0].endpoint, Endpoint::Extended);
        let parsed: Vec<Secret> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].secret_name, "db-password");
    }

    #[tokio::test]
    async fn create_encodes_the_file_content() {
        let path = std::env::temp_dir().join(format!(
            "metalcloud-secret-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "hunter2\n").unwrap();

        let transport = Arc::new(RecordingTransport::new(
            StaticTransport::new().with_response(
                "secret_create",
                json!({"secret_id": 11, "secret_name": "db-password"}),
            ),
        ));

        let (result, output) = run_with(
            &[
                "secret",
                "create",
                "--name",
                "db-password",
                "--usage",
                "database",
                "--file",
                path.to_str().unwrap(),
            ],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("create succeeds");
        assert!(output.contains("#11"));

        let sent = &transport.params_for("secret_create")[0][0];
        assert_eq!(sent["secret_name"], "db-password");
        assert_eq!(sent["secret_usage"], "database");
        assert_eq!(sent["secret_base64"], BASE64.encode("hunter2"));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn delete_is_confirmation_gated() {
        let transport = Arc::new(RecordingTransport::new(
            StaticTransport::new().with_response("secret_delete", json!(true)),
        ));

        let (result, _) = run_with(&["secret", "delete", "--secret-id", "7"], transport.clone(), b"nope\n")
            .await;
        assert!(matches!(result, Err(MetalCliError::NotConfirmed)));
        assert!(transport.params_for("secret_delete").is_empty());

        let (result, _) = run_with(
            &["secret", "delete", "--secret-id", "7", "--autoconfirm"],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("autoconfirmed delete succeeds");
        assert_eq!(transport.params_for("secret_delete").len(), 1);
    }
}
