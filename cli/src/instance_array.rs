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

//! Instance array commands. The `--id` flag accepts either a numeric id or
//! a label; labels resolve through a controller search.

use clap::{Arg, value_parser};
use metalcloud_rpc::models::InstanceArray;
use metalcloud_rpc::{Endpoint, MetalApiClient};
use prettytable::{Table, row};

use crate::command::runtime::RuntimeContext;
use crate::command::{Command, CommandDescriptor, Handler, HandlerFuture, args, io};
use crate::errors::{CliResult, MetalCliError};
use crate::output::{self, ToTable, cli_output};

pub fn commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            subject: "instance-array",
            alt_subject: Some("ia"),
            predicate: Some("list"),
            alt_predicate: Some("ls"),
            description: "List the instance arrays of an infrastructure.",
            example: "metalcloud-cli instance-array list --infrastructure-id 25",
            arg_spec: list_args,
            handler: Handler::Modern(list_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "instance-array",
            alt_subject: Some("ia"),
            predicate: Some("show"),
            alt_predicate: None,
            description: "Show one instance array in detail.",
            example: "metalcloud-cli instance-array show --id web-servers",
            arg_spec: show_args,
            handler: Handler::Modern(show_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "instance-array",
            alt_subject: Some("ia"),
            predicate: Some("create"),
            alt_predicate: None,
            description: "Create an instance array from a config document.",
            example: "metalcloud-cli instance-array create --infrastructure-id 25 --file ia.yaml",
            arg_spec: create_args,
            handler: Handler::Modern(create_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "instance-array",
            alt_subject: Some("ia"),
            predicate: Some("edit"),
            alt_predicate: Some("update"),
            description: "Edit an instance array. Flags override the current (or supplied) config.",
            example: "metalcloud-cli instance-array edit --id 310 --instance-count 4",
            arg_spec: edit_args,
            handler: Handler::Modern(edit_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
        CommandDescriptor {
            subject: "instance-array",
            alt_subject: Some("ia"),
            predicate: Some("delete"),
            alt_predicate: Some("rm"),
            description: "Delete an instance array.",
            example: "metalcloud-cli instance-array delete --id 310",
            arg_spec: delete_args,
            handler: Handler::Modern(delete_handler),
            required_permissions: &[],
            endpoint: Endpoint::User,
            admin_endpoint: None,
        },
    ]
}

fn with_id_flag(command: clap::Command) -> clap::Command {
    command.arg(
        Arg::new("id")
            .long("id")
            .value_name("ID_OR_LABEL")
            .value_parser(value_parser!(String))
            .required(true)
            .help("Instance array id or label"),
    )
}

fn list_args(command: clap::Command) -> clap::Command {
    output::with_format_flag(command)
        .arg(
            Arg::new("infrastructure-id")
                .long("infrastructure-id")
                .value_name("ID")
                .value_parser(value_parser!(i64))
                .required(true)
                .help("Infrastructure to list instance arrays for"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_name("N")
                .value_parser(value_parser!(i64))
                .help("Show at most N instance arrays"),
        )
}

fn show_args(command: clap::Command) -> clap::Command {
    with_id_flag(output::with_format_flag(command))
}

fn create_args(command: clap::Command) -> clap::Command {
    args::with_config_input_flags(command).arg(
        Arg::new("infrastructure-id")
            .long("infrastructure-id")
            .value_name("ID")
            .value_parser(value_parser!(i64))
            .required(true)
            .help("Infrastructure to create the instance array in"),
    )
}

fn edit_args(command: clap::Command) -> clap::Command {
    with_id_flag(args::with_config_input_flags(command))
        .arg(
            Arg::new("label")
                .long("label")
                .value_name("LABEL")
                .value_parser(value_parser!(String))
                .help("New label"),
        )
        .arg(
            Arg::new("instance-count")
                .long("instance-count")
                .value_name("COUNT")
                .value_parser(value_parser!(i64))
                .help("New instance count"),
        )
        .arg(
            Arg::new("ram-gbytes")
                .long("ram-gbytes")
                .value_name("GB")
                .value_parser(value_parser!(i64))
                .help("New amount of RAM per instance, in GB"),
        )
        .arg(
            Arg::new("firewall-managed")
                .long("firewall-managed")
                .value_name("BOOL")
                .value_parser(value_parser!(bool))
                .help("Whether the firewall is controller-managed"),
        )
        .arg(
            Arg::new("custom-variables")
                .long("custom-variables")
                .value_name("K=V,...")
                .value_parser(value_parser!(String))
                .help("Replace the custom variables, e.g. env=prod,tier=web"),
        )
}

fn delete_args(command: clap::Command) -> clap::Command {
    io::with_confirmation_flags(with_id_flag(command))
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

fn edit_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_edit(ctx, command))
}

fn delete_handler<'a>(ctx: &'a mut RuntimeContext, command: &'a Command<'a>) -> HandlerFuture<'a> {
    Box::pin(handle_delete(ctx, command))
}

/// Resolves the `--id` input: numeric ids pass through, labels go through
/// a controller lookup.
async fn resolve_id(client: &MetalApiClient, input: &str) -> CliResult<i64> {
    args::id_or_resolve(input, |label| async move {
        let found = client.instance_array_get_by_label(&label).await?;
        found.instance_array_id.ok_or_else(|| {
            MetalCliError::Generic(format!(
                "The controller returned instance array '{label}' without an id"
            ))
        })
    })
    .await
}

async fn handle_list(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let format = output::format_of(command)?;
    let infrastructure_id = args::require_id(command, "infrastructure-id")?;
    let mut instance_arrays = ctx.api_client.instance_arrays(infrastructure_id).await?;

    let limit = args::get_int(command, "limit");
    if limit > 0 {
        instance_arrays.truncate(limit as usize);
    }

    cli_output(&instance_arrays, format)
}

async fn handle_show(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let format = output::format_of(command)?;
    let id = resolve_id(&ctx.api_client, &args::require_string(command, "id")?).await?;
    let instance_array = ctx.api_client.instance_array_get(id).await?;
    cli_output(&instance_array, format)
}

async fn handle_create(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let RuntimeContext {
        api_client, input, ..
    } = ctx;
    let infrastructure_id = args::require_id(command, "infrastructure-id")?;
    let mut definition: InstanceArray = args::read_config_input(command, input).await?;
    definition.infrastructure_id = infrastructure_id;

    let created = api_client
        .instance_array_create(infrastructure_id, &definition)
        .await?;
    Ok(format!(
        "Created instance array #{} ('{}').\n",
        created.instance_array_id.unwrap_or_default(),
        created.instance_array_label
    ))
}

async fn handle_edit(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let RuntimeContext {
        api_client, input, ..
    } = ctx;
    let id = resolve_id(api_client, &args::require_string(command, "id")?).await?;

    // Start from the supplied document when there is one, from the current
    // object otherwise; unspecified fields must keep their values.
    let mut payload: InstanceArray = if args::has_config_input(command) {
        args::read_config_input(command, input).await?
    } else {
        api_client.instance_array_get(id).await?
    };
    args::update_if_set(
        &mut payload.instance_array_label,
        args::get_string_ok(command, "label"),
    );
    args::update_if_set(
        &mut payload.instance_array_instance_count,
        args::get_int_ok(command, "instance-count"),
    );
    args::update_if_set(
        &mut payload.instance_array_ram_gbytes,
        args::get_int_ok(command, "ram-gbytes"),
    );
    args::update_if_set(
        &mut payload.instance_array_firewall_managed,
        args::get_bool_ok(command, "firewall-managed"),
    );
    if let Some(raw) = args::get_string_ok(command, "custom-variables") {
        payload.instance_array_custom_variables = Some(args::key_value_map(&raw)?);
    }

    let updated = api_client.instance_array_edit(id, &payload).await?;
    Ok(format!(
        "Updated instance array #{id} ('{}').\n",
        updated.instance_array_label
    ))
}

async fn handle_delete(ctx: &mut RuntimeContext, command: &Command<'_>) -> CliResult<String> {
    let RuntimeContext {
        api_client,
        input,
        output,
        ..
    } = ctx;
    let id = resolve_id(api_client, &args::require_string(command, "id")?).await?;
    let target = api_client.instance_array_get(id).await?;

    let message = format!(
        "Deleting instance array #{id} ('{}'). Are you sure? Type 'yes' to continue: ",
        target.instance_array_label
    );
    if !io::confirm(command, input, output, &message).await? {
        return Err(MetalCliError::NotConfirmed);
    }

    api_client.instance_array_delete(id).await?;
    Ok(format!("Deleted instance array #{id}.\n"))
}

impl ToTable for Vec<InstanceArray> {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row![
            "ID", "LABEL", "INSTANCES", "RAM (GB)", "PROCESSORS", "CORES", "STATUS"
        ]);
        for instance_array in self {
            let _ = table.add_row(row![
                instance_array
                    .instance_array_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                instance_array.instance_array_label,
                instance_array.instance_array_instance_count,
                instance_array.instance_array_ram_gbytes,
                instance_array.instance_array_processor_count,
                instance_array.instance_array_processor_core_count,
                instance_array
                    .instance_array_service_status
                    .clone()
                    .unwrap_or_default()
            ]);
        }
        table
    }
}

impl ToTable for InstanceArray {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row!["PROPERTY", "VALUE"]);
        let _ = table.add_row(row![
            "ID",
            self.instance_array_id
                .map(|id| id.to_string())
                .unwrap_or_default()
        ]);
        let _ = table.add_row(row!["Label", self.instance_array_label]);
        let _ = table.add_row(row![
            "Subdomain",
            self.instance_array_subdomain.clone().unwrap_or_default()
        ]);
        let _ = table.add_row(row!["Infrastructure", self.infrastructure_id]);
        let _ = table.add_row(row!["Instances", self.instance_array_instance_count]);
        let _ = table.add_row(row!["RAM (GB)", self.instance_array_ram_gbytes]);
        let _ = table.add_row(row!["Processors", self.instance_array_processor_count]);
        let _ = table.add_row(row![
            "Cores per processor",
            self.instance_array_processor_core_count
        ]);
        let _ = table.add_row(row!["Disks", self.instance_array_disk_count]);
        let _ = table.add_row(row!["Boot method", self.instance_array_boot_method]);
        let _ = table.add_row(row![
            "Firewall managed",
            self.instance_array_firewall_managed
        ]);
        let _ = table.add_row(row![
            "Status",
            self.instance_array_service_status
                .clone()
                .unwrap_or_default()
        ]);
        table
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metalcloud_rpc::testing::{RecordingTransport, StaticTransport};
    use serde_json::json;

    use super::*;
    use crate::build_registry;
    use crate::command::dispatch;
    use crate::command::runtime::test_support::{context_with, output_string};
    use crate::config::CliConfig;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> InstanceArray {
        InstanceArray {
            instance_array_id: Some(310),
            instance_array_label: "web-servers".to_string(),
            infrastructure_id: 25,
            instance_array_instance_count: 2,
            instance_array_ram_gbytes: 64,
            instance_array_processor_count: 1,
            instance_array_processor_core_count: 16,
            instance_array_boot_method: "local_drives".to_string(),
            ..InstanceArray::default()
        }
    }

    fn write_fixture(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "metalcloud-ia-{name}-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, serde_yaml::to_string(&fixture()).unwrap()).unwrap();
        path
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

    fn transport_with_fixture() -> Arc<RecordingTransport> {
        let object = serde_json::to_value(fixture()).unwrap();
        Arc::new(RecordingTransport::new(
            StaticTransport::new()
                .with_response("instance_array_get", object.clone())
                .with_response("instance_array_get_by_label", object.clone())
                .with_response("instance_array_create", object.clone())
                .with_response("instance_array_edit", object.clone())
                .with_response("instance_array_delete", json!(true)),
        ))
    }

    #[tokio::test]
    async fn create_then_edit_round_trips_without_data_loss() {
        let path = write_fixture("roundtrip");
        let transport = transport_with_fixture();

        let (result, _) = run_with(
            &[
                "instance-array",
                "create",
                "--infrastructure-id",
                "25",
                "--file",
                path.to_str().unwrap(),
            ],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("create succeeds");

        let (result, _) = run_with(
            &[
                "instance-array",
                "edit",
                "--id",
                "310",
                "--file",
                path.to_str().unwrap(),
            ],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("edit succeeds");

        let create_params = transport.params_for("instance_array_create");
        let edit_params = transport.params_for("instance_array_edit");
        assert_eq!(create_params.len(), 1);
        assert_eq!(edit_params.len(), 1);
        assert_eq!(create_params[0][0], json!(25));
        assert_eq!(edit_params[0][0], json!(310));

        let sent_on_create: InstanceArray =
            serde_json::from_value(create_params[0][1].clone()).unwrap();
        let sent_on_edit: InstanceArray = serde_json::from_value(edit_params[0][1].clone()).unwrap();
        assert_eq!(sent_on_create, fixture());
        assert_eq!(sent_on_edit, fixture());

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn edit_without_a_document_starts_from_the_current_object() {
        let transport = transport_with_fixture();
        let (result, _) = run_with(
            &["instance-array", "edit", "--id", "310", "--instance-count", "5"],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("edit succeeds");

        let sent: InstanceArray =
            serde_json::from_value(transport.params_for("instance_array_edit")[0][1].clone())
                .unwrap();
        assert_eq!(sent.instance_array_instance_count, 5);
        // Everything else keeps the fetched values.
        assert_eq!(sent.instance_array_label, "web-servers");
        assert_eq!(sent.instance_array_ram_gbytes, 64);
    }

    #[tokio::test]
    async fn edit_parses_custom_variables_into_a_map() {
        let transport = transport_with_fixture();
        let (result, _) = run_with(
            &[
                "instance-array",
                "edit",
                "--id",
                "310",
                "--custom-variables",
                "env=prod,tier=web",
                "--firewall-managed",
                "false",
            ],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("edit succeeds");

        let sent: InstanceArray =
            serde_json::from_value(transport.params_for("instance_array_edit")[0][1].clone())
                .unwrap();
        let variables = sent.instance_array_custom_variables.expect("variables set");
        assert_eq!(variables["env"], "prod");
        assert_eq!(variables["tier"], "web");
        assert!(!sent.instance_array_firewall_managed);
    }

    #[tokio::test]
    async fn edit_rejects_malformed_custom_variables() {
        let transport = transport_with_fixture();
        let (result, _) = run_with(
            &[
                "instance-array",
                "edit",
                "--id",
                "310",
                "--custom-variables",
                "env=prod=oops",
            ],
            transport.clone(),
            b"",
        )
        .await;

        assert!(result.is_err());
        assert!(transport.params_for("instance_array_edit").is_empty());
    }

    #[tokio::test]
    async fn list_truncates_to_the_limit() {
        let many = json!([
            serde_json::to_value(fixture()).unwrap(),
            serde_json::to_value(InstanceArray {
                instance_array_id: Some(311),
                instance_array_label: "db-servers".to_string(),
                ..fixture()
            })
            .unwrap(),
        ]);
        let transport = Arc::new(RecordingTransport::new(
            StaticTransport::new().with_response("instance_arrays", many),
        ));

        let (result, output) = run_with(
            &[
                "instance-array",
                "list",
                "--infrastructure-id",
                "25",
                "--limit",
                "1",
                "--format",
                "json",
            ],
            transport,
            b"",
        )
        .await;
        result.expect("list succeeds");

        let parsed: Vec<InstanceArray> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].instance_array_label, "web-servers");
    }

    #[tokio::test]
    async fn labels_resolve_through_the_controller_search() {
        let transport = transport_with_fixture();
        let (result, output) = run_with(
            &["instance-array", "show", "--id", "web-servers", "--format", "json"],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("show succeeds");

        assert_eq!(
            transport.params_for("instance_array_get_by_label")[0][0],
            json!("web-servers")
        );
        let shown: InstanceArray = serde_json::from_str(&output).unwrap();
        assert_eq!(shown.instance_array_id, Some(310));
    }

    #[tokio::test]
    async fn numeric_ids_skip_the_controller_search() {
        let transport = transport_with_fixture();
        let (result, _) = run_with(
            &["instance-array", "show", "--id", "310"],
            transport.clone(),
            b"",
        )
        .await;
        result.expect("show succeeds");
        assert!(transport.params_for("instance_array_get_by_label").is_empty());
    }

    #[tokio::test]
    async fn delete_declined_aborts_before_the_backend_call() {
        let transport = transport_with_fixture();
        let (result, _) = run_with(
            &["instance-array", "delete", "--id", "310"],
            transport.clone(),
            b"no\n",
        )
        .await;

        assert!(matches!(result, Err(MetalCliError::NotConfirmed)));
        assert!(transport.params_for("instance_array_delete").is_empty());
    }

    #[tokio::test]
    async fn delete_confirmed_with_yes_calls_the_backend() {
        let transport = transport_with_fixture();
        let (result, output) = run_with(
            &["instance-array", "delete", "--id", "310"],
            transport.clone(),
            b"yes\n",
        )
        .await;

        result.expect("delete succeeds");
        assert_eq!(transport.params_for("instance_array_delete").len(), 1);
        assert!(output.contains("Deleted instance array #310"));
    }

    #[tokio::test]
    async fn delete_with_autoconfirm_never_prompts() {
        let transport = transport_with_fixture();
        let (result, output) = run_with(
            &["instance-array", "delete", "--id", "310", "--autoconfirm"],
            transport.clone(),
            b"",
        )
        .await;

        result.expect("delete succeeds");
        assert!(!output.contains("Are you sure?"));
    }
}
