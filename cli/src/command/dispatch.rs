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

use std::fmt::Write as _;

use clap::{Arg, ArgAction};

use crate::async_write;
use crate::command::runtime::RuntimeContext;
use crate::command::{Command, CommandDescriptor, CommandRegistry, Handler, tokenize};
use crate::config::{CliConfig, PERMISSION_ADMIN};
use crate::errors::{CliResult, MetalCliError};

/// Runs one CLI invocation end to end: tokenize, locate, parse flags,
/// resolve the endpoint tier, invoke the handler and write its output.
pub async fn execute(
    raw_args: &[String],
    registry: &CommandRegistry,
    ctx: &mut RuntimeContext,
) -> CliResult<()> {
    let (subject, predicate, consumed) = tokenize(raw_args);

    let Some(subject) = subject else {
        let help = render_registry_help(registry, &ctx.config)?;
        return Ok(async_write!(ctx.output, "{help}")?);
    };
    if subject == "help" {
        let help = render_registry_help(registry, &ctx.config)?;
        return Ok(async_write!(ctx.output, "{help}")?);
    }

    // Help and no-color act before flag parsing can run; recognize and
    // strip them here.
    let mut help_requested = false;
    let mut flag_tokens: Vec<String> = Vec::with_capacity(raw_args.len() - consumed);
    for token in &raw_args[consumed..] {
        match token.as_str() {
            "-h" | "-help" | "--help" => help_requested = true,
            "--no-color" | "-no-color" => ctx.no_color = true,
            other => flag_tokens.push(other.to_string()),
        }
    }

    let descriptor = locate_visible(registry, &ctx.config, subject, predicate)?;
    let name = descriptor.display_name();
    tracing::debug!(command = %name, "dispatching");

    let mut spec = (descriptor.arg_spec)(
        clap::Command::new(name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .about(descriptor.description),
    );
    if !spec
        .get_arguments()
        .any(|arg| arg.get_id().as_str() == "no-color")
    {
        spec = spec.arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored output"),
        );
    }

    if help_requested {
        let help = render_command_help(&mut spec, descriptor)?;
        return Ok(async_write!(ctx.output, "{help}")?);
    }

    let matches = spec.try_get_matches_from(flag_tokens).map_err(|err| {
        MetalCliError::Usage(format!(
            "{err}Use 'metalcloud-cli {name} -h' for syntax help"
        ))
    })?;
    let command = Command {
        descriptor,
        matches,
    };

    // The admin endpoint only applies to callers holding the admin
    // permission; everyone else stays on the descriptor's default tier.
    ctx.endpoint = if ctx.config.has_permission(PERMISSION_ADMIN) {
        command
            .descriptor
            .admin_endpoint
            .unwrap_or(command.descriptor.endpoint)
    } else {
        command.descriptor.endpoint
    };
    ctx.api_client = ctx.api_client.clone().with_endpoint(ctx.endpoint);

    let result = match command.descriptor.handler {
        Handler::Legacy(run) => {
            let client = ctx.core_client();
            run(&command, &client).await
        }
        Handler::Modern(run) => run(ctx, &command).await,
    };

    match result {
        Ok(text) => Ok(async_write!(ctx.output, "{text}")?),
        Err(err) => Err(decorate_error(err, &name)),
    }
}

fn locate_visible<'r>(
    registry: &'r CommandRegistry,
    config: &CliConfig,
    subject: &str,
    predicate: Option<&str>,
) -> CliResult<&'r CommandDescriptor> {
    if let Some(descriptor) = registry
        .locate(subject, predicate)
        .filter(|d| d.visible_to(&config.permissions))
    {
        return Ok(descriptor);
    }

    // The subject exists but the predicate is missing or wrong: list the
    // predicates the caller is allowed to see.
    let visible: Vec<&CommandDescriptor> = registry
        .filter_by_subject(subject)
        .into_iter()
        .filter(|d| d.visible_to(&config.permissions))
        .collect();
    if !visible.is_empty() {
        let predicates = visible
            .iter()
            .filter_map(|d| d.predicate)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(MetalCliError::MissingPredicate {
            subject: subject.to_string(),
            predicates,
        });
    }

    Err(MetalCliError::UnknownCommand)
}

/// Wraps handler and parse failures with the syntax-help hint, and
/// rewrites controller 404s into a version-compatibility message.
/// Confirmation declines pass through verbatim.
fn decorate_error(err: MetalCliError, name: &str) -> MetalCliError {
    match err {
        MetalCliError::Api(api) if api.is_not_found() => MetalCliError::VersionMismatch {
            version: env!("CARGO_PKG_VERSION"),
            message: api.to_string(),
        },
        err @ (MetalCliError::NotConfirmed | MetalCliError::VersionMismatch { .. }) => err,
        err => MetalCliError::CommandFailed {
            command: name.to_string(),
            message: err.to_string(),
        },
    }
}

fn render_registry_help(registry: &CommandRegistry, config: &CliConfig) -> CliResult<String> {
    let mut text = String::new();
    writeln!(text, "Usage: metalcloud-cli <subject> [predicate] [--flags]")?;
    writeln!(text)?;
    writeln!(text, "Available commands:")?;
    for descriptor in registry
        .iter()
        .filter(|d| d.visible_to(&config.permissions))
    {
        writeln!(
            text,
            "  {:<28} {}",
            descriptor.display_name(),
            descriptor.description
        )?;
    }
    writeln!(text)?;
    writeln!(
        text,
        "Use 'metalcloud-cli <subject> [predicate] -h' for details on a command."
    )?;
    Ok(text)
}

fn render_command_help(
    spec: &mut clap::Command,
    descriptor: &CommandDescriptor,
) -> CliResult<String> {
    let mut text = spec.render_long_help().to_string();
    if !descriptor.example.is_empty() {
        writeln!(text)?;
        writeln!(text, "Example:")?;
        writeln!(text, "  {}", descriptor.example)?;
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metalcloud_rpc::Transport;
    use metalcloud_rpc::testing::StaticTransport;
    use serde_json::json;

    use super::*;
    use crate::build_registry;
    use crate::command::runtime::test_support::{context_with, output_string};
    use crate::config::CliConfig;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn datacenter_fixture() -> serde_json::Value {
        json!([
            {
                "datacenter_name": "us-east-1",
                "datacenter_display_name": "US East",
                "datacenter_type": "metal",
                "datacenter_is_master": true,
            },
            {"datacenter_name": "eu-west-2", "datacenter_display_name": "EU West"},
            {"datacenter_name": "ap-south-3"},
        ])
    }

    async fn run(
        args: &[&str],
        transport: Arc<dyn Transport>,
        config: CliConfig,
        stdin: &[u8],
    ) -> (CliResult<()>, String) {
        let registry = build_registry().expect("registry builds");
        let (mut ctx, buffer) = context_with(config, transport, stdin);
        let result = execute(&argv(args), &registry, &mut ctx).await;
        (result, output_string(&buffer))
    }

    #[tokio::test]
    async fn the_full_registry_builds_without_duplicates() {
        let _ = build_registry().expect("no duplicate subject/predicate pairs");
    }

    #[tokio::test]
    async fn list_with_json_format_round_trips_the_fixture() {
        let transport =
            Arc::new(StaticTransport::new().with_response("datacenters", datacenter_fixture()));
        let (result, output) = run(
            &["datacenter", "list", "--format", "json"],
            transport,
            CliConfig::default(),
            b"",
        )
        .await;

        result.expect("list succeeds");
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&output).expect("output is a json array");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["datacenter_name"], "us-east-1");
        assert_eq!(parsed[0]["datacenter_display_name"], "US East");
        assert_eq!(parsed[0]["datacenter_is_master"], true);
    }

    #[tokio::test]
    async fn alias_tokens_reach_the_same_command() {
        let transport =
            Arc::new(StaticTransport::new().with_response("datacenters", datacenter_fixture()));
        let (result, output) = run(
            &["dc", "ls", "--format", "json"],
            transport,
            CliConfig::default(),
            b"",
        )
        .await;

        result.expect("alias lookup succeeds");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).expect("json output");
        assert_eq!(parsed.len(), 3);
    }

    #[tokio::test]
    async fn unknown_commands_error_out() {
        let (result, _) = run(
            &["drive", "list"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;
        assert!(matches!(result, Err(MetalCliError::UnknownCommand)));
    }

    #[tokio::test]
    async fn subject_without_predicate_lists_the_predicates() {
        let (result, _) = run(
            &["datacenter"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;

        let err = result.expect_err("predicate is required");
        let text = err.to_string();
        assert!(text.contains("datacenter"));
        assert!(text.contains("list"));
        assert!(text.contains("show"));
    }

    #[tokio::test]
    async fn parse_errors_carry_the_syntax_hint() {
        let (result, _) = run(
            &["instance-array", "list", "--infrastructure-id", "not-a-number"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;

        let err = result.expect_err("bad flag value");
        assert!(err.to_string().contains("-h' for syntax help"));
    }

    #[tokio::test]
    async fn help_renders_instead_of_executing() {
        // No canned responses: execution would fail, help must not.
        let (result, output) = run(
            &["datacenter", "list", "-h"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;

        result.expect("help renders");
        assert!(output.contains("--format"));
        assert!(output.contains("Example:"));
    }

    #[tokio::test]
    async fn no_args_renders_the_registry_help() {
        let (result, output) = run(&[], Arc::new(StaticTransport::new()), CliConfig::default(), b"")
            .await;
        result.expect("help renders");
        assert!(output.contains("datacenter list"));
        assert!(output.contains("version"));
    }

    #[tokio::test]
    async fn admin_commands_are_invisible_without_the_permission() {
        let (result, _) = run(
            &["datacenter", "create"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;
        // The subject is visible, so the caller gets the predicate listing
        // rather than the hidden predicate.
        let err = result.expect_err("create is admin-only");
        assert!(!err.to_string().contains("create"));
    }

    #[tokio::test]
    async fn admin_callers_use_the_admin_tier_when_declared() {
        use metalcloud_rpc::Endpoint;
        use metalcloud_rpc::testing::RecordingTransport;

        let recording = || {
            Arc::new(RecordingTransport::new(
                StaticTransport::new().with_response("datacenters", datacenter_fixture()),
            ))
        };

        let transport = recording();
        let mut config = CliConfig::default();
        let _ = config.permissions.insert(PERMISSION_ADMIN.to_string());
        let (result, _) = run(&["datacenter", "list"], transport.clone(), config, b"").await;
        result.expect("list succeeds");
        assert_eq!(transport.requests()[0].endpoint, Endpoint::Admin);

        let transport = recording();
        let (result, _) = run(
            &["datacenter", "list"],
            transport.clone(),
            CliConfig::default(),
            b"",
        )
        .await;
        result.expect("list succeeds");
        assert_eq!(transport.requests()[0].endpoint, Endpoint::User);
    }

    #[tokio::test]
    async fn not_found_rewrites_into_a_version_hint() {
        // StaticTransport answers unknown methods with a "Not Found" rpc
        // error, which is exactly what an older controller does.
        let (result, _) = run(
            &["version"],
            Arc::new(StaticTransport::new()),
            CliConfig::default(),
            b"",
        )
        .await;

        let err = result.expect_err("controller rejects the method");
        match err {
            MetalCliError::VersionMismatch { version, .. } => {
                assert_eq!(version, env!("CARGO_PKG_VERSION"));
            }
            other => panic!("expected VersionMismatch, got {other}"),
        }
    }

    #[tokio::test]
    async fn no_color_tokens_are_stripped_before_parsing() {
        let transport =
            Arc::new(StaticTransport::new().with_response("datacenters", datacenter_fixture()));
        let (result, _) = run(
            &["datacenter", "list", "-no-color", "--format", "json"],
            transport,
            CliConfig::default(),
            b"",
        )
        .await;
        result.expect("single-dash no-color token is accepted");
    }
}
