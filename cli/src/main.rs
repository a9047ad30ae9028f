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

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::command::CommandRegistry;
use crate::command::dispatch;
use crate::command::runtime::RuntimeContext;
use crate::config::CliConfig;
use crate::errors::CliResult;

mod async_write;
mod command;
mod config;
mod datacenter;
mod errors;
mod instance_array;
mod output;
mod secret;
mod version;

/// All command groups, concatenated into the startup registry. A duplicate
/// subject/predicate pair anywhere in here fails fast instead of silently
/// shadowing.
pub(crate) fn build_registry() -> CliResult<CommandRegistry> {
    CommandRegistry::new(vec![
        datacenter::commands(),
        instance_array::commands(),
        secret::commands(),
        version::commands(),
    ])
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Log level comes from RUST_LOG, defaulting to INFO, with the noisy
    // HTTP internals capped.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("hyper=warn".parse()?)
        .add_directive("rustls=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);
    tracing_subscriber::registry()
        .with(fmt::Layer::default().compact().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()?;

    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    // Configuration problems surface before the output stream exists.
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let registry = match build_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut ctx = match RuntimeContext::from_config(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = dispatch::execute(&raw_args, &registry, &mut ctx).await {
        crate::async_writeln!(ctx.output, "{err}")?;
        std::process::exit(1);
    }
    Ok(())
}
