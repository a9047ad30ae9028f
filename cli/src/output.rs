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

//! General utility code for displaying command results in the formats the
//! CLI supports: json, yaml, csv and the default ascii table.

use clap::{Arg, value_parser};
use prettytable::Table;
use serde::Serialize;

use crate::command::{Command, args};
use crate::errors::{CliResult, MetalCliError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    AsciiTable,
    Yaml,
}

impl OutputFormat {
    pub fn parse(value: &str) -> CliResult<Self> {
        match value {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "yaml" | "YAML" => Ok(OutputFormat::Yaml),
            "ascii-table" | "table" => Ok(OutputFormat::AsciiTable),
            other => Err(MetalCliError::Usage(format!(
                "Unknown output format '{other}'. Valid formats: json, yaml, csv, ascii-table"
            ))),
        }
    }
}

/// Registers the `--format` flag shared by commands that render objects.
pub fn with_format_flag(command: clap::Command) -> clap::Command {
    command.arg(
        Arg::new("format")
            .long("format")
            .value_name("FORMAT")
            .value_parser(value_parser!(String))
            .help("Output format: json, yaml, csv or ascii-table (default)"),
    )
}

pub fn format_of(command: &Command<'_>) -> CliResult<OutputFormat> {
    match args::get_string_ok(command, "format") {
        Some(value) => OutputFormat::parse(&value),
        None => Ok(OutputFormat::AsciiTable),
    }
}

/// ToTable renders an object (or list of objects) as a prettytable, used
/// for both the ascii-table and csv formats.
pub trait ToTable {
    fn to_table(&self) -> Table;
}

/// cli_output serializes through serde for json/yaml and through the
/// [`ToTable`] impl for tables and csv.
pub fn cli_output<T: Serialize + ToTable>(input: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(input)?;
            rendered.push('\n');
            Ok(rendered)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(input)?),
        OutputFormat::AsciiTable => Ok(input.to_table().to_string()),
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            let _ = input
                .to_table()
                .to_csv(&mut buffer)
                .map_err(|err| MetalCliError::Generic(err.to_string()))?;
            String::from_utf8(buffer).map_err(|err| MetalCliError::Generic(err.to_string()))
        }
    }
}
