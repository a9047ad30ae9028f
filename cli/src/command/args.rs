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

//! Typed accessors over a command's parsed flag set. Absence is
//! `Option::None` throughout; the `_ok` accessors report a value only when
//! the flag was actually provided on the command line, never for defaults.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, value_parser};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::command::Command;
use crate::errors::{CliResult, MetalCliError};

fn provided(command: &Command<'_>, name: &str) -> bool {
    match command.matches.try_contains_id(name) {
        Ok(true) => matches!(
            command.matches.value_source(name),
            Some(ValueSource::CommandLine)
        ),
        _ => false,
    }
}

pub fn get_string_ok(command: &Command<'_>, name: &str) -> Option<String> {
    if !provided(command, name) {
        return None;
    }
    command
        .matches
        .try_get_one::<String>(name)
        .ok()
        .flatten()
        .cloned()
}

pub fn get_string(command: &Command<'_>, name: &str) -> String {
    get_string_ok(command, name).unwrap_or_default()
}

pub fn get_int_ok(command: &Command<'_>, name: &str) -> Option<i64> {
    if !provided(command, name) {
        return None;
    }
    command
        .matches
        .try_get_one::<i64>(name)
        .ok()
        .flatten()
        .copied()
}

pub fn get_int(command: &Command<'_>, name: &str) -> i64 {
    get_int_ok(command, name).unwrap_or_default()
}

pub fn get_bool_ok(command: &Command<'_>, name: &str) -> Option<bool> {
    if !provided(command, name) {
        return None;
    }
    command
        .matches
        .try_get_one::<bool>(name)
        .ok()
        .flatten()
        .copied()
}

pub fn get_bool(command: &Command<'_>, name: &str) -> bool {
    get_bool_ok(command, name).unwrap_or_default()
}

/// Strict accessor for numeric identifiers: the flag must be present and
/// positive.
pub fn require_id(command: &Command<'_>, name: &str) -> CliResult<i64> {
    match get_int_ok(command, name) {
        Some(value) if value > 0 => Ok(value),
        Some(value) => Err(MetalCliError::Usage(format!(
            "Value {value} for --{name} is not a valid id"
        ))),
        None => Err(MetalCliError::Usage(format!(
            "Required value for --{name} is missing"
        ))),
    }
}

/// Strict accessor for required text flags: present and non-empty.
pub fn require_string(command: &Command<'_>, name: &str) -> CliResult<String> {
    match get_string_ok(command, name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MetalCliError::Usage(format!(
            "Required value for --{name} is missing"
        ))),
    }
}

/// Overwrites `destination` only when the argument was explicitly
/// provided. Edit payloads use this so unspecified fields keep their
/// current values.
pub fn update_if_set<T>(destination: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *destination = value;
    }
}

/// Either a numeric identifier or a human label. Flags that accept both
/// parse into this once; the discriminant is stored, not re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrLabel {
    Id(i64),
    Label(String),
}

impl IdOrLabel {
    /// `Id` iff the input parses as a positive integer; everything else,
    /// including zero and negatives, is treated as a label.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(id) if id > 0 => IdOrLabel::Id(id),
            _ => IdOrLabel::Label(trimmed.to_string()),
        }
    }
}

impl fmt::Display for IdOrLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdOrLabel::Id(id) => write!(f, "{id}"),
            IdOrLabel::Label(label) => write!(f, "{label}"),
        }
    }
}

/// Returns the id directly when the input is numeric, otherwise runs the
/// caller-supplied label resolver (typically an API search call).
pub async fn id_or_resolve<F, Fut>(input: &str, resolve: F) -> CliResult<i64>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = CliResult<i64>>,
{
    match IdOrLabel::parse(input) {
        IdOrLabel::Id(id) => Ok(id),
        IdOrLabel::Label(label) => resolve(label).await,
    }
}

/// Parses `"k1=v1,k2=v2"` into a map. Every non-empty comma-separated pair
/// must contain exactly one `=` and a non-empty key; values may be empty.
pub fn key_value_map(input: &str) -> CliResult<HashMap<String, String>> {
    let mut map = HashMap::new();

    for pair in input.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(MetalCliError::Usage(format!(
                "Malformed key=value pair '{pair}'"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(MetalCliError::Usage(format!(
                "Empty key in key=value pair '{pair}'"
            )));
        }
        let _ = map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

/// Registers the object-input flags shared by create/update commands:
/// `--file <path>` or `--pipe`, with `--input-format json|yaml`.
pub fn with_config_input_flags(command: clap::Command) -> clap::Command {
    command
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_name("PATH")
                .value_parser(value_parser!(String))
                .help("Read the object definition from this file"),
        )
        .arg(
            Arg::new("pipe")
                .long("pipe")
                .action(ArgAction::SetTrue)
                .help("Read the object definition from standard input"),
        )
        .arg(
            Arg::new("input-format")
                .long("input-format")
                .value_name("FORMAT")
                .value_parser(["json", "yaml"])
                .default_value("yaml")
                .help("Format of the object definition"),
        )
}

pub fn has_config_input(command: &Command<'_>) -> bool {
    get_string_ok(command, "file").is_some() || get_bool(command, "pipe")
}

/// Reads the object definition selected by the config-input flags and
/// deserializes it according to `--input-format`.
pub async fn read_config_input<T: DeserializeOwned>(
    command: &Command<'_>,
    input: &mut Pin<Box<dyn AsyncBufRead>>,
) -> CliResult<T> {
    let raw = if get_bool(command, "pipe") {
        let mut buffer = String::new();
        let _ = input.read_to_string(&mut buffer).await?;
        buffer
    } else if let Some(path) = get_string_ok(command, "file") {
        tokio::fs::read_to_string(path).await?
    } else {
        return Err(MetalCliError::Usage(
            "Provide the object definition with --file <path> or --pipe".to_string(),
        ));
    };

    let format = command
        .matches
        .try_get_one::<String>("input-format")
        .ok()
        .flatten()
        .map(String::as_str)
        .unwrap_or("yaml");

    match format {
        "json" => serde_json::from_str(&raw).map_err(|err| MetalCliError::ConfigParse {
            format: "JSON",
            message: err.to_string(),
        }),
        _ => serde_yaml::from_str(&raw).map_err(|err| MetalCliError::ConfigParse {
            format: "YAML",
            message: err.to_string(),
        }),
    }
}
