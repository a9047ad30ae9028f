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

#[derive(Debug, thiserror::Error)]
pub enum MetalCliError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid command. Run 'metalcloud-cli help' to list the available commands.")]
    UnknownCommand,

    #[error("'{subject}' needs one of the following predicates: {predicates}")]
    MissingPredicate {
        subject: String,
        predicates: String,
    },

    #[error("Command registered twice for '{0}'")]
    DuplicateCommand(String),

    #[error("Operation not confirmed. Aborting.")]
    NotConfirmed,

    #[error("{message}. Use 'metalcloud-cli {command} -h' for syntax help")]
    CommandFailed { command: String, message: String },

    #[error(
        "The controller answered Not Found. metalcloud-cli {version} is likely \
         incompatible with this controller; upgrade the CLI or the controller. \
         Underlying error: {message}"
    )]
    VersionMismatch {
        version: &'static str,
        message: String,
    },

    #[error("Unable to parse the {format} object definition: {message}")]
    ConfigParse {
        format: &'static str,
        message: String,
    },

    #[error("{0}")]
    Api(#[from] metalcloud_rpc::ApiError),

    #[error("Error while handling json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error while handling yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error while writing into string: {0}")]
    StringWrite(#[from] std::fmt::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type CliResult<T> = Result<T, MetalCliError>;
