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

//! The command dispatch core: descriptors, the startup registry, and the
//! `subject [predicate]` tokenizer. Resource modules contribute descriptor
//! vectors; the dispatcher in [`dispatch`] runs one invocation end to end.

pub mod args;
pub mod dispatch;
pub mod io;
pub mod runtime;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

use metalcloud_rpc::{CoreClient, Endpoint};

use crate::errors::{CliResult, MetalCliError};
use runtime::RuntimeContext;

/// Future type returned by command handlers.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = CliResult<String>> + 'a>>;

/// The two handler generations. `Legacy` handlers predate the runtime
/// context and receive a raw [`CoreClient`] bound to the resolved endpoint
/// tier; `Modern` handlers receive the full context with the typed client
/// inside. Exactly which one a descriptor carries is explicit, never
/// inferred from nil checks.
pub enum Handler {
    Legacy(for<'a> fn(&'a Command<'a>, &'a CoreClient) -> HandlerFuture<'a>),
    Modern(for<'a> fn(&'a mut RuntimeContext, &'a Command<'a>) -> HandlerFuture<'a>),
}

/// CommandDescriptor is the static definition of one CLI action. Built
/// once at startup and never mutated afterwards.
pub struct CommandDescriptor {
    pub subject: &'static str,
    pub alt_subject: Option<&'static str>,
    /// `None` means the subject alone is a valid command.
    pub predicate: Option<&'static str>,
    pub alt_predicate: Option<&'static str>,
    pub description: &'static str,
    pub example: &'static str,
    /// Registers the command's flags on a fresh flag set.
    pub arg_spec: fn(clap::Command) -> clap::Command,
    pub handler: Handler,
    /// The caller must hold every listed permission to see or run the
    /// command.
    pub required_permissions: &'static [&'static str],
    pub endpoint: Endpoint,
    /// Used instead of `endpoint` when the caller holds the admin
    /// permission.
    pub admin_endpoint: Option<Endpoint>,
}

impl CommandDescriptor {
    /// Display name, `subject predicate` or the bare subject.
    pub fn display_name(&self) -> String {
        match self.predicate {
            Some(predicate) => format!("{} {}", self.subject, predicate),
            None => self.subject.to_string(),
        }
    }

    fn subjects(&self) -> Vec<&'static str> {
        let mut subjects = vec![self.subject];
        if let Some(alias) = self.alt_subject {
            subjects.push(alias);
        }
        subjects
    }

    fn predicates(&self) -> Vec<Option<&'static str>> {
        let mut predicates = vec![self.predicate];
        if self.alt_predicate.is_some() && self.alt_predicate != self.predicate {
            predicates.push(self.alt_predicate);
        }
        predicates
    }

    pub fn visible_to(&self, permissions: &HashSet<String>) -> bool {
        self.required_permissions
            .iter()
            .all(|p| permissions.contains(*p))
    }
}

/// A located descriptor bound to the parsed flag set of one invocation.
pub struct Command<'a> {
    pub descriptor: &'a CommandDescriptor,
    pub matches: clap::ArgMatches,
}

/// CommandRegistry owns every descriptor and answers lookups through a
/// `(subject, predicate)` index covering aliases. Registering the same
/// pair twice is a startup error, not a silent shadow.
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
    index: HashMap<(String, String), usize>,
}

const NO_PREDICATE: &str = "";

impl CommandRegistry {
    pub fn new(groups: Vec<Vec<CommandDescriptor>>) -> CliResult<Self> {
        let commands: Vec<CommandDescriptor> = groups.into_iter().flatten().collect();
        let mut index = HashMap::new();

        for (position, descriptor) in commands.iter().enumerate() {
            for subject in descriptor.subjects() {
                for predicate in descriptor.predicates() {
                    let key = (
                        subject.to_string(),
                        predicate.unwrap_or(NO_PREDICATE).to_string(),
                    );
                    if let Some(previous) = index.insert(key, position) {
                        if previous != position {
                            return Err(MetalCliError::DuplicateCommand(format!(
                                "{} {}",
                                subject,
                                predicate.unwrap_or("<none>")
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self { commands, index })
    }

    pub fn locate(&self, subject: &str, predicate: Option<&str>) -> Option<&CommandDescriptor> {
        self.index
            .get(&(
                subject.to_string(),
                predicate.unwrap_or(NO_PREDICATE).to_string(),
            ))
            .map(|&position| &self.commands[position])
    }

    /// Every descriptor registered under `subject` (canonical or alias),
    /// used to build "valid predicates are ..." errors and help listings.
    pub fn filter_by_subject(&self, subject: &str) -> Vec<&CommandDescriptor> {
        self.commands
            .iter()
            .filter(|d| d.subject == subject || d.alt_subject == Some(subject))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }
}

/// Splits raw CLI args into `(subject, predicate, consumed)`. The first
/// two tokens not starting with `-` are subject and predicate; flags begin
/// at the first `-token`. A resource label that itself starts with `-`
/// cannot be used positionally, which is an accepted limitation.
pub fn tokenize(args: &[String]) -> (Option<&str>, Option<&str>, usize) {
    let mut subject = None;
    let mut predicate = None;
    let mut consumed = 0;

    for token in args {
        if token.starts_with('-') {
            break;
        }
        if subject.is_none() {
            subject = Some(token.as_str());
        } else if predicate.is_none() {
            predicate = Some(token.as_str());
        } else {
            break;
        }
        consumed += 1;
    }

    (subject, predicate, consumed)
}

#[cfg(test)]
pub(crate) fn noop_modern<'a>(
    _ctx: &'a mut RuntimeContext,
    _command: &'a Command<'a>,
) -> HandlerFuture<'a> {
    Box::pin(async { Ok(String::new()) })
}
