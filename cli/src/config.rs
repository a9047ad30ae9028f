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

use std::collections::HashSet;
use std::env;

use metalcloud_rpc::{Endpoint, HttpTransport};

use crate::errors::{CliResult, MetalCliError};

/// Permission granted by `METALCLOUD_ADMIN`. Commands that declare an
/// admin endpoint only switch to it for callers holding this.
pub const PERMISSION_ADMIN: &str = "admin";

/// Process configuration, resolved once from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub endpoint: String,
    pub admin_endpoint: Option<String>,
    pub developer_endpoint: Option<String>,
    pub extended_endpoint: Option<String>,
    pub user_email: Option<String>,
    pub api_key: Option<String>,
    pub permissions: HashSet<String>,
}

impl CliConfig {
    pub fn from_env() -> CliResult<Self> {
        let endpoint = env::var("METALCLOUD_ENDPOINT").map_err(|_| {
            MetalCliError::Usage(
                "METALCLOUD_ENDPOINT is not set. Point it at your MetalCloud controller, \
                 e.g. https://api.metalcloud.example.com"
                    .to_string(),
            )
        })?;

        let mut permissions = HashSet::new();
        if is_truthy(env::var("METALCLOUD_ADMIN").ok().as_deref()) {
            let _ = permissions.insert(PERMISSION_ADMIN.to_string());
        }

        Ok(Self {
            endpoint,
            admin_endpoint: env::var("METALCLOUD_ADMIN_ENDPOINT").ok(),
            developer_endpoint: env::var("METALCLOUD_DEVELOPER_ENDPOINT").ok(),
            extended_endpoint: env::var("METALCLOUD_EXTENDED_ENDPOINT").ok(),
            user_email: env::var("METALCLOUD_USER_EMAIL").ok(),
            api_key: env::var("METALCLOUD_API_KEY").ok(),
            permissions,
        })
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn http_transport(&self) -> HttpTransport {
        let mut transport = HttpTransport::new(self.endpoint.clone())
            .with_credentials(self.user_email.clone(), self.api_key.clone());
        if let Some(ref url) = self.admin_endpoint {
            transport = transport.with_endpoint(Endpoint::Admin, url.clone());
        }
        if let Some(ref url) = self.developer_endpoint {
            transport = transport.with_endpoint(Endpoint::Developer, url.clone());
        }
        if let Some(ref url) = self.extended_endpoint {
            transport = transport.with_endpoint(Endpoint::Extended, url.clone());
        }
        transport
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_permissions(permissions: &[&str]) -> CliConfig {
        CliConfig {
            endpoint: "https://api.example.com".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..CliConfig::default()
        }
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("YES")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn admin_permission_is_queryable() {
        let config = config_with_permissions(&[PERMISSION_ADMIN]);
        assert!(config.has_permission(PERMISSION_ADMIN));
        assert!(!config.has_permission("billing"));

        let config = config_with_permissions(&[]);
        assert!(!config.has_permission(PERMISSION_ADMIN));
    }
}
