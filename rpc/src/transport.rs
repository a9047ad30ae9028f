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

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::errors::{ApiError, ApiResult};

/// Endpoint selects which controller connection tier a call targets.
/// Commands declare the tier they need; the admin tier is only reachable
/// for callers holding the admin permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    User,
    Developer,
    Extended,
    Admin,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::User => "user",
            Endpoint::Developer => "developer",
            Endpoint::Extended => "extended",
            Endpoint::Admin => "admin",
        }
    }
}

/// One controller call: a method name with positional parameters, addressed
/// to an endpoint tier.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub method: String,
    pub params: Value,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, method: impl Into<String>, params: Value) -> Self {
        Self {
            endpoint,
            method: method.into(),
            params,
        }
    }
}

/// Transport executes controller calls. The HTTP implementation below is
/// the production one; [`crate::testing`] provides canned transports.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value>;
}

/// HttpTransport posts JSON-RPC envelopes to the controller over HTTPS.
/// Tiers without a configured URL fall back to the user tier.
pub struct HttpTransport {
    endpoints: HashMap<Endpoint, String>,
    user_email: Option<String>,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_endpoint: impl Into<String>) -> Self {
        let mut endpoints = HashMap::new();
        let _ = endpoints.insert(Endpoint::User, user_endpoint.into());
        Self {
            endpoints,
            user_email: None,
            api_key: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, tier: Endpoint, url: impl Into<String>) -> Self {
        let _ = self.endpoints.insert(tier, url.into());
        self
    }

    pub fn with_credentials(
        mut self,
        user_email: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        self.user_email = user_email;
        self.api_key = api_key;
        self
    }

    fn url_for(&self, tier: Endpoint) -> ApiResult<&str> {
        self.endpoints
            .get(&tier)
            .or_else(|| self.endpoints.get(&Endpoint::User))
            .map(String::as_str)
            .ok_or_else(|| {
                ApiError::ConnectFailed(format!("no URL configured for the {} tier", tier.as_str()))
            })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.url_for(request.endpoint)?;
        tracing::debug!(
            method = %request.method,
            endpoint = request.endpoint.as_str(),
            "calling controller"
        );

        let envelope = json!({
            "jsonrpc": "2.0",
            "method": request.method,
            "params": request.params,
            "id": 0,
        });

        let mut builder = self.http.post(url).json(&envelope);
        if let Some(ref email) = self.user_email {
            builder = builder.header("X-MetalCloud-User", email);
        }
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_connect() {
                ApiError::ConnectFailed(err.to_string())
            } else {
                ApiError::Transport(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if let Some(error) = body.get("error") {
            return Err(ApiError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        body.get("result").cloned().ok_or(ApiError::EmptyResult)
    }
}
