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

//! Transport doubles for exercising clients and command handlers without a
//! live controller.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::errors::{ApiError, ApiResult};
use crate::transport::{ApiRequest, Transport};

/// StaticTransport serves canned results keyed by method name. Calls to
/// methods without a canned result fail the way a controller that does not
/// know the method would, with a "Not Found" RPC error.
#[derive(Default)]
pub struct StaticTransport {
    responses: HashMap<String, Value>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, method: impl Into<String>, result: Value) -> Self {
        let _ = self.responses.insert(method.into(), result);
        self
    }
}

#[async_trait::async_trait]
impl Transport for StaticTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        self.responses
            .get(&request.method)
            .cloned()
            .ok_or_else(|| ApiError::Rpc {
                code: -32601,
                message: format!("Method {} Not Found", request.method),
            })
    }
}

/// RecordingTransport captures every request while answering from an inner
/// [`StaticTransport`]. Tests use it to assert on the exact payloads a
/// command sent to the controller.
pub struct RecordingTransport {
    inner: StaticTransport,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn new(inner: StaticTransport) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .clone()
    }

    /// The positional params of every recorded call to `method`, in order.
    pub fn params_for(&self, method: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .map(|request| request.params)
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());
        self.inner.execute(request).await
    }
}
