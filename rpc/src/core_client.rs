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

use std::sync::Arc;

use serde_json::Value;

use crate::errors::ApiResult;
use crate::transport::{ApiRequest, Endpoint, Transport};

/// CoreClient is the raw calling surface kept for the first-generation
/// command handlers: one `call` with a method name and positional params,
/// bound to an endpoint tier at dispatch time. New handlers should prefer
/// the typed [`crate::MetalApiClient`].
#[derive(Clone)]
pub struct CoreClient {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
}

impl CoreClient {
    pub fn new(transport: Arc<dyn Transport>, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub async fn call(&self, method: &str, params: Value) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::new(self.endpoint, method, params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::StaticTransport;

    #[tokio::test]
    async fn call_returns_the_raw_result() {
        let transport = StaticTransport::new().with_response("secrets", json!([{"secret_id": 7}]));
        let client = CoreClient::new(Arc::new(transport), Endpoint::Extended);

        let result = client.call("secrets", json!([])).await.expect("result");
        assert_eq!(result[0]["secret_id"], 7);
        assert_eq!(client.endpoint(), Endpoint::Extended);
    }
}
