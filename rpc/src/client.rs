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

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::errors::ApiResult;
use crate::models::{ControllerVersion, Datacenter, InstanceArray};
use crate::transport::{ApiRequest, Endpoint, Transport};

/// [`MetalApiClient`] is the typed surface over the controller transport.
///
/// Note: not every controller method needs a wrapper here. Handlers that
/// want raw access use [`crate::CoreClient`] and call the method
/// themselves; add methods here when there is value in the typed decoding
/// or in building the request from simpler primitives.
#[derive(Clone)]
pub struct MetalApiClient {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
}

impl MetalApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            endpoint: Endpoint::User,
        }
    }

    /// Rebind the client to another endpoint tier. The dispatcher uses
    /// this when a caller with the admin permission runs a command that
    /// declares an admin endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ApiResult<T> {
        let result = self
            .transport
            .execute(ApiRequest::new(self.endpoint, method, params))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn datacenters(&self, only_active: bool) -> ApiResult<Vec<Datacenter>> {
        self.call("datacenters", json!([only_active])).await
    }

    pub async fn datacenter_get(&self, name: &str) -> ApiResult<Datacenter> {
        self.call("datacenter_get", json!([name])).await
    }

    pub async fn datacenter_create(&self, datacenter: &Datacenter) -> ApiResult<Datacenter> {
        self.call("datacenter_create", json!([datacenter])).await
    }

    pub async fn instance_arrays(&self, infrastructure_id: i64) -> ApiResult<Vec<InstanceArray>> {
        self.call("instance_arrays", json!([infrastructure_id]))
            .await
    }

    pub async fn instance_array_get(&self, instance_array_id: i64) -> ApiResult<InstanceArray> {
        self.call("instance_array_get", json!([instance_array_id]))
            .await
    }

    pub async fn instance_array_get_by_label(&self, label: &str) -> ApiResult<InstanceArray> {
        self.call("instance_array_get_by_label", json!([label]))
            .await
    }

    pub async fn instance_array_create(
        &self,
        infrastructure_id: i64,
        instance_array: &InstanceArray,
    ) -> ApiResult<InstanceArray> {
        self.call(
            "instance_array_create",
            json!([infrastructure_id, instance_array]),
        )
        .await
    }

    pub async fn instance_array_edit(
        &self,
        instance_array_id: i64,
        instance_array: &InstanceArray,
    ) -> ApiResult<InstanceArray> {
        self.call(
            "instance_array_edit",
            json!([instance_array_id, instance_array]),
        )
        .await
    }

    pub async fn instance_array_delete(&self, instance_array_id: i64) -> ApiResult<()> {
        let _ = self
            .transport
            .execute(ApiRequest::new(
                self.endpoint,
                "instance_array_delete",
                json!([instance_array_id]),
            ))
            .await?;
        Ok(())
    }

    pub async fn controller_version(&self) -> ApiResult<ControllerVersion> {
        self.call("controller_version", json!([])).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::ApiError;
    use crate::testing::StaticTransport;

    fn client_with(transport: StaticTransport) -> MetalApiClient {
        MetalApiClient::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn datacenters_decode_into_models() {
        let client = client_with(StaticTransport::new().with_response(
            "datacenters",
            json!([
                {"datacenter_name": "us-east-1", "datacenter_display_name": "US East"},
                {"datacenter_name": "eu-west-2", "datacenter_hidden": true},
            ]),
        ));

        let datacenters = client.datacenters(true).await.expect("datacenters");
        assert_eq!(datacenters.len(), 2);
        assert_eq!(datacenters[0].datacenter_name, "us-east-1");
        assert_eq!(datacenters[0].datacenter_display_name, "US East");
        assert!(datacenters[1].datacenter_hidden);
    }

    #[tokio::test]
    async fn controller_errors_pass_through() {
        let client = client_with(StaticTransport::new());
        let err = client.datacenters(true).await.expect_err("missing method");
        assert!(matches!(err, ApiError::Rpc { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_discards_the_result_payload() {
        let client = client_with(
            StaticTransport::new().with_response("instance_array_delete", json!(true)),
        );
        client
            .instance_array_delete(310)
            .await
            .expect("delete succeeds");
    }
}
