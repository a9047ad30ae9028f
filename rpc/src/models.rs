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

//! Controller data model. Every field the controller may omit carries a
//! serde default so partial responses and hand-written config documents
//! both deserialize cleanly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A datacenter as reported by the controller. `datacenter_name` is the
/// stable identifier; the display name is free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datacenter {
    pub datacenter_name: String,
    #[serde(default)]
    pub datacenter_display_name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub datacenter_type: String,
    #[serde(default)]
    pub datacenter_is_master: bool,
    #[serde(default)]
    pub datacenter_is_maintenance: bool,
    #[serde(default)]
    pub datacenter_hidden: bool,
    #[serde(default)]
    pub datacenter_tags: Vec<String>,
    #[serde(default)]
    pub datacenter_created_timestamp: String,
    #[serde(default)]
    pub datacenter_updated_timestamp: String,
}

/// A group of identically-configured server instances inside an
/// infrastructure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceArray {
    #[serde(default)]
    pub instance_array_id: Option<i64>,
    pub instance_array_label: String,
    #[serde(default)]
    pub instance_array_subdomain: Option<String>,
    #[serde(default)]
    pub infrastructure_id: i64,
    #[serde(default)]
    pub instance_array_instance_count: i64,
    #[serde(default)]
    pub instance_array_ram_gbytes: i64,
    #[serde(default)]
    pub instance_array_processor_count: i64,
    #[serde(default)]
    pub instance_array_processor_core_count: i64,
    #[serde(default)]
    pub instance_array_processor_core_mhz: i64,
    #[serde(default)]
    pub instance_array_disk_count: i64,
    #[serde(default)]
    pub instance_array_disk_size_mbytes: i64,
    #[serde(default)]
    pub instance_array_boot_method: String,
    #[serde(default)]
    pub instance_array_firewall_managed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_array_custom_variables: Option<HashMap<String, String>>,
    #[serde(default)]
    pub instance_array_service_status: Option<String>,
}

/// An encrypted value stored by the controller and referenced from
/// deployment templates by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub secret_id: Option<i64>,
    pub secret_name: String,
    #[serde(default)]
    pub secret_usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_base64: Option<String>,
    #[serde(default)]
    pub secret_created_timestamp: Option<String>,
    #[serde(default)]
    pub secret_updated_timestamp: Option<String>,
}

/// Version information reported by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerVersion {
    pub version: String,
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub build_timestamp: Option<String>,
}
