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

//! Client library for the MetalCloud controller API.
//!
//! The controller speaks JSON-RPC over HTTPS. Everything in this crate goes
//! through the [`Transport`] seam, so command handlers and tests can run
//! against canned transports instead of a live controller.

pub mod client;
pub mod core_client;
pub mod errors;
pub mod models;
pub mod testing;
pub mod transport;

pub use client::MetalApiClient;
pub use core_client::CoreClient;
pub use errors::{ApiError, ApiResult};
pub use transport::{ApiRequest, Endpoint, HttpTransport, Transport};
