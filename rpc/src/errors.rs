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

/// ApiError enumerates the failures that can surface from a controller
/// call, from connection setup through response decoding.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unable to connect to the MetalCloud API: {0}")]
    ConnectFailed(String),

    #[error("The MetalCloud controller returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("The controller rejected the call: {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Error while decoding the controller response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("The controller response carried no result")]
    EmptyResult,
}

impl ApiError {
    /// True for the responses an incompatible controller answers with
    /// 404/"Not Found". The CLI rewrites these into a version hint.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status == 404,
            ApiError::Rpc { message, .. } => message.contains("Not Found"),
            _ => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
