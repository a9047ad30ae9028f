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

use std::pin::Pin;
use std::sync::Arc;

use metalcloud_rpc::{CoreClient, Endpoint, MetalApiClient, Transport};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::config::CliConfig;
use crate::errors::CliResult;

/// RuntimeContext carries everything one invocation needs: configuration,
/// the clients, and the input/output streams. It is passed explicitly into
/// the dispatcher and every handler; there is no process-wide state. Tests
/// swap the streams for buffers and the transport for a canned one.
pub struct RuntimeContext {
    pub config: CliConfig,
    pub api_client: MetalApiClient,
    pub transport: Arc<dyn Transport>,
    pub input: Pin<Box<dyn AsyncBufRead>>,
    pub output: Pin<Box<dyn AsyncWrite>>,
    /// Endpoint tier resolved by the dispatcher for the current command.
    pub endpoint: Endpoint,
    pub no_color: bool,
}

impl RuntimeContext {
    /// Context over an injected transport, with the real process streams.
    pub fn new(config: CliConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_client: MetalApiClient::new(transport.clone()),
            transport,
            config,
            input: Box::pin(BufReader::new(tokio::io::stdin())),
            output: Box::pin(tokio::io::stdout()),
            endpoint: Endpoint::User,
            no_color: false,
        }
    }

    /// Context talking to the configured controller.
    pub fn from_config(config: CliConfig) -> CliResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(config.http_transport());
        Ok(Self::new(config, transport))
    }

    /// A raw client for legacy handlers, bound to the endpoint tier the
    /// dispatcher resolved for this command.
    pub fn core_client(&self) -> CoreClient {
        CoreClient::new(self.transport.clone(), self.endpoint)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use super::*;

    /// AsyncWrite into a shared buffer the test keeps a handle on.
    pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl AsyncWrite for SharedBuffer {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.0.lock().expect("buffer poisoned").extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// A context over the given transport, with `stdin_content` available
    /// on the input stream. Returns the output buffer handle alongside.
    pub fn context_with(
        config: CliConfig,
        transport: Arc<dyn Transport>,
        stdin_content: &[u8],
    ) -> (RuntimeContext, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let mut ctx = RuntimeContext::new(config, transport);
        ctx.input = Box::pin(BufReader::new(Cursor::new(stdin_content.to_vec())));
        ctx.output = Box::pin(SharedBuffer(buffer.clone()));
        (ctx, buffer)
    }

    pub fn output_string(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().expect("buffer poisoned").clone())
            .expect("output is utf-8")
    }
}
