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

//! `write!`-shaped macros over the async output stream carried by the
//! runtime context. Each macro awaits internally, so call sites read like
//! their std counterparts with a trailing `?`.

#[macro_export]
macro_rules! async_write {
    ($writer:expr, $($arg:tt)*) => {{
        use tokio::io::AsyncWriteExt as _;
        $writer.write_all(format!($($arg)*).as_bytes()).await
    }};
}

#[macro_export]
macro_rules! async_writeln {
    ($writer:expr) => {{
        use tokio::io::AsyncWriteExt as _;
        $writer.write_all(b"\n").await
    }};
    ($writer:expr, $($arg:tt)*) => {{
        use tokio::io::AsyncWriteExt as _;
        let mut line = format!($($arg)*);
        line.push('\n');
        $writer.write_all(line.as_bytes()).await
    }};
}
