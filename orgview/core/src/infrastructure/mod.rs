// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure Layer
//!
//! Session-wide shared resources and the transport adapter:
//!
//! - `event_bus` — synchronous handlers plus async broadcast receivers
//! - `work_log` — append-only work/event/error log
//! - `http_backend` — `reqwest` implementation of the backend trait

pub mod event_bus;
pub mod http_backend;
pub mod work_log;
