// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! Pure types shared by every store module. Nothing here performs I/O; the
//! [`backend::Backend`] trait is the seam to the transport.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `namespace` | Namespace registry, typed verbs, key generation |
//! | `as_of` | Session-wide observation date |
//! | `entity` | Entity kinds, records, validity windows |
//! | `events` | Store events and their wire names |
//! | `log` | Work/event/error log entries |
//! | `workflow` | Workflow requests and submission states |
//! | `backend` | Read/write requests and the backend trait |
//! | `config` | Store configuration file |

pub mod as_of;
pub mod backend;
pub mod config;
pub mod entity;
pub mod events;
pub mod log;
pub mod namespace;
pub mod workflow;
