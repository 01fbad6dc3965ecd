// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! As-Of Date Context
//!
//! The single observation date every entity read is parameterised with.
//! `set` is the only mutation path and updates the value before returning,
//! so any fetch issued afterwards observes the new date. The context never
//! triggers re-fetches itself; that is left to whoever changed the date.

use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use tracing::debug;

/// ISO calendar date format used on the wire (`2020-01-01`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub struct AsOfDate {
    current: RwLock<NaiveDate>,
}

impl AsOfDate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            current: RwLock::new(date),
        }
    }

    /// Context initialised to the local calendar date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn get(&self) -> NaiveDate {
        *self.current.read()
    }

    pub fn set(&self, date: NaiveDate) {
        let mut current = self.current.write();
        if *current != date {
            debug!(from = %*current, to = %date, "As-of date changed");
        }
        *current = date;
    }

    pub fn reset_to_today(&self) {
        self.set(Local::now().date_naive());
    }

    /// Parse an ISO date (`YYYY-MM-DD`).
    pub fn parse(input: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
    }
}

impl Default for AsOfDate {
    fn default() -> Self {
        Self::today()
    }
}
