// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Round-robin candidate rotation.
//!
//! A [`RotationState`] belongs to a single generation request. It keeps one
//! cursor per `(category, role)` pair so that load spreads across the
//! eligible population within that request. Nothing is carried between
//! requests, so two generations over the same inputs choose the same people.

use crate::types::{DutyCategory, DutyRole, Person};
use std::collections::HashMap;

/// Request-scoped rotation cursors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    cursors: HashMap<(DutyCategory, DutyRole), usize>,
}

impl RotationState {
    /// Creates a rotation with every cursor at the start of its pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pool index the next search for `(category, role)` starts at.
    #[must_use]
    pub fn cursor(&self, category: DutyCategory, role: DutyRole) -> usize {
        self.cursors.get(&(category, role)).copied().unwrap_or(0)
    }

    /// Picks the next acceptable candidate from `pool`.
    ///
    /// The search starts at the current cursor and wraps once around the
    /// pool. The first candidate for which `accept` returns `true` is chosen
    /// and the cursor moves just past it. When nobody is accepted the cursor
    /// stays put and `Ok(None)` signals a vacancy.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `accept`; the cursor is left
    /// unchanged in that case.
    pub fn select<E, F>(
        &mut self,
        category: DutyCategory,
        role: DutyRole,
        pool: &[Person],
        mut accept: F,
    ) -> Result<Option<i64>, E>
    where
        F: FnMut(&Person) -> Result<bool, E>,
    {
        if pool.is_empty() {
            return Ok(None);
        }

        let start: usize = self.cursor(category, role) % pool.len();
        for step in 0..pool.len() {
            let index: usize = (start + step) % pool.len();
            let candidate: &Person = &pool[index];
            if accept(candidate)? {
                self.cursors
                    .insert((category, role), (index + 1) % pool.len());
                return Ok(Some(candidate.person_id));
            }
        }
        Ok(None)
    }
}
