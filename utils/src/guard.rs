//! Reentrancy guard for functions that hand value to an external party.
//!
//! The guard is a single `locked` flag. [`ReentrancyGuard::enter`] fails if
//! the flag is already set; otherwise it sets it and returns an [`Entered`]
//! token that clears the flag when dropped. Because release happens in
//! `Drop`, the flag is cleared on every exit path: `Ok`, `Err` via `?`, and
//! unwinding panics.
//!
//! The token owns a handle to the flag instead of borrowing the guard, so
//! the guarded body is free to pass `&mut self` of the owning contract to
//! an external callback while the guard is held.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

/// Returned when a guarded surface is entered while already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reentrant call")]
pub struct ReentrantCall;

/// Per-contract mutex against nested reentry.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: Rc<Cell<bool>>,
}

/// Proof that the guard is held. Releases the guard on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as this token is dropped"]
pub struct Entered {
    locked: Rc<Cell<bool>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard.
    pub fn enter(&self) -> Result<Entered, ReentrantCall> {
        if self.locked.get() {
            return Err(ReentrantCall);
        }
        self.locked.set(true);
        Ok(Entered {
            locked: Rc::clone(&self.locked),
        })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl Drop for Entered {
    fn drop(&mut self) {
        self.locked.set(false);
    }
}
