//! Busy Token
//!
//! The single-flag gate that keeps at most one user action in flight.
//! The token lives inside the store state; [`BusyGuard`] sets it and puts it
//! back to [`BusyToken::Idle`] when dropped, so every exit path of an action
//! (success, failure, or a dropped future) releases the gate.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::PresetId;

/// Which action currently holds the gate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "preset_id", rename_all = "kebab-case")]
pub enum BusyToken {
    /// Nothing in flight
    #[default]
    Idle,
    /// Switching protocol
    Protocol,
    /// Updating SNI
    Sni,
    /// Creating a preset
    CreatePreset,
    /// Fetching a preset's config
    Open(PresetId),
    /// Deleting a preset
    Delete(PresetId),
}

impl BusyToken {
    /// Whether the gate is free
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Stable string key (`""`, `"protocol"`, `"open-7"`, ...)
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Protocol => "protocol".to_string(),
            Self::Sni => "sni".to_string(),
            Self::CreatePreset => "create-preset".to_string(),
            Self::Open(id) => format!("open-{id}"),
            Self::Delete(id) => format!("delete-{id}"),
        }
    }
}

impl fmt::Display for BusyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            other => f.write_str(&other.key()),
        }
    }
}

/// Anything that owns a busy token slot behind a mutex
pub(crate) trait BusySlot {
    /// Mutable access to the token
    fn token_mut(&mut self) -> &mut BusyToken;

    /// Called after the token changed
    fn on_change(&mut self) {}
}

/// RAII holder of the busy gate
///
/// Holds a reference to the mutex, never the lock itself, so it can live
/// across `.await` points.
pub(crate) struct BusyGuard<'a, S: BusySlot> {
    slot: &'a Mutex<S>,
    token: BusyToken,
}

impl<'a, S: BusySlot> BusyGuard<'a, S> {
    /// Claim the gate for `token`, or return the token that already holds it
    #[cfg(test)]
    pub(crate) fn acquire(slot: &'a Mutex<S>, token: BusyToken) -> Result<Self, BusyToken> {
        let mut state = slot.lock();
        Self::claim(slot, &mut *state, token)
    }

    /// Claim the gate while the caller already holds `slot`'s lock as `state`
    ///
    /// The caller must release the lock before the guard is dropped.
    pub(crate) fn claim(
        slot: &'a Mutex<S>,
        state: &mut S,
        token: BusyToken,
    ) -> Result<Self, BusyToken> {
        debug_assert!(!token.is_idle());
        let current = *state.token_mut();
        if !current.is_idle() {
            return Err(current);
        }
        *state.token_mut() = token;
        state.on_change();
        Ok(Self { slot, token })
    }

    /// The token this guard holds
    pub(crate) fn token(&self) -> BusyToken {
        self.token
    }
}

impl<S: BusySlot> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        let mut state = self.slot.lock();
        if *state.token_mut() == self.token {
            *state.token_mut() = BusyToken::Idle;
            state.on_change();
        }
    }
}
