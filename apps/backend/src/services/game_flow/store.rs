//! Single authoritative `GameState` per game.
//!
//! Readers take an `Arc` snapshot. Writers run read-compute-write under the
//! write lock and replace the whole value; `version` grows by one per
//! replacement and doubles as the HTTP ETag.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::epoch::{EpochGuard, FlowContext};
use crate::domain::GameState;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: Arc<GameState>,
    pub version: u64,
}

/// Result of an epoch-checked commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Applied { version: u64 },
    /// The writer's epoch was superseded; nothing was written.
    Discarded,
}

#[derive(Debug)]
pub struct GameStore {
    current: RwLock<Snapshot>,
    epochs: EpochGuard,
}

impl GameStore {
    pub fn new(state: GameState) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                state: Arc::new(state),
                version: 0,
            }),
            epochs: EpochGuard::default(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current.read().clone()
    }

    pub fn context(&self) -> FlowContext {
        self.epochs.current()
    }

    pub fn epoch(&self) -> u64 {
        self.epochs.epoch()
    }

    /// Writes `f(state)` only if `ctx` still carries the current epoch.
    ///
    /// The epoch comparison happens under the write lock, so a commit can
    /// never land after an override that bumped the epoch.
    pub fn commit<F>(&self, ctx: &FlowContext, f: F) -> Result<Commit, DomainError>
    where
        F: FnOnce(&GameState) -> Result<GameState, DomainError>,
    {
        let mut current = self.current.write();
        if !self.epochs.is_current(ctx) {
            debug!(
                game_id = %current.state.game_id,
                epoch = ctx.epoch,
                current_epoch = self.epochs.epoch(),
                "Discarding stale-epoch write"
            );
            return Ok(Commit::Discarded);
        }
        let next = f(&current.state)?;
        current.version += 1;
        current.state = Arc::new(next);
        Ok(Commit::Applied {
            version: current.version,
        })
    }

    /// Writes `f(state)` regardless of epoch. Human submissions use this;
    /// they are validated against the state they land on.
    pub fn update<F, T>(&self, f: F) -> Result<(T, u64), DomainError>
    where
        F: FnOnce(&GameState) -> Result<(GameState, T), DomainError>,
    {
        let mut current = self.current.write();
        let (next, out) = f(&current.state)?;
        current.version += 1;
        current.state = Arc::new(next);
        Ok((out, current.version))
    }

    /// Bumps the epoch without writing. Routines holding an older context
    /// can no longer commit.
    pub fn retire(&self) -> FlowContext {
        let _current = self.current.write();
        self.epochs.bump()
    }

    /// Bumps the epoch, then writes `f(state)`. The bump stands even when
    /// `f` fails.
    pub fn supersede<F, T>(&self, f: F) -> Result<(T, FlowContext), DomainError>
    where
        F: FnOnce(&GameState) -> Result<(GameState, T), DomainError>,
    {
        let mut current = self.current.write();
        let ctx = self.epochs.bump();
        let (next, out) = f(&current.state)?;
        current.version += 1;
        current.state = Arc::new(next);
        Ok((out, ctx))
    }
}
