//! Per-game flow epochs.
//!
//! Every orchestration routine captures a [`FlowContext`] when it starts.
//! A privileged override bumps the epoch, which cancels the old token so
//! in-flight decision calls are abandoned, and makes the store refuse any
//! commit still carrying the old epoch.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct FlowContext {
    pub epoch: u64,
    pub token: CancellationToken,
}

impl FlowContext {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct EpochGuard {
    inner: Mutex<(u64, CancellationToken)>,
}

impl Default for EpochGuard {
    fn default() -> Self {
        Self {
            inner: Mutex::new((0, CancellationToken::new())),
        }
    }
}

impl EpochGuard {
    pub fn current(&self) -> FlowContext {
        let inner = self.inner.lock();
        FlowContext {
            epoch: inner.0,
            token: inner.1.clone(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.inner.lock().0
    }

    /// Starts a new epoch and cancels every context of the old one.
    pub fn bump(&self) -> FlowContext {
        let mut inner = self.inner.lock();
        inner.1.cancel();
        inner.0 += 1;
        inner.1 = CancellationToken::new();
        FlowContext {
            epoch: inner.0,
            token: inner.1.clone(),
        }
    }

    #[inline]
    pub fn is_current(&self, ctx: &FlowContext) -> bool {
        self.epoch() == ctx.epoch
    }
}
