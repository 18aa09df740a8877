//! Single-slot frame gate for live video.
//!
//! A camera produces frames faster than inference can consume them. The gate
//! admits one frame at a time; frames submitted while another is in flight are
//! dropped on the spot rather than queued. The slot is released when the
//! [`InFlight`] guard is dropped, which may happen on a different thread from
//! the one that submitted the frame.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::trace::trace_event;

#[derive(Debug, Default)]
struct GateState {
    busy: AtomicBool,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

/// Admits at most one in-flight frame of type `F`; clones share the same slot.
pub struct FrameGate<F> {
    state: Arc<GateState>,
    _frame: PhantomData<fn(F)>,
}

impl<F> FrameGate<F> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(GateState::default()),
            _frame: PhantomData,
        }
    }

    /// Claims the slot for `frame` without blocking.
    ///
    /// Returns `None` and drops `frame` when another frame is still in flight.
    pub fn try_submit(&self, frame: F) -> Option<InFlight<F>> {
        if self
            .state
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let dropped = self.state.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            trace_event!("frame_dropped", dropped = dropped);
            return None;
        }
        self.state.accepted.fetch_add(1, Ordering::Relaxed);
        Some(InFlight {
            frame,
            state: Arc::clone(&self.state),
        })
    }

    /// Returns true while a frame is being processed.
    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    /// Number of frames admitted so far.
    pub fn accepted(&self) -> u64 {
        self.state.accepted.load(Ordering::Relaxed)
    }

    /// Number of frames discarded because the slot was taken.
    pub fn dropped(&self) -> u64 {
        self.state.dropped.load(Ordering::Relaxed)
    }
}

impl<F> Default for FrameGate<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for FrameGate<F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _frame: PhantomData,
        }
    }
}

impl<F> fmt::Debug for FrameGate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameGate")
            .field("busy", &self.is_busy())
            .field("accepted", &self.accepted())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Guard for the frame currently being processed.
#[derive(Debug)]
pub struct InFlight<F> {
    frame: F,
    state: Arc<GateState>,
}

impl<F> Deref for InFlight<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.frame
    }
}

impl<F> DerefMut for InFlight<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.frame
    }
}

impl<F> Drop for InFlight<F> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::Release);
    }
}
