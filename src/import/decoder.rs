use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Poll;

use crate::animation::AnimationClip;
use crate::scene::{BoneHandle, Rig};

/// Raw result of decoding an animation file.
#[derive(Debug, Clone, Default)]
pub struct DecodedScene {
    pub rig: Rig,
    /// Top-level object of the file. `None` when the decoder produced nothing
    /// usable.
    pub root: Option<BoneHandle>,
    pub clips: Vec<AnimationClip>,
}

/// Outcome of one incremental decode step.
#[derive(Debug)]
pub enum DecodeStep {
    Pending,
    Finished(DecodedScene),
    /// The decoder gave up on its own (e.g. its host cancelled it).
    Canceled,
    Failed(String),
}

/// An in-flight decode that advances one bounded slice of work per step.
pub trait DecodeTask {
    fn step(&mut self) -> DecodeStep;

    /// Completion fraction in `[0, 1]`.
    fn progress(&self) -> f32;
}

/// File decoder. Parsing happens in the returned task, not in `begin`.
pub trait AnimationDecoder {
    type Task: DecodeTask;

    fn begin(&self, bytes: Vec<u8>) -> Self::Task;
}

/// Shared cooperative cancellation flag.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Yields to the executor once.
pub(crate) fn yield_now() -> impl Future<Output = ()> {
    let mut yielded = false;
    futures::future::poll_fn(move |cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
}
