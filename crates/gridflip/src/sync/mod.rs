//! Frame synchronization: render-phase batching, deferred timers and tweens.
//!
//! The engine never touches a clock or a display link directly. Everything
//! time-based goes through [`FrameScheduler`], which a host can implement on
//! top of its own render loop. [`FrameLoop`] is the in-crate implementation:
//! the host calls [`FrameLoop::tick`] once per frame with the current time
//! and the loop runs, in order:
//!
//! 1. due timers,
//! 2. [`Phase::Update`] tasks,
//! 3. one step of every live tween,
//! 4. [`Phase::Render`] tasks (style writes),
//! 5. [`Phase::PostRender`] tasks (reads that must observe this frame's writes).
//!
//! A task queued for a phase that already ran this frame runs next frame.

mod cancel;
mod throttle;
mod tween;

use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

pub use cancel::CancelHandle;
pub use throttle::{Gate, Throttle};
pub use tween::{Tween, TweenSample};

use crate::geometry::Coords;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Per-frame tween callback.
pub type UpdateFn = Box<dyn FnMut(Coords)>;

/// Point in a frame at which a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// State updates, before tweens step.
    Update,
    /// Visual writes.
    Render,
    /// After this frame's writes were applied.
    PostRender,
}

impl Phase {
    const fn index(self) -> usize {
        match self {
            Self::Update => 0,
            Self::Render => 1,
            Self::PostRender => 2,
        }
    }
}

/// Scheduling primitives the engine relies on.
pub trait FrameScheduler {
    /// Time of the current (or most recent) frame.
    fn now(&self) -> Duration;

    /// Queues `task` for `phase` of the next frame that reaches it.
    fn schedule(&self, phase: Phase, task: Task);

    /// Runs `task` on the first frame at or after `now() + delay`.
    fn defer(&self, delay: Duration, task: Task) -> CancelHandle;

    /// Drives `tween`, calling `on_update` with each frame's value and
    /// `on_complete` once after the final value.
    ///
    /// Cancelling the returned handle stops both callbacks.
    fn tween(&self, tween: Tween, on_update: UpdateFn, on_complete: Task) -> CancelHandle;
}

// ============================================================================
// FrameLoop
// ============================================================================

struct Timer {
    due: Duration,
    seq: u64,
    handle: CancelHandle,
    task: Task,
}

struct ActiveTween {
    tween: Tween,
    started_at: Option<Duration>,
    handle: CancelHandle,
    on_update: UpdateFn,
    on_complete: Option<Task>,
}

#[derive(Default)]
struct LoopState {
    now: Duration,
    frame: u64,
    next_seq: u64,
    queues: [Vec<Task>; 3],
    timers: Vec<Timer>,
    tweens: Vec<ActiveTween>,
}

/// Deterministic frame loop driven by explicit timestamps.
///
/// Single-threaded by construction: queued work is `!Send` and no borrow of
/// the loop's state is held while a task or callback runs, so callbacks may
/// schedule further work.
#[derive(Default)]
pub struct FrameLoop {
    state: RefCell<LoopState>,
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FrameLoop")
            .field("now", &state.now)
            .field("frame", &state.frame)
            .field("queued", &state.queues.iter().map(Vec::len).sum::<usize>())
            .field("timers", &state.timers.len())
            .field("tweens", &state.tweens.len())
            .finish()
    }
}

impl FrameLoop {
    /// Creates an idle loop at time zero.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of frames ticked so far.
    #[must_use]
    pub fn frame(&self) -> u64 { self.state.borrow().frame }

    /// Number of live (not cancelled) tweens.
    #[must_use]
    pub fn active_tweens(&self) -> usize {
        self.state.borrow().tweens.iter().filter(|t| !t.handle.is_cancelled()).count()
    }

    /// Number of live (not cancelled) timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.iter().filter(|t| !t.handle.is_cancelled()).count()
    }

    /// Returns whether any task, timer or tween is waiting for a frame.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        let state = self.state.borrow();
        state.queues.iter().any(|queue| !queue.is_empty())
            || state.timers.iter().any(|t| !t.handle.is_cancelled())
            || state.tweens.iter().any(|t| !t.handle.is_cancelled())
    }

    /// Runs one frame at time `now`.
    ///
    /// Time never goes backwards: an earlier `now` is treated as the last
    /// frame's time.
    pub fn tick(&self, now: Duration) {
        {
            let mut state = self.state.borrow_mut();
            state.now = state.now.max(now);
            state.frame += 1;
        }

        self.run_timers();
        self.run_phase(Phase::Update);
        self.step_tweens();
        self.run_phase(Phase::Render);
        self.run_phase(Phase::PostRender);
    }

    /// Ticks at a fixed frame interval until no work is left or `limit`
    /// frames ran. Returns the number of frames ticked.
    pub fn run_until_idle(&self, frame_interval: Duration, limit: usize) -> usize {
        let mut frames = 0;
        while frames < limit && self.has_pending_work() {
            let now = self.now().saturating_add(frame_interval);
            self.tick(now);
            frames += 1;
        }
        frames
    }

    fn run_timers(&self) {
        let due = {
            let mut state = self.state.borrow_mut();
            let now = state.now;
            let (mut due, pending): (Vec<_>, Vec<_>) =
                std::mem::take(&mut state.timers).into_iter().partition(|t| t.due <= now);
            state.timers = pending;
            due.sort_by_key(|t| (t.due, t.seq));
            due
        };

        for timer in due {
            if !timer.handle.is_cancelled() {
                (timer.task)();
            }
        }
    }

    fn run_phase(&self, phase: Phase) {
        let tasks = std::mem::take(&mut self.state.borrow_mut().queues[phase.index()]);
        for task in tasks {
            task();
        }
    }

    fn step_tweens(&self) {
        let (tweens, now) = {
            let mut state = self.state.borrow_mut();
            (std::mem::take(&mut state.tweens), state.now)
        };

        let mut live = Vec::with_capacity(tweens.len());
        for mut active in tweens {
            if active.handle.is_cancelled() {
                continue;
            }

            let started_at = *active.started_at.get_or_insert(now);
            let sample = active.tween.sample(now.saturating_sub(started_at));
            (active.on_update)(sample.value);

            if active.handle.is_cancelled() {
                continue;
            }

            if sample.finished {
                if let Some(on_complete) = active.on_complete.take() {
                    on_complete();
                }
            } else {
                live.push(active);
            }
        }

        let mut state = self.state.borrow_mut();
        // Tweens started from inside a callback were pushed meanwhile.
        let started = std::mem::replace(&mut state.tweens, live);
        state.tweens.extend(started);
    }
}

impl FrameScheduler for FrameLoop {
    fn now(&self) -> Duration { self.state.borrow().now }

    fn schedule(&self, phase: Phase, task: Task) {
        self.state.borrow_mut().queues[phase.index()].push(task);
    }

    fn defer(&self, delay: Duration, task: Task) -> CancelHandle {
        let handle = CancelHandle::new();
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now.saturating_add(delay);
        state.timers.push(Timer { due, seq, handle: handle.clone(), task });
        handle
    }

    fn tween(&self, tween: Tween, on_update: UpdateFn, on_complete: Task) -> CancelHandle {
        let handle = CancelHandle::new();
        self.state.borrow_mut().tweens.push(ActiveTween {
            tween,
            started_at: None,
            handle: handle.clone(),
            on_update,
            on_complete: Some(on_complete),
        });
        handle
    }
}
