//! Engine handle: one animator per container.
//!
//! [`wrap_grid`] records the starting position of every item and returns a
//! [`GridAnimator`]. The host then forwards the container's change batches,
//! window resizes and container scrolls to it. Each animator owns its own
//! position cache, so animators on different containers never interact.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::animation::state::{ItemId, Motion, PositionCache};
use crate::config::{EasingType, GridOptions, Stagger};
use crate::element::{ChangeRecord, Element};
use crate::error::{GridError, GridResult};
use crate::geometry::Rect;
use crate::reconcile::{self, PassReport};
use crate::sync::{CancelHandle, FrameScheduler, Gate, Throttle};

/// Minimum time between two resize-triggered re-records.
pub const RESIZE_THROTTLE: Duration = Duration::from_millis(250);

/// Minimum time between two scroll-triggered re-records.
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(20);

/// Host callback receiving the elements of one pass.
pub type Callback<E> = Rc<dyn Fn(&[E])>;

pub(crate) type Shared<E> = Rc<RefCell<GridState<E>>>;
pub(crate) type WeakShared<E> = Weak<RefCell<GridState<E>>>;

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Resize,
    Scroll,
}

impl Channel {
    const fn interval(self) -> Duration {
        match self {
            Self::Resize => RESIZE_THROTTLE,
            Self::Scroll => SCROLL_THROTTLE,
        }
    }
}

#[derive(Debug)]
struct ThrottledSubscription {
    throttle: Throttle,
    trailing: Option<CancelHandle>,
}

impl ThrottledSubscription {
    const fn new(channel: Channel) -> Self {
        Self { throttle: Throttle::new(channel.interval()), trailing: None }
    }
}

#[derive(Debug)]
pub(crate) struct Subscriptions {
    mutations: bool,
    resize: Option<ThrottledSubscription>,
    scroll: Option<ThrottledSubscription>,
}

impl Subscriptions {
    const fn engaged() -> Self {
        Self {
            mutations: true,
            resize: Some(ThrottledSubscription::new(Channel::Resize)),
            scroll: Some(ThrottledSubscription::new(Channel::Scroll)),
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> Option<&mut ThrottledSubscription> {
        match channel {
            Channel::Resize => self.resize.as_mut(),
            Channel::Scroll => self.scroll.as_mut(),
        }
    }

    fn unsubscribe(&mut self, channel: Channel) {
        let slot = match channel {
            Channel::Resize => &mut self.resize,
            Channel::Scroll => &mut self.scroll,
        };
        if let Some(trailing) = slot.take().and_then(|sub| sub.trailing) {
            trailing.cancel();
        }
    }

    fn unsubscribe_all(&mut self) {
        self.mutations = false;
        self.unsubscribe(Channel::Resize);
        self.unsubscribe(Channel::Scroll);
    }
}

// ============================================================================
// State
// ============================================================================

/// Everything one animator owns.
pub(crate) struct GridState<E: Element> {
    pub(crate) container: E,
    pub(crate) options: GridOptions,
    pub(crate) cache: PositionCache<E>,
    pub(crate) on_start: Option<Callback<E>>,
    pub(crate) on_end: Option<Callback<E>>,
    subscriptions: Subscriptions,
}

/// Re-records the cached geometry of `elements`.
///
/// No-op when the container has no layout box.
pub(crate) fn record_elements<E: Element>(shared: &Shared<E>, elements: &[E]) {
    let container = shared.borrow().container.clone();
    let Some(container_rect) = container.bounding_rect() else {
        tracing::trace!("container has no layout box, skipping record");
        return;
    };
    shared.borrow_mut().cache.record(elements, container_rect);
}

/// Re-records every child of the container.
pub(crate) fn record_all<E: Element>(shared: &Shared<E>) {
    let children = shared.borrow().container.children();
    record_elements(shared, &children);
}

// ============================================================================
// Builder
// ============================================================================

/// Configures a [`GridAnimator`] before it starts tracking.
pub struct GridAnimatorBuilder<E: Element> {
    container: E,
    options: GridOptions,
    on_start: Option<Callback<E>>,
    on_end: Option<Callback<E>>,
}

impl<E: Element> fmt::Debug for GridAnimatorBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridAnimatorBuilder")
            .field("options", &self.options)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: Element + 'static> GridAnimatorBuilder<E> {
    /// Replaces all options at once.
    #[must_use]
    pub fn options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the tween duration in milliseconds.
    #[must_use]
    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.options = self.options.with_duration_ms(duration_ms);
        self
    }

    /// Sets the per-item start delay.
    #[must_use]
    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.options = self.options.with_stagger(stagger);
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingType) -> Self {
        self.options = self.options.with_easing(easing);
        self
    }

    /// Sets the easing curve by name.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidEasing`] for an unknown name.
    pub fn easing_name(mut self, name: &str) -> GridResult<Self> {
        self.options = self.options.with_easing_name(name)?;
        Ok(self)
    }

    /// Called with the items of a pass right before their FLIP jump.
    ///
    /// Items interrupted by the pass have already had their transforms
    /// cleared at this point.
    #[must_use]
    pub fn on_start(mut self, callback: impl Fn(&[E]) + 'static) -> Self {
        self.on_start = Some(Rc::new(callback));
        self
    }

    /// Called once every tween of a pass completed naturally.
    #[must_use]
    pub fn on_end(mut self, callback: impl Fn(&[E]) + 'static) -> Self {
        self.on_end = Some(Rc::new(callback));
        self
    }

    /// Records the initial positions and starts listening.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DetachedContainer`] if the container is not in
    /// a document.
    pub fn build(self, scheduler: Rc<dyn FrameScheduler>) -> GridResult<GridAnimator<E>> {
        if !self.container.is_connected() {
            return Err(GridError::DetachedContainer);
        }

        let shared = Rc::new(RefCell::new(GridState {
            container: self.container,
            options: self.options,
            cache: PositionCache::new(),
            on_start: self.on_start,
            on_end: self.on_end,
            subscriptions: Subscriptions::engaged(),
        }));
        record_all(&shared);

        tracing::debug!(
            items = shared.borrow().cache.len(),
            options = ?shared.borrow().options,
            "grid wrapped"
        );
        Ok(GridAnimator { shared, scheduler })
    }
}

/// Starts animating layout changes of `container` with `options`.
///
/// # Errors
///
/// Returns [`GridError::DetachedContainer`] if the container is not in a
/// document.
pub fn wrap_grid<E: Element + 'static>(
    container: E,
    options: GridOptions,
    scheduler: Rc<dyn FrameScheduler>,
) -> GridResult<GridAnimator<E>> {
    GridAnimator::builder(container).options(options).build(scheduler)
}

// ============================================================================
// GridAnimator
// ============================================================================

/// Handle to the animation engine of one container.
///
/// Dropping the handle stops tracking; tweens already running still finish.
pub struct GridAnimator<E: Element> {
    shared: Shared<E>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl<E: Element> fmt::Debug for GridAnimator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.borrow();
        f.debug_struct("GridAnimator")
            .field("options", &state.options)
            .field("items", &state.cache.len())
            .field("subscriptions", &state.subscriptions)
            .finish_non_exhaustive()
    }
}

impl<E: Element + 'static> GridAnimator<E> {
    /// Starts configuring an animator for `container`.
    #[must_use]
    pub fn builder(container: E) -> GridAnimatorBuilder<E> {
        GridAnimatorBuilder { container, options: GridOptions::default(), on_start: None, on_end: None }
    }

    /// Stops listening to mutations, resizes and scrolls.
    ///
    /// Animations already in flight are left to finish.
    pub fn disengage(&self) {
        self.shared.borrow_mut().subscriptions.unsubscribe_all();
        tracing::debug!("grid disengaged");
    }

    /// Returns whether the animator still reacts to mutations.
    #[must_use]
    pub fn is_engaged(&self) -> bool { self.shared.borrow().subscriptions.mutations }

    /// Runs a pass now, as if a layout-affecting change had been observed.
    ///
    /// Works after [`disengage`](Self::disengage) too.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MultipleChildWrappers`] if an item that moved
    /// has more than one direct child.
    pub fn force_animation(&self) -> GridResult<PassReport> {
        reconcile::reconcile_forced(&self.shared, &self.scheduler)
    }

    /// Handles one batch of changes observed under the container.
    ///
    /// Returns `Ok(None)` when the animator is disengaged or the batch holds
    /// no layout-relevant change.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MultipleChildWrappers`] if an item that moved
    /// has more than one direct child.
    pub fn notify_mutations(&self, records: &[ChangeRecord]) -> GridResult<Option<PassReport>> {
        if !self.is_engaged() {
            return Ok(None);
        }
        reconcile::reconcile(&self.shared, &self.scheduler, records)
    }

    /// Handles a window resize.
    pub fn notify_resize(&self) { self.throttled(Channel::Resize); }

    /// Handles a scroll of the container.
    pub fn notify_scroll(&self) { self.throttled(Channel::Scroll); }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> GridOptions { self.shared.borrow().options.clone() }

    /// The animated container.
    #[must_use]
    pub fn container(&self) -> E { self.shared.borrow().container.clone() }

    /// Number of items observed so far.
    #[must_use]
    pub fn tracked_items(&self) -> usize { self.shared.borrow().cache.len() }

    /// Identity assigned to `element`, if it was observed.
    #[must_use]
    pub fn item_id(&self, element: &E) -> Option<ItemId> { self.shared.borrow().cache.id_of(element) }

    /// Last recorded container-relative geometry of `element`.
    #[must_use]
    pub fn cached_rect(&self, element: &E) -> Option<Rect> {
        self.shared.borrow().cache.entry_for(element).map(|entry| entry.rect)
    }

    /// Motion state of `element`.
    #[must_use]
    pub fn motion(&self, element: &E) -> Option<Motion> {
        self.shared.borrow().cache.entry_for(element).map(|entry| entry.motion.clone())
    }

    /// Returns whether `element` is animating or waiting for a staggered
    /// start.
    #[must_use]
    pub fn is_animating(&self, element: &E) -> bool {
        self.motion(element).is_some_and(|motion| motion.is_active())
    }

    fn throttled(&self, channel: Channel) {
        let now = self.scheduler.now();
        let gate = {
            let mut state = self.shared.borrow_mut();
            let Some(subscription) = state.subscriptions.channel_mut(channel) else {
                return;
            };
            subscription.throttle.poll(now)
        };

        match gate {
            Gate::Run => run_channel(&self.shared, channel),
            Gate::Skip => tracing::trace!(?channel, "throttled"),
            Gate::Defer(delay) => {
                let shared = Rc::downgrade(&self.shared);
                let scheduler = Rc::downgrade(&self.scheduler);
                let handle = self.scheduler.defer(
                    delay,
                    Box::new(move || {
                        let (Some(shared), Some(scheduler)) = (shared.upgrade(), scheduler.upgrade())
                        else {
                            return;
                        };
                        let live = {
                            let mut state = shared.borrow_mut();
                            state.subscriptions.channel_mut(channel).is_some_and(|subscription| {
                                subscription.throttle.fire_trailing(scheduler.now());
                                subscription.trailing = None;
                                true
                            })
                        };
                        if live {
                            run_channel(&shared, channel);
                        }
                    }),
                );
                if let Some(subscription) = self.shared.borrow_mut().subscriptions.channel_mut(channel) {
                    subscription.trailing = Some(handle);
                }
            }
        }
    }
}

fn run_channel<E: Element>(shared: &Shared<E>, channel: Channel) {
    if channel == Channel::Resize {
        let container = shared.borrow().container.clone();
        if !container.is_connected() {
            shared.borrow_mut().subscriptions.unsubscribe(Channel::Resize);
            tracing::debug!("container detached, dropping resize subscription");
            return;
        }
    }
    record_all(shared);
}
