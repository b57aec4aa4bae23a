//! Starts FLIP tweens for the items a reconciliation pass selected.

use std::cell::{Cell, OnceCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use smallvec::SmallVec;

use super::state::{ItemId, Motion};
use super::transform::{WriteMode, apply_coords};
use crate::element::Element;
use crate::geometry::{Coords, Rect, container_relative};
use crate::grid::{Callback, Shared, WeakShared, record_elements};
use crate::sync::{CancelHandle, FrameScheduler, Phase, Tween};

/// An item whose geometry changed since it was last recorded.
#[derive(Debug, Clone)]
pub struct PendingAnimation<E> {
    /// The item.
    pub element: E,
    /// Its identity.
    pub id: ItemId,
    /// Cached (old) geometry.
    pub first: Rect,
    /// Freshly measured (new) geometry.
    pub last: Rect,
}

/// Tracks the natural completion of every tween started by one pass.
struct Batch<E> {
    remaining: Cell<usize>,
    elements: Vec<E>,
    on_end: Option<Callback<E>>,
}

impl<E> Batch<E> {
    fn complete_one(&self) {
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        if remaining == 0
            && let Some(on_end) = &self.on_end
        {
            on_end(&self.elements);
        }
    }
}

/// Starts the animations for one pass.
///
/// Child wrappers are measured for every item before the first style write,
/// keeping reads and writes in separate passes.
#[allow(clippy::float_cmp)]
pub fn start_animations<E>(
    shared: &Shared<E>,
    scheduler: &Rc<dyn FrameScheduler>,
    container_rect: Rect,
    items: Vec<PendingAnimation<E>>,
) where
    E: Element + 'static,
{
    let child_rects: SmallVec<[Option<Rect>; 16]> = items
        .iter()
        .map(|item| {
            item.element
                .children()
                .first()
                .and_then(Element::bounding_rect)
                .map(|rect| container_relative(container_rect, rect))
        })
        .collect();

    let (options, on_end) = {
        let state = shared.borrow();
        (state.options.clone(), state.on_end.clone())
    };

    let batch = Rc::new(Batch {
        remaining: Cell::new(items.len()),
        elements: items.iter().map(|item| item.element.clone()).collect(),
        on_end,
    });

    for (index, (item, child_rect)) in items.into_iter().zip(child_rects).enumerate() {
        let coords = Coords::flip(item.first, item.last);
        tracing::trace!(item = %item.id, %coords, "flip");

        item.element.set_transform_origin_top_left();
        if let Some(child) = item.element.children().first()
            && child_rect.is_some_and(|rect| rect.x == item.last.x && rect.y == item.last.y)
        {
            child.set_transform_origin_top_left();
        }
        apply_coords(&item.element, coords, WriteMode::Immediate, scheduler.as_ref());

        let tween = Tween::new(coords, Coords::IDENTITY, options.duration(), options.easing);
        let run = ItemRun {
            shared: Rc::downgrade(shared),
            scheduler: Rc::downgrade(scheduler),
            element: item.element,
            id: item.id,
            batch: Rc::clone(&batch),
        };

        let motion = match options.stagger.delay_for(index) {
            None => Motion::Animating(run.start(tween)),
            Some(delay) => Motion::PendingStart(run.defer(scheduler.as_ref(), delay, tween)),
        };
        // A pass started from `on_start` may have claimed the item already.
        let previous = shared.borrow_mut().cache.set_motion(item.id, motion);
        if let Some(handle) = previous.handle() {
            tracing::trace!(item = %item.id, "superseded nested motion");
            handle.cancel();
        }
    }
}

/// Everything one item's tween callbacks need.
struct ItemRun<E: Element> {
    shared: WeakShared<E>,
    scheduler: Weak<dyn FrameScheduler>,
    element: E,
    id: ItemId,
    batch: Rc<Batch<E>>,
}

impl<E: Element + 'static> ItemRun<E> {
    /// Starts the tween now and returns its handle.
    fn start(self, tween: Tween) -> CancelHandle {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return CancelHandle::new();
        };

        let slot: Rc<OnceCell<CancelHandle>> = Rc::new(OnceCell::new());

        let on_update = {
            let element = self.element.clone();
            let shared = self.shared.clone();
            let scheduler = self.scheduler.clone();
            Box::new(move |value: Coords| {
                let Some(scheduler) = scheduler.upgrade() else {
                    return;
                };
                apply_coords(&element, value, WriteMode::Scheduled, scheduler.as_ref());
                let element = element.clone();
                let shared = shared.clone();
                scheduler.schedule(
                    Phase::PostRender,
                    Box::new(move || {
                        if let Some(shared) = shared.upgrade() {
                            record_elements(&shared, std::slice::from_ref(&element));
                        }
                    }),
                );
            })
        };

        let on_complete = {
            let slot = Rc::clone(&slot);
            let shared = self.shared.clone();
            let id = self.id;
            let batch = Rc::clone(&self.batch);
            Box::new(move || {
                if let (Some(shared), Some(handle)) = (shared.upgrade(), slot.get()) {
                    shared.borrow_mut().cache.finish_motion(id, handle);
                }
                tracing::trace!(item = %id, "tween complete");
                batch.complete_one();
            })
        };

        let handle = scheduler.tween(tween, on_update, on_complete);
        let _ = slot.set(handle.clone());
        handle
    }

    /// Defers the start by `delay`; the returned handle cancels the pending
    /// start.
    fn defer(self, scheduler: &dyn FrameScheduler, delay: Duration, tween: Tween) -> CancelHandle {
        let timer: Rc<OnceCell<CancelHandle>> = Rc::new(OnceCell::new());
        let timer_slot = Rc::clone(&timer);

        let handle = scheduler.defer(
            delay,
            Box::new(move || {
                let Some(scheduler) = self.scheduler.upgrade() else {
                    return;
                };
                scheduler.schedule(
                    Phase::Update,
                    Box::new(move || {
                        let Some(timer) = timer_slot.get() else {
                            return;
                        };
                        if timer.is_cancelled() {
                            return;
                        }
                        let Some(shared) = self.shared.upgrade() else {
                            return;
                        };
                        let id = self.id;
                        let still_pending = matches!(
                            shared.borrow().cache.lookup(id).map(|entry| &entry.motion),
                            Some(Motion::PendingStart(pending)) if pending.same_as(timer)
                        );
                        if !still_pending {
                            return;
                        }
                        let handle = self.start(tween);
                        shared.borrow_mut().cache.set_motion(id, Motion::Animating(handle));
                    }),
                );
            }),
        );
        let _ = timer.set(handle.clone());
        handle
    }
}
